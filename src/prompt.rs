// src/prompt.rs

use crate::models::{ChatContext, ConditionSet};

const GUIDELINES: &str = "Key guidelines:
- Always be warm, empathetic, and supportive
- Provide specific, actionable advice tailored to their conditions and Indian context
- Consider Indian climate, traditional foods, and lifestyle patterns
- Keep responses concise but detailed enough to be helpful (max 200 words)
- Use **bold** for important points and *italics* for emphasis
- Always include a disclaimer that this doesn't replace professional medical advice
- If asked about diet plans, provide specific Indian meal suggestions and foods to include/avoid
- If asked about routines, create detailed daily schedules suitable for Indian lifestyle
- If asked about exercises, suggest safe activities that work in Indian climate/settings
- Be very specific rather than generic, with Indian cultural context
- Consider how their multiple conditions might interact
- Format your response with clear sections using **headers** and bullet points where helpful";

const DOCUMENT_INSTRUCTION: &str = "IMPORTANT: The patient has provided medical documents. Please reference these documents in your response when relevant and provide advice based on the information contained in them. If lab results or previous prescriptions are mentioned, incorporate this information into your recommendations.";

/// Builds the prompt sent to the language model for one chat turn.
pub fn build_system_prompt(context: &ChatContext) -> String {
    let condition_names = context.conditions.joined_names();

    let mut prompt = format!(
        "You are a helpful, caring health assistant providing personalized advice for someone in India with multiple health conditions: {}. \n\n{}\n\nPatient context (India-based):\n- Current health conditions: {}",
        condition_names, GUIDELINES, condition_names
    );

    if let Some(surgery) = context.relevant_surgery_type() {
        prompt.push_str(&format!("\n- Recent surgery type: {}", surgery));
    }

    if !context.previous_questions.is_empty() {
        prompt.push_str(&format!(
            "\n- Previous questions asked: {}",
            context.previous_questions.join(", ")
        ));
    }

    if !context.attachments.is_empty() {
        let names = context
            .attachments
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let contents = context
            .attachments
            .iter()
            .map(|a| format!("{}: {}", a.name, a.content_str()))
            .collect::<Vec<_>>()
            .join("\n\n");

        prompt.push_str(&format!("\n- Medical documents provided: {}", names));
        prompt.push_str(&format!("\n- Document contents for reference:\n{}", contents));
        prompt.push_str(&format!("\n\n{}", DOCUMENT_INSTRUCTION));
    }

    prompt.push_str(&format!(
        "\n\nCurrent question: {}\n\nRespond naturally and specifically to their question, considering all their health conditions and how they might interact with each other.",
        context.current_question
    ));

    prompt
}

/// Prompt for the short greeting shown when a chat starts.
pub fn build_intro_prompt(conditions: &ConditionSet) -> String {
    format!(
        "Generate a warm, welcoming greeting (max 30 words) for someone who just selected that they have these health conditions: {}. Be empathetic and supportive, letting them know you're here to help with their health journey.",
        conditions.joined_names()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Attachment, ConditionKey};

    fn context(conditions: Vec<ConditionKey>, question: &str) -> ChatContext {
        ChatContext::new(ConditionSet::new(conditions).unwrap(), question)
    }

    #[test]
    fn test_prompt_lists_condition_names_and_question() {
        let ctx = context(
            vec![ConditionKey::KidneyStones, ConditionKey::Hypertension],
            "How much water should I drink?",
        );
        let prompt = build_system_prompt(&ctx);

        assert!(prompt.contains("- Current health conditions: kidney stones, hypertension"));
        assert!(prompt.contains("Current question: How much water should I drink?"));
        assert!(!prompt.contains("Previous questions asked"));
        assert!(!prompt.contains("Medical documents provided"));
    }

    #[test]
    fn test_surgery_line_requires_recent_surgery() {
        let mut ctx = context(vec![ConditionKey::Pregnant], "diet?");
        ctx.surgery_type = Some("C-section".to_string());
        assert!(!build_system_prompt(&ctx).contains("Recent surgery type"));

        let mut ctx = context(vec![ConditionKey::Pregnant, ConditionKey::RecentSurgery], "diet?");
        ctx.surgery_type = Some("C-section".to_string());
        assert!(build_system_prompt(&ctx).contains("\n- Recent surgery type: C-section"));
    }

    #[test]
    fn test_previous_questions_are_joined() {
        let mut ctx = context(vec![ConditionKey::Thyroid], "And sleep?");
        ctx.previous_questions = vec!["Diet?".to_string(), "Exercise?".to_string()];
        assert!(build_system_prompt(&ctx).contains("- Previous questions asked: Diet?, Exercise?"));
    }

    #[test]
    fn test_attachments_are_inlined_verbatim() {
        let mut ctx = context(vec![ConditionKey::Diabetes], "Is this okay?");
        ctx.attachments = vec![
            Attachment::text("labs.txt", "text/plain", "HbA1c: 7.2%\nFasting: 140"),
            Attachment::text("rx.txt", "text/plain", "Metformin 500mg"),
        ];
        let prompt = build_system_prompt(&ctx);

        assert!(prompt.contains("- Medical documents provided: labs.txt, rx.txt"));
        assert!(prompt.contains("labs.txt: HbA1c: 7.2%\nFasting: 140\n\nrx.txt: Metformin 500mg"));
        assert!(prompt.contains(DOCUMENT_INSTRUCTION));
    }

    #[test]
    fn test_intro_prompt_names_conditions() {
        let conditions = ConditionSet::new(vec![ConditionKey::MentalHealth]).unwrap();
        assert!(build_intro_prompt(&conditions).contains("conditions: mental health."));
    }
}
