// src/canned.rs
//
// Offline answers used when no language model is configured.

use crate::models::ConditionKey;

pub const CLARIFYING_RESPONSE: &str = "I hear you. Can you share a bit more about what you need today—diet, exercise, routines, or symptoms? I’ll suggest simple, caring steps.";

pub const DEFAULT_INTRO: &str =
    "I'm here for you. Let's explore supportive, practical steps together.";

const SURGERY_DIET_KEYWORDS: &[&str] = &["diet", "food", "meal", "avoid"];

/// Keyword groups in the order they are tested. The first group with a hit decides the answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topic {
    Diet,
    Exercise,
    Routine,
    Triggers,
    Doctor,
    Remedies,
}

impl Topic {
    pub const ORDER: [Topic; 6] = [
        Topic::Diet,
        Topic::Exercise,
        Topic::Routine,
        Topic::Triggers,
        Topic::Doctor,
        Topic::Remedies,
    ];

    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Topic::Diet => &["diet", "food", "meal"],
            Topic::Exercise => &["exercise", "sport", "workout"],
            Topic::Routine => &["routine", "daily"],
            Topic::Triggers => &["avoid", "trigger"],
            Topic::Doctor => &["doctor", "ask"],
            // "remed" covers remedy and remedies
            Topic::Remedies => &["remed", "home"],
        }
    }

    fn matches(&self, lowercased: &str) -> bool {
        contains_any(lowercased, self.keywords())
    }

    fn response(&self, condition: ConditionKey) -> String {
        let condition_name = condition.name();
        match self {
            Topic::Diet => format!(
                "A gentle, balanced plate helps with {}. Prioritize:\n\
                 - Half plate veggies (cooked or raw as tolerated)\n\
                 - Lean protein (dal, legumes, fish, eggs)\n\
                 - Whole grains (oats, brown rice)\n\
                 - Healthy fats (nuts, seeds, olive oil)\n\
                 Hydrate well. Avoid ultra-processed snacks and too much sugar.",
                condition_name
            ),
            Topic::Exercise => format!(
                "Safe movement for {}:\n\
                 - Start with 15–20 mins of light activity (walk, gentle yoga)\n\
                 - Add mobility drills and breathing\n\
                 - Progress slowly; stop with sharp pain or dizziness\n\
                 Consult a clinician before new routines, especially if symptoms flare.",
                condition_name
            ),
            Topic::Routine => "A calming daily rhythm:\n\
                 - Morning: Hydrate, 5 mins of calm breathing, light stretch\n\
                 - Midday: Balanced meal, short walk\n\
                 - Evening: Device wind-down, gratitude note, aim for consistent sleep\n\
                 Consistency > intensity."
                .to_string(),
            Topic::Triggers => "Common triggers to minimize:\n\
                 - Ultra-processed foods, heavy late-night meals\n\
                 - Irregular sleep and dehydration\n\
                 - Skipping meds or check-ups\n\
                 Track patterns in a simple diary—awareness leads to kinder choices."
                .to_string(),
            Topic::Doctor => "Helpful questions for your doctor:\n\
                 - What signs mean I should seek urgent care?\n\
                 - Which medicines/supplements should I continue or pause?\n\
                 - When can I resume exercise/sex/travel?\n\
                 - Any red flags specific to my history?"
                .to_string(),
            Topic::Remedies => "Gentle home supports (not replacing medical advice):\n\
                 - Warm compresses, herbal teas (ginger, chamomile) as tolerated\n\
                 - Mindful breathing: in 4s, out 6–8s\n\
                 - Light movement and sunshine if possible"
                .to_string(),
        }
    }
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

/// Returns the first topic whose keywords appear in `input`.
pub fn match_topic(input: &str) -> Option<Topic> {
    let lc = input.to_lowercase();
    Topic::ORDER.into_iter().find(|topic| topic.matches(&lc))
}

fn surgery_diet_response(surgery_type: &str) -> String {
    format!(
        "After {}, choose small, frequent meals. Focus on protein (dal, eggs, yogurt), soft veggies, and hydration. Avoid very spicy or oily foods initially. Sip water often. If nausea appears, try ginger tea. Reach out to your doctor if vomiting or severe pain occurs.",
        surgery_type
    )
}

/// Picks a canned answer for a question. Pure and deterministic.
pub fn make_response(condition: ConditionKey, input: &str, surgery_type: Option<&str>) -> String {
    let lc = input.to_lowercase();

    if condition == ConditionKey::RecentSurgery {
        if let Some(surgery) = surgery_type.map(str::trim).filter(|s| !s.is_empty()) {
            if contains_any(&lc, SURGERY_DIET_KEYWORDS) {
                return surgery_diet_response(surgery);
            }
        }
    }

    match match_topic(&lc) {
        Some(topic) => topic.response(condition),
        None => CLARIFYING_RESPONSE.to_string(),
    }
}

/// Greeting shown when a chat starts.
pub fn warm_intro(condition: ConditionKey) -> &'static str {
    match condition {
        ConditionKey::Pregnant => {
            "I'm so glad you're here. Let's make this journey comfortable and safe."
        }
        ConditionKey::RecentSurgery => {
            "Welcome back. Gentle recovery steps can help you heal smoothly."
        }
        ConditionKey::MentalHealth => {
            "You're not alone. Let's take this one gentle step at a time."
        }
        ConditionKey::Skin => {
            "I understand skin concerns can be frustrating. Let's find gentle, effective solutions together."
        }
        ConditionKey::Diabetes => {
            "Managing diabetes can feel overwhelming, but small steps make a big difference. I'm here to help."
        }
        ConditionKey::Pcos => {
            "PCOS affects everyone differently. Let's find approaches that work specifically for you."
        }
        _ => DEFAULT_INTRO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diet_keywords_pick_diet_template_for_every_condition() {
        for condition in ConditionKey::ALL {
            for input in ["Give me a DIET plan", "Which foods help?", "meal ideas"] {
                let response = make_response(condition, input, None);
                assert!(
                    response.starts_with(&format!(
                        "A gentle, balanced plate helps with {}.",
                        condition.name()
                    )),
                    "{} / {}",
                    condition,
                    input
                );
            }
        }
    }

    #[test]
    fn test_surgery_type_overrides_diet_template() {
        let response = make_response(
            ConditionKey::RecentSurgery,
            "What food is good?",
            Some("Gallbladder removal"),
        );
        assert!(response.starts_with("After Gallbladder removal, choose small, frequent meals."));

        let response = make_response(ConditionKey::RecentSurgery, "Plan my meals", Some("C-section"));
        assert!(response.starts_with("After C-section"));
    }

    #[test]
    fn test_surgery_type_also_answers_avoid_questions() {
        let response = make_response(ConditionKey::RecentSurgery, "Foods to avoid", Some("C-section"));
        assert!(response.starts_with("After C-section"));
    }

    #[test]
    fn test_blank_surgery_type_falls_back_to_generic_diet() {
        let response = make_response(ConditionKey::RecentSurgery, "diet please", Some("  "));
        assert!(response.starts_with("A gentle, balanced plate helps with recent surgery."));
    }

    #[test]
    fn test_surgery_type_ignored_for_other_conditions() {
        let response = make_response(ConditionKey::Diabetes, "diet please", Some("C-section"));
        assert!(response.starts_with("A gentle, balanced plate helps with diabetes."));
    }

    #[test]
    fn test_no_keyword_returns_clarifying_template() {
        for input in ["hello", "I feel tired", ""] {
            assert_eq!(make_response(ConditionKey::Thyroid, input, None), CLARIFYING_RESPONSE);
        }
    }

    #[test]
    fn test_diet_wins_over_exercise() {
        let response = make_response(ConditionKey::Weight, "exercise and diet tips", None);
        assert!(response.starts_with("A gentle, balanced plate"));
        assert_eq!(match_topic("exercise and diet tips"), Some(Topic::Diet));
    }

    #[test]
    fn test_topic_precedence_order() {
        assert_eq!(match_topic("daily workout"), Some(Topic::Exercise));
        assert_eq!(match_topic("daily things to avoid"), Some(Topic::Routine));
        assert_eq!(match_topic("triggers to ask about"), Some(Topic::Triggers));
        assert_eq!(match_topic("doctor-approved home care"), Some(Topic::Doctor));
        assert_eq!(match_topic("Safe home remedies"), Some(Topic::Remedies));
        assert_eq!(match_topic("good morning"), None);
    }

    #[test]
    fn test_sports_question_for_diabetes() {
        let response = make_response(
            ConditionKey::Diabetes,
            "What sports or exercises are safe for me?",
            None,
        );
        assert!(response.contains("Safe movement for diabetes:"));
    }

    #[test]
    fn test_warm_intro_has_default() {
        assert_eq!(warm_intro(ConditionKey::Thyroid), DEFAULT_INTRO);
        assert!(warm_intro(ConditionKey::Pregnant).contains("comfortable and safe"));
    }
}
