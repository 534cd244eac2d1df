// chatbot.rs

use crate::api::{GeminiClient, LanguageModel};
use crate::canned;
use crate::config::Config;
use crate::errors::CareResult;
use crate::models::{ChatContext, ConditionSet};
use crate::prompt::{build_intro_prompt, build_system_prompt};
use log::{debug, error, info};

/// Chooses between the language model and the canned answers for each question.
///
/// The model is injected; without one every answer comes from [`canned::make_response`]
/// and no network call is ever attempted.
#[derive(Debug, Clone)]
pub struct Chatbot<M = GeminiClient> {
    model: Option<M>,
}

impl Chatbot<GeminiClient> {
    /// Uses Gemini when the config carries a usable key, otherwise runs offline.
    pub fn from_config(config: &Config) -> CareResult<Self> {
        if !config.has_usable_api_key() {
            info!("No valid Gemini API key, using canned responses");
            return Ok(Self { model: None });
        }

        let client = GeminiClient::from_config(config)?;
        info!("Gemini client ready (model {})", client.model());
        Ok(Self {
            model: Some(client),
        })
    }
}

impl<M: LanguageModel> Chatbot<M> {
    pub fn new(model: Option<M>) -> Self {
        Self { model }
    }

    pub fn offline() -> Self {
        Self { model: None }
    }

    pub fn is_ai_enabled(&self) -> bool {
        self.model.is_some()
    }

    /// Produces the reply for one chat turn. Never fails: errors become a fallback sentence.
    pub async fn generate_response(&self, context: &ChatContext) -> String {
        let Some(model) = &self.model else {
            return canned::make_response(
                context.conditions.primary(),
                &context.current_question,
                context.surgery_type.as_deref(),
            );
        };

        let prompt = build_system_prompt(context);
        debug!("Generated prompt for Gemini: {}", prompt);

        match model.generate(&prompt).await {
            Ok(text) if text.trim().is_empty() => {
                error!("Gemini returned an empty response");
                fallback_response(context)
            }
            Ok(text) => {
                debug!("Gemini raw response: {}", text);
                text.trim().to_string()
            }
            Err(e) => {
                error!("Error generating response from Gemini: {}", e);
                fallback_response(context)
            }
        }
    }

    /// Greeting for a freshly selected set of conditions.
    pub async fn generate_warm_intro(&self, conditions: &ConditionSet) -> String {
        let canned_intro = canned::warm_intro(conditions.primary()).to_string();

        let Some(model) = &self.model else {
            return canned_intro;
        };

        match model.generate(&build_intro_prompt(conditions)).await {
            Ok(text) if text.trim().is_empty() => {
                error!("Gemini returned an empty intro");
                canned_intro
            }
            Ok(text) => text.trim().to_string(),
            Err(e) => {
                error!("Error generating intro from Gemini: {}", e);
                canned_intro
            }
        }
    }
}

/// Reply used when the language model call fails.
pub fn fallback_response(context: &ChatContext) -> String {
    format!(
        "I understand you're asking about \"{}\". While I'm having trouble connecting to my knowledge base right now, I'd recommend discussing this specific question with your healthcare provider who can give you personalized advice for your {} conditions. In the meantime, focus on staying hydrated, eating balanced meals, and getting adequate rest.",
        context.current_question,
        context.conditions.joined_names()
    )
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::constants::PLACEHOLDER_API_KEY;
    use crate::errors::CareError;
    use crate::models::ConditionKey;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use wiremock::{matchers::method, Mock, MockServer, ResponseTemplate};

    /// Records prompts and replies with a fixed result.
    #[derive(Debug, Default)]
    pub(crate) struct ScriptedModel {
        pub reply: Option<String>,
        pub calls: AtomicUsize,
        pub prompts: Mutex<Vec<String>>,
    }

    impl ScriptedModel {
        pub fn replying(text: &str) -> Self {
            Self {
                reply: Some(text.to_string()),
                ..Default::default()
            }
        }

        pub fn failing() -> Self {
            Self::default()
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl LanguageModel for &ScriptedModel {
        async fn generate(&self, prompt: &str) -> CareResult<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.reply
                .clone()
                .ok_or_else(|| CareError::api_error("quota exceeded"))
        }
    }

    fn context(conditions: Vec<ConditionKey>, question: &str) -> ChatContext {
        ChatContext::new(ConditionSet::new(conditions).unwrap(), question)
    }

    #[tokio::test]
    async fn test_offline_matches_canned_for_primary_condition() {
        let chatbot: Chatbot<&ScriptedModel> = Chatbot::offline();
        assert!(!chatbot.is_ai_enabled());

        let ctx = context(
            vec![ConditionKey::Diabetes, ConditionKey::Pregnant],
            "What sports or exercises are safe for me?",
        );
        let reply = chatbot.generate_response(&ctx).await;

        assert_eq!(
            reply,
            canned::make_response(ConditionKey::Diabetes, &ctx.current_question, None)
        );
        assert!(reply.contains("Safe movement for diabetes:"));
    }

    #[tokio::test]
    async fn test_offline_passes_surgery_type_to_canned() {
        let chatbot: Chatbot<&ScriptedModel> = Chatbot::offline();
        let mut ctx = context(vec![ConditionKey::RecentSurgery], "diet after my operation");
        ctx.surgery_type = Some("Appendix removal".to_string());

        let reply = chatbot.generate_response(&ctx).await;
        assert!(reply.starts_with("After Appendix removal"));
    }

    #[tokio::test]
    async fn test_online_returns_trimmed_reply_with_one_call() {
        let model = ScriptedModel::replying("  **Drink water.**\n\n");
        let chatbot = Chatbot::new(Some(&model));
        assert!(chatbot.is_ai_enabled());

        let ctx = context(vec![ConditionKey::KidneyStones], "How much water?");
        let reply = chatbot.generate_response(&ctx).await;

        assert_eq!(reply, "**Drink water.**");
        assert_eq!(model.call_count(), 1);
        let prompts = model.prompts.lock().unwrap();
        assert!(prompts[0].contains("Current question: How much water?"));
    }

    #[tokio::test]
    async fn test_online_failure_returns_fallback_without_retry() {
        let model = ScriptedModel::failing();
        let chatbot = Chatbot::new(Some(&model));

        let ctx = context(
            vec![ConditionKey::Pcos, ConditionKey::Thyroid],
            "Can I eat rice?",
        );
        let reply = chatbot.generate_response(&ctx).await;

        assert_eq!(reply, fallback_response(&ctx));
        assert!(reply.starts_with("I understand you're asking about \"Can I eat rice?\"."));
        assert!(reply.contains("for your pcos, thyroid conditions."));
        assert_eq!(model.call_count(), 1);
    }

    #[tokio::test]
    async fn test_blank_reply_is_treated_as_failure() {
        let model = ScriptedModel::replying(" \n ");
        let chatbot = Chatbot::new(Some(&model));

        let ctx = context(vec![ConditionKey::Skin], "Acne tips?");
        assert_eq!(chatbot.generate_response(&ctx).await, fallback_response(&ctx));
    }

    #[tokio::test]
    async fn test_warm_intro_offline_and_on_failure() {
        let conditions = ConditionSet::new(vec![ConditionKey::MentalHealth]).unwrap();

        let offline: Chatbot<&ScriptedModel> = Chatbot::offline();
        assert_eq!(
            offline.generate_warm_intro(&conditions).await,
            canned::warm_intro(ConditionKey::MentalHealth)
        );

        let model = ScriptedModel::failing();
        let chatbot = Chatbot::new(Some(&model));
        assert_eq!(
            chatbot.generate_warm_intro(&conditions).await,
            canned::warm_intro(ConditionKey::MentalHealth)
        );
        assert_eq!(model.call_count(), 1);
    }

    #[tokio::test]
    async fn test_blank_intro_falls_back_to_canned() {
        let conditions = ConditionSet::new(vec![ConditionKey::Pregnant]).unwrap();
        let model = ScriptedModel::replying("   \n ");
        let chatbot = Chatbot::new(Some(&model));

        assert_eq!(
            chatbot.generate_warm_intro(&conditions).await,
            canned::warm_intro(ConditionKey::Pregnant)
        );
        assert_eq!(model.call_count(), 1);
    }

    #[tokio::test]
    async fn test_placeholder_key_never_calls_gemini() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let mut config = Config::default();
        config.api_key = Some(PLACEHOLDER_API_KEY.to_string());
        config.api_base_url = mock_server.uri();

        let chatbot = Chatbot::from_config(&config).unwrap();
        assert!(!chatbot.is_ai_enabled());

        let ctx = context(
            vec![ConditionKey::Diabetes],
            "What sports or exercises are safe for me?",
        );
        let reply = chatbot.generate_response(&ctx).await;
        assert_eq!(
            reply,
            canned::make_response(ConditionKey::Diabetes, &ctx.current_question, None)
        );
        assert!(reply.contains("Safe movement for diabetes:"));

        let intro = chatbot
            .generate_warm_intro(&ConditionSet::new(vec![ConditionKey::Diabetes]).unwrap())
            .await;
        assert_eq!(intro, canned::warm_intro(ConditionKey::Diabetes));
    }

    #[test]
    fn test_from_config_without_key_is_offline() {
        let chatbot = Chatbot::from_config(&Config::default()).unwrap();
        assert!(!chatbot.is_ai_enabled());

        let mut config = Config::default();
        config.api_key = Some("key".to_string());
        assert!(Chatbot::from_config(&config).unwrap().is_ai_enabled());
    }
}
