use crate::{
    config::Config,
    constants::{API_KEY_HEADER, GEMINI_API_VERSION},
    errors::{CareError, CareResult},
    logging::log_api_call,
    models::ApiCallLog,
};
use chrono::Utc;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::{Duration, Instant};

/// A single-shot text completion backend.
#[allow(async_fn_in_trait)]
pub trait LanguageModel {
    /// Sends one prompt and returns the model's text. No retries.
    async fn generate(&self, prompt: &str) -> CareResult<String>;
}

/// Client for the Gemini `generateContent` endpoint.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Option<Duration>,
    ) -> CareResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            api_key: api_key.into(),
            model: model.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Builds a client from config. Fails if the config holds no usable key.
    pub fn from_config(config: &Config) -> CareResult<Self> {
        let api_key = config
            .usable_api_key()
            .ok_or_else(|| CareError::config_error("No usable Gemini API key configured"))?;

        Self::new(
            api_key,
            &config.model,
            &config.api_base_url,
            config.request_timeout_secs.map(Duration::from_secs),
        )
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}/{}/models/{}:generateContent",
            self.base_url, GEMINI_API_VERSION, self.model
        )
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl LanguageModel for GeminiClient {
    async fn generate(&self, prompt: &str) -> CareResult<String> {
        // Prepare request payload
        let endpoint = self.endpoint();
        let payload = json!({
            "contents": [
                {
                    "role": "user",
                    "parts": [{ "text": prompt }]
                }
            ]
        });

        let start_time = Instant::now();

        // Make API request
        let response = self
            .http
            .post(&endpoint)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| CareError::api_error(format!("Request failed: {}", e)))?;

        // Log the API call
        let status = response.status();
        log_api_call(&ApiCallLog {
            timestamp: Utc::now(),
            endpoint: endpoint.clone(),
            request_summary: format!("generateContent ({} prompt chars)", prompt.len()),
            response_status: status.as_u16(),
            response_time_ms: start_time.elapsed().as_millis(),
        });

        // Check for API errors before touching the body
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(CareError::api_error(format!(
                "API returned error: {} - {}",
                status, error_text
            )));
        }

        // Parse response
        let body: Value = response
            .json()
            .await
            .map_err(|e| CareError::api_error(format!("Failed to parse API response: {}", e)))?;

        extract_text(&body)
    }
}

/// Pulls the reply text out of a `generateContent` response body.
fn extract_text(body: &Value) -> CareResult<String> {
    // Check for API-reported errors
    if let Some(error) = body["error"].as_object() {
        return Err(CareError::api_error(format!(
            "{}: {}",
            error
                .get("status")
                .and_then(Value::as_str)
                .unwrap_or("unknown"),
            error
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("no message")
        )));
    }

    // Extract content
    let parts = body["candidates"][0]["content"]["parts"]
        .as_array()
        .ok_or_else(|| CareError::api_error("Response missing expected content"))?;

    let text: String = parts
        .iter()
        .filter_map(|part| part["text"].as_str())
        .collect();

    if text.trim().is_empty() {
        return Err(CareError::api_error("Empty response received from Gemini"));
    }

    Ok(text)
}
