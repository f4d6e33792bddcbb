//! OpenAI-compatible text generator.
//!
//! Works against any chat-completions API that speaks the OpenAI wire
//! format, including self-hosted gateways via `with_base_url`.

use async_trait::async_trait;

use crate::error::GenerationError;
use crate::security::ApiKey;
use crate::traits::generator::TextGenerator;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Text generator backed by an OpenAI-compatible chat completions API.
pub struct OpenAiGenerator {
    api_key: ApiKey,
    model: String,
    base_url: String,
    client: reqwest::Client,
    /// Sampling temperature for generation calls.
    pub temperature: f32,
}

impl OpenAiGenerator {
    /// Create a new generator for the given model.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: ApiKey::new(api_key),
            model: model.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            client: reqwest::Client::new(),
            temperature: 0.7,
        }
    }

    /// Point at a compatible non-OpenAI endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

#[async_trait]
impl TextGenerator for OpenAiGenerator {
    async fn complete(&self, instruction: &str) -> Result<String, GenerationError> {
        #[derive(serde::Serialize)]
        struct Request<'a> {
            model: &'a str,
            messages: Vec<Message<'a>>,
            temperature: f32,
        }

        #[derive(serde::Serialize)]
        struct Message<'a> {
            role: &'a str,
            content: &'a str,
        }

        #[derive(serde::Deserialize)]
        struct Response {
            choices: Vec<Choice>,
        }

        #[derive(serde::Deserialize)]
        struct Choice {
            message: ResponseMessage,
        }

        #[derive(serde::Deserialize)]
        struct ResponseMessage {
            content: Option<String>,
        }

        let request = Request {
            model: &self.model,
            messages: vec![Message {
                role: "user",
                content: instruction,
            }],
            temperature: self.temperature,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key.expose()))
            .json(&request)
            .send()
            .await
            .map_err(GenerationError::backend)?;

        if !response.status().is_success() {
            return Err(GenerationError::message(format!(
                "chat completions API error: {}",
                response.status()
            )));
        }

        let payload: Response = response.json().await.map_err(GenerationError::backend)?;

        payload
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(GenerationError::EmptyDraft)
    }
}
