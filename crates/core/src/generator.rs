use crate::error::GenerationError;
use crate::models::ConversationTurn;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use url::Url;

pub const GROQ_CHAT_ENDPOINT: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";
pub const DEFAULT_TEMPERATURE: f32 = 0.3;

/// Narrow seam over the hosted answer-generation collaborator.
#[async_trait]
pub trait AnswerGenerator: Send + Sync {
    /// Produce an answer from the strict instruction block, the prior
    /// conversation turns, and the rendered context/question prompt.
    async fn generate(
        &self,
        system_prompt: &str,
        history: &[ConversationTurn],
        user_prompt: &str,
    ) -> Result<String, GenerationError>;
}

/// Groq chat-completions client (OpenAI-compatible payload).
pub struct GroqGenerator {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    temperature: f32,
}

impl GroqGenerator {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: GROQ_CHAT_ENDPOINT.to_string(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    /// Point the client at a different OpenAI-compatible endpoint.
    pub fn with_endpoint(mut self, endpoint: &str) -> Result<Self, GenerationError> {
        self.endpoint = Url::parse(endpoint)?.to_string();
        Ok(self)
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

fn chat_payload(
    model: &str,
    temperature: f32,
    system_prompt: &str,
    history: &[ConversationTurn],
    user_prompt: &str,
) -> Value {
    let mut messages = vec![json!({ "role": "system", "content": system_prompt })];

    for turn in history {
        messages.push(json!({ "role": turn.speaker.role(), "content": turn.message }));
    }

    messages.push(json!({ "role": "user", "content": user_prompt }));

    json!({
        "model": model,
        "temperature": temperature,
        "messages": messages,
    })
}

fn parse_answer(payload: &Value) -> Result<String, GenerationError> {
    payload
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .map(|text| text.trim().to_string())
        .ok_or_else(|| {
            GenerationError::BackendResponse("response has no message content".to_string())
        })
}

#[async_trait]
impl AnswerGenerator for GroqGenerator {
    async fn generate(
        &self,
        system_prompt: &str,
        history: &[ConversationTurn],
        user_prompt: &str,
    ) -> Result<String, GenerationError> {
        let payload = chat_payload(
            &self.model,
            self.temperature,
            system_prompt,
            history,
            user_prompt,
        );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(GenerationError::Auth(status.to_string()));
            }
            StatusCode::TOO_MANY_REQUESTS => {
                return Err(GenerationError::RateLimited(status.to_string()));
            }
            status if !status.is_success() => {
                return Err(GenerationError::BackendResponse(format!(
                    "answer service returned {status}"
                )));
            }
            _ => {}
        }

        let payload: Value = response.json().await?;
        parse_answer(&payload)
    }
}
