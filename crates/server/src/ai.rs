//! Outbound client for the OpenRouter-compatible chat completion API used
//! by the tutoring chat.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

const AI_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_RESPONSE_TOKENS: u32 = 500;
/// How much conversation history is replayed to the provider.
pub const CONTEXT_MESSAGES: u64 = 6;

const DEFAULT_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
const DEFAULT_MODEL: &str = "anthropic/claude-sonnet-4";

#[derive(Debug, Error)]
pub enum AiError {
    #[error("AI request timed out")]
    Timeout,
    #[error("AI provider unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct AiMessage {
    pub role: String,
    pub content: String,
}

impl AiMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        AiMessage {
            role: role.into(),
            content: content.into(),
        }
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [AiMessage],
    max_tokens: u32,
    temperature: f64,
    stream: bool,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}

#[derive(Clone)]
pub struct AiClient {
    client: Client,
    api_url: String,
    api_key: Option<String>,
    model: String,
}

impl AiClient {
    pub fn from_env() -> Self {
        AiClient {
            client: Client::new(),
            api_url: std::env::var("AI_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            api_key: std::env::var("AI_API_KEY").ok(),
            model: std::env::var("AI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
        }
    }

    /// One attempt, bounded wait. No retries: the caller either surfaces
    /// the timeout or degrades to a fallback message.
    pub async fn chat(&self, messages: &[AiMessage]) -> Result<String, AiError> {
        match tokio::time::timeout(AI_TIMEOUT, self.request(messages)).await {
            Ok(result) => result,
            Err(_) => Err(AiError::Timeout),
        }
    }

    async fn request(&self, messages: &[AiMessage]) -> Result<String, AiError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AiError::Unavailable("AI API key not configured".to_string()))?;

        let body = ChatCompletionRequest {
            model: &self.model,
            messages,
            max_tokens: MAX_RESPONSE_TOKENS,
            temperature: 0.7,
            stream: false,
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AiError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(AiError::Unavailable(format!("{status}: {detail}")));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| AiError::Unavailable(format!("invalid response: {e}")))?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| AiError::Unavailable("empty response".to_string()))
    }
}

/// Shown to the student when the provider fails for any reason other than
/// a timeout.
pub const FALLBACK_MESSAGE: &str = "I'm having trouble connecting to my AI service right now. \
This might be due to high demand. Please try asking your question again in a moment, or \
rephrase it more simply.";

/// System prompt framing the tutoring conversation around the student.
pub fn system_prompt(
    student_name: &str,
    class_name: Option<&str>,
    grade_label: Option<&str>,
    school_name: Option<&str>,
) -> String {
    let class_name = class_name.unwrap_or("your class");
    let grade = grade_label.unwrap_or("your grade");
    let school = school_name.unwrap_or("your school");

    format!(
        "You are an AI tutor helping {student_name}, a student in {class_name} at {school}.\n\n\
Key guidelines:\n\
- Give clear, concise educational answers\n\
- Use age-appropriate language for grade {grade}\n\
- Be encouraging and supportive\n\
- Keep responses focused and helpful\n\n\
Student: {student_name} | Class: {class_name} | Grade: {grade}"
    )
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_system_prompt_mentions_context() {
        let prompt = system_prompt("Ami", Some("CM2 A"), Some("CM2"), Some("Ecole du Parc"));
        assert!(prompt.contains("Ami"));
        assert!(prompt.contains("CM2 A"));
        assert!(prompt.contains("Ecole du Parc"));
    }

    #[test]
    fn test_system_prompt_defaults() {
        let prompt = system_prompt("Ami", None, None, None);
        assert!(prompt.contains("your class"));
        assert!(prompt.contains("your school"));
    }
}
