//! Text Completion (§6): the pluggable LLM driver behind the Producer,
//! ScriptWriter, Critic, and Editor. Streaming, if the real provider does
//! it, is the provider's problem — this trait only promises the final
//! concatenated text.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use studio_core::{StudioError, StudioResult};

/// Queries a text-completion model. Implementations must return
/// `StudioError::ProviderFailure` on an empty or malformed response
/// rather than an empty string — callers rely on a non-empty `Ok` to mean
/// "the model actually said something".
#[async_trait]
pub trait TextCompletion: Send + Sync {
    async fn query(&self, prompt: &str, system_prompt: Option<&str>) -> StudioResult<String>;
}

#[derive(Debug, Deserialize)]
struct AnthropicMessageResponse {
    content: Vec<AnthropicContentBlock>,
}

#[derive(Debug, Deserialize)]
struct AnthropicContentBlock {
    #[serde(default)]
    text: String,
}

/// Real driver, backing onto the Anthropic Messages API: a single user
/// turn plus an optional system prompt, returning the concatenated text
/// blocks.
pub struct AnthropicTextCompletion {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl AnthropicTextCompletion {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }
}

#[async_trait]
impl TextCompletion for AnthropicTextCompletion {
    async fn query(&self, prompt: &str, system_prompt: Option<&str>) -> StudioResult<String> {
        let mut body = json!({
            "model": self.model,
            "max_tokens": 4096,
            "messages": [{"role": "user", "content": prompt}],
        });
        if let Some(system) = system_prompt {
            body["system"] = json!(system);
        }

        let response = self
            .client
            .post("https://api.anthropic.com/v1/messages")
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .json(&body)
            .send()
            .await
            .map_err(|e| StudioError::ProviderError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(StudioError::ProviderFailure(format!(
                "text completion returned status {}",
                response.status()
            )));
        }

        let parsed: AnthropicMessageResponse = response
            .json()
            .await
            .map_err(|e| StudioError::ProviderFailure(format!("malformed completion response: {e}")))?;

        let text: String = parsed.content.into_iter().map(|b| b.text).collect::<Vec<_>>().join("");
        if text.trim().is_empty() {
            return Err(StudioError::ProviderFailure("completion returned empty content".to_string()));
        }
        Ok(text)
    }
}

/// Deterministic stand-in used by the mock agents and tests: echoes a
/// fixed canned response regardless of prompt, so call sites that parse
/// JSON out of the response can be driven with a known payload.
pub struct MockTextCompletion {
    pub canned_response: String,
}

impl MockTextCompletion {
    pub fn new(canned_response: impl Into<String>) -> Self {
        Self {
            canned_response: canned_response.into(),
        }
    }
}

#[async_trait]
impl TextCompletion for MockTextCompletion {
    async fn query(&self, _prompt: &str, _system_prompt: Option<&str>) -> StudioResult<String> {
        if self.canned_response.trim().is_empty() {
            return Err(StudioError::ProviderFailure("mock completion has no canned response configured".to_string()));
        }
        Ok(self.canned_response.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_returns_canned_response() {
        let completion = MockTextCompletion::new("hello world");
        let text = completion.query("anything", None).await.unwrap();
        assert_eq!(text, "hello world");
    }

    #[tokio::test]
    async fn mock_with_empty_canned_response_fails() {
        let completion = MockTextCompletion::new("");
        assert!(completion.query("anything", None).await.is_err());
    }
}
