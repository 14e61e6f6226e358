//! Vision Completion (§6): a text completion call with an attached image,
//! used by the QA Verifier in live mode to judge a generated frame.

use async_trait::async_trait;
use base64::Engine;
use serde::Deserialize;
use serde_json::json;
use studio_core::{StudioError, StudioResult};

/// Media types the real provider accepts for an inlined image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageMediaType {
    Jpeg,
    Png,
    Gif,
    Webp,
}

impl ImageMediaType {
    pub fn mime(self) -> &'static str {
        match self {
            ImageMediaType::Jpeg => "image/jpeg",
            ImageMediaType::Png => "image/png",
            ImageMediaType::Gif => "image/gif",
            ImageMediaType::Webp => "image/webp",
        }
    }
}

#[async_trait]
pub trait VisionCompletion: Send + Sync {
    async fn query_with_image(
        &self,
        prompt: &str,
        image_bytes: &[u8],
        media_type: ImageMediaType,
        system_prompt: Option<&str>,
    ) -> StudioResult<String>;
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

/// Real driver: base64-encodes the frame and attaches it as an image
/// content block alongside the text prompt, mirroring
/// `ClaudeClient.query_with_image`.
pub struct AnthropicVisionCompletion {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl AnthropicVisionCompletion {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }
}

#[async_trait]
impl VisionCompletion for AnthropicVisionCompletion {
    async fn query_with_image(
        &self,
        prompt: &str,
        image_bytes: &[u8],
        media_type: ImageMediaType,
        system_prompt: Option<&str>,
    ) -> StudioResult<String> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(image_bytes);
        let mut body = json!({
            "model": self.model,
            "max_tokens": 2048,
            "messages": [{
                "role": "user",
                "content": [
                    {
                        "type": "image",
                        "source": {"type": "base64", "media_type": media_type.mime(), "data": encoded},
                    },
                    {"type": "text", "text": prompt},
                ],
            }],
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
                "vision completion returned status {}",
                response.status()
            )));
        }

        let parsed: AnthropicMessageResponse = response
            .json()
            .await
            .map_err(|e| StudioError::ProviderFailure(format!("malformed vision response: {e}")))?;

        let text: String = parsed.content.into_iter().map(|b| b.text).collect::<Vec<_>>().join("");
        if text.trim().is_empty() {
            return Err(StudioError::ProviderFailure("vision completion returned empty content".to_string()));
        }
        Ok(text)
    }
}

/// Deterministic stand-in returning a canned analysis regardless of the
/// image bytes supplied.
pub struct MockVisionCompletion {
    pub canned_response: String,
}

impl MockVisionCompletion {
    pub fn new(canned_response: impl Into<String>) -> Self {
        Self {
            canned_response: canned_response.into(),
        }
    }
}

#[async_trait]
impl VisionCompletion for MockVisionCompletion {
    async fn query_with_image(
        &self,
        _prompt: &str,
        _image_bytes: &[u8],
        _media_type: ImageMediaType,
        _system_prompt: Option<&str>,
    ) -> StudioResult<String> {
        if self.canned_response.trim().is_empty() {
            return Err(StudioError::ProviderFailure("mock vision completion has no canned response".to_string()));
        }
        Ok(self.canned_response.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_ignores_bytes_and_returns_canned_text() {
        let vision = MockVisionCompletion::new("a lab bench with glassware");
        let text = vision.query_with_image("describe this frame", &[1, 2, 3], ImageMediaType::Png, None).await.unwrap();
        assert_eq!(text, "a lab bench with glassware");
    }

    #[test]
    fn media_types_map_to_expected_mime_strings() {
        assert_eq!(ImageMediaType::Jpeg.mime(), "image/jpeg");
        assert_eq!(ImageMediaType::Webp.mime(), "image/webp");
    }
}
