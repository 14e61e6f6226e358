//! Image Provider (§6): backs the DoP's `dall_e` and `web_image` display
//! modes. Two distinct sourcing strategies live behind the same trait:
//! generative (DALL-E-style) and web search (Wikimedia-style), since the
//! DoP decides which one a scene gets, not the provider.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use studio_core::{StudioError, StudioResult};

/// License tiers a web-sourced image can carry. Ordered so that a lower
/// variant is always at least as permissive as a higher one for the
/// "prefers public domain then CC" filter in §6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ImageLicense {
    PublicDomain,
    CreativeCommons,
    Restricted,
}

/// Search-time filters for web-sourced imagery.
#[derive(Debug, Clone, Default)]
pub struct WebImageSettings {
    pub prefer_landscape: bool,
    pub require_diagram: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneratedImage {
    pub image_url: String,
    pub cost: f64,
    #[serde(default)]
    pub license: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

#[async_trait]
pub trait ImageProvider: Send + Sync {
    async fn generate(&self, prompt: &str, style: Option<&str>) -> StudioResult<GeneratedImage>;

    async fn search_web(&self, query: &str, settings: &WebImageSettings) -> StudioResult<GeneratedImage>;
}

/// Deterministic stand-in covering both sourcing strategies. Web search
/// results are drawn from a small fixed candidate pool so the license /
/// aspect-ratio / diagram filters have something real to discriminate
/// between.
pub struct MockImageProvider {
    pub dalle_cost: f64,
    candidates: Vec<MockWebCandidate>,
}

struct MockWebCandidate {
    url: &'static str,
    license: ImageLicense,
    width: u32,
    height: u32,
    is_diagram: bool,
}

impl MockImageProvider {
    pub fn new() -> Self {
        Self {
            dalle_cost: 0.04,
            candidates: vec![
                MockWebCandidate {
                    url: "https://commons.example.org/restricted_portrait.jpg",
                    license: ImageLicense::Restricted,
                    width: 600,
                    height: 900,
                    is_diagram: false,
                },
                MockWebCandidate {
                    url: "https://commons.example.org/cc_landscape_photo.jpg",
                    license: ImageLicense::CreativeCommons,
                    width: 1200,
                    height: 800,
                    is_diagram: false,
                },
                MockWebCandidate {
                    url: "https://commons.example.org/pd_landscape_diagram.jpg",
                    license: ImageLicense::PublicDomain,
                    width: 1400,
                    height: 900,
                    is_diagram: true,
                },
            ],
        }
    }
}

impl Default for MockImageProvider {
    fn default() -> Self {
        Self::new()
    }
}

fn license_label(license: ImageLicense) -> &'static str {
    match license {
        ImageLicense::PublicDomain => "public_domain",
        ImageLicense::CreativeCommons => "cc",
        ImageLicense::Restricted => "restricted",
    }
}

#[async_trait]
impl ImageProvider for MockImageProvider {
    async fn generate(&self, prompt: &str, style: Option<&str>) -> StudioResult<GeneratedImage> {
        if prompt.trim().is_empty() {
            return Err(StudioError::InvalidInput("image prompt must not be empty".to_string()));
        }
        let suffix = style.unwrap_or("default");
        Ok(GeneratedImage {
            image_url: format!("https://mock-cdn.example.com/dalle_{}_{}.png", prompt.len(), suffix),
            cost: self.dalle_cost,
            license: None,
            width: Some(1024),
            height: Some(1024),
        })
    }

    async fn search_web(&self, query: &str, settings: &WebImageSettings) -> StudioResult<GeneratedImage> {
        if query.trim().is_empty() {
            return Err(StudioError::InvalidInput("web image query must not be empty".to_string()));
        }

        let mut ranked: Vec<&MockWebCandidate> = self
            .candidates
            .iter()
            .filter(|c| !settings.require_diagram || c.is_diagram)
            .filter(|c| !settings.prefer_landscape || c.width > c.height)
            .collect();
        ranked.sort_by_key(|c| c.license);

        let picked = ranked.into_iter().next().ok_or_else(|| {
            StudioError::ProviderFailure("no web image candidate satisfied the requested filters".to_string())
        })?;

        Ok(GeneratedImage {
            image_url: picked.url.to_string(),
            cost: 0.0,
            license: Some(license_label(picked.license).to_string()),
            width: Some(picked.width),
            height: Some(picked.height),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn web_search_prefers_public_domain_over_cc() {
        let provider = MockImageProvider::new();
        let settings = WebImageSettings::default();
        let image = provider.search_web("lab equipment", &settings).await.unwrap();
        assert_eq!(image.license.as_deref(), Some("public_domain"));
    }

    #[tokio::test]
    async fn web_search_honors_landscape_and_diagram_filters() {
        let provider = MockImageProvider::new();
        let settings = WebImageSettings {
            prefer_landscape: true,
            require_diagram: true,
        };
        let image = provider.search_web("circuit schematic", &settings).await.unwrap();
        assert!(image.width.unwrap() > image.height.unwrap());
    }

    #[tokio::test]
    async fn generate_rejects_empty_prompt() {
        let provider = MockImageProvider::new();
        assert!(provider.generate("", None).await.is_err());
    }
}
