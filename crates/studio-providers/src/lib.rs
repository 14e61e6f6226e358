//! External-collaborator trait surface (§6): the pluggable boundary
//! between the core agent contracts (`studio-agents`) and whatever real
//! LLM/generation services back a production run. Every trait here has a
//! deterministic `Mock*` implementation so the full pipeline can run
//! without a network call.

pub mod audio_provider;
pub mod image_provider;
pub mod qa_frame_extractor;
pub mod text_completion;
pub mod video_provider;
pub mod vision_completion;

pub use audio_provider::{AudioProvider, GeneratedSpeech, MockAudioProvider};
pub use image_provider::{GeneratedImage, ImageLicense, ImageProvider, MockImageProvider, WebImageSettings};
pub use qa_frame_extractor::{MockQaFrameExtractor, QaFrameExtractor};
pub use text_completion::{AnthropicTextCompletion, MockTextCompletion, TextCompletion};
pub use video_provider::{ChainReference, GeneratedVideoPayload, MockVideoProvider, VideoProvider};
pub use vision_completion::{AnthropicVisionCompletion, ImageMediaType, MockVisionCompletion, VisionCompletion};
