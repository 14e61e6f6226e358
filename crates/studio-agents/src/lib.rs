//! Agent trait contracts (C7): one trait per production role, each with a
//! deterministic mock implementation so the pipeline is fully exercisable
//! without calling an LLM or an external generation API.

pub mod audio_generator;
pub mod critic;
pub mod editor;
pub mod json_extract;
pub mod producer;
pub mod qa_verifier;
pub mod retry;
pub mod scene;
pub mod script_writer;
pub mod video_generator;

pub use audio_generator::{AudioGenerator, MockAudioGenerator, MusicSpec, SceneAudio, SoundEffectSpec, VoiceoverSpec};
pub use critic::{compare_pilots, continuation_multiplier, Critic, MockCritic, PilotResults, SceneResult};
pub use editor::{Editor, MockEditor};
pub use json_extract::extract_json;
pub use producer::{MockProducer, PilotStrategy, Producer};
pub use qa_verifier::{qa_threshold, MockQAVerifier, QAResult, QAVerifier};
pub use retry::retry_with_backoff;
pub use scene::{auto_scene_count, Scene};
pub use script_writer::{MockScriptWriter, ScriptWriter};
pub use video_generator::{ChainFrom, GeneratedVideo, MockVideoGenerator, VideoGenerator};
