use serde::{Deserialize, Serialize};

/// Kind of asset stored in the Content Library.
#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AssetType {
    Audio,
    #[default]
    Image,
    /// Extracted from the knowledge base, never generated.
    Figure,
    Video,
}

/// Approval status of an asset.
#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AssetStatus {
    /// Just generated, not reviewed.
    #[default]
    Draft,
    /// Flagged for human review.
    Review,
    Approved,
    Rejected,
    /// Regenerated after rejection.
    Revised,
}

/// How an asset was produced.
#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AssetSource {
    Dalle,
    Elevenlabs,
    OpenaiTts,
    GoogleTts,
    Luma,
    Runway,
    KbExtraction,
    /// Sourced from the web (Wikimedia Commons, etc.).
    Web,
    /// Processed or composited (e.g. via ffmpeg).
    Ffmpeg,
    /// Supplied directly by a human, never produced by a provider call.
    #[default]
    Manual,
}

/// How a scene's visual slot is filled, chosen by the DoP.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DisplayMode {
    FigureSync,
    DallE,
    /// A web-sourced image, distinct from a DALL-E generation.
    WebImage,
    CarryForward,
    TextOnly,
}
