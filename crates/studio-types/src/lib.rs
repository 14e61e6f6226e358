pub mod asset;
pub mod execution;
pub mod intent;
pub mod tier;

pub use asset::{AssetSource, AssetStatus, AssetType, DisplayMode};
pub use execution::ExecutionMode;
pub use intent::SegmentIntent;
pub use tier::{AudioProductionTier, ProductionTier};
