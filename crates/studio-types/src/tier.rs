use serde::{Deserialize, Serialize};

/// Production quality tier. Variants are ordered cheapest to most expensive;
/// both per-unit cost and quality ceiling strictly increase with tier.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ProductionTier {
    #[serde(rename = "static_images")]
    Static,
    #[serde(rename = "motion_graphics")]
    Motion,
    Animated,
    Photorealistic,
}

impl ProductionTier {
    pub const ALL: [ProductionTier; 4] = [
        ProductionTier::Static,
        ProductionTier::Motion,
        ProductionTier::Animated,
        ProductionTier::Photorealistic,
    ];
}

/// Depth of audio production applied to a pilot, from nothing through a
/// fully time-synced mix.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AudioProductionTier {
    None,
    MusicOnly,
    SimpleOverlay,
    TimeSynced,
    FullProduction,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn production_tier_serializes_to_the_spec_strings() {
        assert_eq!(serde_json::to_string(&ProductionTier::Static).unwrap(), "\"static_images\"");
        assert_eq!(serde_json::to_string(&ProductionTier::Motion).unwrap(), "\"motion_graphics\"");
        assert_eq!(serde_json::to_string(&ProductionTier::Animated).unwrap(), "\"animated\"");
        assert_eq!(serde_json::to_string(&ProductionTier::Photorealistic).unwrap(), "\"photorealistic\"");

        let round_tripped: ProductionTier = serde_json::from_str("\"static_images\"").unwrap();
        assert_eq!(round_tripped, ProductionTier::Static);
    }
}
