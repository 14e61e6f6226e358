//! Content Library: the in-memory registry of every generated or sourced
//! asset, with approval tracking and reuse queries.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use studio_types::{AssetSource, AssetStatus, AssetType};

/// A single registered asset. Mirrors the union of every asset kind the
/// pipeline produces — audio, image, figure, video — with the fields each
/// kind doesn't use left at their defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct AssetRecord {
    #[serde(default)]
    pub asset_id: String,
    pub asset_type: AssetType,
    pub source: AssetSource,
    #[serde(default)]
    pub status: AssetStatus,

    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub file_size_bytes: u64,
    #[serde(default)]
    pub format: String,

    #[serde(default)]
    pub describes: String,
    #[serde(default)]
    pub tags: Vec<String>,

    pub text_content: Option<String>,
    pub voice: Option<String>,
    pub duration_sec: Option<f64>,

    pub prompt: Option<String>,
    pub figure_number: Option<u32>,
    pub caption: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,

    pub segment_idx: Option<u32>,
    #[serde(default)]
    pub used_in_segments: Vec<u32>,
    pub script_id: Option<String>,

    pub origin_run_id: Option<String>,
    pub generated_at: Option<String>,
    pub generated_by: Option<String>,
    #[serde(default)]
    pub generation_cost: f64,

    pub approved_at: Option<String>,
    pub approved_by: Option<String>,
    pub rejected_reason: Option<String>,
    pub revision_of: Option<String>,
    #[serde(default)]
    pub notes: String,
}

impl Default for AssetType {
    fn default() -> Self {
        AssetType::Image
    }
}

impl Default for AssetSource {
    fn default() -> Self {
        AssetSource::Manual
    }
}

impl Default for AssetStatus {
    fn default() -> Self {
        AssetStatus::Draft
    }
}

/// Criteria for [`ContentLibrary::query`]. Every field is optional —
/// `None` means "don't filter on this".
#[derive(Debug, Clone, Default)]
pub struct AssetQuery {
    pub asset_type: Option<AssetType>,
    pub status: Option<AssetStatus>,
    pub segment_idx: Option<u32>,
    pub figure_number: Option<u32>,
    pub tags: Vec<String>,
    pub source: Option<AssetSource>,
}

/// The master content library for a single production.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContentLibrary {
    pub project_id: String,
    #[serde(default)]
    pub assets: HashMap<String, AssetRecord>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,

    #[serde(default)]
    audio_counter: u32,
    #[serde(default)]
    image_counter: u32,
    #[serde(default)]
    figure_counter: u32,
    #[serde(default)]
    video_counter: u32,
}

fn now_iso8601() -> String {
    chrono::Utc::now().to_rfc3339()
}

impl ContentLibrary {
    pub fn new(project_id: impl Into<String>) -> Self {
        let now = now_iso8601();
        ContentLibrary {
            project_id: project_id.into(),
            assets: HashMap::new(),
            created_at: now.clone(),
            updated_at: now,
            audio_counter: 0,
            image_counter: 0,
            figure_counter: 0,
            video_counter: 0,
        }
    }

    fn next_id(&mut self, asset_type: AssetType) -> String {
        match asset_type {
            AssetType::Audio => {
                self.audio_counter += 1;
                format!("aud_{:04}", self.audio_counter)
            }
            AssetType::Image => {
                self.image_counter += 1;
                format!("img_{:04}", self.image_counter)
            }
            AssetType::Figure => {
                self.figure_counter += 1;
                format!("fig_{:04}", self.figure_counter)
            }
            AssetType::Video => {
                self.video_counter += 1;
                format!("vid_{:04}", self.video_counter)
            }
        }
    }

    /// Registers a new asset, minting an id if `record.asset_id` is empty
    /// and stamping `generated_at` if unset. Returns the final asset id.
    pub fn register(&mut self, mut record: AssetRecord) -> String {
        if record.asset_id.is_empty() {
            record.asset_id = self.next_id(record.asset_type);
        }
        if record.generated_at.is_none() {
            record.generated_at = Some(now_iso8601());
        }
        let id = record.asset_id.clone();
        self.assets.insert(id.clone(), record);
        self.updated_at = now_iso8601();
        id
    }

    pub fn get(&self, asset_id: &str) -> Option<&AssetRecord> {
        self.assets.get(asset_id)
    }

    pub fn query(&self, criteria: &AssetQuery) -> Vec<&AssetRecord> {
        self.assets
            .values()
            .filter(|a| criteria.asset_type.map_or(true, |t| a.asset_type == t))
            .filter(|a| criteria.status.map_or(true, |s| a.status == s))
            .filter(|a| {
                criteria.segment_idx.map_or(true, |idx| {
                    a.segment_idx == Some(idx) || a.used_in_segments.contains(&idx)
                })
            })
            .filter(|a| criteria.figure_number.map_or(true, |n| a.figure_number == Some(n)))
            .filter(|a| criteria.tags.is_empty() || criteria.tags.iter().any(|t| a.tags.contains(t)))
            .filter(|a| criteria.source.map_or(true, |s| a.source == s))
            .collect()
    }

    /// Marks an asset approved, idempotent from any non-approved state.
    /// Returns false if the id wasn't found.
    pub fn approve(&mut self, asset_id: &str, approved_by: &str) -> bool {
        let Some(asset) = self.assets.get_mut(asset_id) else {
            return false;
        };
        asset.status = AssetStatus::Approved;
        asset.approved_by = Some(approved_by.to_string());
        asset.approved_at = Some(now_iso8601());
        self.updated_at = now_iso8601();
        true
    }

    pub fn reject(&mut self, asset_id: &str, reason: &str) -> bool {
        let Some(asset) = self.assets.get_mut(asset_id) else {
            return false;
        };
        asset.status = AssetStatus::Rejected;
        asset.rejected_reason = Some(reason.to_string());
        self.updated_at = now_iso8601();
        true
    }

    pub fn flag_for_review(&mut self, asset_id: &str) -> bool {
        let Some(asset) = self.assets.get_mut(asset_id) else {
            return false;
        };
        asset.status = AssetStatus::Review;
        self.updated_at = now_iso8601();
        true
    }

    /// Whether an approved asset already covers this segment/type, so the
    /// DoP can skip regenerating it.
    pub fn has_approved_asset_for(&self, segment_idx: u32, asset_type: AssetType) -> bool {
        !self
            .query(&AssetQuery {
                asset_type: Some(asset_type),
                status: Some(AssetStatus::Approved),
                segment_idx: Some(segment_idx),
                ..Default::default()
            })
            .is_empty()
    }

    pub fn get_approved_for_segment(&self, segment_idx: u32, asset_type: AssetType) -> Option<&AssetRecord> {
        self.query(&AssetQuery {
            asset_type: Some(asset_type),
            status: Some(AssetStatus::Approved),
            segment_idx: Some(segment_idx),
            ..Default::default()
        })
        .into_iter()
        .next()
    }

    pub fn summary(&self) -> LibrarySummary {
        let mut by_type: HashMap<String, u32> = HashMap::new();
        let mut by_status: HashMap<String, u32> = HashMap::new();

        for asset in self.assets.values() {
            *by_type.entry(format!("{:?}", asset.asset_type)).or_default() += 1;
            *by_status.entry(format!("{:?}", asset.status)).or_default() += 1;
        }

        LibrarySummary {
            total: self.assets.len(),
            by_type,
            by_status,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LibrarySummary {
    pub total: usize,
    pub by_type: HashMap<String, u32>,
    pub by_status: HashMap<String, u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image_record(segment_idx: u32) -> AssetRecord {
        AssetRecord {
            asset_type: AssetType::Image,
            source: AssetSource::Dalle,
            segment_idx: Some(segment_idx),
            ..Default::default()
        }
    }

    #[test]
    fn register_mints_type_scoped_ids() {
        let mut lib = ContentLibrary::new("proj_1");
        let first = lib.register(image_record(0));
        let second = lib.register(image_record(1));
        assert_eq!(first, "img_0001");
        assert_eq!(second, "img_0002");
    }

    #[test]
    fn keeps_explicit_asset_id() {
        let mut lib = ContentLibrary::new("proj_1");
        let mut record = image_record(0);
        record.asset_id = "img_fig6_v2".to_string();
        let id = lib.register(record);
        assert_eq!(id, "img_fig6_v2");
    }

    #[test]
    fn register_and_approve_stamp_timestamps() {
        let mut lib = ContentLibrary::new("proj_1");
        let id = lib.register(image_record(0));
        assert!(lib.get(&id).unwrap().generated_at.is_some());
        assert!(lib.get(&id).unwrap().approved_at.is_none());

        lib.approve(&id, "user");
        assert!(lib.get(&id).unwrap().approved_at.is_some());
    }

    #[test]
    fn approve_reject_flag_are_idempotent_on_missing_id() {
        let mut lib = ContentLibrary::new("proj_1");
        assert!(!lib.approve("missing", "user"));
        assert!(!lib.reject("missing", "bad"));
        assert!(!lib.flag_for_review("missing"));
    }

    #[test]
    fn has_approved_asset_for_reflects_approval_state() {
        let mut lib = ContentLibrary::new("proj_1");
        let id = lib.register(image_record(3));
        assert!(!lib.has_approved_asset_for(3, AssetType::Image));
        lib.approve(&id, "user");
        assert!(lib.has_approved_asset_for(3, AssetType::Image));
        assert_eq!(
            lib.get_approved_for_segment(3, AssetType::Image).unwrap().asset_id,
            id
        );
    }

    #[test]
    fn query_filters_by_multiple_criteria() {
        let mut lib = ContentLibrary::new("proj_1");
        lib.register(image_record(0));
        let mut audio = AssetRecord {
            asset_type: AssetType::Audio,
            source: AssetSource::Elevenlabs,
            segment_idx: Some(0),
            ..Default::default()
        };
        audio.tags.push("voiceover".to_string());
        lib.register(audio);

        let audio_only = lib.query(&AssetQuery {
            asset_type: Some(AssetType::Audio),
            segment_idx: Some(0),
            ..Default::default()
        });
        assert_eq!(audio_only.len(), 1);
        assert_eq!(audio_only[0].source, AssetSource::Elevenlabs);
    }
}
