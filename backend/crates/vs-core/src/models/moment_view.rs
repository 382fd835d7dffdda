use crate::{
    ContextLevel, CustomPayload, EncodedAttachment, Result as CoreErrorResult, SensorReadings,
    SharingPolicy, VibeSnapshot, WorldCore,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A moment filtered to one context level; this is the JSON wire payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MomentView {
    pub world_id: String,
    pub timestamp: DateTime<Utc>,
    pub context_level: ContextLevel,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub creator_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub world: Option<WorldCore>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub vibe: Option<VibeSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub viewers: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub sharing: Option<SharingPolicy>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub sensors: Option<SensorReadings>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub custom: Option<CustomPayload>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub attachment: Option<EncodedAttachment>,
}

impl MomentView {
    #[track_caller]
    pub fn to_json_bytes(&self) -> CoreErrorResult<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    #[track_caller]
    pub fn from_json_slice(payload: &[u8]) -> CoreErrorResult<Self> {
        Ok(serde_json::from_slice(payload)?)
    }
}
