use serde::Deserialize;
use vs_core::SharingPolicy;

/// `stream.world` parameters
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StreamWorldParams {
    pub world_id: String,
    pub user_id: String,
    /// Private to `user_id` when omitted
    #[serde(default)]
    pub sharing: Option<SharingPolicy>,
}

/// `stream.vibe` parameters
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StreamVibeParams {
    pub world_id: String,
    pub user_id: String,
}
