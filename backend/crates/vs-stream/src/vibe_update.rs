use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vs_core::{ContextLevel, VibeSnapshot};

/// Payload published on `*.world.vibe.*` subjects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VibeUpdate {
    pub world_id: String,
    pub timestamp: DateTime<Utc>,
    pub context_level: ContextLevel,
    /// Omitted for recipients at `ContextLevel::None`
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub vibe: Option<VibeSnapshot>,
}

impl VibeUpdate {
    pub fn project(
        world_id: &str,
        timestamp: DateTime<Utc>,
        vibe: &VibeSnapshot,
        level: ContextLevel,
    ) -> Self {
        Self {
            world_id: world_id.to_string(),
            timestamp,
            context_level: level,
            vibe: level.includes_core().then(|| vibe.clone()),
        }
    }
}
