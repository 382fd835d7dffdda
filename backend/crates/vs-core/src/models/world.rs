//! World entity - a shared space whose state is broadcast as moments.

use crate::{BinaryAttachment, CustomPayload, SensorReadings, SharingPolicy, WorldKind};

use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct World {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub kind: WorldKind,
    #[serde(default)]
    pub occupancy: u32,
    /// Creator of periodic moments for this world
    #[serde(default)]
    pub owner_id: String,
    /// Users currently present, in arrival order
    #[serde(default)]
    pub viewers: Vec<String>,
    #[serde(default)]
    pub current_vibe_id: Option<String>,
    #[serde(default)]
    pub sensors: Option<SensorReadings>,
    /// Policy applied to periodic broadcasts
    #[serde(default)]
    pub sharing: SharingPolicy,
    #[serde(default)]
    pub custom: Option<CustomPayload>,
    #[serde(default)]
    pub attachment: Option<BinaryAttachment>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl World {
    pub fn new(id: impl Into<String>, name: impl Into<String>, owner_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: WorldKind::default(),
            occupancy: 0,
            owner_id: owner_id.into(),
            viewers: Vec::new(),
            current_vibe_id: None,
            sensors: None,
            sharing: SharingPolicy::default(),
            custom: None,
            attachment: None,
            updated_at: Utc::now(),
        }
    }

    pub fn has_vibe(&self) -> bool {
        self.current_vibe_id.is_some()
    }
}
