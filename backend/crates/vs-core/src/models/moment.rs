//! Moment - a transient snapshot of a world at publish time.

use crate::{
    BinaryAttachment, ContextLevel, CustomPayload, MomentView, Result as CoreErrorResult,
    SensorReadings, SharingPolicy, VibeSnapshot, WorldKind,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Core world fields carried by every moment above `ContextLevel::None`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldCore {
    pub name: String,
    pub kind: WorldKind,
    pub occupancy: u32,
    /// Derived 0.0-1.0 activity estimate
    pub activity_level: f64,
}

/// A point-in-time snapshot of a world.
///
/// Moments are never mutated in place; the `with_*` methods consume the
/// value and return a new one.
#[derive(Debug, Clone, PartialEq)]
pub struct Moment {
    pub world_id: String,
    pub timestamp: DateTime<Utc>,
    pub creator_id: String,
    viewers: Vec<String>,
    pub sharing: SharingPolicy,
    pub world: WorldCore,
    pub vibe: Option<VibeSnapshot>,
    pub sensors: Option<SensorReadings>,
    pub custom: Option<CustomPayload>,
    pub attachment: Option<BinaryAttachment>,
}

impl Moment {
    pub fn new(world_id: impl Into<String>, world: WorldCore, timestamp: DateTime<Utc>) -> Self {
        Self {
            world_id: world_id.into(),
            timestamp,
            creator_id: String::new(),
            viewers: Vec::new(),
            sharing: SharingPolicy::private(),
            world,
            vibe: None,
            sensors: None,
            custom: None,
            attachment: None,
        }
    }

    /// Current viewers in arrival order, without duplicates
    pub fn viewers(&self) -> &[String] {
        &self.viewers
    }

    pub fn with_creator(mut self, creator_id: impl Into<String>) -> Self {
        self.creator_id = creator_id.into();
        self
    }

    /// Append a viewer unless already present
    pub fn with_viewer(mut self, viewer: impl Into<String>) -> Self {
        let viewer = viewer.into();
        if !viewer.is_empty() && !self.viewers.contains(&viewer) {
            self.viewers.push(viewer);
        }
        self
    }

    pub fn with_viewers<I, S>(self, viewers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        viewers
            .into_iter()
            .fold(self, |moment, viewer| moment.with_viewer(viewer))
    }

    pub fn with_sharing(mut self, sharing: SharingPolicy) -> Self {
        self.sharing = sharing;
        self
    }

    pub fn with_vibe(mut self, vibe: Option<VibeSnapshot>) -> Self {
        self.vibe = vibe;
        self
    }

    pub fn with_sensors(mut self, sensors: Option<SensorReadings>) -> Self {
        self.sensors = sensors;
        self
    }

    pub fn with_custom(mut self, custom: Option<CustomPayload>) -> Self {
        self.custom = custom;
        self
    }

    pub fn with_attachment(mut self, attachment: Option<BinaryAttachment>) -> Self {
        self.attachment = attachment;
        self
    }

    /// Visible only to the creator
    pub fn is_private(&self) -> bool {
        self.sharing.is_private_to_creator()
    }

    /// Project the moment down to what a recipient at `level` may see
    #[track_caller]
    pub fn project(&self, level: ContextLevel) -> CoreErrorResult<MomentView> {
        let core = level.includes_core();
        let detail = level.includes_detail();

        let attachment = match (&self.attachment, detail) {
            (Some(attachment), true) => Some(attachment.encoded()?),
            _ => None,
        };

        Ok(MomentView {
            world_id: self.world_id.clone(),
            timestamp: self.timestamp,
            context_level: level,
            creator_id: core.then(|| self.creator_id.clone()),
            world: core.then(|| self.world.clone()),
            vibe: if core { self.vibe.clone() } else { None },
            viewers: detail.then(|| self.viewers.clone()),
            sharing: detail.then(|| self.sharing.clone()),
            sensors: if detail { self.sensors } else { None },
            custom: if detail { self.custom.clone() } else { None },
            attachment,
        })
    }

    /// Projection for a specific recipient; the creator always gets `Full`
    #[track_caller]
    pub fn project_for(&self, recipient: &str) -> CoreErrorResult<MomentView> {
        self.project(self.sharing.level_for(recipient, &self.creator_id))
    }
}
