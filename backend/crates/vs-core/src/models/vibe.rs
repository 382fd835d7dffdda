use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The ambient mood assigned to a world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vibe {
    pub id: String,
    pub name: String,
    pub mood: String,
    /// 0.0 (calm) to 1.0 (energetic)
    pub energy: f64,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

/// The subset of a vibe embedded in a moment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VibeSnapshot {
    pub id: String,
    pub name: String,
    pub mood: String,
    pub energy: f64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub color: Option<String>,
}

impl Vibe {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        mood: impl Into<String>,
        energy: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            mood: mood.into(),
            energy: energy.clamp(0.0, 1.0),
            color: None,
            description: None,
            updated_at: Utc::now(),
        }
    }

    pub fn snapshot(&self) -> VibeSnapshot {
        VibeSnapshot {
            id: self.id.clone(),
            name: self.name.clone(),
            mood: self.mood.clone(),
            energy: self.energy,
            color: self.color.clone(),
        }
    }
}
