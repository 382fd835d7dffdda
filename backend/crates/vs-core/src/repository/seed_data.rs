use crate::{Result as CoreErrorResult, Vibe, World};

use serde::Deserialize;

/// Initial worlds and vibes loaded at startup
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SeedData {
    pub worlds: Vec<World>,
    pub vibes: Vec<Vibe>,
}

impl SeedData {
    #[track_caller]
    pub fn from_json_str(contents: &str) -> CoreErrorResult<Self> {
        Ok(serde_json::from_str(contents)?)
    }
}
