use crate::{ConfigError, ConfigErrorResult};

use serde::Deserialize;

/// Optional JSON file of worlds and vibes loaded at startup
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct SeedConfig {
    /// Path relative to the config directory
    pub path: Option<String>,
}

impl SeedConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if let Some(path) = &self.path
            && (std::path::Path::new(path).is_absolute() || path.contains(".."))
        {
            return Err(ConfigError::config(
                "seed.path must be relative and cannot contain '..'",
            ));
        }
        Ok(())
    }
}
