use crate::error::{Result as ServerErrorResult, ServerError};

use std::path::Path;

use log::{info, warn};
use vs_core::{InMemoryRepository, SeedData};

/// Repository filled from the seed file, or empty when there is none
pub fn load_repository(seed_path: Option<&Path>) -> ServerErrorResult<InMemoryRepository> {
    let Some(path) = seed_path else {
        info!("No seed file configured, starting with an empty repository");
        return Ok(InMemoryRepository::new());
    };

    if !path.exists() {
        warn!(
            "Seed file {} not found, starting with an empty repository",
            path.display()
        );
        return Ok(InMemoryRepository::new());
    }

    let contents = std::fs::read_to_string(path).map_err(|source| ServerError::SeedFile {
        path: path.display().to_string(),
        source,
    })?;
    let seed_error = |source| ServerError::SeedData {
        path: path.display().to_string(),
        source,
    };

    let seed = SeedData::from_json_str(&contents).map_err(seed_error)?;
    InMemoryRepository::from_seed(seed).map_err(seed_error)
}
