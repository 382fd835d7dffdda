use crate::{Metrics, Result as StreamErrorResult, StreamError};

use std::sync::Arc;

use chrono::Utc;
use log::{debug, warn};
use vs_core::{Moment, Repository, SensorReadings, World, WorldCore};

// Occupancy at which the occupancy share of activity saturates
const OCCUPANCY_SATURATION: u32 = 20;
const SOUND_SATURATION: f64 = 100.0;

const OCCUPANCY_WEIGHT: f64 = 0.5;
const MOVEMENT_WEIGHT: f64 = 0.3;
const SOUND_WEIGHT: f64 = 0.2;

/// A world that could not be turned into a moment
#[derive(Debug)]
pub struct WorldFailure {
    pub world_id: String,
    pub error: StreamError,
}

/// Result of a full sweep; one bad world never sinks the rest
#[derive(Debug, Default)]
pub struct GeneratedMoments {
    pub moments: Vec<Moment>,
    pub failures: Vec<WorldFailure>,
}

/// Derived 0.0-1.0 activity estimate.
///
/// Non-decreasing in occupancy and movement; missing or non-finite sensor
/// values count as zero.
pub fn activity_level(occupancy: u32, sensors: Option<&SensorReadings>) -> f64 {
    let occupancy_share =
        f64::from(occupancy.min(OCCUPANCY_SATURATION)) / f64::from(OCCUPANCY_SATURATION);
    let movement = sensors.and_then(|s| s.movement).map_or(0.0, unit_clamp);
    let sound = sensors
        .and_then(|s| s.sound_level)
        .map_or(0.0, |level| unit_clamp(level / SOUND_SATURATION));

    OCCUPANCY_WEIGHT * occupancy_share + MOVEMENT_WEIGHT * movement + SOUND_WEIGHT * sound
}

fn unit_clamp(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

pub struct MomentGenerator {
    repository: Arc<dyn Repository>,
    metrics: Metrics,
}

impl MomentGenerator {
    pub fn new(repository: Arc<dyn Repository>) -> Self {
        Self {
            repository,
            metrics: Metrics::new(),
        }
    }

    /// Snapshot one world
    pub fn generate(&self, world_id: &str) -> StreamErrorResult<Moment> {
        if world_id.trim().is_empty() {
            return Err(StreamError::validation(
                "world ID is required",
                Some("world_id"),
            ));
        }

        let world = self.repository.get_world(world_id)?;
        let moment = self.from_world(world)?;
        self.metrics.moments_generated(1);
        Ok(moment)
    }

    /// Snapshot every world in id order, collecting per-world failures
    pub fn generate_all(&self) -> GeneratedMoments {
        let mut generated = GeneratedMoments::default();

        for world in self.repository.get_all_worlds() {
            let world_id = world.id.clone();
            match self.from_world(world) {
                Ok(moment) => generated.moments.push(moment),
                Err(error) => {
                    warn!("Skipping world {}: {}", world_id, error);
                    self.metrics.generation_failed();
                    generated.failures.push(WorldFailure { world_id, error });
                }
            }
        }

        debug!(
            "Generated {} moments ({} failed)",
            generated.moments.len(),
            generated.failures.len()
        );
        self.metrics.moments_generated(generated.moments.len());
        generated
    }

    fn from_world(&self, world: World) -> StreamErrorResult<Moment> {
        let vibe = if world.has_vibe() {
            Some(self.repository.get_world_vibe(&world.id)?.snapshot())
        } else {
            None
        };

        let core = WorldCore {
            name: world.name,
            kind: world.kind,
            occupancy: world.occupancy,
            activity_level: activity_level(world.occupancy, world.sensors.as_ref()),
        };

        Ok(Moment::new(world.id, core, Utc::now())
            .with_creator(world.owner_id)
            .with_viewers(world.viewers)
            .with_sharing(world.sharing)
            .with_vibe(vibe)
            .with_sensors(world.sensors)
            .with_custom(world.custom)
            .with_attachment(world.attachment))
    }
}
