use crate::{
    CoreError, Repository, Result as CoreErrorResult, SeedData, SensorReadings, Vibe, World,
};

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use log::{debug, info};
use parking_lot::RwLock;

/// Thread-safe in-memory store for worlds and vibes
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    inner: Arc<RwLock<RepositoryInner>>,
}

#[derive(Default)]
struct RepositoryInner {
    worlds: HashMap<String, World>,
    vibes: HashMap<String, Vibe>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a repository from seed data, validating vibe references
    pub fn from_seed(seed: SeedData) -> CoreErrorResult<Self> {
        let repository = Self::new();
        for vibe in seed.vibes {
            repository.upsert_vibe(vibe)?;
        }
        for world in seed.worlds {
            repository.upsert_world(world)?;
        }
        info!(
            "Repository seeded with {} worlds and {} vibes",
            repository.world_count(),
            repository.vibe_count()
        );
        Ok(repository)
    }

    /// Insert or replace a world. A referenced vibe must already exist.
    pub fn upsert_world(&self, world: World) -> CoreErrorResult<()> {
        if world.id.trim().is_empty() {
            return Err(CoreError::validation("world ID is required", Some("id")));
        }

        let mut inner = self.inner.write();
        if let Some(vibe_id) = &world.current_vibe_id
            && !inner.vibes.contains_key(vibe_id)
        {
            return Err(CoreError::vibe_not_found(vibe_id));
        }

        debug!("Upserting world {}", world.id);
        inner.worlds.insert(world.id.clone(), world);
        Ok(())
    }

    pub fn upsert_vibe(&self, vibe: Vibe) -> CoreErrorResult<()> {
        if vibe.id.trim().is_empty() {
            return Err(CoreError::validation("vibe ID is required", Some("id")));
        }

        let mut inner = self.inner.write();
        debug!("Upserting vibe {}", vibe.id);
        inner.vibes.insert(vibe.id.clone(), vibe);
        Ok(())
    }

    /// Assign (or clear with `None`) a world's current vibe
    pub fn set_world_vibe(&self, world_id: &str, vibe_id: Option<&str>) -> CoreErrorResult<()> {
        let mut inner = self.inner.write();
        if let Some(vibe_id) = vibe_id
            && !inner.vibes.contains_key(vibe_id)
        {
            return Err(CoreError::vibe_not_found(vibe_id));
        }

        let world = inner
            .worlds
            .get_mut(world_id)
            .ok_or_else(|| CoreError::world_not_found(world_id))?;
        world.current_vibe_id = vibe_id.map(str::to_string);
        world.updated_at = Utc::now();
        Ok(())
    }

    pub fn set_occupancy(&self, world_id: &str, occupancy: u32) -> CoreErrorResult<()> {
        self.modify_world(world_id, |world| world.occupancy = occupancy)
    }

    pub fn set_sensors(&self, world_id: &str, sensors: SensorReadings) -> CoreErrorResult<()> {
        self.modify_world(world_id, |world| world.sensors = Some(sensors))
    }

    /// Record a user entering the world (no-op if already present)
    pub fn add_viewer(&self, world_id: &str, user_id: &str) -> CoreErrorResult<()> {
        self.modify_world(world_id, |world| {
            if !world.viewers.iter().any(|v| v == user_id) {
                world.viewers.push(user_id.to_string());
            }
        })
    }

    pub fn remove_world(&self, world_id: &str) -> CoreErrorResult<World> {
        self.inner
            .write()
            .worlds
            .remove(world_id)
            .ok_or_else(|| CoreError::world_not_found(world_id))
    }

    /// Remove a vibe. Worlds still pointing at it fail lookups until reassigned.
    pub fn remove_vibe(&self, vibe_id: &str) -> CoreErrorResult<Vibe> {
        self.inner
            .write()
            .vibes
            .remove(vibe_id)
            .ok_or_else(|| CoreError::vibe_not_found(vibe_id))
    }

    pub fn world_count(&self) -> usize {
        self.inner.read().worlds.len()
    }

    pub fn vibe_count(&self) -> usize {
        self.inner.read().vibes.len()
    }

    fn modify_world<F>(&self, world_id: &str, change: F) -> CoreErrorResult<()>
    where
        F: FnOnce(&mut World),
    {
        let mut inner = self.inner.write();
        let world = inner
            .worlds
            .get_mut(world_id)
            .ok_or_else(|| CoreError::world_not_found(world_id))?;
        change(world);
        world.updated_at = Utc::now();
        Ok(())
    }
}

impl Repository for InMemoryRepository {
    fn get_world(&self, id: &str) -> CoreErrorResult<World> {
        self.inner
            .read()
            .worlds
            .get(id)
            .cloned()
            .ok_or_else(|| CoreError::world_not_found(id))
    }

    fn get_all_worlds(&self) -> Vec<World> {
        let mut worlds: Vec<World> = self.inner.read().worlds.values().cloned().collect();
        worlds.sort_by(|a, b| a.id.cmp(&b.id));
        worlds
    }

    fn get_world_vibe(&self, world_id: &str) -> CoreErrorResult<Vibe> {
        let inner = self.inner.read();
        let world = inner
            .worlds
            .get(world_id)
            .ok_or_else(|| CoreError::world_not_found(world_id))?;

        let vibe_id = world
            .current_vibe_id
            .as_deref()
            .ok_or_else(|| CoreError::no_vibe_assigned(world_id))?;

        inner
            .vibes
            .get(vibe_id)
            .cloned()
            .ok_or_else(|| CoreError::vibe_not_found(vibe_id))
    }
}
