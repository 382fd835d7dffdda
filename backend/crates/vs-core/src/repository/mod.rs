pub mod in_memory_repository;
pub mod seed_data;

use crate::{Result as CoreErrorResult, Vibe, World};

/// Read access to world and vibe state.
///
/// Implementations must tolerate concurrent reads from the broadcast loop
/// while request handlers write.
pub trait Repository: Send + Sync {
    fn get_world(&self, id: &str) -> CoreErrorResult<World>;

    /// All worlds ordered by id
    fn get_all_worlds(&self) -> Vec<World>;

    /// The vibe currently assigned to a world
    fn get_world_vibe(&self, world_id: &str) -> CoreErrorResult<Vibe>;
}
