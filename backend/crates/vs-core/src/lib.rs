pub mod error;
pub mod models;
pub mod repository;

pub use error::{CoreError, Result};
pub use models::binary_attachment::{BinaryAttachment, EncodedAttachment};
pub use models::binary_encoding::BinaryEncoding;
pub use models::context_level::ContextLevel;
pub use models::custom_payload::CustomPayload;
pub use models::moment::{Moment, WorldCore};
pub use models::moment_view::MomentView;
pub use models::sensor_readings::SensorReadings;
pub use models::sharing_policy::SharingPolicy;
pub use models::vibe::{Vibe, VibeSnapshot};
pub use models::world::World;
pub use models::world_kind::WorldKind;
pub use repository::in_memory_repository::InMemoryRepository;
pub use repository::seed_data::SeedData;
pub use repository::Repository;

#[cfg(test)]
mod tests;
