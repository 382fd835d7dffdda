pub mod binary_attachment;
pub mod binary_encoding;
pub mod context_level;
pub mod custom_payload;
pub mod moment;
pub mod moment_view;
pub mod sensor_readings;
pub mod sharing_policy;
pub mod vibe;
pub mod world;
pub mod world_kind;
