use serde::{Deserialize, Serialize};

/// Application-defined data carried alongside a world.
///
/// `Opaque` is the escape hatch for producers whose payload shape is not
/// known here; it is forwarded untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum CustomPayload {
    Note(String),
    Tags(Vec<String>),
    Metric { name: String, value: f64 },
    Opaque(String),
}
