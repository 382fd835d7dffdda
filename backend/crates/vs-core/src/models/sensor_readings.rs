use serde::{Deserialize, Serialize};

/// Latest readings for a world. Every channel is independently optional.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorReadings {
    /// Degrees Celsius
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Relative humidity, percent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub humidity: Option<f64>,
    /// Lux
    #[serde(skip_serializing_if = "Option::is_none")]
    pub light_level: Option<f64>,
    /// Decibels
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sound_level: Option<f64>,
    /// Normalized 0.0-1.0 motion estimate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub movement: Option<f64>,
}

impl SensorReadings {
    pub fn is_empty(&self) -> bool {
        self.temperature.is_none()
            && self.humidity.is_none()
            && self.light_level.is_none()
            && self.sound_level.is_none()
            && self.movement.is_none()
    }
}
