//! Configuration for detection operations

use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Confidence threshold for a single search (0.0 to 1.0)
    pub threshold: f32,
    /// Lowest threshold a retrying search relaxes to
    pub min_threshold: f32,
    /// Number of extra attempts a retrying search makes
    pub max_retries: u32,
    /// Pause between attempts and between polling ticks
    #[serde(with = "duration_secs")]
    pub check_interval: Duration,
    /// Budget for waiting operations
    #[serde(with = "duration_secs")]
    pub timeout: Duration,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            threshold: 0.8,
            min_threshold: 0.6,
            max_retries: 3,
            check_interval: Duration::from_secs(1),
            timeout: Duration::from_secs(30),
        }
    }
}

impl DetectorConfig {
    /// Configuration preset for crisp UI elements (menus, buttons)
    pub fn strict() -> Self {
        Self {
            threshold: 0.9,
            min_threshold: 0.8,
            max_retries: 2,
            ..Self::default()
        }
    }

    /// Configuration preset for in-game overlays that shift with lighting and scaling
    pub fn relaxed() -> Self {
        Self {
            threshold: 0.75,
            min_threshold: 0.5,
            max_retries: 5,
            timeout: Duration::from_secs(60),
            ..Self::default()
        }
    }
}

/// Durations stored as fractional seconds in config files
mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
    }
}
