//! Driver categories

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Coarse device classification carried by every driver descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriverCategory {
    Sensor,
    Actuator,
    Interface,
    Storage,
    Network,
    Custom,
}

impl DriverCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            DriverCategory::Sensor => "sensor",
            DriverCategory::Actuator => "actuator",
            DriverCategory::Interface => "interface",
            DriverCategory::Storage => "storage",
            DriverCategory::Network => "network",
            DriverCategory::Custom => "custom",
        }
    }
}

impl fmt::Display for DriverCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DriverCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sensor" => Ok(DriverCategory::Sensor),
            "actuator" => Ok(DriverCategory::Actuator),
            "interface" => Ok(DriverCategory::Interface),
            "storage" => Ok(DriverCategory::Storage),
            "network" => Ok(DriverCategory::Network),
            "custom" => Ok(DriverCategory::Custom),
            other => Err(format!("unknown driver category `{}`", other)),
        }
    }
}
