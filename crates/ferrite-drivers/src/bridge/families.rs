//! Device families known to the bridge backend
//!
//! Each family helper turns a HAL function table into the mapping list a
//! descriptor carries, validating the tier contract up front: every LED
//! capability tier requires the operations of the tiers below it.

use super::native::{Mapping, NativeOp, OpRole};
use crate::error::AdapterError;
use serde::{Deserialize, Serialize};

/// LED capability tiers; each is a strict superset of the previous
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedKind {
    Simple,
    Pwm,
    Rgb,
    Rgbw,
    Addressable,
}

/// Family tag persisted with a bridge descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "family", content = "kind", rename_all = "snake_case")]
pub enum DeviceFamily {
    Led(LedKind),
    TemperatureSensor,
    Custom,
}

/// Native entry points for one LED device. Tier validation happens in
/// [`led_mappings`]; optional getters only enrich getStatus.
#[derive(Clone, Copy, Default)]
pub struct LedHal {
    pub init: Option<fn() -> i32>,
    pub deinit: Option<fn() -> i32>,
    pub set_state: Option<fn(bool) -> i32>,
    pub get_state: Option<fn() -> bool>,
    pub toggle: Option<fn() -> i32>,
    pub set_brightness: Option<fn(u8) -> i32>,
    pub get_brightness: Option<fn() -> u8>,
    pub set_color: Option<fn(u8, u8, u8) -> i32>,
    pub get_color: Option<fn() -> (u8, u8, u8)>,
    pub set_color_w: Option<fn(u8, u8, u8, u8) -> i32>,
    pub set_pixel: Option<fn(u16, u8, u8, u8) -> i32>,
}

/// Native entry points for one temperature sensor
#[derive(Clone, Copy, Default)]
pub struct TempSensorHal {
    pub init: Option<fn() -> i32>,
    pub deinit: Option<fn() -> i32>,
    pub read_celsius: Option<fn() -> f32>,
    pub start_conversion: Option<fn() -> i32>,
    pub set_resolution: Option<fn(u8) -> i32>,
    pub get_resolution: Option<fn() -> u8>,
}

fn require<T>(slot: Option<T>, what: &str, tier: &str) -> Result<T, AdapterError> {
    slot.ok_or_else(|| {
        AdapterError::InvalidDescription(format!("{} tier requires `{}`", tier, what))
    })
}

/// Build the mapping list for an LED of the given tier
pub fn led_mappings(kind: LedKind, hal: &LedHal) -> Result<Vec<Mapping>, AdapterError> {
    let mut mappings = Vec::new();

    if let Some(f) = hal.init {
        mappings.push(Mapping::new("init", NativeOp::Simple(f), OpRole::Init));
    }
    if let Some(f) = hal.deinit {
        mappings.push(Mapping::new("deinit", NativeOp::Simple(f), OpRole::Deinit));
    }

    // Simple tier: on/off is the baseline contract
    let set_state = require(hal.set_state, "set_state", "simple")?;
    mappings.push(Mapping::new(
        "set_state",
        NativeOp::SetState(set_state),
        OpRole::Write,
    ));
    if let Some(f) = hal.get_state {
        mappings.push(Mapping::new("get_state", NativeOp::GetState(f), OpRole::Helper));
    }
    if let Some(f) = hal.toggle {
        mappings.push(Mapping::new("toggle", NativeOp::Simple(f), OpRole::Control));
    }

    if kind >= LedKind::Pwm {
        let f = require(hal.set_brightness, "set_brightness", "pwm")?;
        mappings.push(Mapping::new(
            "set_brightness",
            NativeOp::SetLevel(f),
            OpRole::Write,
        ));
        if let Some(f) = hal.get_brightness {
            mappings.push(Mapping::new(
                "get_brightness",
                NativeOp::GetLevel(f),
                OpRole::Helper,
            ));
        }
    }

    if kind >= LedKind::Rgb {
        let f = require(hal.set_color, "set_color", "rgb")?;
        mappings.push(Mapping::new("set_color", NativeOp::SetColor(f), OpRole::Write));
        if let Some(f) = hal.get_color {
            mappings.push(Mapping::new(
                "get_color",
                NativeOp::GetColor(f),
                OpRole::Helper,
            ));
        }
    }

    if kind >= LedKind::Rgbw {
        let f = require(hal.set_color_w, "set_color_w", "rgbw")?;
        mappings.push(Mapping::new(
            "set_color_w",
            NativeOp::SetColorW(f),
            OpRole::Write,
        ));
    }

    if kind >= LedKind::Addressable {
        let f = require(hal.set_pixel, "set_pixel", "addressable")?;
        mappings.push(Mapping::new("set_pixel", NativeOp::SetPixel(f), OpRole::Write));
    }

    Ok(mappings)
}

/// Build the mapping list for a temperature sensor
pub fn temp_sensor_mappings(hal: &TempSensorHal) -> Result<Vec<Mapping>, AdapterError> {
    let mut mappings = Vec::new();

    if let Some(f) = hal.init {
        mappings.push(Mapping::new("init", NativeOp::Simple(f), OpRole::Init));
    }
    if let Some(f) = hal.deinit {
        mappings.push(Mapping::new("deinit", NativeOp::Simple(f), OpRole::Deinit));
    }

    let read = require(hal.read_celsius, "read_celsius", "sensor")?;
    mappings.push(Mapping::new(
        "read_celsius",
        NativeOp::ReadScalar(read),
        OpRole::Read,
    ));
    if let Some(f) = hal.start_conversion {
        mappings.push(Mapping::new(
            "start_conversion",
            NativeOp::Simple(f),
            OpRole::Control,
        ));
    }
    if let Some(f) = hal.set_resolution {
        mappings.push(Mapping::new(
            "set_resolution",
            NativeOp::SetLevel(f),
            OpRole::Control,
        ));
    }
    if let Some(f) = hal.get_resolution {
        mappings.push(Mapping::new(
            "get_resolution",
            NativeOp::GetLevel(f),
            OpRole::Helper,
        ));
    }

    Ok(mappings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok_state(_on: bool) -> i32 {
        0
    }
    fn ok_level(_v: u8) -> i32 {
        0
    }

    #[test]
    fn test_tiers_are_ordered() {
        assert!(LedKind::Simple < LedKind::Pwm);
        assert!(LedKind::Pwm < LedKind::Rgb);
        assert!(LedKind::Rgb < LedKind::Rgbw);
        assert!(LedKind::Rgbw < LedKind::Addressable);
    }

    #[test]
    fn test_simple_tier_requires_set_state() {
        let err = led_mappings(LedKind::Simple, &LedHal::default()).unwrap_err();
        assert!(matches!(err, AdapterError::InvalidDescription(_)));
    }

    #[test]
    fn test_pwm_tier_requires_brightness_on_top_of_simple() {
        let hal = LedHal {
            set_state: Some(ok_state),
            ..Default::default()
        };
        assert!(led_mappings(LedKind::Simple, &hal).is_ok());
        assert!(led_mappings(LedKind::Pwm, &hal).is_err());

        let hal = LedHal {
            set_state: Some(ok_state),
            set_brightness: Some(ok_level),
            ..Default::default()
        };
        assert!(led_mappings(LedKind::Pwm, &hal).is_ok());
    }

    #[test]
    fn test_each_tier_is_a_superset_of_the_previous() {
        fn color(_r: u8, _g: u8, _b: u8) -> i32 {
            0
        }
        let hal = LedHal {
            set_state: Some(ok_state),
            set_brightness: Some(ok_level),
            set_color: Some(color),
            ..Default::default()
        };
        let simple = led_mappings(LedKind::Simple, &hal).unwrap();
        let pwm = led_mappings(LedKind::Pwm, &hal).unwrap();
        let rgb = led_mappings(LedKind::Rgb, &hal).unwrap();

        let names = |ms: &[Mapping]| -> Vec<String> {
            ms.iter().map(|m| m.name.clone()).collect()
        };
        let simple_names = names(&simple);
        let pwm_names = names(&pwm);
        let rgb_names = names(&rgb);
        assert!(simple_names.iter().all(|n| pwm_names.contains(n)));
        assert!(pwm_names.iter().all(|n| rgb_names.contains(n)));
        assert!(rgb_names.len() > pwm_names.len());
    }

    #[test]
    fn test_sensor_requires_read() {
        let err = temp_sensor_mappings(&TempSensorHal::default()).unwrap_err();
        assert!(matches!(err, AdapterError::InvalidDescription(_)));
    }

    #[test]
    fn test_family_tag_serializes() {
        let family = DeviceFamily::Led(LedKind::Pwm);
        let json = serde_json::to_value(family).unwrap();
        assert_eq!(json, serde_json::json!({"family": "led", "kind": "pwm"}));
        let back: DeviceFamily = serde_json::from_value(json).unwrap();
        assert_eq!(back, family);
    }
}
