use alloc::string::String;
use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

use crate::color::{self, Rgb};
use crate::domain::entity::Mode;
use crate::domain::error::{ConfigError, StorageError};
use crate::domain::topic::TOPIC_SIZE;

/// Maximum size of an inbound command payload
pub const PAYLOAD_SIZE: usize = 64;

/// Validated change requested through one command topic.
///
/// This is a source-neutral representation of what the user wants to do.
#[derive(Debug, Clone, PartialEq)]
pub enum LightCommand {
    Power(bool),
    /// Percentage `0..=100`
    Brightness(u8),
    Rgb(Rgb),
    /// Raw value, mireds or Kelvin
    ColorTemperature(u32),
    Effect(Mode),
}

/// The part of the light state that survives a reboot
#[derive(Debug, Clone, PartialEq)]
pub struct LightSnapshot {
    pub mode: Mode,
    pub brightness: f32,
    pub rgb: Rgb,
}

/// Message delivered by the broker on a subscribed topic
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub topic: heapless::String<TOPIC_SIZE>,
    pub payload: heapless::Vec<u8, PAYLOAD_SIZE>,
}

impl InboundMessage {
    /// Build a message, failing when either part exceeds its buffer
    pub fn new(topic: &str, payload: &[u8]) -> Option<Self> {
        Some(Self {
            topic: heapless::String::try_from(topic).ok()?,
            payload: heapless::Vec::from_slice(payload).ok()?,
        })
    }
}

/// Device section of the config file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceSection {
    pub name: String,
    #[serde(rename = "type")]
    pub device_type: String,
    pub mode: String,
    pub brightness: f32,
    pub rgb: String,
}

impl Default for DeviceSection {
    fn default() -> Self {
        Self {
            name: String::from("Power Stand"),
            device_type: String::from("light"),
            mode: String::from("rainbow"),
            brightness: 1.0,
            rgb: String::from("255,255,255"),
        }
    }
}

/// Durable configuration file
///
/// Loaded once at boot. The device section is rewritten whenever the light
/// state changes. Broker keys are also accepted as `broker_address`,
/// `broker_port`, `broker_user`, `broker_password` and `client_id`; they are
/// written back under their `mqtt_*` names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedConfig {
    #[serde(alias = "broker_address")]
    pub mqtt_broker: String,
    #[serde(alias = "broker_port")]
    pub mqtt_port: u16,
    #[serde(alias = "broker_user")]
    pub mqtt_user: String,
    #[serde(alias = "broker_password")]
    pub mqtt_password: String,
    #[serde(alias = "client_id")]
    pub mqtt_client_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wifi_ssid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wifi_password: Option<String>,
    pub device: DeviceSection,
}

impl Default for PersistedConfig {
    fn default() -> Self {
        Self {
            mqtt_broker: String::new(),
            mqtt_port: 1883,
            mqtt_user: String::new(),
            mqtt_password: String::new(),
            mqtt_client_id: String::from("power-stand"),
            wifi_ssid: None,
            wifi_password: None,
            device: DeviceSection::default(),
        }
    }
}

impl PersistedConfig {
    /// Parse the config file. Missing fields take their defaults.
    pub fn from_json(data: &[u8]) -> Result<Self, ConfigError> {
        serde_json::from_slice(data).map_err(|_| ConfigError::Deserialization)
    }

    /// Encode the config as indented JSON
    pub fn to_json_pretty(&self) -> Result<Vec<u8>, StorageError> {
        serde_json::to_vec_pretty(self).map_err(|_| StorageError::Serialization)
    }

    /// Light state stored in the device section
    pub fn light_snapshot(&self) -> Result<LightSnapshot, ConfigError> {
        let mode =
            Mode::parse(&self.device.mode).map_err(|_| ConfigError::InvalidField("device.mode"))?;
        let rgb =
            color::parse_rgb(&self.device.rgb).ok_or(ConfigError::InvalidField("device.rgb"))?;
        if !(0.0..=1.0).contains(&self.device.brightness) {
            return Err(ConfigError::InvalidField("device.brightness"));
        }
        Ok(LightSnapshot {
            mode,
            brightness: self.device.brightness,
            rgb,
        })
    }

    /// Store the light state into the device section
    pub fn set_light(&mut self, snapshot: &LightSnapshot) {
        self.device.mode = String::from(snapshot.mode.as_str());
        self.device.brightness = snapshot.brightness;
        self.device.rgb = String::from(color::format_rgb(snapshot.rgb).as_str());
    }
}
