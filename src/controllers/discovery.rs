//! Home Assistant discovery payload
//!
//! Matches the default-schema MQTT light expected by Home Assistant.

use serde::Serialize;

use crate::config::DEVICE;
use crate::domain::entity::Mode;
use crate::domain::error::NetworkError;
use crate::domain::topic::TopicKind;
use crate::infrastructure::context::DeviceIdentity;

/// Discovery payload buffer size
pub const DISCOVERY_BUF_SIZE: usize = 2048;

pub const PAYLOAD_ON: &str = "ON";
pub const PAYLOAD_OFF: &str = "OFF";

/// Device information block
#[derive(Serialize)]
pub struct DiscoveryDevice<'a> {
    pub identifiers: [&'a str; 1],
    pub name: &'a str,
    pub manufacturer: &'a str,
    pub model: &'a str,
    pub sw_version: &'a str,
}

/// Light entity discovery payload
#[derive(Serialize)]
pub struct LightDiscovery<'a> {
    pub name: &'a str,
    pub unique_id: &'a str,
    pub command_topic: &'a str,
    pub state_topic: &'a str,
    pub brightness_command_topic: &'a str,
    pub brightness_state_topic: &'a str,
    pub brightness_scale: u8,
    pub color_temp_command_topic: &'a str,
    pub color_temp_state_topic: &'a str,
    pub rgb_command_topic: &'a str,
    pub rgb_state_topic: &'a str,
    pub effect_command_topic: &'a str,
    pub effect_state_topic: &'a str,
    pub effect_list: &'a [&'a str],
    pub payload_on: &'a str,
    pub payload_off: &'a str,
    pub device: DiscoveryDevice<'a>,
}

impl<'a> LightDiscovery<'a> {
    pub fn new(identity: &'a DeviceIdentity) -> Self {
        let topic = move |kind: TopicKind| identity.topics.get(kind);
        Self {
            name: identity.name.as_str(),
            unique_id: identity.unique_id.as_str(),
            command_topic: topic(TopicKind::Set),
            state_topic: topic(TopicKind::Status),
            brightness_command_topic: topic(TopicKind::Brightness),
            brightness_state_topic: topic(TopicKind::BrightnessStatus),
            brightness_scale: 100,
            color_temp_command_topic: topic(TopicKind::ColorTemp),
            color_temp_state_topic: topic(TopicKind::ColorTempStatus),
            rgb_command_topic: topic(TopicKind::Rgb),
            rgb_state_topic: topic(TopicKind::RgbStatus),
            effect_command_topic: topic(TopicKind::Effect),
            effect_state_topic: topic(TopicKind::EffectStatus),
            effect_list: &Mode::EFFECT_NAMES,
            payload_on: PAYLOAD_ON,
            payload_off: PAYLOAD_OFF,
            device: DiscoveryDevice {
                identifiers: [identity.unique_id.as_str()],
                name: identity.name.as_str(),
                manufacturer: DEVICE.manufacturer,
                model: DEVICE.model,
                sw_version: DEVICE.sw_version,
            },
        }
    }

    /// Serialize into `buf`, returning the payload length
    pub fn encode(&self, buf: &mut [u8]) -> Result<usize, NetworkError> {
        serde_json_core::to_slice(self, buf).map_err(|_| NetworkError::PayloadTooLarge)
    }
}
