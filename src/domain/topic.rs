//! Topic set of the device
//!
//! Every topic has the shape `{namespace}/{device_type}/{unique_id}{suffix}`
//! and is computed once at startup.

use core::fmt::Write;

use heapless::String;

use crate::domain::error::ConfigError;

/// Topic buffer size
pub const TOPIC_SIZE: usize = 96;

/// Device identifier buffer size
pub const UNIQUE_ID_SIZE: usize = 32;

/// Discovery namespace
pub const NAMESPACE: &str = "homeassistant";

pub type Topic = String<TOPIC_SIZE>;
pub type UniqueId = String<UNIQUE_ID_SIZE>;

/// Derive the device identifier from a hardware address.
///
/// Format: `powerstand_{mac as lowercase hex}`
pub fn unique_id_from_mac(mac: [u8; 6]) -> UniqueId {
    let mut id = UniqueId::new();
    let _ = id.push_str("powerstand_");
    for byte in mac {
        let _ = write!(id, "{:02x}", byte);
    }
    id
}

/// Role of a topic in the device namespace
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopicKind {
    Config,
    Status,
    Set,
    Brightness,
    BrightnessStatus,
    ColorTemp,
    ColorTempStatus,
    Rgb,
    RgbStatus,
    Effect,
    EffectStatus,
}

impl TopicKind {
    pub const ALL: [TopicKind; 11] = [
        TopicKind::Config,
        TopicKind::Status,
        TopicKind::Set,
        TopicKind::Brightness,
        TopicKind::BrightnessStatus,
        TopicKind::ColorTemp,
        TopicKind::ColorTempStatus,
        TopicKind::Rgb,
        TopicKind::RgbStatus,
        TopicKind::Effect,
        TopicKind::EffectStatus,
    ];

    pub const fn suffix(self) -> &'static str {
        match self {
            TopicKind::Config => "/config",
            TopicKind::Status => "/status",
            TopicKind::Set => "/set",
            TopicKind::Brightness => "/brightness",
            TopicKind::BrightnessStatus => "/brightnessstatus",
            TopicKind::ColorTemp => "/colortemp",
            TopicKind::ColorTempStatus => "/colortempstatus",
            TopicKind::Rgb => "/rgb",
            TopicKind::RgbStatus => "/rgbstatus",
            TopicKind::Effect => "/effect",
            TopicKind::EffectStatus => "/effectstatus",
        }
    }

    /// Command carried by this topic, `None` for state and discovery topics
    pub const fn command(self) -> Option<CommandKind> {
        match self {
            TopicKind::Set => Some(CommandKind::Power),
            TopicKind::Brightness => Some(CommandKind::Brightness),
            TopicKind::ColorTemp => Some(CommandKind::ColorTemperature),
            TopicKind::Rgb => Some(CommandKind::Rgb),
            TopicKind::Effect => Some(CommandKind::Effect),
            _ => None,
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

/// Kind of change requested on a command topic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Power,
    Brightness,
    ColorTemperature,
    Rgb,
    Effect,
}

/// Precomputed topics of one device
#[derive(Debug, Clone)]
pub struct Topics {
    base: Topic,
    topics: [Topic; 11],
}

impl Topics {
    pub fn new(device_type: &str, unique_id: &str) -> Result<Self, ConfigError> {
        let mut base = Topic::new();
        write!(base, "{}/{}/{}", NAMESPACE, device_type, unique_id)
            .map_err(|_| ConfigError::TopicTooLong)?;

        let mut topics: [Topic; 11] = Default::default();
        for kind in TopicKind::ALL {
            let topic = &mut topics[kind.index()];
            topic.push_str(&base).map_err(|()| ConfigError::TopicTooLong)?;
            topic
                .push_str(kind.suffix())
                .map_err(|()| ConfigError::TopicTooLong)?;
        }

        Ok(Self { base, topics })
    }

    pub fn get(&self, kind: TopicKind) -> &str {
        &self.topics[kind.index()]
    }

    /// Classify a topic of this device, `None` for foreign topics
    pub fn classify(&self, topic: &str) -> Option<TopicKind> {
        let suffix = topic.strip_prefix(self.base.as_str())?;
        TopicKind::ALL
            .into_iter()
            .find(|kind| kind.suffix() == suffix)
    }

    /// Topics the device subscribes to: every command and status topic
    pub fn subscriptions(&self) -> impl Iterator<Item = &str> {
        TopicKind::ALL
            .into_iter()
            .filter(|kind| *kind != TopicKind::Config)
            .map(|kind| self.get(kind))
    }
}
