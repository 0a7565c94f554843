use alloc::string::String;
use core::cell::Cell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

use crate::domain::entity::DeviceState;
use crate::domain::error::ConfigError;
use crate::domain::topic::{Topics, UniqueId, unique_id_from_mac};
use crate::infrastructure::services::{SharedLightState, StatusBoard, WallClock};

/// Identity of the device on the broker
#[derive(Debug, Clone)]
pub struct DeviceIdentity {
    pub name: String,
    pub unique_id: UniqueId,
    pub topics: Topics,
}

impl DeviceIdentity {
    pub fn new(name: &str, device_type: &str, mac: [u8; 6]) -> Result<Self, ConfigError> {
        let unique_id = unique_id_from_mac(mac);
        let topics = Topics::new(device_type, &unique_id)?;
        Ok(Self {
            name: String::from(name),
            unique_id,
            topics,
        })
    }
}

/// State shared by every task of the runtime
pub struct DeviceContext {
    pub identity: DeviceIdentity,
    pub light: SharedLightState,
    pub status: StatusBoard,
    pub clock: WallClock,
    /// Raised after a command so the state echo goes out early
    pub publish_request: Signal<CriticalSectionRawMutex, ()>,
    session_up: Mutex<CriticalSectionRawMutex, Cell<bool>>,
}

impl DeviceContext {
    pub fn new(identity: DeviceIdentity, state: DeviceState) -> Self {
        Self {
            identity,
            light: SharedLightState::new(state),
            status: StatusBoard::new(),
            clock: WallClock::new(),
            publish_request: Signal::new(),
            session_up: Mutex::new(Cell::new(false)),
        }
    }

    pub fn topics(&self) -> &Topics {
        &self.identity.topics
    }

    /// Whether a broker session is established and healthy
    pub fn is_session_up(&self) -> bool {
        self.session_up.lock(Cell::get)
    }

    pub fn set_session_up(&self, up: bool) {
        self.session_up.lock(|cell| cell.set(up));
    }
}
