pub(crate) struct EffectConfig {
    pub base_tick_ms: u32,
    pub idle_frame_ms: u32,
    pub breathing_steps: u32,
    pub breathing_duration_ms: u32,
    pub flash_count: u32,
    pub flash_on_ms: u32,
    pub flash_off_ms: u32,
    pub rainbow_steps: u32,
    pub watercolor_step_ms: u32,
    pub watercolor_repeat: usize,
}

pub(crate) struct StorageConfig {
    pub write_debounce_ms: u64,
}

pub(crate) struct PublisherConfig {
    pub interval_ms: u64,
}

pub(crate) struct ConnectivityConfig {
    pub poll_interval_ms: u64,
}

pub(crate) struct CommandConfig {
    pub idle_poll_ms: u64,
}

pub(crate) struct DisplayConfig {
    pub width: u32,
    pub refresh_ms: u64,
}

pub struct DeviceInfo {
    pub manufacturer: &'static str,
    pub model: &'static str,
    pub sw_version: &'static str,
}

pub const FIRMWARE_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEVICE: DeviceInfo = DeviceInfo {
    manufacturer: "Power Stand",
    model: "ESP32-C3",
    sw_version: FIRMWARE_VERSION,
};

/// Brightness used by ON when nothing was remembered before OFF.
pub const DEFAULT_ON_BRIGHTNESS: f32 = 1.0;

pub(crate) const EFFECTS: EffectConfig = EffectConfig {
    base_tick_ms: 10,
    idle_frame_ms: 20,
    breathing_steps: 100,
    breathing_duration_ms: 2000,
    flash_count: 5,
    flash_on_ms: 50,
    flash_off_ms: 500,
    rainbow_steps: 255,
    watercolor_step_ms: 100,
    watercolor_repeat: 6,
};

pub(crate) const STORAGE: StorageConfig = StorageConfig {
    write_debounce_ms: 5000,
};

pub(crate) const PUBLISHER: PublisherConfig = PublisherConfig { interval_ms: 5000 };

pub(crate) const CONNECTIVITY: ConnectivityConfig = ConnectivityConfig {
    poll_interval_ms: 500,
};

pub(crate) const COMMANDS: CommandConfig = CommandConfig { idle_poll_ms: 50 };

pub(crate) const DISPLAY: DisplayConfig = DisplayConfig {
    width: 128,
    refresh_ms: 1000,
};
