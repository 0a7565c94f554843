use heapless::String;

use crate::color::{self, Rgb, WHITE};
use crate::config::DEFAULT_ON_BRIGHTNESS;
use crate::domain::dto::{LightCommand, LightSnapshot};
use crate::domain::error::CommandError;

/// Maximum length of an effect name
pub const MODE_NAME_SIZE: usize = 32;

pub type ModeName = String<MODE_NAME_SIZE>;

/// Light effect mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Static,
    Breathing,
    Flashing,
    RandomFlash,
    Rainbow,
    Watercolor,
    Off,
    /// Effect name nobody recognised, kept verbatim
    Unknown(ModeName),
}

impl Mode {
    /// Names advertised in the discovery effect list
    pub const EFFECT_NAMES: [&'static str; 7] = [
        "static",
        "breathing",
        "flashing",
        "random_flash",
        "rainbow",
        "watercolor",
        "off",
    ];

    /// Parse an effect name.
    ///
    /// Unrecognised names become [`Mode::Unknown`].
    pub fn parse(name: &str) -> Result<Self, CommandError> {
        let name = name.trim();
        let mode = match name {
            "static" => Mode::Static,
            "breathing" => Mode::Breathing,
            "flashing" => Mode::Flashing,
            "random_flash" => Mode::RandomFlash,
            "rainbow" => Mode::Rainbow,
            "watercolor" => Mode::Watercolor,
            "off" => Mode::Off,
            other => {
                let stored =
                    ModeName::try_from(other).map_err(|()| CommandError::EffectNameTooLong)?;
                Mode::Unknown(stored)
            }
        };
        Ok(mode)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Mode::Static => "static",
            Mode::Breathing => "breathing",
            Mode::Flashing => "flashing",
            Mode::RandomFlash => "random_flash",
            Mode::Rainbow => "rainbow",
            Mode::Watercolor => "watercolor",
            Mode::Off => "off",
            Mode::Unknown(name) => name.as_str(),
        }
    }

    /// Text shown on the display while the mode runs
    pub const fn label(&self) -> &'static str {
        match self {
            Mode::Static => "Static",
            Mode::Breathing => "Breathing",
            Mode::Flashing => "Flashing",
            Mode::RandomFlash => "Random Flash",
            Mode::Rainbow => "Rainbow",
            Mode::Watercolor => "Watercolor",
            Mode::Off => "Light Off",
            Mode::Unknown(_) => "Unknown",
        }
    }

    /// Whether the mode renders the `rgb` base color.
    ///
    /// Rainbow and Watercolor carry their own palettes.
    pub const fn uses_base_color(&self) -> bool {
        !matches!(self, Mode::Rainbow | Mode::Watercolor)
    }
}

/// Represents the light state.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceState {
    pub mode: Mode,
    /// Output level in `0.0..=1.0`, zero means off
    pub brightness: f32,
    /// Level restored by ON after OFF
    pub last_brightness: f32,
    pub rgb: Rgb,
    /// Last color temperature command, cleared by an RGB command
    pub color_temp: Option<u32>,
}

impl DeviceState {
    /// Create a new light state
    pub const fn new() -> Self {
        Self {
            mode: Mode::Rainbow,
            brightness: 1.0,
            last_brightness: 1.0,
            rgb: WHITE,
            color_temp: None,
        }
    }

    /// Restore a state from its persisted part
    pub fn from_snapshot(snapshot: LightSnapshot) -> Self {
        let last_brightness = if snapshot.brightness > 0.0 {
            snapshot.brightness
        } else {
            DEFAULT_ON_BRIGHTNESS
        };
        Self {
            mode: snapshot.mode,
            brightness: snapshot.brightness,
            last_brightness,
            rgb: snapshot.rgb,
            color_temp: None,
        }
    }

    pub fn is_on(&self) -> bool {
        self.brightness > 0.0
    }

    /// Brightness as a rounded `0..=100` percentage
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn brightness_percent(&self) -> u8 {
        libm::roundf(self.brightness.clamp(0.0, 1.0) * 100.0) as u8
    }

    /// The persisted part of the state
    pub fn snapshot(&self) -> LightSnapshot {
        LightSnapshot {
            mode: self.mode.clone(),
            brightness: self.brightness,
            rgb: self.rgb,
        }
    }

    pub fn turn_on(&mut self) {
        if self.is_on() {
            return;
        }
        self.brightness = if self.last_brightness > 0.0 {
            self.last_brightness
        } else {
            DEFAULT_ON_BRIGHTNESS
        };
    }

    pub fn turn_off(&mut self) {
        self.last_brightness = self.brightness;
        self.brightness = 0.0;
    }

    /// Set brightness from a `0..=100` percentage
    pub fn set_brightness_percent(&mut self, percent: u8) {
        self.brightness = f32::from(percent.min(100)) / 100.0;
    }

    /// Set the base color.
    ///
    /// Palette modes switch to `Static` so the color becomes visible.
    pub fn set_rgb(&mut self, rgb: Rgb) {
        if !self.mode.uses_base_color() {
            self.mode = Mode::Static;
        }
        self.rgb = rgb;
        self.color_temp = None;
    }

    /// Apply a validated command
    pub fn apply(&mut self, command: LightCommand) {
        match command {
            LightCommand::Power(true) => self.turn_on(),
            LightCommand::Power(false) => self.turn_off(),
            LightCommand::Brightness(percent) => self.set_brightness_percent(percent),
            LightCommand::Rgb(rgb) => self.set_rgb(rgb),
            LightCommand::ColorTemperature(value) => {
                if let Some(rgb) = color::color_temperature_to_rgb(value) {
                    self.set_rgb(rgb);
                    self.color_temp = Some(value);
                }
            }
            LightCommand::Effect(mode) => self.mode = mode,
        }
    }
}

impl Default for DeviceState {
    /// Create a new light state with default values
    fn default() -> Self {
        Self::new()
    }
}
