//! Inbound command dispatch
//!
//! Maps a broker message to a light state change. Dispatch is synchronous
//! and the whole mutation happens in one critical section.

use log::{info, warn};

use crate::color;
use crate::domain::dto::LightCommand;
use crate::domain::entity::Mode;
use crate::domain::error::CommandError;
use crate::domain::topic::CommandKind;
use crate::infrastructure::context::DeviceContext;

/// What the router did with a message
#[derive(Debug, Clone, PartialEq)]
pub enum Handled {
    /// The command was applied to the light state
    Applied(LightCommand),
    /// Echo of our own state or a topic we do not serve
    Ignored,
}

pub struct CommandRouter<'a> {
    context: &'a DeviceContext,
}

impl<'a> CommandRouter<'a> {
    pub fn new(context: &'a DeviceContext) -> Self {
        Self { context }
    }

    /// Apply one inbound message.
    ///
    /// A malformed payload leaves the state untouched and is returned as an
    /// error after being logged.
    pub fn handle(&self, topic: &str, payload: &[u8]) -> Result<Handled, CommandError> {
        let Some(kind) = self.context.topics().classify(topic) else {
            info!("router: ignoring message on unknown topic {}", topic);
            return Ok(Handled::Ignored);
        };
        let Some(kind) = kind.command() else {
            return Ok(Handled::Ignored);
        };

        let command = parse_command(kind, payload).inspect_err(|e| {
            warn!("router: rejected payload on {}: {}", topic, e);
        })?;

        self.context
            .light
            .update(|state| state.apply(command.clone()));
        Ok(Handled::Applied(command))
    }
}

/// Validate a payload received on a command topic
pub fn parse_command(kind: CommandKind, payload: &[u8]) -> Result<LightCommand, CommandError> {
    let text = core::str::from_utf8(payload)
        .map_err(|_| CommandError::Encoding)?
        .trim();

    match kind {
        CommandKind::Power => match text {
            "ON" => Ok(LightCommand::Power(true)),
            "OFF" => Ok(LightCommand::Power(false)),
            _ => Err(CommandError::InvalidPower),
        },
        CommandKind::Brightness => text
            .parse::<u8>()
            .ok()
            .filter(|percent| *percent <= 100)
            .map(LightCommand::Brightness)
            .ok_or(CommandError::InvalidBrightness),
        CommandKind::ColorTemperature => text
            .parse::<u32>()
            .ok()
            .filter(|value| *value > 0)
            .map(LightCommand::ColorTemperature)
            .ok_or(CommandError::InvalidColorTemperature),
        CommandKind::Rgb => color::parse_rgb(text)
            .map(LightCommand::Rgb)
            .ok_or(CommandError::InvalidRgb),
        CommandKind::Effect => Mode::parse(text).map(LightCommand::Effect),
    }
}
