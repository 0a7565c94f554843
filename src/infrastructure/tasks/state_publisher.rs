use core::fmt::Write;

use embassy_futures::select::select;
use embassy_time::{Duration, Timer};
use heapless::{String, Vec};
use log::{debug, warn};

use crate::color::format_rgb;
use crate::config::PUBLISHER;
use crate::controllers::{PAYLOAD_OFF, PAYLOAD_ON};
use crate::domain::entity::{DeviceState, MODE_NAME_SIZE};
use crate::domain::error::NetworkError;
use crate::domain::ports::BrokerClient;
use crate::domain::topic::TopicKind;
use crate::infrastructure::context::DeviceContext;
use crate::infrastructure::types::SharedBroker;

/// One state topic update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateMessage {
    pub kind: TopicKind,
    pub payload: String<MODE_NAME_SIZE>,
}

impl StateMessage {
    fn new(kind: TopicKind, args: core::fmt::Arguments<'_>) -> Self {
        let mut payload = String::new();
        let _ = payload.write_fmt(args);
        Self { kind, payload }
    }
}

/// State topic payloads mirroring `state`.
///
/// The RGB echo is left out while a palette effect runs, the color
/// temperature echo while no temperature is set.
pub fn state_messages(state: &DeviceState) -> Vec<StateMessage, 5> {
    let mut messages = Vec::new();
    let power = if state.is_on() { PAYLOAD_ON } else { PAYLOAD_OFF };

    let _ = messages.push(StateMessage::new(TopicKind::Status, format_args!("{}", power)));
    let _ = messages.push(StateMessage::new(
        TopicKind::BrightnessStatus,
        format_args!("{}", state.brightness_percent()),
    ));
    let _ = messages.push(StateMessage::new(
        TopicKind::EffectStatus,
        format_args!("{}", state.mode.as_str()),
    ));
    if state.mode.uses_base_color() {
        let _ = messages.push(StateMessage::new(
            TopicKind::RgbStatus,
            format_args!("{}", format_rgb(state.rgb)),
        ));
    }
    if let Some(color_temp) = state.color_temp {
        let _ = messages.push(StateMessage::new(
            TopicKind::ColorTempStatus,
            format_args!("{}", color_temp),
        ));
    }
    messages
}

/// Periodic best-effort echo of the light state
pub struct StatePublisher<'a, B> {
    context: &'a DeviceContext,
    broker: &'a SharedBroker<B>,
    failing: bool,
}

impl<'a, B: BrokerClient> StatePublisher<'a, B> {
    pub fn new(context: &'a DeviceContext, broker: &'a SharedBroker<B>) -> Self {
        Self {
            context,
            broker,
            failing: false,
        }
    }

    /// Publish on every interval and right after each applied command
    pub async fn run(&mut self) {
        let interval = Duration::from_millis(PUBLISHER.interval_ms);
        loop {
            let _ = self.tick().await;
            select(Timer::after(interval), self.context.publish_request.wait()).await;
        }
    }

    /// Publish the state once.
    ///
    /// The first failing publish ends the tick; only the first failure of a
    /// streak is logged.
    pub async fn tick(&mut self) -> Result<(), NetworkError> {
        if !self.context.is_session_up() {
            return Err(NetworkError::NotConnected);
        }

        match self.publish_state().await {
            Ok(()) => {
                self.failing = false;
                Ok(())
            }
            Err(e) => {
                if !self.failing {
                    warn!("mqtt: state publish failed: {}", e);
                    self.failing = true;
                }
                Err(e)
            }
        }
    }

    async fn publish_state(&mut self) -> Result<(), NetworkError> {
        let messages = state_messages(&self.context.light.get());
        let topics = self.context.topics();

        let mut broker = self.broker.lock().await;
        for message in &messages {
            broker
                .publish(topics.get(message.kind), message.payload.as_bytes(), false)
                .await?;
        }
        debug!("mqtt: published {} state topics", messages.len());
        Ok(())
    }
}
