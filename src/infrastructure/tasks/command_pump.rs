use embassy_time::{Duration, Timer};
use log::warn;

use crate::config::COMMANDS;
use crate::controllers::{CommandRouter, Handled};
use crate::domain::ports::BrokerClient;
use crate::infrastructure::context::DeviceContext;
use crate::infrastructure::types::SharedBroker;

/// Delivers inbound broker messages to the command router
pub struct CommandPump<'a, B> {
    context: &'a DeviceContext,
    broker: &'a SharedBroker<B>,
    router: CommandRouter<'a>,
}

impl<'a, B: BrokerClient> CommandPump<'a, B> {
    pub fn new(context: &'a DeviceContext, broker: &'a SharedBroker<B>) -> Self {
        Self {
            context,
            broker,
            router: CommandRouter::new(context),
        }
    }

    pub async fn run(&mut self) {
        loop {
            if self.poll_once().await {
                embassy_futures::yield_now().await;
            } else {
                Timer::after(Duration::from_millis(COMMANDS.idle_poll_ms)).await;
            }
        }
    }

    /// Take at most one message from the broker and route it.
    ///
    /// Returns whether a message was taken. A client error marks the
    /// session down so the connectivity monitor sets it up again.
    pub async fn poll_once(&mut self) -> bool {
        if !self.context.is_session_up() {
            return false;
        }

        let polled = self.broker.lock().await.poll().await;
        match polled {
            Ok(Some(message)) => {
                if let Ok(Handled::Applied(_)) = self.router.handle(&message.topic, &message.payload)
                {
                    self.context.publish_request.signal(());
                }
                true
            }
            Ok(None) => false,
            Err(e) => {
                warn!("mqtt: poll failed: {}, session marked down", e);
                self.context.set_session_up(false);
                false
            }
        }
    }
}
