//! Connectivity monitor
//!
//! Polls the link and, on every disconnected to connected edge, syncs the
//! clock, opens a broker session, subscribes to the device topics and
//! announces the device. Losing the link is only observed.

use embassy_time::{Duration, Ticker};
use log::{info, warn};

use crate::config::CONNECTIVITY;
use crate::controllers::{DISCOVERY_BUF_SIZE, LightDiscovery};
use crate::domain::error::NetworkError;
use crate::domain::ports::{BrokerClient, NetworkLink};
use crate::domain::topic::TopicKind;
use crate::infrastructure::context::DeviceContext;
use crate::infrastructure::types::SharedBroker;

/// Ticks to wait before retrying a failed session setup
const SESSION_RETRY_TICKS: u8 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Disconnected,
    Connected,
}

pub struct ConnectivityMonitor<'a, N, B> {
    context: &'a DeviceContext,
    link: N,
    broker: &'a SharedBroker<B>,
    state: LinkState,
    retry_in: u8,
    failing: bool,
}

impl<'a, N, B> ConnectivityMonitor<'a, N, B>
where
    N: NetworkLink,
    B: BrokerClient,
{
    pub fn new(context: &'a DeviceContext, link: N, broker: &'a SharedBroker<B>) -> Self {
        Self {
            context,
            link,
            broker,
            state: LinkState::Disconnected,
            retry_in: 0,
            failing: false,
        }
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    pub async fn run(&mut self) {
        let mut ticker = Ticker::every(Duration::from_millis(CONNECTIVITY.poll_interval_ms));
        loop {
            self.tick().await;
            ticker.next().await;
        }
    }

    /// Observe the link once and react to edges
    pub async fn tick(&mut self) {
        let connected = self.link.is_connected();
        let address = if connected {
            self.link.current_address()
        } else {
            None
        };
        self.context.status.set_network(address);

        match (self.state, connected) {
            (LinkState::Disconnected, true) => {
                info!("network: connected, address {:?}", address);
                self.state = LinkState::Connected;
                self.retry_in = 0;
                self.sync_clock().await;
                self.establish_session().await;
            }
            (LinkState::Connected, true) => {
                if !self.context.is_session_up() {
                    if self.retry_in > 0 {
                        self.retry_in -= 1;
                    } else {
                        self.establish_session().await;
                    }
                }
            }
            (LinkState::Connected, false) => {
                info!("network: disconnected");
                self.state = LinkState::Disconnected;
                self.context.set_session_up(false);
            }
            (LinkState::Disconnected, false) => {}
        }
    }

    async fn sync_clock(&mut self) {
        match self.link.sync_clock().await {
            Ok(unix_secs) => {
                self.context.clock.set(unix_secs);
                info!("network: clock synced to {}", unix_secs);
            }
            Err(e) => warn!("network: clock sync failed: {}", e),
        }
    }

    async fn establish_session(&mut self) {
        match self.open_session().await {
            Ok(()) => {
                info!("mqtt: session established, discovery published");
                self.context.set_session_up(true);
                self.failing = false;
            }
            Err(e) => {
                if !self.failing {
                    warn!("mqtt: session setup failed: {}, will retry", e);
                    self.failing = true;
                }
                self.retry_in = SESSION_RETRY_TICKS;
            }
        }
    }

    async fn open_session(&mut self) -> Result<(), NetworkError> {
        let topics = self.context.topics();
        let mut broker = self.broker.lock().await;

        broker.connect().await?;
        for topic in topics.subscriptions() {
            broker.subscribe(topic).await?;
        }

        let mut buf = [0u8; DISCOVERY_BUF_SIZE];
        let len = LightDiscovery::new(&self.context.identity).encode(&mut buf)?;
        broker
            .publish(topics.get(TopicKind::Config), &buf[..len], true)
            .await
    }
}
