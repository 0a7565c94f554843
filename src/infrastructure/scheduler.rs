//! Cooperative scheduler
//!
//! Runs every periodic task of the device on a single executor task. Each
//! task awaits between units of work, so none of them can starve the
//! others.

use embassy_futures::join::{join, join3};
use embedded_hal_async::delay::DelayNs;
use log::{info, warn};

use crate::domain::dto::PersistedConfig;
use crate::domain::ports::{
    BrokerClient, ConfigStore, DisplaySink, LedSink, NetworkLink, RandomSource,
};
use crate::effect::EffectEngine;
use crate::infrastructure::context::DeviceContext;
use crate::infrastructure::tasks::{
    CommandPump, ConfigPersister, ConnectivityMonitor, StatePublisher, StatusDisplay,
};
use crate::infrastructure::types::SharedBroker;

/// Hardware the scheduler drives
pub struct Drivers<L, D, R, N, S, P> {
    pub leds: L,
    pub delay: D,
    pub rng: R,
    pub link: N,
    pub store: S,
    pub display: P,
}

pub struct Scheduler<'a, L, D, R, N, B, S, P> {
    engine: EffectEngine<'a, L, D, R>,
    monitor: ConnectivityMonitor<'a, N, B>,
    pump: CommandPump<'a, B>,
    publisher: StatePublisher<'a, B>,
    persister: ConfigPersister<'a, S>,
    display: StatusDisplay<'a, P>,
}

impl<'a, L, D, R, N, B, S, P> Scheduler<'a, L, D, R, N, B, S, P>
where
    L: LedSink,
    D: DelayNs,
    R: RandomSource,
    N: NetworkLink,
    B: BrokerClient,
    S: ConfigStore,
    P: DisplaySink,
{
    /// `config` is the file loaded at boot, kept for the write-back
    pub fn new(
        context: &'a DeviceContext,
        broker: &'a SharedBroker<B>,
        drivers: Drivers<L, D, R, N, S, P>,
        config: PersistedConfig,
    ) -> Self {
        Self {
            engine: EffectEngine::new(context, drivers.leds, drivers.delay, drivers.rng),
            monitor: ConnectivityMonitor::new(context, drivers.link, broker),
            pump: CommandPump::new(context, broker),
            publisher: StatePublisher::new(context, broker),
            persister: ConfigPersister::new(context, drivers.store, config),
            display: StatusDisplay::new(context, drivers.display),
        }
    }

    /// Show the boot screen, then run all tasks forever
    pub async fn run(self) {
        let Self {
            mut engine,
            mut monitor,
            mut pump,
            mut publisher,
            mut persister,
            mut display,
        } = self;

        if let Err(e) = display.splash() {
            warn!("display: splash failed: {}", e);
        }
        info!("scheduler: starting tasks");

        join(
            join3(engine.run(), monitor.run(), pump.run()),
            join3(publisher.run(), persister.run(), display.run()),
        )
        .await;
    }
}
