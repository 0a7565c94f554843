use embassy_time::{Duration, Ticker};
use log::{debug, info, warn};

use crate::config::STORAGE;
use crate::domain::dto::{LightSnapshot, PersistedConfig};
use crate::domain::error::StorageError;
use crate::domain::ports::ConfigStore;
use crate::infrastructure::context::DeviceContext;

/// Debounced write-back of the light state into the config file
pub struct ConfigPersister<'a, S> {
    context: &'a DeviceContext,
    store: S,
    config: PersistedConfig,
    persisted: Option<LightSnapshot>,
}

impl<'a, S: ConfigStore> ConfigPersister<'a, S> {
    /// `config` is the file as loaded at boot
    pub fn new(context: &'a DeviceContext, store: S, config: PersistedConfig) -> Self {
        let persisted = config.light_snapshot().ok();
        Self {
            context,
            store,
            config,
            persisted,
        }
    }

    pub fn config(&self) -> &PersistedConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn run(&mut self) {
        let mut ticker = Ticker::every(Duration::from_millis(STORAGE.write_debounce_ms));
        loop {
            ticker.next().await;
            let _ = self.tick().await;
        }
    }

    /// Write the config if the light state moved since the last write.
    ///
    /// Returns whether a write happened. A failed write is retried on the
    /// next tick that still sees a difference.
    pub async fn tick(&mut self) -> Result<bool, StorageError> {
        let snapshot = self.context.light.get().snapshot();
        if self.persisted.as_ref() == Some(&snapshot) {
            return Ok(false);
        }

        self.config.set_light(&snapshot);
        let data = self.config.to_json_pretty()?;
        match self.store.store(&data).await {
            Ok(()) => {
                debug!("persistence: light state persisted, mode {}", snapshot.mode.as_str());
                self.persisted = Some(snapshot);
                Ok(true)
            }
            Err(e) => {
                warn!("persistence: error persisting light state: {}", e);
                Err(e)
            }
        }
    }
}

/// Read the config file at boot.
///
/// A missing or unreadable file yields the defaults; the next write
/// replaces it.
pub async fn load_config<S: ConfigStore>(store: &mut S) -> PersistedConfig {
    let data = match store.load().await {
        Ok(data) => data,
        Err(e) => {
            info!("persistence: no stored config ({}), using defaults", e);
            return PersistedConfig::default();
        }
    };
    PersistedConfig::from_json(&data).unwrap_or_else(|e| {
        warn!("persistence: stored config is invalid ({}), using defaults", e);
        PersistedConfig::default()
    })
}
