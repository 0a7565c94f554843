//! Power Stand firmware
//!
//! Boots the ESP32-C3, loads the config file, brings up Wi-Fi and hands the
//! LED strip, the status panel and the broker session to the device runtime.

#![no_std]
#![no_main]

extern crate alloc;

mod display;
mod led;
mod mqtt;
mod network;
mod random;
mod storage;

use embassy_executor::Spawner;
use embassy_time::{Delay, Duration, Timer};
use esp_alloc as _;
use esp_backtrace as _;
use esp_hal::clock::CpuClock;
use esp_hal::efuse::Efuse;
use esp_hal::gpio::{Level, Output, OutputConfig};
use esp_hal::i2c::master::{Config as I2cConfig, I2c};
use esp_hal::interrupt::software::SoftwareInterruptControl;
use esp_hal::timer::timg::TimerGroup;
use esp_storage::FlashStorage;
use log::{error, info, warn};

use power_stand::domain::dto::PersistedConfig;
use power_stand::domain::entity::DeviceState;
use power_stand::infrastructure::context::{DeviceContext, DeviceIdentity};
use power_stand::infrastructure::scheduler::Drivers;
use power_stand::infrastructure::tasks::load_config;
use power_stand::infrastructure::types::SharedBroker;
use power_stand::{Scheduler, mk_static};

use crate::display::{OledPanel, StatusPanel};
use crate::led::EspLedStrip;
use crate::mqtt::{BrokerSettings, ChannelBroker, mqtt_session_task};
use crate::network::{WifiLink, start_wifi_sta};
use crate::random::HardwareRng;
use crate::storage::config_store;

esp_bootloader_esp_idf::esp_app_desc!();

const HOSTNAME: &str = "power-stand";

#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    esp_println::logger::init_logger_from_env();

    // Initialize hardware
    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    esp_alloc::heap_allocator!(size: 72 * 1024);

    // Start rtos
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    let sw_int = SoftwareInterruptControl::new(peripherals.SW_INTERRUPT);
    esp_rtos::start(timg0.timer0, sw_int.software_interrupt0);

    // Boot indicator off
    let _status_led = Output::new(peripherals.GPIO13, Level::Low, OutputConfig::default());

    // Load config and restore the light state
    let mut store = config_store(FlashStorage::new(peripherals.FLASH));
    let config = load_config(&mut store).await;
    let state = match config.light_snapshot() {
        Ok(snapshot) => DeviceState::from_snapshot(snapshot),
        Err(e) => {
            warn!("boot: stored light state rejected ({}), using defaults", e);
            DeviceState::new()
        }
    };

    let mac = Efuse::mac_address();
    let identity = match DeviceIdentity::new(&config.device.name, &config.device.device_type, mac)
        .or_else(|e| {
            warn!("boot: invalid device identity ({}), using defaults", e);
            let defaults = PersistedConfig::default();
            DeviceIdentity::new(&defaults.device.name, &defaults.device.device_type, mac)
        }) {
        Ok(identity) => identity,
        Err(e) => halt("device identity", e).await,
    };
    info!("boot: device id {}", identity.unique_id);

    let context = mk_static!(DeviceContext, DeviceContext::new(identity, state));
    let broker = mk_static!(SharedBroker<ChannelBroker>, SharedBroker::new(ChannelBroker));

    // Network
    let mut rng = HardwareRng::new();
    let seed = rng.seed();
    let stack = match start_wifi_sta(
        spawner,
        peripherals.WIFI,
        wifi_value(config.wifi_ssid.as_deref(), option_env!("WIFI_SSID")),
        wifi_value(config.wifi_password.as_deref(), option_env!("WIFI_PASSWORD")),
        truncated(HOSTNAME),
        seed,
    ) {
        Ok(stack) => stack,
        Err(e) => halt("wifi", e).await,
    };

    let settings = BrokerSettings {
        host: truncated(&config.mqtt_broker),
        port: config.mqtt_port,
        client_id: truncated(&config.mqtt_client_id),
    };
    if !config.mqtt_user.is_empty() {
        warn!("mqtt: broker credentials are not supported by the client, connecting anonymously");
    }
    spawner.spawn(mqtt_session_task(stack, settings)).ok();

    // Outputs
    let leds = match EspLedStrip::new(peripherals.RMT, peripherals.GPIO12) {
        Ok(leds) => leds,
        Err(e) => halt("led strip", e).await,
    };
    let panel = match I2c::new(peripherals.I2C0, I2cConfig::default()) {
        Ok(i2c) => {
            let i2c = i2c.with_sda(peripherals.GPIO1).with_scl(peripherals.GPIO0);
            match OledPanel::new(i2c) {
                Ok(panel) => StatusPanel::Oled(panel),
                Err(e) => {
                    warn!("display: panel not found ({}), running headless", e);
                    StatusPanel::Missing
                }
            }
        }
        Err(_) => {
            warn!("display: I2C setup failed, running headless");
            StatusPanel::Missing
        }
    };

    let drivers = Drivers {
        leds,
        delay: Delay,
        rng,
        link: WifiLink::new(stack),
        store,
        display: panel,
    };
    Scheduler::new(context, broker, drivers, config).run().await;

    loop {
        Timer::after(Duration::from_secs(5)).await;
    }
}

fn wifi_value<const N: usize>(
    stored: Option<&str>,
    built_in: Option<&'static str>,
) -> heapless::String<N> {
    truncated(stored.or(built_in).unwrap_or_default())
}

/// Copy as much of `value` as fits
fn truncated<const N: usize>(value: &str) -> heapless::String<N> {
    let mut out = heapless::String::new();
    for c in value.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

async fn halt(stage: &str, e: impl core::fmt::Display) -> ! {
    error!("boot: {} failed: {}", stage, e);
    loop {
        Timer::after(Duration::from_secs(60)).await;
    }
}
