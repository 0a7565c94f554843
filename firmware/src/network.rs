use core::net::Ipv4Addr;

use embassy_executor::Spawner;
use embassy_net::dns::DnsQueryType;
use embassy_net::udp::{PacketMetadata, UdpSocket};
use embassy_net::{DhcpConfig, IpAddress, Runner, Stack, StackResources};
use embassy_time::{Duration, Timer, with_timeout};
use esp_hal::peripherals::WIFI;
use esp_radio::wifi::{
    AuthMethod, ClientConfig, Config, ModeConfig, WifiController, WifiDevice, WifiEvent,
    WifiStaState,
};
use heapless::String;
use log::{info, warn};
use static_cell::make_static;

use power_stand::domain::error::NetworkError;
use power_stand::domain::ports::NetworkLink;

const MAX_NETWORK_CONNECTIONS: usize = 6;

const NTP_HOST: &str = "pool.ntp.org";
const NTP_PORT: u16 = 123;
const NTP_PACKET_SIZE: usize = 48;
/// Seconds between 1900-01-01 and 1970-01-01
const NTP_UNIX_OFFSET: u64 = 2_208_988_800;
const NTP_TIMEOUT: Duration = Duration::from_secs(5);

pub type Ssid = String<32>;
pub type Password = String<64>;
pub type Hostname = String<32>;

/// Bring up Wi-Fi in station mode and spawn the link tasks.
///
/// Returns without waiting for the link; the connectivity monitor observes
/// it from then on.
pub fn start_wifi_sta(
    spawner: Spawner,
    wifi_device: WIFI<'static>,
    ssid: Ssid,
    password: Password,
    hostname: Hostname,
    seed: u64,
) -> Result<Stack<'static>, NetworkError> {
    let radio = esp_radio::init().map_err(|_| NetworkError::Transport)?;
    let radio = &*make_static!(radio);
    let (controller, interfaces) =
        esp_radio::wifi::new(radio, wifi_device, Config::default())
            .map_err(|_| NetworkError::Transport)?;

    let mut dhcp_config = DhcpConfig::default();
    dhcp_config.hostname = Some(hostname);
    let net_config = embassy_net::Config::dhcpv4(dhcp_config);

    let network_resources = make_static!(StackResources::<{ MAX_NETWORK_CONNECTIONS }>::new());
    let (stack, runner) = embassy_net::new(interfaces.sta, net_config, network_resources, seed);

    spawner
        .spawn(wifi_connection_task(controller, ssid, password))
        .ok();
    spawner.spawn(network_runner_task(runner)).ok();

    Ok(stack)
}

/// Background task for connecting to the `WiFi` network and reconnecting if needed
#[embassy_executor::task]
async fn wifi_connection_task(
    mut controller: WifiController<'static>,
    ssid: Ssid,
    password: Password,
) {
    loop {
        if esp_radio::wifi::sta_state() == WifiStaState::Connected {
            controller.wait_for_event(WifiEvent::StaDisconnected).await;
            Timer::after(Duration::from_millis(2000)).await;
        }
        if !matches!(controller.is_started(), Ok(true)) {
            let client_config = if password.is_empty() {
                ClientConfig::default()
                    .with_ssid(ssid.as_str().into())
                    .with_auth_method(AuthMethod::None)
            } else {
                ClientConfig::default()
                    .with_ssid(ssid.as_str().into())
                    .with_password(password.as_str().into())
            };
            if let Err(e) = controller.set_config(&ModeConfig::Client(client_config)) {
                warn!("network: invalid wifi config: {:?}", e);
                Timer::after(Duration::from_millis(5000)).await;
                continue;
            }
            if let Err(e) = controller.start_async().await {
                warn!("network: wifi start failed: {:?}", e);
                Timer::after(Duration::from_millis(5000)).await;
                continue;
            }
        }

        info!("network: connecting to {}", ssid);
        if let Err(e) = controller.connect_async().await {
            warn!("network: error connecting: {:?}", e);
            Timer::after(Duration::from_millis(5000)).await;
        }
    }
}

/// Background task for running the network stack
#[embassy_executor::task]
async fn network_runner_task(mut runner: Runner<'static, WifiDevice<'static>>) {
    runner.run().await;
}

/// Resolves a hostname to an IP address
pub async fn resolve_host(stack: Stack<'static>, host: &str) -> Result<IpAddress, NetworkError> {
    if let Ok(ip) = host.parse::<Ipv4Addr>() {
        return Ok(IpAddress::Ipv4(ip));
    }

    let addresses = stack
        .dns_query(host, DnsQueryType::A)
        .await
        .map_err(|_| NetworkError::Transport)?;

    addresses.first().copied().ok_or(NetworkError::Transport)
}

/// Station link of the embassy-net stack
pub struct WifiLink {
    stack: Stack<'static>,
}

impl WifiLink {
    pub fn new(stack: Stack<'static>) -> Self {
        Self { stack }
    }

    async fn query_ntp(&self) -> Result<u64, NetworkError> {
        let server = resolve_host(self.stack, NTP_HOST).await?;

        let mut rx_meta = [PacketMetadata::EMPTY; 1];
        let mut rx_buffer = [0u8; NTP_PACKET_SIZE * 2];
        let mut tx_meta = [PacketMetadata::EMPTY; 1];
        let mut tx_buffer = [0u8; NTP_PACKET_SIZE * 2];
        let mut socket = UdpSocket::new(
            self.stack,
            &mut rx_meta,
            &mut rx_buffer,
            &mut tx_meta,
            &mut tx_buffer,
        );
        socket.bind(0).map_err(|_| NetworkError::Transport)?;

        // LI 0, version 4, client mode
        let mut request = [0u8; NTP_PACKET_SIZE];
        request[0] = 0x23;
        socket
            .send_to(&request, (server, NTP_PORT))
            .await
            .map_err(|_| NetworkError::Transport)?;

        let mut response = [0u8; NTP_PACKET_SIZE];
        let (len, _) = with_timeout(NTP_TIMEOUT, socket.recv_from(&mut response))
            .await
            .map_err(|_| NetworkError::ClockUnavailable)?
            .map_err(|_| NetworkError::Transport)?;
        if len < NTP_PACKET_SIZE {
            return Err(NetworkError::Protocol);
        }

        let transmit = u32::from_be_bytes([response[40], response[41], response[42], response[43]]);
        u64::from(transmit)
            .checked_sub(NTP_UNIX_OFFSET)
            .ok_or(NetworkError::Protocol)
    }
}

impl NetworkLink for WifiLink {
    fn is_connected(&mut self) -> bool {
        self.stack.is_link_up() && self.stack.config_v4().is_some()
    }

    fn current_address(&mut self) -> Option<Ipv4Addr> {
        self.stack.config_v4().map(|config| config.address.address())
    }

    async fn sync_clock(&mut self) -> Result<u64, NetworkError> {
        self.query_ntp().await
    }
}
