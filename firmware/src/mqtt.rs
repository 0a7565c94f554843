//! Broker session task
//!
//! The MQTT client borrows its socket buffers, so it lives inside one task.
//! [`ChannelBroker`] is the handle the runtime uses; it forwards every call
//! to the session task and waits for the answer.

use embassy_futures::select::{Either, select};
use embassy_net::Stack;
use embassy_net::tcp::TcpSocket;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use embassy_time::Duration;
use heapless::{String, Vec};
use log::{debug, info, warn};
use myrtio_mqtt::client::{MqttClient, MqttEvent, MqttOptions};
use myrtio_mqtt::packet::QoS;
use myrtio_mqtt::transport::TcpTransport;

use power_stand::controllers::DISCOVERY_BUF_SIZE;
use power_stand::domain::dto::InboundMessage;
use power_stand::domain::error::NetworkError;
use power_stand::domain::ports::BrokerClient;
use power_stand::domain::topic::Topic;

use crate::network::resolve_host;

const MQTT_MAX_TOPICS: usize = 12;
const MQTT_BUF_SIZE: usize = 2560;
const INBOX_DEPTH: usize = 8;

pub type ClientId = String<32>;
pub type Host = String<64>;

/// Where the session connects to
pub struct BrokerSettings {
    pub host: Host,
    pub port: u16,
    pub client_id: ClientId,
}

enum Request {
    Connect,
    Subscribe(Topic),
    Publish {
        topic: Topic,
        payload: Vec<u8, DISCOVERY_BUF_SIZE>,
    },
}

/// One unit of session work, detached from the client borrow
enum Step {
    Request(Request),
    Inbound(Option<InboundMessage>),
    Lost,
}

enum SessionEnd {
    /// A new session was requested while this one was up
    Reconnect,
    Closed,
}

static REQUESTS: Channel<CriticalSectionRawMutex, Request, 1> = Channel::new();
static RESPONSES: Channel<CriticalSectionRawMutex, Result<(), NetworkError>, 1> = Channel::new();
static INBOX: Channel<CriticalSectionRawMutex, InboundMessage, INBOX_DEPTH> = Channel::new();
static SESSION_LOST: Signal<CriticalSectionRawMutex, NetworkError> = Signal::new();

/// Broker handle backed by [`mqtt_session_task`]
pub struct ChannelBroker;

impl ChannelBroker {
    async fn call(&mut self, request: Request) -> Result<(), NetworkError> {
        REQUESTS.send(request).await;
        RESPONSES.receive().await
    }
}

impl BrokerClient for ChannelBroker {
    async fn connect(&mut self) -> Result<(), NetworkError> {
        SESSION_LOST.reset();
        INBOX.clear();
        self.call(Request::Connect).await
    }

    async fn subscribe(&mut self, topic: &str) -> Result<(), NetworkError> {
        let topic = Topic::try_from(topic).map_err(|()| NetworkError::PayloadTooLarge)?;
        self.call(Request::Subscribe(topic)).await
    }

    /// The client has no retain flag; discovery is re-sent on every session instead.
    async fn publish(
        &mut self,
        topic: &str,
        payload: &[u8],
        _retain: bool,
    ) -> Result<(), NetworkError> {
        let topic = Topic::try_from(topic).map_err(|()| NetworkError::PayloadTooLarge)?;
        let payload = Vec::from_slice(payload).map_err(|()| NetworkError::PayloadTooLarge)?;
        self.call(Request::Publish { topic, payload }).await
    }

    async fn poll(&mut self) -> Result<Option<InboundMessage>, NetworkError> {
        if let Some(e) = SESSION_LOST.try_take() {
            return Err(e);
        }
        Ok(INBOX.try_receive().ok())
    }
}

/// Owns the broker socket and serves [`ChannelBroker`] requests
#[embassy_executor::task]
pub async fn mqtt_session_task(stack: Stack<'static>, settings: BrokerSettings) {
    let mut reconnect = false;
    loop {
        if !reconnect {
            match REQUESTS.receive().await {
                Request::Connect => {}
                _ => {
                    RESPONSES.send(Err(NetworkError::NotConnected)).await;
                    continue;
                }
            }
        }

        reconnect = match run_session(stack, &settings).await {
            SessionEnd::Reconnect => true,
            SessionEnd::Closed => false,
        };
    }
}

async fn run_session(stack: Stack<'static>, settings: &BrokerSettings) -> SessionEnd {
    let mut rx_buffer = [0u8; MQTT_BUF_SIZE];
    let mut tx_buffer = [0u8; MQTT_BUF_SIZE];

    let mut socket = TcpSocket::new(stack, &mut rx_buffer, &mut tx_buffer);
    socket.set_timeout(Some(Duration::from_secs(60)));

    let address = match resolve_host(stack, settings.host.as_str()).await {
        Ok(address) => address,
        Err(e) => {
            RESPONSES.send(Err(e)).await;
            return SessionEnd::Closed;
        }
    };

    info!("mqtt: connecting to broker {:?}:{}", address, settings.port);
    if let Err(e) = socket.connect((address, settings.port)).await {
        socket.abort();
        warn!("mqtt: TCP connect failed: {:?}", e);
        RESPONSES.send(Err(NetworkError::Transport)).await;
        return SessionEnd::Closed;
    }

    let transport = TcpTransport::new(socket, Duration::from_secs(30));
    let options =
        MqttOptions::new(settings.client_id.as_str()).with_keep_alive(Duration::from_secs(15));
    let mut client: MqttClient<_, MQTT_MAX_TOPICS, MQTT_BUF_SIZE> =
        MqttClient::new(transport, options);

    if client.connect().await.is_err() {
        RESPONSES.send(Err(NetworkError::Protocol)).await;
        return SessionEnd::Closed;
    }
    RESPONSES.send(Ok(())).await;

    loop {
        let step = match select(REQUESTS.receive(), client.poll()).await {
            Either::First(request) => Step::Request(request),
            Either::Second(Ok(Some(MqttEvent::Publish(message)))) => Step::Inbound(
                InboundMessage::new(&message.topic[..], &message.payload[..]),
            ),
            Either::Second(Ok(_)) => continue,
            Either::Second(Err(_)) => Step::Lost,
        };

        match step {
            Step::Request(Request::Connect) => return SessionEnd::Reconnect,
            Step::Request(Request::Subscribe(topic)) => {
                let result = client
                    .subscribe(topic.as_str(), QoS::AtLeastOnce)
                    .await
                    .map_err(|_| NetworkError::Transport);
                RESPONSES.send(result).await;
            }
            Step::Request(Request::Publish { topic, payload }) => {
                let result = client
                    .publish(topic.as_str(), &payload, QoS::AtMostOnce)
                    .await
                    .map_err(|_| NetworkError::Transport);
                RESPONSES.send(result).await;
            }
            Step::Inbound(Some(inbound)) => {
                if INBOX.try_send(inbound).is_err() {
                    debug!("mqtt: inbox full, message dropped");
                }
            }
            Step::Inbound(None) => debug!("mqtt: oversized message dropped"),
            Step::Lost => {
                warn!("mqtt: session lost");
                SESSION_LOST.signal(NetworkError::Transport);
                return SessionEnd::Closed;
            }
        }
    }
}
