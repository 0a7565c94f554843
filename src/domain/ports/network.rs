use core::net::Ipv4Addr;

use crate::domain::dto::InboundMessage;
use crate::domain::error::NetworkError;

/// Raw network link
#[allow(async_fn_in_trait)]
pub trait NetworkLink {
    /// Whether the link is up with an address assigned
    fn is_connected(&mut self) -> bool;

    fn current_address(&mut self) -> Option<Ipv4Addr>;

    /// Fetch the wall clock time as Unix seconds
    async fn sync_clock(&mut self) -> Result<u64, NetworkError>;
}

/// Publish/subscribe transport client
#[allow(async_fn_in_trait)]
pub trait BrokerClient {
    /// Open a new broker session
    async fn connect(&mut self) -> Result<(), NetworkError>;

    async fn subscribe(&mut self, topic: &str) -> Result<(), NetworkError>;

    async fn publish(
        &mut self,
        topic: &str,
        payload: &[u8],
        retain: bool,
    ) -> Result<(), NetworkError>;

    /// Take one delivered message without waiting for new ones
    async fn poll(&mut self) -> Result<Option<InboundMessage>, NetworkError>;
}
