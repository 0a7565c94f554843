pub mod command_router;
pub mod discovery;

pub use command_router::{CommandRouter, Handled, parse_command};
pub use discovery::{DISCOVERY_BUF_SIZE, LightDiscovery, PAYLOAD_OFF, PAYLOAD_ON};
