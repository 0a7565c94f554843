mod command_pump;
mod connectivity;
mod display;
mod persistence;
mod state_publisher;

pub use command_pump::CommandPump;
pub use connectivity::{ConnectivityMonitor, LinkState};
pub use display::{StatusDisplay, centered_x};
pub use persistence::{ConfigPersister, load_config};
pub use state_publisher::{StateMessage, StatePublisher, state_messages};
