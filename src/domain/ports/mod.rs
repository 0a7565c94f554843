pub mod display;
pub mod light;
pub mod network;
pub mod persistence;

pub use display::*;
pub use light::*;
pub use network::*;
pub use persistence::*;
