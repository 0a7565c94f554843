//! Runtime side of the device
//!
//! Shared state, the services wrapping it and the periodic tasks driving
//! the ports.

pub mod context;
pub mod scheduler;
pub mod services;
pub mod tasks;
pub mod types;
