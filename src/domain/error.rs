//! Error types of the device runtime
//!
//! Errors are split by how the runtime reacts to them: network errors are
//! transient and retried on the next tick, command errors reject a single
//! payload, storage errors leave the in-memory state untouched.

use core::fmt;

/// Transient broker, link or clock failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkError {
    /// The link or the broker session is down
    NotConnected,
    /// The transport failed while sending or receiving
    Transport,
    /// The broker rejected the request or answered garbage
    Protocol,
    /// The outgoing payload does not fit the transport buffers
    PayloadTooLarge,
    /// Time could not be fetched from the network
    ClockUnavailable,
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkError::NotConnected => write!(f, "not connected"),
            NetworkError::Transport => write!(f, "transport error"),
            NetworkError::Protocol => write!(f, "protocol error"),
            NetworkError::PayloadTooLarge => write!(f, "payload too large"),
            NetworkError::ClockUnavailable => write!(f, "clock unavailable"),
        }
    }
}

/// Inbound command payload that failed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandError {
    /// Payload is not valid UTF-8
    Encoding,
    /// Power payload is neither `ON` nor `OFF`
    InvalidPower,
    /// Brightness is not an integer in `0..=100`
    InvalidBrightness,
    /// Color temperature is not a positive integer
    InvalidColorTemperature,
    /// Color is not a `r,g,b` byte triple
    InvalidRgb,
    /// Effect name does not fit the mode name buffer
    EffectNameTooLong,
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::Encoding => write!(f, "payload is not UTF-8"),
            CommandError::InvalidPower => write!(f, "expected ON or OFF"),
            CommandError::InvalidBrightness => {
                write!(f, "expected brightness percentage 0-100")
            }
            CommandError::InvalidColorTemperature => {
                write!(f, "expected positive color temperature")
            }
            CommandError::InvalidRgb => write!(f, "expected r,g,b byte triple"),
            CommandError::EffectNameTooLong => write!(f, "effect name too long"),
        }
    }
}

/// Durable storage failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// The storage driver failed to read or write
    DriverError,
    /// Stored data is missing or has no valid header
    InvalidMagicHeader,
    /// The record does not fit the storage area
    TooLarge,
    /// The record could not be encoded
    Serialization,
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::DriverError => write!(f, "storage driver error"),
            StorageError::InvalidMagicHeader => write!(f, "invalid magic header"),
            StorageError::TooLarge => write!(f, "record too large"),
            StorageError::Serialization => write!(f, "serialization error"),
        }
    }
}

/// Boot-time configuration failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The config file is not valid JSON for the expected schema
    Deserialization,
    /// A persisted field holds a value the runtime can not use
    InvalidField(&'static str),
    /// A derived topic does not fit the topic buffer
    TopicTooLong,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Deserialization => write!(f, "JSON deserialization error"),
            ConfigError::InvalidField(field) => write!(f, "invalid field: {}", field),
            ConfigError::TopicTooLong => write!(f, "topic too long"),
        }
    }
}

/// LED or display driver failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputError {
    /// The peripheral did not accept the frame
    DriverError,
}

impl fmt::Display for OutputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputError::DriverError => write!(f, "output driver error"),
        }
    }
}
