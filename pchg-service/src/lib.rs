//! Peripheral device charger service
//!
//! Monitors the wireless/peripheral charge ports owned by the EC. Ports are discovered once at attach, then
//! refreshed either on demand by consumers reading a property (rate limited) or by EC device events (forced).
//! Consumers are told about a port through [`port::Registry::changed`] only when its status or battery level
//! actually changed.

#![no_std]

use ec_services::ec_type::command;

pub mod config;
pub mod context;
pub mod discovery;
pub mod event;
pub mod poll;
pub mod port;
pub mod time;

#[cfg(test)]
mod mock;

pub use config::Config;
pub use context::Context;
pub use event::{EventResult, HostEventSource};
pub use port::{PortHandle, Registry};

/// Peripheral charger service errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// A command buffer could not be sized for the request or response
    Allocation,
    /// The EC transport failed, contains the transport status
    Transport(i32),
    /// The EC returned a malformed response
    InvalidResponse,
    /// The EC reported more ports than supported, contains the reported count
    CapacityExceeded(u8),
    /// No port could be registered
    NoDevice,
    /// The EC does not have peripheral charge ports
    FeatureAbsent,
    /// The handle does not belong to this context
    InvalidPort,
}

impl Error {
    /// Returns true for errors that are an expected outcome on this platform rather than a fault
    pub fn is_benign(&self) -> bool {
        matches!(self, Error::FeatureAbsent)
    }
}

impl From<command::Error> for Error {
    fn from(value: command::Error) -> Self {
        match value {
            command::Error::Allocation => Error::Allocation,
            command::Error::Transport(status) => Error::Transport(status),
            command::Error::InvalidResponse => Error::InvalidResponse,
        }
    }
}
