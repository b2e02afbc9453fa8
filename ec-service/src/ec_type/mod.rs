//! Standard EC types
pub mod command;
pub mod event;
pub mod structure;

pub use command::{execute, execute_raw, CommandId, Error, HostCommand, HostRequest, HostResponse, Transport};
