//! EC Service Interface Exports
//!
//! Hardware agnostic pieces shared by services that talk to an embedded controller over the host command
//! protocol: the wire codec, event masks and the generic power supply reporting types.

#![no_std]
#![warn(missing_docs)]

pub mod ec_type;
pub mod fmt;
pub mod power;
