//! Peripheral charger and device event wire records
//!
//! All records are packed and little-endian. They are encoded field by field so the in-memory layout of these
//! types never matters.

use super::command::{CommandId, HostRequest, HostResponse};
use super::event::DeviceEvent;

/// Maximum number of peripheral charge ports the protocol can describe
pub const EC_PCHG_MAX_PORTS: u8 = 8;

/// Peripheral charger state as reported by the EC
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PchgState {
    /// Charger is reset and not initialized
    Reset,
    /// Charger is initialized, charging is disabled
    Initialized,
    /// Charging is enabled, waiting for a device
    Enabled,
    /// Device detected, not charging
    Detected,
    /// Device is charging
    Charging,
    /// Device is fully charged
    Full,
    /// State code this side of the protocol does not know about
    Unrecognized(u8),
}

impl From<u8> for PchgState {
    fn from(value: u8) -> Self {
        match value {
            0 => PchgState::Reset,
            1 => PchgState::Initialized,
            2 => PchgState::Enabled,
            3 => PchgState::Detected,
            4 => PchgState::Charging,
            5 => PchgState::Full,
            other => PchgState::Unrecognized(other),
        }
    }
}

impl From<PchgState> for u8 {
    fn from(state: PchgState) -> Self {
        match state {
            PchgState::Reset => 0,
            PchgState::Initialized => 1,
            PchgState::Enabled => 2,
            PchgState::Detected => 3,
            PchgState::Charging => 4,
            PchgState::Full => 5,
            PchgState::Unrecognized(other) => other,
        }
    }
}

/// Request the number of peripheral charge ports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PchgCountRequest;

/// Number of peripheral charge ports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PchgCountResponse {
    /// Port count
    pub port_count: u8,
}

impl HostRequest for PchgCountRequest {
    const COMMAND: CommandId = CommandId::PchgCount;
    const VERSION: u8 = 0;
    const SIZE: usize = 0;
    type Response = PchgCountResponse;

    fn encode(&self, _buf: &mut [u8]) {}
}

impl HostResponse for PchgCountResponse {
    const SIZE: usize = 1;

    fn decode(buf: &[u8]) -> Self {
        Self { port_count: buf[0] }
    }
}

/// Request the status of a single port
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PchgRequest {
    /// EC port number
    pub port: u8,
}

/// Status of a single port
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PchgResponse {
    /// Charger error flags, opaque to the host
    pub error: u32,
    /// Charger state
    pub state: PchgState,
    /// Battery level of the attached device in percent
    pub battery_percentage: u8,
}

impl HostRequest for PchgRequest {
    const COMMAND: CommandId = CommandId::Pchg;
    const VERSION: u8 = 0;
    const SIZE: usize = 1;
    type Response = PchgResponse;

    fn encode(&self, buf: &mut [u8]) {
        buf[0] = self.port;
    }
}

const PCHG_ERROR_OFFSET: usize = 0;
const PCHG_STATE_OFFSET: usize = 4;
const PCHG_BATTERY_OFFSET: usize = 5;

impl HostResponse for PchgResponse {
    // Two trailing bytes are unused padding
    const SIZE: usize = 8;

    fn decode(buf: &[u8]) -> Self {
        Self {
            error: read_u32(buf, PCHG_ERROR_OFFSET),
            state: buf[PCHG_STATE_OFFSET].into(),
            battery_percentage: buf[PCHG_BATTERY_OFFSET],
        }
    }
}

/// Device event operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceEventParam {
    /// Read and clear the pending device events
    GetCurrentEvents,
    /// Read the enabled device event mask
    GetEnabledEvents,
    /// Write the enabled device event mask
    SetEnabledEvents,
}

impl From<DeviceEventParam> for u8 {
    fn from(param: DeviceEventParam) -> Self {
        match param {
            DeviceEventParam::GetCurrentEvents => 0,
            DeviceEventParam::GetEnabledEvents => 1,
            DeviceEventParam::SetEnabledEvents => 2,
        }
    }
}

/// Device event request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceEventRequest {
    /// Mask to write, only used with [`DeviceEventParam::SetEnabledEvents`]
    pub event_mask: DeviceEvent,
    /// Operation
    pub param: DeviceEventParam,
}

impl DeviceEventRequest {
    /// Request the pending device events
    pub fn current_events() -> Self {
        Self {
            event_mask: DeviceEvent::NONE,
            param: DeviceEventParam::GetCurrentEvents,
        }
    }
}

/// Device event response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceEventResponse {
    /// Device event mask
    pub event_mask: DeviceEvent,
}

impl HostRequest for DeviceEventRequest {
    const COMMAND: CommandId = CommandId::DeviceEvent;
    const VERSION: u8 = 0;
    const SIZE: usize = 5;
    type Response = DeviceEventResponse;

    fn encode(&self, buf: &mut [u8]) {
        buf[0..4].copy_from_slice(&self.event_mask.0.to_le_bytes());
        buf[4] = self.param.into();
    }
}

impl HostResponse for DeviceEventResponse {
    const SIZE: usize = 4;

    fn decode(buf: &[u8]) -> Self {
        Self {
            event_mask: DeviceEvent(read_u32(buf, 0)),
        }
    }
}

fn read_u32(buf: &[u8], offset: usize) -> u32 {
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(&buf[offset..offset + 4]);
    u32::from_le_bytes(bytes)
}
