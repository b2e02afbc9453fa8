//! Charge ports and the registry they are published to
use core::fmt::Write;

use ec_services::power::supply::{Descriptor, Property, Status, SupplyType};
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::mutex::Mutex;
use embassy_time::{Duration, Instant};
use heapless::String;

use crate::Error;

/// Properties every charge port exposes
pub const PROPERTIES: [Property; 3] = [Property::Status, Property::Capacity, Property::Scope];

/// Opaque reference to a registered port
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PortHandle(pub(crate) u8);

impl PortHandle {
    pub(crate) fn slot(self) -> usize {
        self.0 as usize
    }
}

/// Power supply registry the ports are published to
pub trait Registry {
    /// Registration error
    type Error;

    /// Publish a port, a failure leaves the port out of the service
    fn register(&mut self, handle: PortHandle, descriptor: &Descriptor<'_>) -> Result<(), Self::Error>;

    /// Called after the cached state of `handle` changed
    fn changed(&self, handle: PortHandle);
}

/// Cached port state, always updated as a whole
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PortState {
    /// Translated charging status
    pub status: Status,
    /// Battery level in percent, `None` until the first successful refresh
    pub percentage: Option<u8>,
    /// Time of the last successful refresh
    pub last_update: Option<Instant>,
}

impl PortState {
    /// Returns true if the last successful refresh happened less than `window` before `now`
    pub fn is_fresh(&self, now: Instant, window: Duration) -> bool {
        match self.last_update {
            Some(last) => now.saturating_duration_since(last) < window,
            None => false,
        }
    }

    /// Store a refresh result, returns true if status or percentage changed
    pub(crate) fn update(&mut self, status: Status, percentage: u8, now: Instant) -> bool {
        let changed = self.status != status || self.percentage != Some(percentage);
        self.status = status;
        self.percentage = Some(percentage);
        self.last_update = Some(now);
        changed
    }
}

/// Port name length, enough for "PCHG" and a port number
const NAME_LEN: usize = 8;

/// A peripheral charge port
pub struct Port {
    number: u8,
    name: String<NAME_LEN>,
    state: Mutex<NoopRawMutex, PortState>,
}

impl Port {
    /// Create port `number` with an unknown state
    pub fn new(number: u8) -> Result<Self, Error> {
        let mut name = String::new();
        write!(name, "PCHG{}", number).map_err(|_| Error::Allocation)?;

        Ok(Self {
            number,
            name,
            state: Mutex::new(PortState::default()),
        })
    }

    /// EC port number
    pub fn number(&self) -> u8 {
        self.number
    }

    /// Power supply name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Power supply description
    pub fn descriptor(&self) -> Descriptor<'_> {
        Descriptor {
            name: &self.name,
            kind: SupplyType::Battery,
            properties: &PROPERTIES,
        }
    }

    pub(crate) fn state(&self) -> &Mutex<NoopRawMutex, PortState> {
        &self.state
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_port_name() {
        assert_eq!(Port::new(0).unwrap().name(), "PCHG0");
        assert_eq!(Port::new(7).unwrap().name(), "PCHG7");
        assert_eq!(Port::new(u8::MAX).unwrap().name(), "PCHG255");
    }

    #[test]
    fn test_descriptor() {
        let port = Port::new(1).unwrap();
        let desc = port.descriptor();
        assert_eq!(desc.name, "PCHG1");
        assert_eq!(desc.kind, SupplyType::Battery);
        assert!(desc.has_property(Property::Scope));
        assert_eq!(desc.properties.len(), 3);
    }

    #[test]
    fn test_state_freshness() {
        let window = Duration::from_millis(500);
        let mut state = PortState::default();
        assert!(!state.is_fresh(Instant::from_millis(0), window));

        state.update(Status::Charging, 10, Instant::from_millis(1000));
        assert!(state.is_fresh(Instant::from_millis(1000), window));
        assert!(state.is_fresh(Instant::from_millis(1499), window));
        assert!(!state.is_fresh(Instant::from_millis(1500), window));
    }

    #[test]
    fn test_state_update() {
        let mut state = PortState::default();
        assert!(state.update(Status::Unknown, 0, Instant::from_millis(1)));
        assert!(!state.update(Status::Unknown, 0, Instant::from_millis(2)));
        assert_eq!(state.last_update, Some(Instant::from_millis(2)));
        assert!(state.update(Status::Full, 0, Instant::from_millis(3)));
        assert!(state.update(Status::Full, 100, Instant::from_millis(4)));
    }
}
