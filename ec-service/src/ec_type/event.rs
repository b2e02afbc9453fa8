//! Host and device event definitions
use bitflags::bitflags;

/// Host event number for device events
pub const EC_HOST_EVENT_DEVICE: u8 = 10;

/// Device event number for wireless charger events
pub const EC_DEVICE_EVENT_WLC: u8 = 3;

/// Raw host event mask as delivered by the EC
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HostEvent(pub u32);

bitflags! {
    impl HostEvent: u32 {
        /// None
        const NONE = 0;
        /// One or more device events are pending, see [`DeviceEvent`]
        const DEVICE = host_event_mask(EC_HOST_EVENT_DEVICE);
    }
}

/// Host event numbers start at 1
pub const fn host_event_mask(event: u8) -> u32 {
    1 << (event - 1)
}

impl HostEvent {
    /// Returns true if no host event is set
    pub fn is_none(self) -> bool {
        self.0 == 0
    }

    /// Returns true if the device event class is set
    pub fn device(self) -> bool {
        self & Self::DEVICE != Self::NONE
    }
}

/// Device event mask
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceEvent(pub u32);

bitflags! {
    impl DeviceEvent: u32 {
        /// None
        const NONE = 0;
        /// Trackpad
        const TRACKPAD = 1 << 0;
        /// Audio DSP
        const DSP = 1 << 1;
        /// WiFi
        const WIFI = 1 << 2;
        /// Wireless (peripheral) charger
        const WLC = 1 << EC_DEVICE_EVENT_WLC;
    }
}

impl DeviceEvent {
    /// Returns true if a wireless charger event is set
    pub fn wireless_charger(self) -> bool {
        self & Self::WLC != Self::NONE
    }
}
