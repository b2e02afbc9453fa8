//! Configuration types for the peripheral charger service

use ec_services::ec_type::structure::EC_PCHG_MAX_PORTS;
use embassy_time::Duration;

/// Peripheral charger service configuration
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Added to every command ID when the charger sits behind a multiplexed sub-device
    pub cmd_offset: u16,
    /// Non-forced refreshes within this window of the last successful one are skipped
    pub debounce: Duration,
    /// Largest port count accepted at discovery, never above the protocol maximum
    pub max_ports: u8,
}

impl Config {
    /// Port count ceiling actually enforced
    pub fn port_limit(&self) -> u8 {
        self.max_ports.min(EC_PCHG_MAX_PORTS)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cmd_offset: 0,
            debounce: Duration::from_millis(500),
            max_ports: EC_PCHG_MAX_PORTS,
        }
    }
}
