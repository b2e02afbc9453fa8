//! Port discovery
use ec_services::ec_type::command::{execute, Transport};
use ec_services::ec_type::structure::{PchgCountRequest, EC_PCHG_MAX_PORTS};
use ec_services::{error, info, warn};
use heapless::Vec;

use crate::config::Config;
use crate::port::{Port, PortHandle, Registry};
use crate::Error;

/// Fixed capacity port storage
pub type PortSet = Vec<Port, { EC_PCHG_MAX_PORTS as usize }>;

/// Query the port count and publish one power supply per port
///
/// A missing feature is reported as [`Error::FeatureAbsent`], which is expected on most platforms. Ports whose
/// registration fails are skipped and the remaining ones keep their EC port number.
pub async fn discover<T: Transport, R: Registry>(
    transport: &mut T,
    registry: &mut R,
    config: &Config,
) -> Result<PortSet, Error> {
    let count = match execute(transport, config.cmd_offset, &PchgCountRequest).await {
        Ok(rsp) => rsp.port_count,
        Err(e) => {
            warn!("Unable to get number of ports (err:{:?})", e);
            0
        }
    };

    if count == 0 {
        info!("No peripheral charge ports");
        return Err(Error::FeatureAbsent);
    }

    if count > config.port_limit() {
        error!("Too many peripheral charge ports ({})", count);
        return Err(Error::CapacityExceeded(count));
    }

    info!("{} peripheral charge ports found", count);

    let mut ports = PortSet::new();
    for number in 0..count {
        let port = Port::new(number)?;
        let handle = PortHandle(ports.len() as u8);

        if registry.register(handle, &port.descriptor()).is_err() {
            error!("Failed to register power supply for port {}", number);
            continue;
        }

        ports.push(port).map_err(|_| Error::CapacityExceeded(count))?;
    }

    if ports.is_empty() {
        return Err(Error::NoDevice);
    }

    Ok(ports)
}
