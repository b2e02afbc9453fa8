//! Port status polling
use ec_services::ec_type::command::Transport;
use ec_services::ec_type::structure::{PchgRequest, PchgState};
use ec_services::power::supply::Status;
use ec_services::{debug, error, trace};

use crate::context::Context;
use crate::port::{PortHandle, Registry};
use crate::time::Clock;
use crate::Error;

/// Translate an EC charger state into a power supply status
///
/// States that do not say anything about an attached device, including ones this side does not know, are
/// reported as unknown rather than treated as an error.
pub fn status_from_state(state: PchgState) -> Status {
    match state {
        PchgState::Detected => Status::NotCharging,
        PchgState::Charging => Status::Charging,
        PchgState::Full => Status::Full,
        PchgState::Reset | PchgState::Initialized | PchgState::Enabled | PchgState::Unrecognized(_) => {
            Status::Unknown
        }
    }
}

impl<T: Transport, R: Registry, C: Clock> Context<T, R, C> {
    /// Refresh the cached state of a port from the EC
    ///
    /// Unless `force` is set, a port refreshed successfully within the debounce window is left alone. On failure
    /// the cached state is untouched. Returns true if status or battery level changed, in which case the registry
    /// has already been notified.
    pub async fn refresh(&self, handle: PortHandle, force: bool) -> Result<bool, Error> {
        let port = self.port(handle)?;

        let changed = {
            let mut state = port.state().lock().await;
            if !force && state.is_fresh(self.clock().now(), self.config().debounce) {
                trace!("Port {}: refresh rate limited", port.number());
                return Ok(false);
            }

            let rsp = self
                .execute(&PchgRequest { port: port.number() })
                .await
                .inspect_err(|e| error!("Unable to get port.{} status (err:{:?})", port.number(), e))?;

            debug!(
                "Port {}: state={:?} battery={}%",
                port.number(),
                rsp.state,
                rsp.battery_percentage
            );
            if rsp.error != 0 {
                debug!("Port {}: charger error flags {:#x}", port.number(), rsp.error);
            }

            state.update(
                status_from_state(rsp.state),
                rsp.battery_percentage,
                self.clock().now(),
            )
        };

        // Lock released, observers see the committed state
        if changed {
            self.registry().changed(handle);
        }

        Ok(changed)
    }
}
