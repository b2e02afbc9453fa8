//! EC event dispatch
use core::future::Future;

use ec_services::ec_type::command::Transport;
use ec_services::ec_type::event::HostEvent;
use ec_services::ec_type::structure::DeviceEventRequest;
use ec_services::{info, trace, warn};
use embassy_futures::select::{select, Either};

use crate::context::Context;
use crate::port::Registry;
use crate::time::Clock;

/// Outcome of offering a host event to the service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EventResult {
    /// The event was for the charger and the ports were refreshed
    Handled,
    /// The event should be passed on to other consumers
    NotHandled,
}

/// Source of raw host events, typically the EC interrupt path
pub trait HostEventSource {
    /// Wait for the next host event
    fn wait_host_event(&mut self) -> impl Future<Output = HostEvent>;
}

impl<T: Transport, R: Registry, C: Clock> Context<T, R, C> {
    /// Handle a raw host event
    ///
    /// Device events are narrowed down with a device event query. A wireless charger event forces a refresh of
    /// every port, bypassing the debounce window.
    pub async fn process_host_event(&self, event: HostEvent) -> EventResult {
        if event.is_none() {
            trace!("Empty host event");
            return EventResult::NotHandled;
        }

        if !event.device() {
            trace!("Ignoring host event {:#x}", event.0);
            return EventResult::NotHandled;
        }

        let device_event = match self.execute(&DeviceEventRequest::current_events()).await {
            Ok(rsp) => rsp.event_mask,
            Err(e) => {
                warn!("Unable to get device events (err:{:?})", e);
                return EventResult::NotHandled;
            }
        };

        if !device_event.wireless_charger() {
            trace!("Ignoring device event {:#x}", device_event.0);
            return EventResult::NotHandled;
        }

        for handle in self.handles() {
            // Failures are logged by refresh, the cached state stands
            let _ = self.refresh(handle, true).await;
        }

        EventResult::Handled
    }

    /// Dispatch events from `source` until [`Context::stop`] is called
    ///
    /// A stop requested while no loop was running is discarded.
    pub async fn run<S: HostEventSource>(&self, source: &mut S) {
        self.stop_signal().reset();
        info!("Starting peripheral charger event loop");
        loop {
            match select(source.wait_host_event(), self.stop_signal().wait()).await {
                Either::First(event) => {
                    trace!("New host event");
                    self.process_host_event(event).await;
                }
                Either::Second(()) => {
                    info!("Peripheral charger event loop stopped");
                    return;
                }
            }
        }
    }
}
