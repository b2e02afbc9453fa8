//! Peripheral charger context
use ec_services::ec_type::command::{self, HostRequest, Transport};
use ec_services::power::supply::{Property, PropertyValue, Scope, Status};
use ec_services::{info, trace};
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::mutex::Mutex;
use embassy_sync::signal::Signal;

use crate::config::Config;
use crate::discovery::{self, PortSet};
use crate::port::{Port, PortHandle, PortState, Registry};
use crate::time::{Clock, SystemClock};
use crate::Error;

/// Peripheral charger context, owns the EC transport and every discovered port
///
/// The port set is fixed once attached. Consumer reads and EC events may run concurrently on the same executor;
/// each port's cached state is guarded by its own lock, held for the whole refresh so overlapping refreshes of
/// one port are serialized.
pub struct Context<T: Transport, R: Registry, C: Clock = SystemClock> {
    transport: Mutex<NoopRawMutex, T>,
    registry: R,
    clock: C,
    config: Config,
    ports: PortSet,
    stop: Signal<NoopRawMutex, ()>,
}

impl<T: Transport, R: Registry> Context<T, R, SystemClock> {
    /// Discover the charge ports behind `transport` and publish them to `registry`
    pub async fn attach(transport: T, registry: R, config: Config) -> Result<Self, Error> {
        Self::attach_with_clock(transport, registry, config, SystemClock).await
    }
}

impl<T: Transport, R: Registry, C: Clock> Context<T, R, C> {
    /// Attach with a caller provided clock
    pub async fn attach_with_clock(mut transport: T, mut registry: R, config: Config, clock: C) -> Result<Self, Error> {
        let ports = discovery::discover(&mut transport, &mut registry, &config).await?;
        info!("Peripheral charger attached with {} port(s)", ports.len());

        Ok(Self {
            transport: Mutex::new(transport),
            registry,
            clock,
            config,
            ports,
            stop: Signal::new(),
        })
    }

    /// Tear down the context, handing the transport and registry back to the host
    pub fn detach(self) -> (T, R) {
        info!("Peripheral charger detached");
        (self.transport.into_inner(), self.registry)
    }

    /// Service configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Number of registered ports
    pub fn port_count(&self) -> usize {
        self.ports.len()
    }

    /// Handles of all registered ports, in EC port order
    pub fn handles(&self) -> impl Iterator<Item = PortHandle> {
        (0..self.ports.len()).map(|slot| PortHandle(slot as u8))
    }

    pub(crate) fn port(&self, handle: PortHandle) -> Result<&Port, Error> {
        self.ports.get(handle.slot()).ok_or(Error::InvalidPort)
    }

    pub(crate) fn registry(&self) -> &R {
        &self.registry
    }

    pub(crate) fn clock(&self) -> &C {
        &self.clock
    }

    /// EC port number behind `handle`
    pub fn port_number(&self, handle: PortHandle) -> Result<u8, Error> {
        Ok(self.port(handle)?.number())
    }

    /// Power supply name of `handle`
    pub fn name(&self, handle: PortHandle) -> Result<&str, Error> {
        Ok(self.port(handle)?.name())
    }

    /// Cached state of `handle`, without talking to the EC
    pub async fn state(&self, handle: PortHandle) -> Result<PortState, Error> {
        Ok(*self.port(handle)?.state().lock().await)
    }

    /// Cached charging status of `handle`
    pub async fn status(&self, handle: PortHandle) -> Result<Status, Error> {
        Ok(self.state(handle).await?.status)
    }

    /// Cached battery level of `handle`
    pub async fn capacity(&self, handle: PortHandle) -> Result<Option<u8>, Error> {
        Ok(self.state(handle).await?.percentage)
    }

    /// Read a power supply property
    ///
    /// Status and capacity reads refresh the port first, rate limited. A failed refresh is not reported, the
    /// cached value is returned instead.
    pub async fn get_property(&self, handle: PortHandle, property: Property) -> Result<PropertyValue, Error> {
        let port = self.port(handle)?;

        if matches!(property, Property::Status | Property::Capacity) && self.refresh(handle, false).await.is_err() {
            trace!("Port {}: returning cached value", port.number());
        }

        let state = *port.state().lock().await;
        Ok(match property {
            Property::Status => PropertyValue::Status(state.status),
            Property::Capacity => PropertyValue::Capacity(state.percentage),
            Property::Scope => PropertyValue::Scope(Scope::Device),
        })
    }

    /// Send a host command over the shared transport
    pub(crate) async fn execute<Q: HostRequest>(&self, request: &Q) -> Result<Q::Response, Error> {
        let mut transport = self.transport.lock().await;
        Ok(command::execute(&mut *transport, self.config.cmd_offset, request).await?)
    }

    /// Ask a running [`Context::run`] loop to return
    pub fn stop(&self) {
        self.stop.signal(());
    }

    pub(crate) fn stop_signal(&self) -> &Signal<NoopRawMutex, ()> {
        &self.stop
    }
}

#[cfg(test)]
mod test {
    extern crate std;

    use embassy_futures::block_on;

    use super::*;
    use crate::mock::{ManualClock, MockEc, MockRegistry};

    #[test]
    fn test_attach_and_detach() {
        let ec = MockEc::new(2);
        let registry = MockRegistry::new();
        let ctx = block_on(Context::attach_with_clock(
            ec.transport(),
            registry.clone(),
            Config::default(),
            ManualClock::new(),
        ))
        .unwrap();

        assert_eq!(ctx.port_count(), 2);
        let handles: std::vec::Vec<_> = ctx.handles().collect();
        assert_eq!(ctx.name(handles[0]).unwrap(), "PCHG0");
        assert_eq!(ctx.name(handles[1]).unwrap(), "PCHG1");
        assert_eq!(ctx.port_number(handles[1]).unwrap(), 1);
        assert_eq!(registry.registered(), ["PCHG0", "PCHG1"]);

        let (transport, _registry) = ctx.detach();
        assert_eq!(transport.calls(), ec.calls());
    }

    #[test]
    fn test_get_property() {
        let ec = MockEc::new(1);
        ec.set_port(0, 5, 100);
        let clock = ManualClock::new();
        let ctx = block_on(Context::attach_with_clock(
            ec.transport(),
            MockRegistry::new(),
            Config::default(),
            clock.clone(),
        ))
        .unwrap();
        let handle = ctx.handles().next().unwrap();

        assert_eq!(
            block_on(ctx.get_property(handle, Property::Scope)).unwrap(),
            PropertyValue::Scope(Scope::Device)
        );
        // Scope never touches the EC
        assert_eq!(ec.status_queries(), 0);

        assert_eq!(
            block_on(ctx.get_property(handle, Property::Status)).unwrap(),
            PropertyValue::Status(Status::Full)
        );
        assert_eq!(
            block_on(ctx.get_property(handle, Property::Capacity)).unwrap(),
            PropertyValue::Capacity(Some(100))
        );
        // Second read fell inside the debounce window
        assert_eq!(ec.status_queries(), 1);

        assert_eq!(block_on(ctx.status(handle)), Ok(Status::Full));
        assert_eq!(block_on(ctx.capacity(handle)), Ok(Some(100)));
        assert_eq!(ec.status_queries(), 1);
    }

    #[test]
    fn test_get_property_returns_cache_on_failure() {
        let ec = MockEc::new(1);
        ec.set_port(0, 4, 40);
        let clock = ManualClock::new();
        let ctx = block_on(Context::attach_with_clock(
            ec.transport(),
            MockRegistry::new(),
            Config::default(),
            clock.clone(),
        ))
        .unwrap();
        let handle = ctx.handles().next().unwrap();

        assert_eq!(
            block_on(ctx.get_property(handle, Property::Capacity)).unwrap(),
            PropertyValue::Capacity(Some(40))
        );

        ec.fail_port(0, -110);
        clock.advance_ms(1000);
        assert_eq!(
            block_on(ctx.get_property(handle, Property::Status)).unwrap(),
            PropertyValue::Status(Status::Charging)
        );
        assert_eq!(
            block_on(ctx.get_property(handle, Property::Capacity)).unwrap(),
            PropertyValue::Capacity(Some(40))
        );
    }

    #[test]
    fn test_invalid_handle() {
        let ec = MockEc::new(1);
        let ctx = block_on(Context::attach_with_clock(
            ec.transport(),
            MockRegistry::new(),
            Config::default(),
            ManualClock::new(),
        ))
        .unwrap();

        let bogus = PortHandle(4);
        assert_eq!(ctx.name(bogus), Err(Error::InvalidPort));
        assert_eq!(
            block_on(ctx.get_property(bogus, Property::Scope)),
            Err(Error::InvalidPort)
        );
    }

    #[test]
    fn test_cmd_offset() {
        let ec = MockEc::new(1);
        let config = Config {
            cmd_offset: 0x4000,
            ..Default::default()
        };
        let ctx = block_on(Context::attach_with_clock(
            ec.with_offset(0x4000).transport(),
            MockRegistry::new(),
            config,
            ManualClock::new(),
        ))
        .unwrap();
        let handle = ctx.handles().next().unwrap();

        assert_eq!(block_on(ctx.refresh(handle, true)), Ok(true));
        assert_eq!(ec.calls(), [0x4134, 0x4135]);
    }
}
