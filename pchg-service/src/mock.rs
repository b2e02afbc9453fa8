//! Simulated EC, registry and clock shared by the unit tests
extern crate std;

use core::cell::{Cell, RefCell};
use std::rc::Rc;
use std::string::{String, ToString};
use std::vec;
use std::vec::Vec;

use ec_services::ec_type::command::{CommandId, HostCommand, Transport};
use ec_services::power::supply::Descriptor;
use embassy_time::Instant;

use crate::port::{PortHandle, Registry};
use crate::time::Clock;

struct EcState {
    offset: u16,
    port_count: Result<u8, i32>,
    ports: Vec<Result<(u8, u8), i32>>,
    device_events: Result<u32, i32>,
    calls: Vec<u16>,
    queried_ports: Vec<u8>,
}

/// Simulated EC, clones share state
#[derive(Clone)]
pub struct MockEc(Rc<RefCell<EcState>>);

impl MockEc {
    /// EC with `ports` ports, all enabled with no device
    pub fn new(ports: u8) -> Self {
        Self(Rc::new(RefCell::new(EcState {
            offset: 0,
            port_count: Ok(ports),
            ports: vec![Ok((2, 0)); ports as usize],
            device_events: Ok(0),
            calls: Vec::new(),
            queried_ports: Vec::new(),
        })))
    }

    pub fn with_offset(&self, offset: u16) -> &Self {
        self.0.borrow_mut().offset = offset;
        self
    }

    pub fn transport(&self) -> MockTransport {
        MockTransport(self.clone())
    }

    pub fn set_port(&self, port: usize, state: u8, percentage: u8) {
        self.0.borrow_mut().ports[port] = Ok((state, percentage));
    }

    pub fn fail_port(&self, port: usize, status: i32) {
        self.0.borrow_mut().ports[port] = Err(status);
    }

    pub fn fail_port_count(&self, status: i32) {
        self.0.borrow_mut().port_count = Err(status);
    }

    pub fn set_device_events(&self, mask: u32) {
        self.0.borrow_mut().device_events = Ok(mask);
    }

    pub fn fail_device_events(&self, status: i32) {
        self.0.borrow_mut().device_events = Err(status);
    }

    /// Raw command codes received, offset included
    pub fn calls(&self) -> Vec<u16> {
        self.0.borrow().calls.clone()
    }

    /// Port numbers of every status query, failed ones included
    pub fn queried_ports(&self) -> Vec<u8> {
        self.0.borrow().queried_ports.clone()
    }

    pub fn status_queries(&self) -> usize {
        self.0.borrow().queried_ports.len()
    }

    pub fn device_event_queries(&self) -> usize {
        let state = self.0.borrow();
        let command = state.offset.wrapping_add(CommandId::DeviceEvent.into());
        state.calls.iter().filter(|c| **c == command).count()
    }
}

pub struct MockTransport(MockEc);

impl MockTransport {
    pub fn calls(&self) -> Vec<u16> {
        self.0.calls()
    }
}

fn reply(msg: &mut HostCommand, bytes: &[u8]) -> Result<usize, i32> {
    let len = bytes.len().min(msg.insize);
    msg.response_mut()[..len].copy_from_slice(&bytes[..len]);
    Ok(len)
}

impl Transport for MockTransport {
    async fn xfer(&mut self, msg: &mut HostCommand) -> Result<usize, i32> {
        // Give other tasks a chance to run while the command is in flight
        embassy_futures::yield_now().await;

        let mut state = self.0 .0.borrow_mut();
        state.calls.push(msg.command);

        let command = msg.command.wrapping_sub(state.offset);
        if command == u16::from(CommandId::PchgCount) {
            let count = state.port_count?;
            reply(msg, &[count])
        } else if command == u16::from(CommandId::Pchg) {
            let port = msg.request()[0];
            state.queried_ports.push(port);
            let (pchg_state, percentage) = state.ports[port as usize]?;
            reply(msg, &[0, 0, 0, 0, pchg_state, percentage, 0, 0])
        } else if command == u16::from(CommandId::DeviceEvent) {
            // Only reading the current events is supported
            assert_eq!(msg.request()[4], 0);
            let mask = state.device_events?;
            reply(msg, &mask.to_le_bytes())
        } else {
            // EC_RES_INVALID_COMMAND
            Err(-1)
        }
    }
}

struct RegistryState {
    registered: Vec<String>,
    rejected: Vec<String>,
    changes: Vec<PortHandle>,
}

/// Power supply registry recording registrations and change notifications
#[derive(Clone)]
pub struct MockRegistry(Rc<RefCell<RegistryState>>);

impl MockRegistry {
    pub fn new() -> Self {
        Self(Rc::new(RefCell::new(RegistryState {
            registered: Vec::new(),
            rejected: Vec::new(),
            changes: Vec::new(),
        })))
    }

    /// Fail the registration of the supply called `name`
    pub fn reject(&self, name: &str) {
        self.0.borrow_mut().rejected.push(name.to_string());
    }

    pub fn registered(&self) -> Vec<String> {
        self.0.borrow().registered.clone()
    }

    pub fn changes(&self) -> Vec<PortHandle> {
        self.0.borrow().changes.clone()
    }
}

impl Registry for MockRegistry {
    type Error = ();

    fn register(&mut self, _handle: PortHandle, descriptor: &Descriptor<'_>) -> Result<(), Self::Error> {
        let mut state = self.0.borrow_mut();
        if state.rejected.iter().any(|name| name == descriptor.name) {
            return Err(());
        }
        state.registered.push(descriptor.name.to_string());
        Ok(())
    }

    fn changed(&self, handle: PortHandle) {
        self.0.borrow_mut().changes.push(handle);
    }
}

/// Manually advanced clock, clones share time
#[derive(Clone)]
pub struct ManualClock(Rc<Cell<u64>>);

impl ManualClock {
    pub fn new() -> Self {
        Self(Rc::new(Cell::new(0)))
    }

    pub fn advance_ms(&self, ms: u64) {
        self.0.set(self.0.get() + ms);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        Instant::from_millis(self.0.get())
    }
}
