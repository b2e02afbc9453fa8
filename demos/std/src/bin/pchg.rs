use core::cell::RefCell;

use ec_services::ec_type::command::{CommandId, HostCommand, Transport};
use ec_services::ec_type::event::{DeviceEvent, HostEvent};
use ec_services::ec_type::structure::PchgState;
use ec_services::power::supply::{Descriptor, Property};
use embassy_executor::{Executor, Spawner};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::channel::Channel;
use log::{info, warn};
use pchg_service::{Config, Context, HostEventSource, PortHandle, Registry};
use static_cell::StaticCell;

const PORT_COUNT: usize = 2;

/// Simulated EC firmware
mod firmware {
    use super::*;

    #[derive(Clone, Copy)]
    pub struct Port {
        pub state: PchgState,
        pub battery: u8,
    }

    pub struct Firmware {
        pub ports: [Port; PORT_COUNT],
        pub pending: DeviceEvent,
    }

    pub static FIRMWARE: Mutex<CriticalSectionRawMutex, RefCell<Firmware>> = Mutex::new(RefCell::new(Firmware {
        ports: [Port {
            state: PchgState::Enabled,
            battery: 0,
        }; PORT_COUNT],
        pending: DeviceEvent::NONE,
    }));

    pub static HOST_EVENTS: Channel<CriticalSectionRawMutex, HostEvent, 4> = Channel::new();

    /// Raise a wireless charger event towards the host
    pub async fn notify() {
        FIRMWARE.lock(|fw| fw.borrow_mut().pending |= DeviceEvent::WLC);
        HOST_EVENTS.send(HostEvent::DEVICE).await;
    }

    pub fn update(port: usize, f: impl FnOnce(&mut Port)) {
        FIRMWARE.lock(|fw| f(&mut fw.borrow_mut().ports[port]));
    }

    pub fn port(port: usize) -> Option<Port> {
        FIRMWARE.lock(|fw| fw.borrow().ports.get(port).copied())
    }

    /// Read and clear the pending device events
    pub fn take_events() -> DeviceEvent {
        FIRMWARE.lock(|fw| core::mem::replace(&mut fw.borrow_mut().pending, DeviceEvent::NONE))
    }
}

/// EC_RES_INVALID_PARAM
const INVALID_PARAM: i32 = -3;
/// EC_RES_INVALID_COMMAND
const INVALID_COMMAND: i32 = -1;

struct SimTransport;

fn reply(msg: &mut HostCommand, bytes: &[u8]) -> Result<usize, i32> {
    let len = bytes.len().min(msg.insize);
    msg.response_mut()[..len].copy_from_slice(&bytes[..len]);
    Ok(len)
}

impl Transport for SimTransport {
    async fn xfer(&mut self, msg: &mut HostCommand) -> Result<usize, i32> {
        match msg.command {
            c if c == u16::from(CommandId::PchgCount) => reply(msg, &[PORT_COUNT as u8]),
            c if c == u16::from(CommandId::Pchg) => {
                let port = msg.request().first().copied().ok_or(INVALID_PARAM)?;
                let port = firmware::port(port as usize).ok_or(INVALID_PARAM)?;
                let mut rsp = [0u8; 8];
                rsp[4] = port.state.into();
                rsp[5] = port.battery;
                reply(msg, &rsp)
            }
            c if c == u16::from(CommandId::DeviceEvent) => {
                let events = firmware::take_events();
                reply(msg, &events.0.to_le_bytes())
            }
            _ => Err(INVALID_COMMAND),
        }
    }
}

struct HostEvents;

impl HostEventSource for HostEvents {
    async fn wait_host_event(&mut self) -> HostEvent {
        firmware::HOST_EVENTS.receive().await
    }
}

struct LogRegistry;

impl Registry for LogRegistry {
    type Error = ();

    fn register(&mut self, handle: PortHandle, descriptor: &Descriptor<'_>) -> Result<(), Self::Error> {
        info!(
            "Registered {} as {:?} ({:?}, {} properties)",
            descriptor.name,
            handle,
            descriptor.kind,
            descriptor.properties.len()
        );
        Ok(())
    }

    fn changed(&self, handle: PortHandle) {
        info!("{:?} changed", handle);
    }
}

type PchgContext = Context<SimTransport, LogRegistry>;

static CONTEXT: StaticCell<PchgContext> = StaticCell::new();

#[embassy_executor::task]
async fn init_task(spawner: Spawner) {
    let ctx = match Context::attach(SimTransport, LogRegistry, Config::default()).await {
        Ok(ctx) => CONTEXT.init(ctx),
        Err(e) if e.is_benign() => {
            info!("No peripheral charger");
            return;
        }
        Err(e) => {
            warn!("Peripheral charger attach failed: {:?}", e);
            return;
        }
    };
    info!("pchg service init'd");

    spawner.must_spawn(event_task(ctx));
    spawner.must_spawn(consumer_task(ctx));
}

#[embassy_executor::task]
async fn event_task(ctx: &'static PchgContext) {
    ctx.run(&mut HostEvents).await;
}

#[embassy_executor::task]
async fn consumer_task(ctx: &'static PchgContext) {
    loop {
        for handle in ctx.handles() {
            let name = ctx.name(handle).unwrap_or("?");
            match (
                ctx.get_property(handle, Property::Status).await,
                ctx.get_property(handle, Property::Capacity).await,
            ) {
                (Ok(status), Ok(capacity)) => info!("{}: {:?} {:?}", name, status, capacity),
                _ => warn!("{}: unable to read properties", name),
            }
        }
        embassy_time::Timer::after_millis(200).await;
    }
}

#[embassy_executor::task]
async fn firmware_task() {
    embassy_time::Timer::after_secs(1).await;

    info!("Device placed on PCHG0");
    firmware::update(0, |port| {
        port.state = PchgState::Detected;
        port.battery = 20;
    });
    firmware::notify().await;

    embassy_time::Timer::after_secs(1).await;
    firmware::update(0, |port| port.state = PchgState::Charging);
    firmware::notify().await;

    loop {
        embassy_time::Timer::after_secs(1).await;
        let full = firmware::port(0).is_some_and(|port| port.battery >= 100);
        if full {
            break;
        }

        firmware::update(0, |port| {
            port.battery = (port.battery + 10).min(100);
            if port.battery == 100 {
                port.state = PchgState::Full;
            }
        });
        // Battery level changes are only picked up by polling
    }

    info!("PCHG0 full");
    firmware::notify().await;
}

fn main() {
    env_logger::builder().filter_level(log::LevelFilter::Info).init();

    static EXECUTOR: StaticCell<Executor> = StaticCell::new();
    let executor = EXECUTOR.init(Executor::new());

    executor.run(|spawner| {
        spawner.must_spawn(init_task(spawner));
        spawner.must_spawn(firmware_task());
    });
}
