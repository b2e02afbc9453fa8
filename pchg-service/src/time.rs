//! Monotonic time source used for rate limiting
use embassy_time::Instant;

/// Monotonic clock
pub trait Clock {
    /// Current time
    fn now(&self) -> Instant;
}

/// Clock backed by the embassy time driver
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}
