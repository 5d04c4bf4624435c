//! Tick delivery.
//!
//! [`TickSource`] is the port a host wires a real clock to; the timer never
//! sleeps or spawns anything itself. [`IntervalDriver`] is the blocking
//! one-thread implementation used by the CLI, and [`fast_forward`] delivers
//! ticks back-to-back for simulations and tests.

use std::thread;
use std::time::{Duration, Instant};

use super::engine::SessionTimer;

/// Something advanced by a periodic tick.
pub trait TickSource {
    fn on_tick(&mut self);

    /// Ticks are only delivered while this holds.
    fn is_running(&self) -> bool;
}

impl TickSource for SessionTimer {
    fn on_tick(&mut self) {
        self.tick();
    }

    fn is_running(&self) -> bool {
        SessionTimer::is_running(self)
    }
}

/// Calls `on_tick` once per `interval` on the current thread.
#[derive(Debug, Clone, Copy)]
pub struct IntervalDriver {
    interval: Duration,
}

impl Default for IntervalDriver {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

impl IntervalDriver {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Tick `target` until it stops running, calling `observe` after each
    /// tick. Returns the number of ticks delivered.
    ///
    /// Deadlines are scheduled from the start instant, so a slow observer
    /// shortens the next sleep instead of pushing every later tick back.
    pub fn drive<T, F>(&self, target: &mut T, mut observe: F) -> u64
    where
        T: TickSource + ?Sized,
        F: FnMut(&T),
    {
        let mut delivered = 0u64;
        let mut deadline = Instant::now() + self.interval;

        while target.is_running() {
            let now = Instant::now();
            if deadline > now {
                thread::sleep(deadline - now);
            }
            target.on_tick();
            delivered += 1;
            observe(target);
            deadline += self.interval;
        }
        delivered
    }
}

/// Deliver up to `ticks` ticks immediately, stopping early once `target`
/// stops running. Returns the number delivered.
pub fn fast_forward<T: TickSource + ?Sized>(target: &mut T, ticks: u64) -> u64 {
    let mut delivered = 0;
    while delivered < ticks && target.is_running() {
        target.on_tick();
        delivered += 1;
    }
    delivered
}
