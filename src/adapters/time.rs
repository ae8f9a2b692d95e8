//! Time adapter.
//!
//! Provides the [`TimePort`] monotonic tick and cooperative delay.
//!
//! - **`stm32` feature** — a millisecond counter driven by the SysTick
//!   exception (the handler in `main.rs` calls [`systick_tick`] at 1 kHz).
//! - **host** — `std::time::Instant` plus `thread::sleep`, for tests and
//!   simulation.

use crate::app::ports::TimePort;

#[cfg(feature = "stm32")]
use core::sync::atomic::{AtomicU32, Ordering};

// ───────────────────────────────────────────────────────────────
// STM32: SysTick-driven millisecond counter
// ───────────────────────────────────────────────────────────────

/// Milliseconds since boot. Wraps after ~49 days — far outside any
/// single timeout window, which is all the link layer measures.
#[cfg(feature = "stm32")]
static MILLIS: AtomicU32 = AtomicU32::new(0);

/// Called from the SysTick exception handler, once per millisecond.
#[cfg(feature = "stm32")]
pub fn systick_tick() {
    MILLIS.fetch_add(1, Ordering::Release);
}

#[cfg(feature = "stm32")]
pub struct SysTickClock;

#[cfg(feature = "stm32")]
impl SysTickClock {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(feature = "stm32")]
impl Default for SysTickClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "stm32")]
impl TimePort for SysTickClock {
    fn now_ms(&self) -> u64 {
        u64::from(MILLIS.load(Ordering::Acquire))
    }

    fn sleep_ms(&mut self, ms: u32) {
        let deadline = MILLIS.load(Ordering::Acquire).wrapping_add(ms);
        // wfi wakes on the next SysTick at the latest, so this yields
        // rather than busy-spins.
        while (deadline.wrapping_sub(MILLIS.load(Ordering::Acquire)) as i32) > 0 {
            cortex_m::asm::wfi();
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Host: Instant-backed clock
// ───────────────────────────────────────────────────────────────

/// Host clock for tests and simulation.
#[cfg(not(feature = "stm32"))]
pub struct HostClock {
    start: std::time::Instant,
}

#[cfg(not(feature = "stm32"))]
impl HostClock {
    pub fn new() -> Self {
        Self {
            start: std::time::Instant::now(),
        }
    }
}

#[cfg(not(feature = "stm32"))]
impl Default for HostClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(not(feature = "stm32"))]
impl TimePort for HostClock {
    fn now_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    fn sleep_ms(&mut self, ms: u32) {
        std::thread::sleep(std::time::Duration::from_millis(u64::from(ms)));
    }
}
