//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ link / AppService (domain)
//! ```
//!
//! Driven adapters (UART transmit, tick source, sensor bus) implement
//! these traits. The AT transport and [`AppService`](super::service::AppService)
//! consume them via generics, so the domain core never touches hardware
//! directly.

use crate::error::SensorError;

// ───────────────────────────────────────────────────────────────
// Serial transmit port (domain → wire)
// ───────────────────────────────────────────────────────────────

/// Byte transmit primitive for the co-processor UART.
///
/// Used for both command text and raw publish payload bytes; the caller
/// supplies any required line terminator. Implementations should bound
/// the blocking time with a short hardware timeout.
pub trait SerialTx {
    /// Error type for this transmitter.
    type Error: core::fmt::Debug;

    /// Transmit `bytes` verbatim.
    fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;
}

// ───────────────────────────────────────────────────────────────
// Time port (monotonic tick + cooperative yield)
// ───────────────────────────────────────────────────────────────

/// Monotonic millisecond tick source plus a cooperative delay.
///
/// `now_ms` never moves backwards; wrap-around is out of scope (no
/// single timeout window spans anywhere near the counter range).
pub trait TimePort {
    /// Milliseconds since boot.
    fn now_ms(&self) -> u64;

    /// Yield for roughly `ms` milliseconds. Used by the transport's wait
    /// loop so polling doesn't monopolise the CPU; never called from
    /// interrupt context.
    fn sleep_ms(&mut self, ms: u32);
}

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// One temperature/humidity measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    pub temperature_c: f32,
    pub humidity_rh: f32,
}

/// Read-side port: the publish loop calls this once per cycle.
pub trait SensorPort {
    /// Trigger a measurement and return the converted reading.
    fn read(&mut self) -> Result<Reading, SensorError>;
}
