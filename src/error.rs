//! Unified error types for the Hygrolink firmware.
//!
//! A single `Error` enum that every subsystem converts into, keeping
//! the top-level publish loop's error handling uniform. All variants
//! are `Copy` and carry no allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The AT link to the ESP32 co-processor failed.
    Link(LinkError),
    /// The SHT31 sensor could not be read or returned bad data.
    Sensor(SensorError),
    /// Configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Link(e) => write!(f, "link: {e}"),
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

// ---------------------------------------------------------------------------
// AT link errors
// ---------------------------------------------------------------------------

/// Outcome taxonomy for one AT command exchange.
///
/// None of these are retried by the link layer itself — retry policy
/// belongs to the publish loop, which treats any failure as "this cycle
/// did not publish" and tries again on the next interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkError {
    /// The UART transmit primitive reported a local fault.
    TransmitFailed,
    /// The co-processor answered a line containing `ERROR`.
    ErrorMarker,
    /// No conclusive response line arrived within the timeout budget.
    ///
    /// A receive-buffer overflow also ends up here: the corrupted
    /// response is discarded and can never match the expected marker.
    TimedOut,
    /// A quoted command field contained `"`, `\`, or a line terminator.
    /// The AT command language has no escaping, so such input is rejected
    /// before anything touches the wire.
    InvalidField(&'static str),
    /// The formatted command did not fit its fixed-capacity buffer.
    CommandTooLong,
    /// Publish called with a zero-length payload (caller error, nothing
    /// is transmitted).
    EmptyPayload,
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TransmitFailed => write!(f, "UART transmit failed"),
            Self::ErrorMarker => write!(f, "co-processor replied ERROR"),
            Self::TimedOut => write!(f, "timed out waiting for response"),
            Self::InvalidField(field) => write!(f, "unquotable character in {field}"),
            Self::CommandTooLong => write!(f, "command exceeds buffer capacity"),
            Self::EmptyPayload => write!(f, "empty publish payload"),
        }
    }
}

impl From<LinkError> for Error {
    fn from(e: LinkError) -> Self {
        Self::Link(e)
    }
}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// I2C write (measurement trigger) failed.
    BusWriteFailed,
    /// I2C read (measurement fetch) failed.
    BusReadFailed,
    /// A data word failed its CRC-8 check.
    CrcMismatch,
    /// Reading is outside the physically plausible range.
    OutOfRange,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BusWriteFailed => write!(f, "I2C write failed"),
            Self::BusReadFailed => write!(f, "I2C read failed"),
            Self::CrcMismatch => write!(f, "CRC mismatch"),
            Self::OutOfRange => write!(f, "reading out of range"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
