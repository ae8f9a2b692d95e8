//! Sensor subsystem.
//!
//! One driver today: the SHT31 temperature/humidity sensor on I2C. The
//! driver implements [`SensorPort`](crate::app::ports::SensorPort) so
//! the publish loop consumes it like any other port.

pub mod sht31;

pub use sht31::Sht31;
