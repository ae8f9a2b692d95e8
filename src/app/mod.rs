//! Application core — pure domain logic, zero I/O.
//!
//! The publish loop lives here: read the SHT31, format feed payloads,
//! and push them to the broker through the AT modem. All interaction
//! with hardware happens through **port traits** defined in [`ports`],
//! keeping this layer fully testable without real peripherals.

pub mod ports;
pub mod service;
