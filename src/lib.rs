//! Hygrolink firmware library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. STM32-specific code (UART/I2C wiring, the binary entry
//! point) is guarded by the `stm32` cargo feature; the default host build
//! compiles the full AT link engine, sensor driver, and application core
//! against mock ports.

#![cfg_attr(feature = "stm32", no_std)]
#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod link;
pub mod sensors;

mod error;

pub mod adapters;

pub use error::{Error, LinkError, Result, SensorError};
