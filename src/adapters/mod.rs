//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter   | Implements        | Connects to                     |
//! |-----------|-------------------|---------------------------------|
//! | `time`    | TimePort          | SysTick ms counter / host clock |
//! | `uart`    | SerialTx          | USART1 TX to the ESP32          |
//! | `sim`     | SerialTx          | Scripted co-processor (host)    |
//!
//! The STM32 implementations live behind the `stm32` feature; host
//! builds get `std`-backed equivalents for tests and simulation.

pub mod sim;
pub mod time;
pub mod uart;
