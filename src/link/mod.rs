//! AT command link to the ESP32 co-processor.
//!
//! The co-processor speaks a textual command language over UART with no
//! framing beyond line terminators and keyword markers (`OK`, `ERROR`,
//! the `>` prompt). This module reconciles the interrupt-driven receive
//! path with a synchronous request/response programming model:
//!
//! ```text
//! ┌──────────────┐   operations    ┌──────────────┐   send_await   ┌──────────────┐
//! │   AtModem    │────────────────▶│ AtTransport  │───────────────▶│  SerialTx    │
//! │ (sequencer)  │                 │ (poll+match) │                │  (UART TX)   │
//! └──────────────┘                 └──────▲───────┘                └──────────────┘
//!                                         │ line flag + buffer
//!                                  ┌──────┴───────┐                ┌──────────────┐
//!                                  │ LineReceiver │◀───────────────│  USART ISR   │
//!                                  │ (SPSC atomics)│   on_byte      │  (RX byte)   │
//!                                  └──────────────┘                └──────────────┘
//! ```
//!
//! Reception stays armed for the whole process lifetime; each command
//! exchange only resets the buffer and line flag, opening a fresh match
//! window. Exactly one command may be outstanding at a time.

pub mod commands;
pub mod modem;
pub mod rx;
pub mod transport;

pub use modem::{AtModem, ConnectionState};
pub use rx::{LineReceiver, RX_BUFFER_CAP};
pub use transport::AtTransport;
