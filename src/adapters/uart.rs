//! USART transmit adapter for the ESP32 link (STM32 targets).
//!
//! Implements [`SerialTx`] over the stm32f1xx-hal serial transmitter.
//! The receive half never appears here: RX bytes are consumed one at a
//! time by the USART1 interrupt handler in `main.rs`, which feeds them
//! straight into the shared [`LineReceiver`](crate::link::LineReceiver).

#![cfg(feature = "stm32")]

use stm32f1xx_hal::pac::USART1;
use stm32f1xx_hal::prelude::*;
use stm32f1xx_hal::serial::Tx;

use crate::app::ports::SerialTx;

/// Blocking transmitter on USART1.
pub struct UsartTx {
    tx: Tx<USART1>,
}

/// Transmit-side fault, carried through to `LinkError::TransmitFailed`.
#[derive(Debug)]
pub struct UartTxError;

impl UsartTx {
    pub fn new(tx: Tx<USART1>) -> Self {
        Self { tx }
    }
}

impl SerialTx for UsartTx {
    type Error = UartTxError;

    fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        for &b in bytes {
            nb::block!(self.tx.write(b)).map_err(|_| UartTxError)?;
        }
        Ok(())
    }
}
