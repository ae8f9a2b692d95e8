//! Scripted co-processor simulation (host builds only).
//!
//! `SimSerial` plays the ESP32's side of the conversation: every command
//! written through the [`SerialTx`] port is matched against a script,
//! and the scripted response bytes are fed into the shared
//! [`LineReceiver`] exactly as the USART ISR would deliver them. Used by
//! the integration tests and available for host-side experiments.

#![cfg(not(feature = "stm32"))]

use std::cell::RefCell;
use std::rc::Rc;

use crate::app::ports::SerialTx;
use crate::link::LineReceiver;

/// One script entry: respond to any command starting with `when` by
/// delivering `respond` into the receiver.
pub struct Rule {
    pub when: &'static [u8],
    pub respond: &'static [u8],
}

/// Everything the firmware transmitted, in order, one entry per write.
/// Cloned handles stay valid after the serial moves into the transport.
pub type Transcript = Rc<RefCell<Vec<Vec<u8>>>>;

/// Scripted serial link. Single writer, immediate delivery: responses
/// land in the receiver before the transport's wait loop first polls,
/// which the level-like line flag absorbs (that is also how a real
/// burst at 115200 baud behaves against a 1 ms poll).
pub struct SimSerial<'a> {
    rx: &'a LineReceiver,
    script: Vec<Rule>,
    sent: Transcript,
    /// When set, the next write reports a transmit fault instead.
    pub fail_next_write: bool,
}

impl<'a> SimSerial<'a> {
    pub fn new(rx: &'a LineReceiver, script: Vec<Rule>) -> Self {
        Self {
            rx,
            script,
            sent: Rc::new(RefCell::new(Vec::new())),
            fail_next_write: false,
        }
    }

    /// Handle onto the transmit log for later assertions.
    pub fn transcript(&self) -> Transcript {
        Rc::clone(&self.sent)
    }

    fn deliver(&self, bytes: &[u8]) {
        for &b in bytes {
            self.rx.on_byte(b);
        }
    }
}

/// Simulated transmit fault.
#[derive(Debug)]
pub struct SimTxError;

impl SerialTx for SimSerial<'_> {
    type Error = SimTxError;

    fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        if self.fail_next_write {
            self.fail_next_write = false;
            return Err(SimTxError);
        }
        self.sent.borrow_mut().push(bytes.to_vec());
        if let Some(rule) = self.script.iter().find(|r| bytes.starts_with(r.when)) {
            self.deliver(rule.respond);
        }
        Ok(())
    }
}
