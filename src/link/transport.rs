//! Synchronous request/response over the asynchronous receiver.
//!
//! [`AtTransport::send_await`] is the single primitive every protocol
//! step is built on: transmit the command verbatim, then poll the
//! [`LineReceiver`] until the expected marker arrives, the co-processor
//! rejects the command, or the timeout budget runs out. Failures are
//! reported, never retried here — retry policy belongs to the caller.

use log::{trace, warn};

use super::rx::LineReceiver;
use crate::app::ports::{SerialTx, TimePort};
use crate::error::LinkError;

/// Keyword the co-processor prints when it rejects a command.
pub const ERROR_MARKER: &str = "ERROR";

/// Wait-loop poll cadence. Short enough that a response line is noticed
/// promptly, long enough that the control thread actually yields.
const POLL_INTERVAL_MS: u32 = 1;

/// Settle time after a successful match before control returns to the
/// sequencer. The co-processor may still be flushing trailing bytes of
/// the response; issuing the next command immediately risks those tail
/// bytes landing in the next command's window.
pub const POST_MATCH_SETTLE_MS: u32 = 50;

/// Command/response transport over one UART link.
///
/// Owns the transmit side; shares the [`LineReceiver`] with the USART
/// ISR. Exactly one command may be outstanding at a time — the `&mut`
/// receiver on `send_await` enforces that statically.
pub struct AtTransport<'a, T, C> {
    tx: T,
    clock: C,
    rx: &'a LineReceiver,
}

impl<'a, T: SerialTx, C: TimePort> AtTransport<'a, T, C> {
    pub fn new(tx: T, clock: C, rx: &'a LineReceiver) -> Self {
        Self { tx, clock, rx }
    }

    /// Send `cmd` and wait for a response line containing `expected`.
    ///
    /// - `Ok(())` — a line containing `expected` arrived in time.
    /// - `Err(ErrorMarker)` — a line containing `ERROR` arrived first.
    /// - `Err(TransmitFailed)` — the UART write itself failed.
    /// - `Err(TimedOut)` — no conclusive line within `timeout_ms`.
    ///
    /// The expected marker is tested *before* the error keyword: some
    /// firmware revisions echo the word `ERROR` inside otherwise
    /// successful diagnostic text, and the marker must win when a line
    /// carries both. With `expected = None` only the error keyword is
    /// checked and the call can only fail.
    ///
    /// The buffer is never cleared between lines of one exchange, so a
    /// marker arriving after intermediate lines (`WIFI CONNECTED`,
    /// `WIFI GOT IP`, then `OK`) still matches.
    pub fn send_await(
        &mut self,
        cmd: &[u8],
        expected: Option<&str>,
        timeout_ms: u32,
    ) -> Result<(), LinkError> {
        // Fresh match window: reception stays armed process-wide, only
        // the buffer and line flag are reset per command.
        self.rx.reset();

        if let Err(e) = self.tx.write(cmd) {
            warn!("UART transmit failed: {e:?}");
            return Err(LinkError::TransmitFailed);
        }

        let start = self.clock.now_ms();
        while self.clock.now_ms() - start < u64::from(timeout_ms) {
            if self.rx.take_line_ready() {
                if let Some(marker) = expected {
                    if self.rx.contains(marker) {
                        self.clock.sleep_ms(POST_MATCH_SETTLE_MS);
                        return Ok(());
                    }
                }
                if self.rx.contains(ERROR_MARKER) {
                    return Err(LinkError::ErrorMarker);
                }
                // Line arrived without a verdict — keep accumulating.
                trace!("response line without marker, waiting for more");
            }
            self.clock.sleep_ms(POLL_INTERVAL_MS);
        }

        warn!(
            "timeout ({timeout_ms} ms) waiting for {:?}, {} bytes buffered",
            expected,
            self.rx.len()
        );
        Err(LinkError::TimedOut)
    }

    /// Cooperative delay, exposed for sequencer-level settle times.
    pub fn sleep_ms(&mut self, ms: u32) {
        self.clock.sleep_ms(ms);
    }
}
