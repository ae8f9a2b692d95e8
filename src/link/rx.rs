//! Interrupt-fed line receiver.
//!
//! Turns the asynchronous UART byte stream into a bounded, inspectable
//! buffer plus a line-boundary flag. The USART ISR is the single writer
//! ([`LineReceiver::on_byte`]); the control thread inside the transport's
//! wait loop is the single reader. All shared state is atomic with
//! Acquire/Release ordering — the same SPSC discipline as a lock-free
//! event queue, so no critical section is needed on the reception path.

use core::sync::atomic::{AtomicBool, AtomicU8, AtomicU32, AtomicUsize, Ordering};

/// Receive buffer capacity in bytes.
///
/// One slot is reserved so the live length never reaches the capacity,
/// matching the co-processor's longest diagnostic lines with headroom.
pub const RX_BUFFER_CAP: usize = 256;

/// Fixed-capacity receive buffer shared between the USART ISR and the
/// command transport.
///
/// Invariants:
/// - `len() <= RX_BUFFER_CAP - 1` at all times.
/// - The buffer is reset to empty at the start of every command's wait
///   window; a stray byte in flight at that moment is dropped with the
///   rest of the stale window.
/// - The line flag is level-like: multiple lines arriving before the
///   reader consumes it coalesce into one signal.
pub struct LineReceiver {
    buf: [AtomicU8; RX_BUFFER_CAP],
    len: AtomicUsize,
    line_ready: AtomicBool,
    /// Diagnostic only — incremented on overflow, never logged from the
    /// ISR path to keep reception bounded-time.
    overflows: AtomicU32,
}

impl LineReceiver {
    /// `const` so the receiver can live in a `static` reachable from the
    /// USART interrupt handler.
    pub const fn new() -> Self {
        Self {
            buf: [const { AtomicU8::new(0) }; RX_BUFFER_CAP],
            len: AtomicUsize::new(0),
            line_ready: AtomicBool::new(false),
            overflows: AtomicU32::new(0),
        }
    }

    /// Append one received byte. ISR context — must never block and must
    /// return promptly.
    ///
    /// On overflow the whole buffer is discarded (length reset to 0) and
    /// reception continues: the in-flight response is presumed corrupted
    /// and will surface to the waiter as an eventual timeout.
    pub fn on_byte(&self, byte: u8) {
        let len = self.len.load(Ordering::Acquire);
        if len < RX_BUFFER_CAP - 1 {
            self.buf[len].store(byte, Ordering::Relaxed);
            self.len.store(len + 1, Ordering::Release);
        } else {
            self.len.store(0, Ordering::Release);
            self.overflows.fetch_add(1, Ordering::Relaxed);
        }

        if byte == b'\n' {
            self.line_ready.store(true, Ordering::Release);
        }
    }

    /// Clear the buffer and line flag, opening a fresh match window.
    /// Called by the control thread before each command is transmitted.
    pub fn reset(&self) {
        self.len.store(0, Ordering::Release);
        self.line_ready.store(false, Ordering::Release);
    }

    /// Consume the line flag. Returns `true` if at least one line
    /// terminator was seen since the last consume.
    pub fn take_line_ready(&self) -> bool {
        self.line_ready.swap(false, Ordering::AcqRel)
    }

    /// Current number of buffered bytes.
    pub fn len(&self) -> usize {
        self.len.load(Ordering::Acquire)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of overflow resets since boot.
    pub fn overflow_count(&self) -> u32 {
        self.overflows.load(Ordering::Relaxed)
    }

    /// Copy the buffered bytes into `out`, returning how many were
    /// copied. The snapshot is consistent up to the published length.
    pub fn snapshot(&self, out: &mut [u8]) -> usize {
        let n = self.len().min(out.len());
        for (slot, dst) in self.buf.iter().zip(out.iter_mut()).take(n) {
            *dst = slot.load(Ordering::Relaxed);
        }
        n
    }

    /// Substring search over the accumulated response text.
    pub fn contains(&self, needle: &str) -> bool {
        let needle = needle.as_bytes();
        if needle.is_empty() {
            return true;
        }
        let mut snap = [0u8; RX_BUFFER_CAP];
        let n = self.snapshot(&mut snap);
        n >= needle.len() && snap[..n].windows(needle.len()).any(|w| w == needle)
    }
}

impl Default for LineReceiver {
    fn default() -> Self {
        Self::new()
    }
}
