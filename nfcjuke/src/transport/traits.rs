// nfcjuke/src/transport/traits.rs

use crate::types::{TagFamily, TagUid};
use crate::Result;

/// Bus trait abstracting I/O away from the reader command logic.
///
/// Implementations are not required to be thread-safe beyond `Send`: a
/// single worker thread owns the bus by construction and no other code
/// path may touch it.
pub trait NfcBus: Send {
    /// Send a raw command frame to the reader chip.
    fn send(&mut self, data: &[u8]) -> Result<()>;

    /// Receive the chip's response with a timeout in milliseconds.
    fn receive(&mut self, timeout_ms: u64) -> Result<Vec<u8>>;

    /// Perform a bus-level reset (re-open the device, clear driver state).
    /// Default is a no-op for buses without one.
    fn reset(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Page-oriented reader contract consumed by the session state machine.
///
/// One contract for all tag families; the family-specific command
/// sequences (sector authentication on MIFARE Classic, plain access on
/// NTAG) live behind it.
pub trait TagReader {
    /// One anti-collision/select sequence. `Ok(None)` means no tag in
    /// range; errors are transient transport failures.
    fn poll(&mut self) -> Result<Option<TagUid>>;

    /// Read `count` physical pages starting at `start_page`, one chip
    /// command per page. Aborts at the first failed page.
    fn read_pages(&mut self, start_page: u8, count: usize) -> Result<Vec<u8>>;

    /// Write `data` across consecutive pages starting at `start_page`.
    /// `data` must be a multiple of the page size; partial pages are never
    /// issued to hardware.
    fn write_pages(&mut self, start_page: u8, data: &[u8]) -> Result<()>;

    /// Hard-reset the reader chip to recover from a wedged bus state.
    fn reset(&mut self) -> Result<()>;

    /// Tag family selected by the capability probe at connect time.
    fn family(&self) -> TagFamily;
}

impl<T: TagReader + ?Sized> TagReader for Box<T> {
    fn poll(&mut self) -> Result<Option<TagUid>> {
        (**self).poll()
    }

    fn read_pages(&mut self, start_page: u8, count: usize) -> Result<Vec<u8>> {
        (**self).read_pages(start_page, count)
    }

    fn write_pages(&mut self, start_page: u8, data: &[u8]) -> Result<()> {
        (**self).write_pages(start_page, data)
    }

    fn reset(&mut self) -> Result<()> {
        (**self).reset()
    }

    fn family(&self) -> TagFamily {
        (**self).family()
    }
}
