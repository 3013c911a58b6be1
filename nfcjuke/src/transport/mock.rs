// nfcjuke/src/transport/mock.rs

use crate::transport::traits::NfcBus;
use crate::{Error, Result};

/// Mock bus for unit tests. It records sent frames and returns queued
/// responses in order.
#[derive(Debug, Default)]
pub struct MockBus {
    /// Every frame sent to the chip, in order.
    pub sent: Vec<Vec<u8>>,
    /// Queued responses consumed front-to-back by `receive`.
    pub responses: Vec<Vec<u8>>,
    /// Returned by `receive` whenever the queue is empty. When `None`, an
    /// empty queue yields `Error::Timeout` instead.
    pub idle_response: Option<Vec<u8>>,
    /// Testing hook: number of upcoming `receive` calls that fail with
    /// `Timeout` regardless of the queue.
    pub receive_failures: usize,
    /// Number of bus-level resets performed.
    pub bus_resets: usize,
}

impl MockBus {
    /// Fresh mock with an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue one response frame.
    pub fn push_response(&mut self, resp: Vec<u8>) {
        self.responses.push(resp);
    }

    /// Set the frame returned when the response queue runs dry. Long-lived
    /// loop tests use this to keep the worker fed with "no tag" replies.
    pub fn set_idle_response(&mut self, resp: Vec<u8>) {
        self.idle_response = Some(resp);
    }

    /// Set how many subsequent `receive` calls should fail (for tests).
    pub fn set_receive_failures(&mut self, n: usize) {
        self.receive_failures = n;
    }

    /// Number of frames sent whose command byte equals `cmd`.
    pub fn sent_count(&self, cmd: u8) -> usize {
        self.sent.iter().filter(|f| f.first() == Some(&cmd)).count()
    }
}

impl NfcBus for MockBus {
    fn send(&mut self, data: &[u8]) -> Result<()> {
        self.sent.push(data.to_vec());
        Ok(())
    }

    fn receive(&mut self, _timeout_ms: u64) -> Result<Vec<u8>> {
        if self.receive_failures > 0 {
            self.receive_failures -= 1;
            return Err(Error::Timeout);
        }
        if self.responses.is_empty() {
            return match &self.idle_response {
                Some(resp) => Ok(resp.clone()),
                None => Err(Error::Timeout),
            };
        }
        Ok(self.responses.remove(0))
    }

    fn reset(&mut self) -> Result<()> {
        self.bus_resets += 1;
        Ok(())
    }
}
