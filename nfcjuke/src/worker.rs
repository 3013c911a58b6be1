// nfcjuke/src/worker.rs

//! Dedicated poll-loop worker.
//!
//! One thread owns the hardware transport and drives the session state
//! machine at a fixed cadence; no other code path may touch the bus.
//! Session events are handed over a channel to a second thread owning the
//! resolver, so database or playback latency never holds up a poll cycle.
//! The rest of the system communicates with the worker only through the
//! [`NfcHandle`]: a single-slot overwritable write-request cell, a write
//! status cell, and a published snapshot of the last detection.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use log::{error, info, warn};

use crate::resolver::Resolver;
use crate::session::{SessionConfig, SessionEvent, TagSession};
use crate::transport::{NfcBus, Reader};
use crate::types::{TagDetection, WriteRequest, WriteStatus};
use crate::{Error, Result};

/// Worker tuning.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Target period of the poll loop.
    pub poll_period: Duration,
    /// Session state machine tuning.
    pub session: SessionConfig,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            poll_period: Duration::from_millis(100),
            session: SessionConfig::default(),
        }
    }
}

/// State shared between the worker thread and its handle.
struct Shared {
    last_detection: Mutex<Option<TagDetection>>,
    write_slot: Mutex<Option<WriteRequest>>,
    write_status: Mutex<WriteStatus>,
    online: AtomicBool,
    shutdown: AtomicBool,
}

/// Control surface over the worker threads. Dropping the handle shuts the
/// subsystem down and releases the bus.
pub struct NfcHandle {
    shared: Arc<Shared>,
    poll_thread: Option<JoinHandle<()>>,
    resolver_thread: Option<JoinHandle<()>>,
}

impl NfcHandle {
    /// Arm a one-shot NDEF write for the next presented tag.
    ///
    /// Returns [`Error::WriteBusy`] while a previous request is still
    /// armed; a request that already finished (in any way) is replaced.
    pub fn begin_write(&self, request: WriteRequest) -> Result<()> {
        let mut slot = self.shared.write_slot.lock().unwrap();
        let mut status = self.shared.write_status.lock().unwrap();
        if *status == WriteStatus::Armed {
            return Err(Error::WriteBusy);
        }
        *slot = Some(request);
        *status = WriteStatus::Armed;
        Ok(())
    }

    /// Status of the most recent write request, for admin-API polling.
    pub fn write_status(&self) -> WriteStatus {
        *self.shared.write_status.lock().unwrap()
    }

    /// Latest published detection snapshot ("last tag seen").
    pub fn last_detection(&self) -> Option<TagDetection> {
        self.shared.last_detection.lock().unwrap().clone()
    }

    /// Whether the reader hardware answered the connect probe. Stays false
    /// forever if it did not; the worker then keeps reporting "no tag".
    pub fn online(&self) -> bool {
        self.shared.online.load(Ordering::Acquire)
    }

    /// Stop the poll loop, let the resolver drain its queued events, and
    /// wait for both threads to finish. Releases the bus.
    pub fn shutdown(mut self) {
        self.stop_and_join();
    }

    fn stop_and_join(&mut self) {
        self.shared.shutdown.store(true, Ordering::Release);
        // Joining the poll thread first drops the event sender, which in
        // turn lets the resolver thread run to the end of its queue.
        if let Some(thread) = self.poll_thread.take() {
            if thread.join().is_err() {
                error!("nfc poll thread panicked");
            }
        }
        if let Some(thread) = self.resolver_thread.take() {
            if thread.join().is_err() {
                error!("nfc resolver thread panicked");
            }
        }
    }
}

impl Drop for NfcHandle {
    fn drop(&mut self) {
        self.stop_and_join();
    }
}

/// Owns the transport and session on the poll thread; resolution runs on
/// its own thread behind the event channel.
pub struct NfcWorker {
    session: TagSession<Reader>,
    events: mpsc::Sender<SessionEvent>,
    shared: Arc<Shared>,
    poll_period: Duration,
}

impl NfcWorker {
    /// Spawn the poll and resolver threads over `bus` and return a handle.
    ///
    /// The connect probe runs on the poll thread: a chip that does not
    /// answer leaves the subsystem permanently offline without failing the
    /// spawn, and the rest of the system keeps running.
    pub fn spawn(
        bus: Box<dyn NfcBus>,
        resolver: Resolver,
        config: WorkerConfig,
    ) -> Result<NfcHandle> {
        let shared = Arc::new(Shared {
            last_detection: Mutex::new(None),
            write_slot: Mutex::new(None),
            write_status: Mutex::new(WriteStatus::Idle),
            online: AtomicBool::new(false),
            shutdown: AtomicBool::new(false),
        });

        // The resolver thread lives until every sender is gone; the only
        // sender is owned by the poll thread, so it exits right after it.
        let (event_tx, event_rx) = mpsc::channel::<SessionEvent>();
        let resolver_thread = thread::Builder::new()
            .name("nfc-resolve".into())
            .spawn(move || {
                let mut resolver = resolver;
                while let Ok(event) = event_rx.recv() {
                    resolver.handle_event(&event);
                }
            })
            .map_err(|e| Error::HardwareUnavailable(format!("resolver thread: {e}")))?;

        let thread_shared = shared.clone();
        let poll_thread = thread::Builder::new()
            .name("nfc-poll".into())
            .spawn(move || match Reader::connect(bus) {
                Ok(reader) => {
                    thread_shared.online.store(true, Ordering::Release);
                    let worker = NfcWorker {
                        session: TagSession::new(reader, config.session),
                        events: event_tx,
                        shared: thread_shared,
                        poll_period: config.poll_period,
                    };
                    worker.run();
                }
                Err(e) => {
                    error!("nfc reader unavailable, subsystem offline: {}", e);
                    drop(event_tx);
                    run_offline(&thread_shared, config.poll_period);
                }
            })
            .map_err(|e| Error::HardwareUnavailable(format!("worker thread: {e}")))?;

        Ok(NfcHandle {
            shared,
            poll_thread: Some(poll_thread),
            resolver_thread: Some(resolver_thread),
        })
    }

    fn run(mut self) {
        info!("nfc poll loop started");
        while !self.shared.shutdown.load(Ordering::Acquire) {
            let started = Instant::now();
            self.cycle(started);
            let elapsed = started.elapsed();
            if elapsed < self.poll_period {
                thread::sleep(self.poll_period - elapsed);
            }
        }
        info!("nfc poll loop stopped");
    }

    fn cycle(&mut self, now: Instant) {
        if let Some(request) = self.shared.write_slot.lock().unwrap().take() {
            self.session.arm_write(request, now);
        }

        let event = self.session.tick(now);

        if let SessionEvent::Detected(detection) = &event {
            *self.shared.last_detection.lock().unwrap() = Some(detection.clone());
        }

        // An untaken slot means a request arrived mid-cycle; its Armed
        // status must not be clobbered with the pre-arm session status.
        {
            let slot = self.shared.write_slot.lock().unwrap();
            if slot.is_none() {
                *self.shared.write_status.lock().unwrap() = self.session.write_status();
            }
        }

        // Resolution can outlast several poll periods (database, playback),
        // so it is handed to the resolver thread instead of running here.
        if !matches!(&event, SessionEvent::Idle) && self.events.send(event).is_err() {
            warn!("resolver thread gone, dropping session event");
        }
    }
}

/// Degraded loop for a reader that never came up: publish "no tag", fail
/// any write request immediately, wait for shutdown.
fn run_offline(shared: &Shared, poll_period: Duration) {
    *shared.last_detection.lock().unwrap() = Some(TagDetection::absent());
    while !shared.shutdown.load(Ordering::Acquire) {
        if shared.write_slot.lock().unwrap().take().is_some() {
            warn!("write request rejected: reader offline");
            *shared.write_status.lock().unwrap() = WriteStatus::Failed;
        }
        thread::sleep(poll_period);
    }
}
