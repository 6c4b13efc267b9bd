//! Sleep-jitter entropy generator backed by a bounded, mutex-guarded pool.
//!
//! A dedicated harvester thread repeatedly sleeps for a feedback-perturbed
//! interval and keeps the low byte of the measured elapsed nanoseconds. The
//! wake-up error is dominated by OS scheduler non-determinism: timer interrupt
//! granularity, runqueue length, and frequency scaling. Feeding each measured
//! byte back into the next sleep duration keeps the cadence itself from
//! settling into a predictable period.
//!
//! Harvested bytes land in a 4096-byte pool. While the pool has room, bytes
//! are appended; once full, new bytes are XOR-mixed over existing content at a
//! wrapping cursor, so a saturated pool keeps absorbing entropy instead of
//! discarding it.

use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use log::debug;
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::error::Error;
use crate::source::ByteSource;

/// Capacity of the entropy pool in bytes.
pub const POOL_SIZE: usize = 4096;

/// Base sleep interval of the harvester; also the poll cadence of blocking
/// reads.
pub const BASE_SLEEP: Duration = Duration::from_micros(10);

/// Pool state. Guarded by the mutex in [`JitterPool`]; the harvester thread
/// and any number of consumers take the lock only for O(1) or O(n)-copy
/// critical sections, never across a sleep.
struct Pool {
    buf: Box<[u8; POOL_SIZE]>,
    size: usize,
    overflow_cursor: usize,
    total_collected: u64,
}

impl Pool {
    fn new() -> Self {
        Self {
            buf: Box::new([0u8; POOL_SIZE]),
            size: 0,
            overflow_cursor: 0,
            total_collected: 0,
        }
    }

    /// Append while there is room; XOR-mix at the overflow cursor once full.
    /// A byte is never dropped.
    fn absorb(&mut self, byte: u8) {
        self.total_collected += 1;
        if self.size < POOL_SIZE {
            self.buf[self.size] = byte;
            self.size += 1;
        } else {
            self.buf[self.overflow_cursor] ^= byte;
            self.overflow_cursor = (self.overflow_cursor + 1) % POOL_SIZE;
        }
    }

    /// Remove the `out.len()` freshest bytes if available. Taking from the
    /// tail biases the most recently produced entropy toward early
    /// consumption.
    fn pop(&mut self, out: &mut [u8]) -> bool {
        let n = out.len();
        if self.size < n {
            return false;
        }
        out.copy_from_slice(&self.buf[self.size - n..self.size]);
        self.size -= n;
        true
    }

    /// SHA-256 over the live region. Lets callers observe overflow mixing
    /// without consuming entropy.
    fn digest(&self) -> [u8; 32] {
        let mut h = Sha256::new();
        h.update(&self.buf[..self.size]);
        h.finalize().into()
    }
}

/// Snapshot of pool occupancy for operational tooling.
#[derive(Debug, Clone, Serialize)]
pub struct PoolStatus {
    /// Bytes currently held and ready for consumption.
    pub available: usize,
    /// Pool capacity ([`POOL_SIZE`]).
    pub capacity: usize,
    /// Total bytes harvested since start, including overflow-mixed ones.
    pub total_collected: u64,
}

/// Handle to a running jitter entropy generator.
///
/// Created with [`JitterPool::start`], which spawns the harvester thread.
/// Dropping the handle (or calling [`JitterPool::stop`]) signals the
/// harvester and joins it; the signal is consumed exactly once by the
/// harvester's timed wait, so shutdown is prompt and never busy-waits.
pub struct JitterPool {
    pool: Arc<Mutex<Pool>>,
    stop: mpsc::Sender<()>,
    worker: Option<JoinHandle<()>>,
}

impl JitterPool {
    /// Spawn the harvester and return a live handle.
    ///
    /// Blocks for one base sleep interval before returning so the pool has
    /// attempted at least one collection cycle.
    pub fn start() -> Self {
        let pool = Arc::new(Mutex::new(Pool::new()));
        let (stop_tx, stop_rx) = mpsc::channel();
        let shared = Arc::clone(&pool);
        let worker = thread::Builder::new()
            .name("driftpool-harvest".into())
            .spawn(move || harvest(shared, stop_rx))
            .expect("failed to spawn harvester thread");
        debug!("jitter harvester started (pool capacity {POOL_SIZE})");

        thread::sleep(BASE_SLEEP);

        Self {
            pool,
            stop: stop_tx,
            worker: Some(worker),
        }
    }

    /// Bytes currently available for consumption. Non-blocking, O(1).
    pub fn available(&self) -> usize {
        self.pool.lock().unwrap().size
    }

    /// Pool capacity in bytes.
    pub const fn capacity(&self) -> usize {
        POOL_SIZE
    }

    /// Occupancy snapshot under a single lock acquisition.
    pub fn status(&self) -> PoolStatus {
        let pool = self.pool.lock().unwrap();
        PoolStatus {
            available: pool.size,
            capacity: POOL_SIZE,
            total_collected: pool.total_collected,
        }
    }

    /// SHA-256 fingerprint of the current pool contents.
    pub fn fingerprint(&self) -> [u8; 32] {
        self.pool.lock().unwrap().digest()
    }

    /// Remove and return exactly `n` bytes, blocking until the pool holds
    /// them.
    ///
    /// Polls at the base collection cadence rather than being notified.
    /// Never returns short and never errors; a request for more bytes than
    /// the harvester will ever accumulate blocks forever, which is the
    /// caller's responsibility to avoid.
    pub fn read(&self, n: usize) -> Vec<u8> {
        let mut out = vec![0u8; n];
        self.read_exact(&mut out);
        out
    }

    /// Blocking variant that fills a caller-provided buffer. Same contract
    /// as [`JitterPool::read`].
    pub fn read_exact(&self, out: &mut [u8]) {
        while !self.pool.lock().unwrap().pop(out) {
            thread::sleep(BASE_SLEEP);
        }
    }

    /// Stop the harvester and release the pool. Equivalent to dropping the
    /// handle; spelled out for callers that want the lifecycle explicit.
    pub fn stop(self) {
        drop(self);
    }
}

impl Drop for JitterPool {
    fn drop(&mut self) {
        // The harvester may already have exited on a dropped channel.
        let _ = self.stop.send(());
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
        debug!("jitter harvester stopped");
    }
}

impl ByteSource for JitterPool {
    /// Never short: blocks until the whole buffer is served.
    fn read_into(&self, buf: &mut [u8]) -> Result<usize, Error> {
        self.read_exact(buf);
        Ok(buf.len())
    }
}

/// Harvester loop. Runs on its own thread until the stop signal arrives or
/// the handle is dropped.
fn harvest(pool: Arc<Mutex<Pool>>, stop: mpsc::Receiver<()>) {
    // Two feedback bytes, interpreted as a little-endian u16 of nanoseconds,
    // perturb the next sleep. A toggling index alternates which byte the
    // latest measurement replaces.
    let mut feedback = [0u8; 2];
    let mut index = 0usize;

    loop {
        let jitter = Duration::from_nanos(u64::from(u16::from_le_bytes(feedback)));
        let before = Instant::now();

        match stop.recv_timeout(BASE_SLEEP + jitter) {
            Err(RecvTimeoutError::Timeout) => {}
            Ok(()) | Err(RecvTimeoutError::Disconnected) => return,
        }

        let byte = before.elapsed().as_nanos() as u8;
        feedback[index] = byte;
        index ^= 1;

        pool.lock().unwrap().absorb(byte);
    }
}
