//! Worker trait and the thread handle the controller owns per worker.
//!
//! The controller never inspects worker internals; it depends only on
//! the capability set {start, request_stop, join}. Interruption is
//! cooperative: a worker that ignores its stop flag stalls `join`
//! indefinitely — that risk is accepted rather than hidden behind a
//! kill path.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::error::ControlError;

/// A long-running unit of work executed on its own thread.
///
/// `run` consumes the worker and returns its output when the loop
/// exits; the model worker uses this to hand its world state back to
/// the controller across stop/start cycles.
pub trait Worker: Send + 'static {
    /// Value recovered by the controller when the thread is joined.
    type Output: Send + 'static;

    /// Execute the worker's loop until `signals` requests a stop.
    fn run(self, signals: &WorkerSignals) -> Self::Output;
}

/// Flags shared between a [`WorkerHandle`] and its running thread.
#[derive(Clone)]
pub struct WorkerSignals {
    stop: Arc<AtomicBool>,
    looping: Arc<AtomicBool>,
}

impl WorkerSignals {
    /// Whether the controller has requested a cooperative stop.
    pub fn stop_requested(&self) -> bool {
        self.stop.load(Ordering::Acquire)
    }

    /// Whether route looping is currently enabled.
    pub fn looping(&self) -> bool {
        self.looping.load(Ordering::Acquire)
    }
}

/// An owned, restartable worker thread with a looping flag.
///
/// At most one thread runs per handle; `start` while a prior thread is
/// unjoined fails with [`ControlError::AlreadyRunning`]. Every started
/// thread must be joined before the handle is dropped or reused — the
/// controller guarantees this, never detaching.
pub struct WorkerHandle<T> {
    name: &'static str,
    stop: Arc<AtomicBool>,
    looping: Arc<AtomicBool>,
    thread: Option<JoinHandle<T>>,
}

impl<T: Send + 'static> WorkerHandle<T> {
    /// Create an idle handle. `name` labels the OS thread and errors.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            stop: Arc::new(AtomicBool::new(false)),
            looping: Arc::new(AtomicBool::new(false)),
            thread: None,
        }
    }

    /// Name of this worker.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Spawn `worker` on a fresh thread.
    pub fn start<W>(&mut self, worker: W) -> Result<(), ControlError>
    where
        W: Worker<Output = T>,
    {
        if self.thread.is_some() {
            return Err(ControlError::AlreadyRunning(self.name));
        }
        self.stop.store(false, Ordering::Release);
        let signals = WorkerSignals {
            stop: self.stop.clone(),
            looping: self.looping.clone(),
        };
        let handle = thread::Builder::new()
            .name(format!("crossway-{}", self.name))
            .spawn(move || worker.run(&signals))
            .map_err(|source| ControlError::Spawn {
                name: self.name,
                source,
            })?;
        self.thread = Some(handle);
        tracing::debug!(worker = self.name, "worker started");
        Ok(())
    }

    /// Signal the worker's loop to exit. Never forces the thread down.
    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::Release);
    }

    /// Block until the worker thread exits, returning its output.
    ///
    /// Returns `Ok(None)` if no thread was running. Call
    /// [`WorkerHandle::request_stop`] first to guarantee termination.
    pub fn join(&mut self) -> Result<Option<T>, ControlError> {
        match self.thread.take() {
            None => Ok(None),
            Some(handle) => {
                let out = handle
                    .join()
                    .map_err(|_| ControlError::WorkerPanicked(self.name))?;
                tracing::debug!(worker = self.name, "worker joined");
                Ok(Some(out))
            }
        }
    }

    /// Whether a thread has been started and not yet joined.
    pub const fn is_running(&self) -> bool {
        self.thread.is_some()
    }

    /// Set the looping flag, visible to the running worker immediately.
    pub fn set_looping(&self, enabled: bool) {
        self.looping.store(enabled, Ordering::Release);
    }

    /// Flip the looping flag and return its new value.
    pub fn toggle_looping(&self) -> bool {
        !self.looping.fetch_xor(true, Ordering::AcqRel)
    }

    /// Current value of the looping flag.
    pub fn looping(&self) -> bool {
        self.looping.load(Ordering::Acquire)
    }
}
