//! Timer worker: the cadence source for the simulation.
//!
//! Delivers a regular tick signal to the model worker over a small
//! bounded channel. Cadence ticks ride their own channel rather than
//! the control queue — a synthetic control event per tick would drown
//! the run-state commands the queue exists for.

use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::Sender;

use super::worker::{Worker, WorkerSignals};

/// A tick delivered at a fixed interval.
#[derive(Debug, Clone, Copy)]
pub struct Tick {
    /// Tick number, monotonically increasing from 0.
    pub seq: u64,
    /// Time elapsed since the timer started.
    pub elapsed: Duration,
}

/// Periodic tick producer, one per running simulation.
pub struct TimerWorker {
    tick_tx: Sender<Tick>,
    interval: Duration,
}

impl TimerWorker {
    /// Create a timer that ticks every `interval` into `tick_tx`.
    pub const fn new(tick_tx: Sender<Tick>, interval: Duration) -> Self {
        Self { tick_tx, interval }
    }
}

impl Worker for TimerWorker {
    type Output = ();

    fn run(self, signals: &WorkerSignals) {
        let start = Instant::now();
        let mut seq = 0u64;
        let mut next_tick = start + self.interval;

        loop {
            if signals.stop_requested() {
                break;
            }

            let now = Instant::now();
            if now >= next_tick {
                let tick = Tick {
                    seq,
                    elapsed: now - start,
                };

                // Non-blocking send: if the model is behind, skip the
                // tick instead of queueing a backlog.
                let _ = self.tick_tx.try_send(tick);

                seq += 1;
                next_tick += self.interval;

                // Catch up without queueing if we fell behind.
                if next_tick < now {
                    next_tick = now + self.interval;
                }
            } else {
                // Sleep in short slices so a stop request is honored
                // promptly even with long intervals.
                let until_tick = next_tick - now;
                thread::sleep(until_tick.min(Duration::from_millis(1)));
            }
        }
    }
}
