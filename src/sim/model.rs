//! Model worker: steps the world once per timer tick and publishes
//! frame snapshots for the view.

use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};

use crate::control::{Tick, Worker, WorkerSignals};

use super::frame::Frame;
use super::world::World;

/// How long the model blocks on the tick channel before re-checking
/// its stop flag.
const TICK_POLL: Duration = Duration::from_millis(100);

/// Worker owning the [`World`] while the simulation runs.
///
/// The world is moved in on start and returned from `run`, so the
/// controller recovers it on `join` and can resume from the same state
/// after a pause.
pub struct ModelWorker {
    world: World,
    tick_rx: Receiver<Tick>,
    frame_tx: Sender<Frame>,
    step_seconds: f32,
}

impl ModelWorker {
    /// Wire a model worker between the timer and the view.
    pub const fn new(
        world: World,
        tick_rx: Receiver<Tick>,
        frame_tx: Sender<Frame>,
        step_seconds: f32,
    ) -> Self {
        Self {
            world,
            tick_rx,
            frame_tx,
            step_seconds,
        }
    }
}

impl Worker for ModelWorker {
    type Output = World;

    fn run(mut self, signals: &WorkerSignals) -> World {
        // Seed the view before the first tick arrives.
        let _ = self.frame_tx.try_send(self.world.frame());

        loop {
            if signals.stop_requested() {
                break;
            }
            match self.tick_rx.recv_timeout(TICK_POLL) {
                Ok(_tick) => {
                    self.world.set_looping(signals.looping());
                    self.world.step(self.step_seconds);
                    // Drop the frame if the view is behind; the next
                    // one supersedes it anyway.
                    let _ = self.frame_tx.try_send(self.world.frame());
                }
                Err(RecvTimeoutError::Timeout) => {}
                // Timer gone: the controller is pausing us.
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        self.world
    }
}
