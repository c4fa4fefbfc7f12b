//! View worker: presents the most recent frame on its surface.

use std::thread;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError};

use crate::control::{Worker, WorkerSignals};
use crate::sim::Frame;

use super::canvas::{Canvas, FINISHED_CHAR, VOYAGER_CHAR};
use super::surface::Surface;

/// How long the view blocks on the frame channel before re-checking
/// its stop flag.
const FRAME_POLL: Duration = Duration::from_millis(100);

/// Worker that renders frames published by the model.
///
/// While the simulation is paused no frames arrive and the worker
/// simply keeps the last one on screen; it is only stopped on restart
/// or close.
pub struct ViewWorker<S: Surface> {
    frame_rx: Receiver<Frame>,
    canvas: Canvas,
    surface: S,
}

impl<S: Surface> ViewWorker<S> {
    /// Create a view around a scene canvas and an output surface.
    pub const fn new(frame_rx: Receiver<Frame>, canvas: Canvas, surface: S) -> Self {
        Self {
            frame_rx,
            canvas,
            surface,
        }
    }

    fn draw(&mut self, frame: &Frame) {
        self.canvas.reset();

        let finished = frame.voyagers.iter().filter(|v| v.finished).count();
        let mut status = format!(
            "t={:>6.1}s  tick={:<6}  voyagers={} ({} done)  loop={}",
            frame.sim_time,
            frame.tick,
            frame.voyagers.len(),
            finished,
            if frame.looping { "on" } else { "off" },
        );
        for sighting in &frame.sightings {
            status.push_str(&format!("  [{}:{}]", sighting.camera, sighting.count));
        }
        self.canvas.draw_text(0, 0, &status);

        for marker in &frame.voyagers {
            let x = marker.x.round() as u16;
            let y = marker.y.round() as u16;
            let ch = if marker.finished {
                FINISHED_CHAR
            } else {
                VOYAGER_CHAR
            };
            self.canvas.set(x, y + 1, ch);
        }

        if let Err(err) = self.surface.present(&self.canvas) {
            tracing::warn!(%err, "failed to present frame");
        }
    }
}

impl<S: Surface> Worker for ViewWorker<S> {
    type Output = ();

    fn run(mut self, signals: &WorkerSignals) {
        loop {
            if signals.stop_requested() {
                break;
            }
            match self.frame_rx.recv_timeout(FRAME_POLL) {
                Ok(frame) => {
                    // Skip ahead to the newest pending frame.
                    let frame = self.frame_rx.try_iter().last().unwrap_or(frame);
                    self.draw(&frame);
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    // No producer; hold the last frame until stopped.
                    thread::sleep(FRAME_POLL);
                }
            }
        }
    }
}
