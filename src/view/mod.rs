//! Presentation layer: canvas, output surfaces, and the view worker.
//!
//! The "View" collaborator behind the controller's worker seam. It
//! only ever consumes [`Frame`](crate::sim::Frame) snapshots — the
//! live world is never shared with it.

mod canvas;
mod surface;
mod worker;

pub use canvas::Canvas;
pub use surface::{HeadlessSurface, Surface, TerminalGuard, TerminalSurface};
pub use worker::ViewWorker;
