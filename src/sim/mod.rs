//! Simulation model: the world, its voyagers, and the model worker.
//!
//! The control core never looks inside this module beyond the
//! [`Worker`](crate::control::Worker) capability set; everything here
//! is the "Model" collaborator behind that seam.

mod frame;
mod model;
mod voyager;
mod world;

pub use frame::{Frame, Sighting, VoyagerMarker};
pub use model::ModelWorker;
pub use voyager::Voyager;
pub use world::World;
