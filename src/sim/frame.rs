//! Immutable snapshots published by the model worker.
//!
//! A frame is a value, not a view into shared state: the model clones
//! what the presentation layer needs and hands it off over a channel,
//! so the view never touches the live world.

/// One voyager's position within a frame.
#[derive(Debug, Clone, PartialEq)]
pub struct VoyagerMarker {
    /// Voyager label.
    pub id: String,
    /// Column, fractional while between cells.
    pub x: f32,
    /// Row, fractional while between cells.
    pub y: f32,
    /// Whether the voyager has completed its route.
    pub finished: bool,
}

/// How many voyagers a dispatcher camera currently sees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sighting {
    /// Camera label.
    pub camera: String,
    /// Voyagers within the camera's range.
    pub count: usize,
}

/// Snapshot of the world after one simulation step.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Ticks applied since the world was (re)built.
    pub tick: u64,
    /// Simulated seconds elapsed.
    pub sim_time: f32,
    /// Whether route looping was active for this step.
    pub looping: bool,
    /// All voyagers.
    pub voyagers: Vec<VoyagerMarker>,
    /// Per-camera voyager counts.
    pub sightings: Vec<Sighting>,
}
