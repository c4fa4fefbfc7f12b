//! The simulation world: map, voyagers, and dispatcher cameras.
//!
//! The world is a plain value. It is moved into the model worker's
//! thread while the simulation runs and recovered through `join` when
//! it pauses, so exactly one thread ever mutates it.

use crate::config::{CameraConfig, MapConfig, SimConfig};

use super::frame::{Frame, Sighting, VoyagerMarker};
use super::voyager::Voyager;

/// Complete simulation state, rebuilt from [`SimConfig`] on restart.
#[derive(Debug, Clone, PartialEq)]
pub struct World {
    map: MapConfig,
    cameras: Vec<CameraConfig>,
    voyagers: Vec<Voyager>,
    looping: bool,
    ticks: u64,
    sim_time: f32,
}

impl World {
    /// Build the initial world from a validated configuration.
    pub fn new(config: &SimConfig) -> Self {
        Self {
            map: config.map.clone(),
            cameras: config.cameras.clone(),
            voyagers: config
                .voyagers
                .iter()
                .cloned()
                .map(Voyager::new)
                .collect(),
            looping: false,
            ticks: 0,
            sim_time: 0.0,
        }
    }

    /// Number of steps applied since construction.
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Simulated seconds elapsed since construction.
    pub const fn sim_time(&self) -> f32 {
        self.sim_time
    }

    /// Set the looping policy applied by subsequent steps.
    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    /// Advance every voyager by `dt` simulated seconds.
    pub fn step(&mut self, dt: f32) {
        self.ticks += 1;
        self.sim_time += dt;
        for voyager in &mut self.voyagers {
            voyager.advance(dt, self.looping);
        }
    }

    /// Snapshot the current state for the presentation layer.
    pub fn frame(&self) -> Frame {
        let voyagers: Vec<VoyagerMarker> = self
            .voyagers
            .iter()
            .map(|voyager| {
                let (x, y) = voyager.position();
                VoyagerMarker {
                    id: voyager.id().to_owned(),
                    x,
                    y,
                    finished: voyager.finished(),
                }
            })
            .collect();

        let sightings = self
            .cameras
            .iter()
            .map(|camera| Sighting {
                camera: camera.id.clone(),
                count: voyagers
                    .iter()
                    .filter(|marker| camera_sees(camera, marker.x, marker.y))
                    .count(),
            })
            .collect();

        Frame {
            tick: self.ticks,
            sim_time: self.sim_time,
            looping: self.looping,
            voyagers,
            sightings,
        }
    }
}

/// Chebyshev-distance check against the camera's watched square.
fn camera_sees(camera: &CameraConfig, x: f32, y: f32) -> bool {
    let dx = (x - f32::from(camera.position.x)).abs();
    let dy = (y - f32::from(camera.position.y)).abs();
    dx.max(dy) <= f32::from(camera.range)
}
