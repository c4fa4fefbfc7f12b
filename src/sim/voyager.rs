//! A voyager moving along its configured polyline route.

use crate::config::{GridPoint, VoyagerConfig};

/// Live state of one voyager.
#[derive(Debug, Clone, PartialEq)]
pub struct Voyager {
    config: VoyagerConfig,
    /// Index of the route segment currently being traversed.
    leg: usize,
    /// Distance travelled along the current segment, in cells.
    leg_progress: f32,
    finished: bool,
}

impl Voyager {
    /// Place a voyager at the start of its route.
    pub fn new(config: VoyagerConfig) -> Self {
        // A single-waypoint route is already complete.
        let finished = config.route.len() < 2;
        Self {
            config,
            leg: 0,
            leg_progress: 0.0,
            finished,
        }
    }

    /// Voyager label from the configuration.
    pub fn id(&self) -> &str {
        &self.config.id
    }

    /// Whether the route has been fully traversed.
    pub const fn finished(&self) -> bool {
        self.finished
    }

    /// Advance by `dt` simulated seconds. With `looping` enabled a
    /// finished voyager wraps to the start of its route; otherwise it
    /// holds position at the end.
    pub fn advance(&mut self, dt: f32, looping: bool) {
        if self.finished {
            if !looping || self.config.route.len() < 2 {
                return;
            }
            self.leg = 0;
            self.leg_progress = 0.0;
            self.finished = false;
        }

        let route = &self.config.route;
        let lap: f32 = route
            .windows(2)
            .map(|pair| segment_length(pair[0], pair[1]))
            .sum();
        let mut distance = self.config.speed * dt;
        while distance > 0.0 {
            if self.leg + 1 >= route.len() {
                // Degenerate looping route: nowhere to go.
                if looping && lap > f32::EPSILON {
                    self.leg = 0;
                    self.leg_progress = 0.0;
                    continue;
                }
                self.finished = true;
                self.leg_progress = 0.0;
                break;
            }
            let leg_len = segment_length(route[self.leg], route[self.leg + 1]);
            let remaining = leg_len - self.leg_progress;
            if distance < remaining {
                self.leg_progress += distance;
                break;
            }
            distance -= remaining;
            self.leg += 1;
            self.leg_progress = 0.0;
        }
    }

    /// Current position, interpolated along the active segment.
    pub fn position(&self) -> (f32, f32) {
        let route = &self.config.route;
        if self.leg + 1 >= route.len() {
            let last = route[route.len() - 1];
            return (f32::from(last.x), f32::from(last.y));
        }
        let (from, to) = (route[self.leg], route[self.leg + 1]);
        let leg_len = segment_length(from, to);
        if leg_len <= f32::EPSILON {
            return (f32::from(from.x), f32::from(from.y));
        }
        let t = (self.leg_progress / leg_len).clamp(0.0, 1.0);
        (
            f32::from(from.x) + (f32::from(to.x) - f32::from(from.x)) * t,
            f32::from(from.y) + (f32::from(to.y) - f32::from(from.y)) * t,
        )
    }
}

fn segment_length(a: GridPoint, b: GridPoint) -> f32 {
    let dx = f32::from(b.x) - f32::from(a.x);
    let dy = f32::from(b.y) - f32::from(a.y);
    dx.hypot(dy)
}
