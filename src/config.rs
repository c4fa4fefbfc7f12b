//! Simulation configuration: map layout, dispatcher cameras, voyager
//! definitions, and runtime options.
//!
//! Three JSON files are loaded from the working directory before the
//! controller is constructed: `map.json`, `cameras.json`, and
//! `voyagers.json`. Loading either succeeds with a validated
//! [`SimConfig`] or fails before any worker thread exists.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// File name of the map definition.
pub const MAP_FILE: &str = "map.json";
/// File name of the dispatcher camera definitions.
pub const CAMERAS_FILE: &str = "cameras.json";
/// File name of the voyager definitions.
pub const VOYAGERS_FILE: &str = "voyagers.json";

/// Largest accepted map dimension. Keeps canvas coordinates — which
/// reserve an extra status row above the map — inside `u16`.
pub const MAX_MAP_DIM: u16 = 1024;

/// A point on the map grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridPoint {
    /// Column, 0-based from the left edge.
    pub x: u16,
    /// Row, 0-based from the top edge.
    pub y: u16,
}

/// A street segment between two junctions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreetConfig {
    /// One endpoint.
    pub from: GridPoint,
    /// The other endpoint.
    pub to: GridPoint,
}

/// Map layout: grid dimensions plus the street network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapConfig {
    /// Grid width in cells.
    pub width: u16,
    /// Grid height in cells.
    pub height: u16,
    /// Street segments drawn by the view.
    #[serde(default)]
    pub streets: Vec<StreetConfig>,
}

/// A dispatcher camera watching a square area of the map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Unique camera label.
    pub id: String,
    /// Center of the watched area.
    pub position: GridPoint,
    /// Chebyshev radius of the watched area, in cells.
    pub range: u16,
}

/// A voyager: an object moving along a polyline route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoyagerConfig {
    /// Unique voyager label.
    pub id: String,
    /// Speed in cells per simulated second.
    pub speed: f32,
    /// Route waypoints, visited in order.
    pub route: Vec<GridPoint>,
}

/// The fully parsed simulation configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    /// Map layout.
    pub map: MapConfig,
    /// Dispatcher cameras.
    pub cameras: Vec<CameraConfig>,
    /// Voyagers.
    pub voyagers: Vec<VoyagerConfig>,
}

impl SimConfig {
    /// Load and validate the configuration from `dir`.
    pub fn load(dir: &Path) -> Result<Self, ConfigError> {
        let config = Self {
            map: read_json(&dir.join(MAP_FILE))?,
            cameras: read_json(&dir.join(CAMERAS_FILE))?,
            voyagers: read_json(&dir.join(VOYAGERS_FILE))?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check internal consistency: bounds, routes, speeds, unique ids.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (width, height) = (self.map.width, self.map.height);
        if width == 0 || height == 0 {
            return Err(ConfigError::EmptyMap { width, height });
        }
        if width > MAX_MAP_DIM || height > MAX_MAP_DIM {
            return Err(ConfigError::MapTooLarge {
                width,
                height,
                max: MAX_MAP_DIM,
            });
        }
        let in_bounds = |p: GridPoint| p.x < width && p.y < height;
        let out_of_bounds = |what: String, p: GridPoint| ConfigError::OutOfBounds {
            what,
            x: p.x,
            y: p.y,
            width,
            height,
        };

        for (i, street) in self.map.streets.iter().enumerate() {
            for point in [street.from, street.to] {
                if !in_bounds(point) {
                    return Err(out_of_bounds(format!("street #{i} endpoint"), point));
                }
            }
        }
        for camera in &self.cameras {
            if !in_bounds(camera.position) {
                return Err(out_of_bounds(
                    format!("camera `{}`", camera.id),
                    camera.position,
                ));
            }
        }

        let mut seen = std::collections::HashSet::new();
        for voyager in &self.voyagers {
            if !seen.insert(voyager.id.as_str()) {
                return Err(ConfigError::DuplicateVoyager(voyager.id.clone()));
            }
            if voyager.route.is_empty() {
                return Err(ConfigError::EmptyRoute(voyager.id.clone()));
            }
            if voyager.speed <= 0.0 {
                return Err(ConfigError::BadSpeed {
                    id: voyager.id.clone(),
                    speed: voyager.speed,
                });
            }
            for &point in &voyager.route {
                if !in_bounds(point) {
                    return Err(out_of_bounds(
                        format!("voyager `{}` waypoint", voyager.id),
                        point,
                    ));
                }
            }
        }
        Ok(())
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Runtime options for the controller.
#[derive(Debug, Clone)]
pub struct SimOptions {
    /// Interval between simulation ticks.
    pub tick_interval: Duration,
    /// Simulated seconds advanced per tick.
    pub step_seconds: f32,
    /// Render to a headless surface instead of the terminal.
    pub headless: bool,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(100),
            step_seconds: 0.1,
            headless: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> SimConfig {
        SimConfig {
            map: MapConfig {
                width: 20,
                height: 10,
                streets: vec![StreetConfig {
                    from: GridPoint { x: 0, y: 5 },
                    to: GridPoint { x: 19, y: 5 },
                }],
            },
            cameras: vec![CameraConfig {
                id: "north".into(),
                position: GridPoint { x: 10, y: 2 },
                range: 3,
            }],
            voyagers: vec![VoyagerConfig {
                id: "v1".into(),
                speed: 1.5,
                route: vec![GridPoint { x: 0, y: 5 }, GridPoint { x: 19, y: 5 }],
            }],
        }
    }

    #[test]
    fn valid_config_passes_validation() {
        valid_config().validate().unwrap();
    }

    #[test]
    fn map_json_round_trips() {
        let json = r#"{"width": 20, "height": 10,
                       "streets": [{"from": {"x": 0, "y": 5}, "to": {"x": 19, "y": 5}}]}"#;
        let map: MapConfig = serde_json::from_str(json).unwrap();
        assert_eq!(map, valid_config().map);
    }

    #[test]
    fn missing_streets_default_to_empty() {
        let map: MapConfig = serde_json::from_str(r#"{"width": 4, "height": 4}"#).unwrap();
        assert!(map.streets.is_empty());
    }

    #[test]
    fn zero_sized_map_is_rejected() {
        let mut config = valid_config();
        config.map.height = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyMap { .. })
        ));
    }

    #[test]
    fn oversized_map_is_rejected() {
        let mut config = valid_config();
        config.map.height = u16::MAX;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MapTooLarge { .. })
        ));
    }

    #[test]
    fn out_of_bounds_waypoint_is_rejected() {
        let mut config = valid_config();
        config.voyagers[0].route.push(GridPoint { x: 99, y: 5 });
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn empty_route_is_rejected() {
        let mut config = valid_config();
        config.voyagers[0].route.clear();
        assert!(matches!(config.validate(), Err(ConfigError::EmptyRoute(_))));
    }

    #[test]
    fn non_positive_speed_is_rejected() {
        let mut config = valid_config();
        config.voyagers[0].speed = 0.0;
        assert!(matches!(config.validate(), Err(ConfigError::BadSpeed { .. })));
    }

    #[test]
    fn duplicate_voyager_ids_are_rejected() {
        let mut config = valid_config();
        let dup = config.voyagers[0].clone();
        config.voyagers.push(dup);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DuplicateVoyager(_))
        ));
    }

    #[test]
    fn load_reads_all_three_files() {
        let dir = std::env::temp_dir().join(format!("crossway-config-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let config = valid_config();
        fs::write(
            dir.join(MAP_FILE),
            serde_json::to_string(&config.map).unwrap(),
        )
        .unwrap();
        fs::write(
            dir.join(CAMERAS_FILE),
            serde_json::to_string(&config.cameras).unwrap(),
        )
        .unwrap();
        fs::write(
            dir.join(VOYAGERS_FILE),
            serde_json::to_string(&config.voyagers).unwrap(),
        )
        .unwrap();

        let loaded = SimConfig::load(&dir).unwrap();
        assert_eq!(loaded, config);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn load_fails_on_missing_file() {
        let dir = std::env::temp_dir().join("crossway-config-missing");
        assert!(matches!(
            SimConfig::load(&dir),
            Err(ConfigError::Read { .. })
        ));
    }
}
