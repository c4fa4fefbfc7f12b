//! Error types for the control core and configuration loading.
//!
//! Control-loop errors are split from configuration errors: the former
//! indicate lifecycle problems at runtime, the latter stop the
//! controller from being constructed at all.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors from the event queue and worker lifecycle.
#[derive(Error, Debug)]
pub enum ControlError {
    /// `push` was attempted after the queue was shut down. Non-fatal:
    /// producers are expected to see this once the controller closes.
    #[error("event queue is closed")]
    QueueClosed,

    /// `start` was called on a handle whose prior thread was never
    /// joined. This is a controller invariant violation, not a user
    /// condition, and is propagated as fatal.
    #[error("worker `{0}` is already running")]
    AlreadyRunning(&'static str),

    /// A worker thread panicked; its output value is lost.
    #[error("worker `{0}` panicked")]
    WorkerPanicked(&'static str),

    /// The OS refused to spawn a worker thread.
    #[error("failed to spawn worker `{name}`")]
    Spawn {
        /// Name of the worker that could not be spawned.
        name: &'static str,
        /// Underlying OS error.
        #[source]
        source: io::Error,
    },
}

/// Errors while loading the simulation configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A configuration file could not be read.
    #[error("failed to read {path}")]
    Read {
        /// Path of the unreadable file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A configuration file contained invalid JSON.
    #[error("failed to parse {path}")]
    Parse {
        /// Path of the malformed file.
        path: PathBuf,
        /// Underlying serde error.
        #[source]
        source: serde_json::Error,
    },

    /// The map dimensions are zero in either axis.
    #[error("map must be at least 1x1, got {width}x{height}")]
    EmptyMap {
        /// Configured width.
        width: u16,
        /// Configured height.
        height: u16,
    },

    /// The map dimensions exceed what the view can address.
    #[error("map {width}x{height} exceeds the maximum dimension {max}")]
    MapTooLarge {
        /// Configured width.
        width: u16,
        /// Configured height.
        height: u16,
        /// Largest accepted dimension.
        max: u16,
    },

    /// A street endpoint or camera lies outside the map bounds.
    #[error("{what} at ({x}, {y}) is outside the {width}x{height} map")]
    OutOfBounds {
        /// Description of the offending element.
        what: String,
        /// X coordinate.
        x: u16,
        /// Y coordinate.
        y: u16,
        /// Map width.
        width: u16,
        /// Map height.
        height: u16,
    },

    /// A voyager was configured without any route points.
    #[error("voyager `{0}` has an empty route")]
    EmptyRoute(String),

    /// A voyager's speed is zero or negative.
    #[error("voyager `{id}` has non-positive speed {speed}")]
    BadSpeed {
        /// Voyager identifier.
        id: String,
        /// Configured speed.
        speed: f32,
    },

    /// Two voyagers share the same identifier.
    #[error("duplicate voyager id `{0}`")]
    DuplicateVoyager(String),
}
