//! # Crossway
//!
//! A threaded city-traffic simulation driven by an event-based control
//! loop.
//!
//! Three workers run on their own threads — the simulation model, the
//! terminal view, and a tick timer — coordinated by a [`Controller`]
//! that consumes control events ([`Event::Start`], [`Event::Stop`],
//! [`Event::Restart`], [`Event::Close`], [`Event::Loop`]) from a
//! thread-safe queue. Producers anywhere in the process schedule events
//! through a [`Scheduler`]; the control thread applies them strictly in
//! arrival order and is the only thread that ever touches worker
//! lifecycles.
//!
//! ## Example
//!
//! ```rust,ignore
//! use crossway::{Controller, Event, SimOptions};
//!
//! let mut controller = Controller::new("sim-dir".as_ref(), SimOptions::default())?;
//! let scheduler = controller.scheduler();
//! scheduler.schedule(Event::Start)?;
//! // ... some other thread eventually schedules Event::Close ...
//! controller.run()?; // returns once every worker thread is joined
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod config;
pub mod control;
pub mod error;
pub mod input;
pub mod sim;
pub mod view;

// Re-exports for convenience
pub use config::{SimConfig, SimOptions};
pub use control::{Controller, Event, EventQueue, RunState, Scheduler, Worker, WorkerHandle};
pub use error::{ConfigError, ControlError};
pub use input::InputListener;
pub use sim::{Frame, World};
pub use view::TerminalGuard;
