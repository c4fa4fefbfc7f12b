//! Event-driven control core: queue, worker lifecycle, run states.
//!
//! One control thread consumes the event queue and drives three worker
//! threads; producers only ever touch the queue.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐    Event     ┌─────────────────────────────┐
//! │Input/external│ ───────────▶ │        Control loop          │
//! └──────────────┘  EventQueue  │  RunStateMachine.apply(...)  │
//!                               │  start / request_stop / join │
//!                               └──┬──────────┬──────────┬────┘
//!                                  ▼          ▼          ▼
//!                             ┌───────┐  ┌───────┐  ┌───────┐
//!                             │ Timer │  │ Model │  │ View  │
//!                             └───┬───┘  └──┬─┬──┘  └───▲───┘
//!                                 │  Tick   │ │  Frame  │
//!                                 └─────────┘ └─────────┘
//! ```

mod controller;
mod event;
mod state;
mod timer;
mod worker;

pub use controller::{Controller, Scheduler};
pub use event::{Dequeued, Event, EventQueue};
pub use state::{RunState, RunStateMachine};
pub use timer::{Tick, TimerWorker};
pub use worker::{Worker, WorkerHandle, WorkerSignals};
