//! Controller: owns the event queue, the three worker handles, and the
//! run-state machine, and runs the consume loop that ties them together.

use std::path::Path;
use std::sync::Arc;

use crossbeam_channel::{bounded, Sender};

use crate::config::{SimConfig, SimOptions};
use crate::error::{ConfigError, ControlError};
use crate::sim::{Frame, ModelWorker, World};
use crate::view::{Canvas, HeadlessSurface, TerminalSurface, ViewWorker};

use super::event::{Dequeued, Event, EventQueue};
use super::state::{Directive, RunState, RunStateMachine};
use super::timer::TimerWorker;
use super::worker::WorkerHandle;

/// Tick channel depth: one pending tick is enough, extras are skipped.
const TICK_BUFFER: usize = 1;
/// Frame channel depth: small, the view always skips to the newest.
const FRAME_BUFFER: usize = 2;

/// Cloneable producer-side handle for scheduling control events.
///
/// Any thread may hold one: the input listener, the timer worker, or
/// external callers. After the controller terminates, scheduling fails
/// with [`ControlError::QueueClosed`].
#[derive(Clone)]
pub struct Scheduler {
    queue: Arc<EventQueue>,
}

impl Scheduler {
    /// Queue an event for the control loop.
    pub fn schedule(&self, event: Event) -> Result<(), ControlError> {
        self.queue.push(event)
    }
}

/// Coordinates the model, view, and timer workers according to the
/// control events it dequeues.
///
/// Constructed once per process run, after the configuration has been
/// parsed; destroyed only after every started worker thread has been
/// joined.
pub struct Controller {
    queue: Arc<EventQueue>,
    machine: RunStateMachine,
    model: WorkerHandle<World>,
    view: WorkerHandle<()>,
    timer: WorkerHandle<()>,
    /// World state parked here whenever the model thread is not running.
    world: Option<World>,
    /// Pristine configuration, the reset target for `Restart`.
    config: SimConfig,
    options: SimOptions,
    /// Producer side of the frame channel, kept so the model can be
    /// paused and resumed without tearing down the view.
    frame_tx: Option<Sender<Frame>>,
}

impl Controller {
    /// Load the configuration from `dir` and build an idle controller.
    pub fn new(dir: &Path, options: SimOptions) -> Result<Self, ConfigError> {
        let config = SimConfig::load(dir)?;
        Ok(Self::from_config(config, options))
    }

    /// Build an idle controller from an already-validated configuration.
    pub fn from_config(config: SimConfig, options: SimOptions) -> Self {
        Self {
            queue: Arc::new(EventQueue::new()),
            machine: RunStateMachine::new(),
            model: WorkerHandle::new("model"),
            view: WorkerHandle::new("view"),
            timer: WorkerHandle::new("timer"),
            world: Some(World::new(&config)),
            config,
            options,
            frame_tx: None,
        }
    }

    /// Producer handle for scheduling events from other threads.
    pub fn scheduler(&self) -> Scheduler {
        Scheduler {
            queue: self.queue.clone(),
        }
    }

    /// Queue a control event. Thin wrapper over the event queue.
    pub fn schedule_event(&self, event: Event) -> Result<(), ControlError> {
        self.queue.push(event)
    }

    /// Current run state.
    pub const fn state(&self) -> RunState {
        self.machine.state()
    }

    /// Main consume loop: block on the queue, apply each event, exit on
    /// the shutdown sentinel. On return no worker thread remains alive.
    pub fn run(&mut self) -> Result<(), ControlError> {
        tracing::info!("control loop started");
        loop {
            match self.queue.wait_and_pop() {
                Dequeued::Event(event) => self.process(event)?,
                Dequeued::Shutdown => break,
            }
        }
        // The only point guaranteeing every worker has been joined.
        self.stop_and_join_all()?;
        tracing::info!("control loop finished");
        Ok(())
    }

    /// Apply one event and carry out the resulting side effect.
    fn process(&mut self, event: Event) -> Result<(), ControlError> {
        let directive = self.machine.apply(event);
        tracing::debug!(?event, ?directive, state = ?self.machine.state(), "event processed");
        match directive {
            Directive::StartWorkers => self.start_all()?,
            Directive::PauseWorkers => self.pause()?,
            Directive::ResumeWorkers => self.resume()?,
            Directive::RestartWorkers => self.restart()?,
            Directive::ToggleLooping => {
                let enabled = self.model.toggle_looping();
                self.view.set_looping(enabled);
                tracing::info!(enabled, "looping toggled");
            }
            Directive::Shutdown => {
                self.stop_and_join_all()?;
                self.queue.shutdown();
                self.machine.finish_close();
                tracing::info!("simulation closed");
            }
            Directive::Ignore => {}
        }
        Ok(())
    }

    /// First start from idle: spawn the timer, model, and view.
    fn start_all(&mut self) -> Result<(), ControlError> {
        let (frame_tx, frame_rx) = bounded(FRAME_BUFFER);
        self.frame_tx = Some(frame_tx);
        self.start_sim_workers()?;
        let canvas = Canvas::scene(&self.config.map, &self.config.cameras);
        if self.options.headless {
            self.view
                .start(ViewWorker::new(frame_rx, canvas, HeadlessSurface::default()))?;
        } else {
            self.view
                .start(ViewWorker::new(frame_rx, canvas, TerminalSurface::new()))?;
        }
        tracing::info!("simulation started");
        Ok(())
    }

    /// Stop and join the model and timer; the view keeps rendering the
    /// last frame it received.
    fn pause(&mut self) -> Result<(), ControlError> {
        self.timer.request_stop();
        self.model.request_stop();
        self.timer.join()?;
        if let Some(world) = self.model.join()? {
            self.world = Some(world);
        }
        tracing::info!("simulation stopped");
        Ok(())
    }

    /// Restart the model and timer with the preserved world state.
    fn resume(&mut self) -> Result<(), ControlError> {
        if self.frame_tx.is_none() {
            // Resume without a live view; start one so frames land somewhere.
            return self.start_all();
        }
        self.start_sim_workers()?;
        tracing::info!("simulation resumed");
        Ok(())
    }

    /// Tear everything down, rebuild the world from the pristine
    /// configuration, and start fresh workers. Looping is reset.
    fn restart(&mut self) -> Result<(), ControlError> {
        self.stop_and_join_all()?;
        self.world = Some(World::new(&self.config));
        self.model.set_looping(false);
        self.view.set_looping(false);
        self.frame_tx = None;
        tracing::info!("simulation restarting from initial configuration");
        self.start_all()
    }

    /// Spawn the timer and model around a fresh tick channel.
    fn start_sim_workers(&mut self) -> Result<(), ControlError> {
        let world = self.take_world();
        let (tick_tx, tick_rx) = bounded(TICK_BUFFER);
        self.timer
            .start(TimerWorker::new(tick_tx, self.options.tick_interval))?;
        let frame_tx = self
            .frame_tx
            .as_ref()
            .map_or_else(|| bounded(FRAME_BUFFER).0, Sender::clone);
        self.model.start(ModelWorker::new(
            world,
            tick_rx,
            frame_tx,
            self.options.step_seconds,
        ))
    }

    /// Take the parked world, rebuilding it if it was lost to a panic.
    fn take_world(&mut self) -> World {
        self.world.take().unwrap_or_else(|| {
            tracing::warn!("world state missing; rebuilding from configuration");
            World::new(&self.config)
        })
    }

    /// Request a stop on all three workers, then join them all.
    fn stop_and_join_all(&mut self) -> Result<(), ControlError> {
        self.timer.request_stop();
        self.model.request_stop();
        self.view.request_stop();
        self.timer.join()?;
        if let Some(world) = self.model.join()? {
            self.world = Some(world);
        }
        self.view.join()?;
        Ok(())
    }
}

impl Drop for Controller {
    fn drop(&mut self) {
        // Idempotent after run(); covers early exits on error paths.
        let _ = self.stop_and_join_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CameraConfig, GridPoint, MapConfig, VoyagerConfig};
    use std::time::Duration;

    fn config() -> SimConfig {
        SimConfig {
            map: MapConfig {
                width: 20,
                height: 10,
                streets: Vec::new(),
            },
            cameras: vec![CameraConfig {
                id: "gate".into(),
                position: GridPoint { x: 0, y: 0 },
                range: 2,
            }],
            voyagers: vec![VoyagerConfig {
                id: "v1".into(),
                speed: 1.0,
                route: vec![GridPoint { x: 0, y: 0 }, GridPoint { x: 10, y: 0 }],
            }],
        }
    }

    /// Headless options with a tick interval long enough that the model
    /// never steps during a test, keeping world state deterministic.
    fn options() -> SimOptions {
        SimOptions {
            tick_interval: Duration::from_secs(3600),
            step_seconds: 0.1,
            headless: true,
        }
    }

    fn run_scripted(events: &[Event]) -> Controller {
        let mut controller = Controller::from_config(config(), options());
        for &event in events {
            controller.schedule_event(event).unwrap();
        }
        controller.run().unwrap();
        controller
    }

    #[test]
    fn full_scenario_terminates_with_all_workers_joined() {
        let controller = run_scripted(&[
            Event::Start,
            Event::Loop,
            Event::Stop,
            Event::Start,
            Event::Close,
        ]);
        assert_eq!(controller.state(), RunState::Terminated);
        assert!(!controller.model.is_running());
        assert!(!controller.view.is_running());
        assert!(!controller.timer.is_running());
        assert!(controller.world.is_some());
    }

    #[test]
    fn duplicate_start_is_harmless() {
        // A second StartWorkers directive would fail with AlreadyRunning;
        // run() returning Ok proves the duplicate was absorbed as a no-op.
        let controller = run_scripted(&[Event::Start, Event::Start, Event::Close]);
        assert_eq!(controller.state(), RunState::Terminated);
    }

    #[test]
    fn restart_resets_the_world_and_looping() {
        let controller = run_scripted(&[Event::Start, Event::Loop, Event::Restart, Event::Close]);
        assert_eq!(controller.state(), RunState::Terminated);
        assert_eq!(controller.world, Some(World::new(&controller.config)));
        assert!(!controller.model.looping());
        assert!(!controller.view.looping());
    }

    #[test]
    fn stop_parks_the_world_and_start_resumes_it() {
        let controller = run_scripted(&[Event::Start, Event::Stop, Event::Start, Event::Close]);
        assert_eq!(controller.state(), RunState::Terminated);
        // The same world instance survived the pause/resume cycle.
        assert_eq!(controller.world, Some(World::new(&controller.config)));
    }

    #[test]
    fn scheduling_after_close_is_rejected() {
        let controller = run_scripted(&[Event::Close]);
        assert!(matches!(
            controller.schedule_event(Event::Start),
            Err(ControlError::QueueClosed)
        ));
        assert!(matches!(
            controller.scheduler().schedule(Event::Start),
            Err(ControlError::QueueClosed)
        ));
    }

    #[test]
    fn close_while_stopped_terminates_cleanly() {
        let controller = run_scripted(&[Event::Start, Event::Stop, Event::Close]);
        assert_eq!(controller.state(), RunState::Terminated);
        assert!(!controller.view.is_running());
    }

    #[test]
    fn events_after_close_in_the_queue_are_ignored() {
        // Close shuts the queue; the trailing events were queued before
        // shutdown, so they drain through the loop as no-ops.
        let controller = run_scripted(&[Event::Start, Event::Close, Event::Start, Event::Loop]);
        assert_eq!(controller.state(), RunState::Terminated);
    }
}
