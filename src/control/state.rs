//! Run-state machine interpreting control events.
//!
//! Only the control thread applies transitions, so the machine needs no
//! internal locking: the event queue's hand-off is the sole
//! synchronization primitive. Unhandled (state, event) pairs are
//! deliberate no-ops — duplicate user commands are expected, and the
//! double-command protection lives here rather than in the UI.

use super::event::Event;

/// Lifecycle phase of the controller. This is the only field that
/// determines whether worker threads should be alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Constructed, no workers started yet.
    Idle,
    /// Model, view and timer workers are running.
    Running,
    /// Model and timer are paused; the view holds the last frame.
    Stopped,
    /// Close received; workers are being wound down.
    Closing,
    /// Final state: all workers joined, queue shut down.
    Terminated,
}

/// Side effect the controller must perform for an applied transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Directive {
    /// First start from idle: spawn all three workers.
    StartWorkers,
    /// Pause: stop and join model and timer, keep the view alive.
    PauseWorkers,
    /// Resume from stopped with the preserved model state.
    ResumeWorkers,
    /// Stop and join everything, rebuild the model from the pristine
    /// configuration, spawn fresh workers.
    RestartWorkers,
    /// Flip the looping flag on model and view; state is unchanged.
    ToggleLooping,
    /// Wind down all workers and shut the queue; the machine reaches
    /// `Terminated` once the controller confirms via `finish_close`.
    Shutdown,
    /// No transition for this (state, event) pair; log and move on.
    Ignore,
}

/// Holds the current [`RunState`] and maps dequeued events to the side
/// effects the controller must carry out.
#[derive(Debug)]
pub struct RunStateMachine {
    state: RunState,
}

impl RunStateMachine {
    /// Start in [`RunState::Idle`].
    pub const fn new() -> Self {
        Self {
            state: RunState::Idle,
        }
    }

    /// Current state.
    pub const fn state(&self) -> RunState {
        self.state
    }

    /// Apply one event, advancing the state and returning the side
    /// effect to perform. The match is exhaustive over the closed event
    /// set, so an unhandled combination cannot slip in silently.
    pub(crate) fn apply(&mut self, event: Event) -> Directive {
        use RunState::{Closing, Idle, Running, Stopped, Terminated};

        let directive = match (self.state, event) {
            (Idle, Event::Start) => {
                self.state = Running;
                Directive::StartWorkers
            }
            (Running, Event::Stop) => {
                self.state = Stopped;
                Directive::PauseWorkers
            }
            (Stopped, Event::Start) => {
                self.state = Running;
                Directive::ResumeWorkers
            }
            (Running | Stopped, Event::Restart) => {
                self.state = Running;
                Directive::RestartWorkers
            }
            (Running | Stopped, Event::Loop) => Directive::ToggleLooping,
            (Idle | Running | Stopped, Event::Close) => {
                self.state = Closing;
                Directive::Shutdown
            }
            // Everything else: duplicate or out-of-phase commands.
            (Idle | Running | Stopped | Closing | Terminated, _) => Directive::Ignore,
        };

        if directive == Directive::Ignore {
            tracing::info!(?event, state = ?self.state, "event ignored in current state");
        }
        directive
    }

    /// Confirm the close sequence finished: all workers joined and the
    /// queue shut down. Only meaningful in [`RunState::Closing`].
    pub(crate) fn finish_close(&mut self) {
        debug_assert_eq!(self.state, RunState::Closing);
        self.state = RunState::Terminated;
    }
}

impl Default for RunStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Drive the machine the way the controller does: a `Shutdown`
    /// directive is followed by `finish_close` once workers are joined.
    fn drive(machine: &mut RunStateMachine, event: Event) -> Directive {
        let directive = machine.apply(event);
        if directive == Directive::Shutdown {
            machine.finish_close();
        }
        directive
    }

    #[test]
    fn start_loop_stop_start_close_scenario() {
        let mut machine = RunStateMachine::new();
        let events = [
            Event::Start,
            Event::Loop,
            Event::Stop,
            Event::Start,
            Event::Close,
        ];
        let states: Vec<RunState> = events
            .iter()
            .map(|&event| {
                drive(&mut machine, event);
                machine.state()
            })
            .collect();
        assert_eq!(
            states,
            [
                RunState::Running,
                RunState::Running,
                RunState::Stopped,
                RunState::Running,
                RunState::Terminated,
            ]
        );
    }

    #[test]
    fn duplicate_start_is_a_noop() {
        let mut machine = RunStateMachine::new();
        assert_eq!(machine.apply(Event::Start), Directive::StartWorkers);
        assert_eq!(machine.apply(Event::Start), Directive::Ignore);
        assert_eq!(machine.state(), RunState::Running);
    }

    #[test]
    fn stop_while_idle_is_a_noop() {
        let mut machine = RunStateMachine::new();
        assert_eq!(machine.apply(Event::Stop), Directive::Ignore);
        assert_eq!(machine.apply(Event::Loop), Directive::Ignore);
        assert_eq!(machine.state(), RunState::Idle);
    }

    #[test]
    fn loop_is_state_neutral() {
        let mut machine = RunStateMachine::new();
        machine.apply(Event::Start);
        assert_eq!(machine.apply(Event::Loop), Directive::ToggleLooping);
        assert_eq!(machine.state(), RunState::Running);

        machine.apply(Event::Stop);
        assert_eq!(machine.apply(Event::Loop), Directive::ToggleLooping);
        assert_eq!(machine.state(), RunState::Stopped);
    }

    #[test]
    fn restart_runs_from_running_and_stopped() {
        let mut machine = RunStateMachine::new();
        machine.apply(Event::Start);
        assert_eq!(machine.apply(Event::Restart), Directive::RestartWorkers);
        assert_eq!(machine.state(), RunState::Running);

        machine.apply(Event::Stop);
        assert_eq!(machine.apply(Event::Restart), Directive::RestartWorkers);
        assert_eq!(machine.state(), RunState::Running);
    }

    #[test]
    fn close_is_irrevocable() {
        let mut machine = RunStateMachine::new();
        machine.apply(Event::Start);
        drive(&mut machine, Event::Close);
        assert_eq!(machine.state(), RunState::Terminated);

        for event in [Event::Start, Event::Stop, Event::Restart, Event::Loop] {
            assert_eq!(machine.apply(event), Directive::Ignore);
            assert_eq!(machine.state(), RunState::Terminated);
        }
    }

    #[test]
    fn close_works_from_every_live_state() {
        for setup in [&[][..], &[Event::Start][..], &[Event::Start, Event::Stop][..]] {
            let mut machine = RunStateMachine::new();
            for &event in setup {
                machine.apply(event);
            }
            assert_eq!(machine.apply(Event::Close), Directive::Shutdown);
            machine.finish_close();
            assert_eq!(machine.state(), RunState::Terminated);
        }
    }
}
