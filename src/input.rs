//! Input listener: translates key presses into control events.
//!
//! Runs on its own thread, polling crossterm so the control thread is
//! never blocked on the keyboard. A producer, not a worker: it owns no
//! simulation state and exits on its own once the queue closes.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossterm::event::{self, Event as TermEvent, KeyCode, KeyEventKind, KeyModifiers};

use crate::control::{Event, Scheduler};
use crate::error::ControlError;

/// Key bindings:
/// `s`/Enter start, `p`/Space stop, `r` restart, `l` loop,
/// `q`/Esc/Ctrl-C close.
fn event_for_key(code: KeyCode, modifiers: KeyModifiers) -> Option<Event> {
    if modifiers.contains(KeyModifiers::CONTROL) {
        return matches!(code, KeyCode::Char('c')).then_some(Event::Close);
    }
    match code {
        KeyCode::Char('s') | KeyCode::Enter => Some(Event::Start),
        KeyCode::Char('p') | KeyCode::Char(' ') => Some(Event::Stop),
        KeyCode::Char('r') => Some(Event::Restart),
        KeyCode::Char('l') => Some(Event::Loop),
        KeyCode::Char('q') | KeyCode::Esc => Some(Event::Close),
        _ => None,
    }
}

/// Keyboard listener thread scheduling control events.
pub struct InputListener {
    handle: Option<JoinHandle<()>>,
    shutdown: Arc<AtomicBool>,
}

impl InputListener {
    /// Spawn the listener. `poll_timeout` bounds how long the thread
    /// blocks before re-checking its shutdown flag.
    pub fn spawn(scheduler: Scheduler, poll_timeout: Duration) -> std::io::Result<Self> {
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();

        let handle = thread::Builder::new()
            .name("crossway-input".to_owned())
            .spawn(move || {
                Self::run_loop(&scheduler, &shutdown_clone, poll_timeout);
            })?;

        Ok(Self {
            handle: Some(handle),
            shutdown,
        })
    }

    /// Signal the listener to exit.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Release);
    }

    /// Wait for the listener thread to finish.
    pub fn join(mut self) {
        self.shutdown();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    fn run_loop(scheduler: &Scheduler, shutdown: &Arc<AtomicBool>, poll_timeout: Duration) {
        loop {
            if shutdown.load(Ordering::Acquire) {
                break;
            }
            match event::poll(poll_timeout) {
                Ok(true) => match event::read() {
                    Ok(TermEvent::Key(key)) if key.kind == KeyEventKind::Press => {
                        if let Some(control_event) = event_for_key(key.code, key.modifiers) {
                            match scheduler.schedule(control_event) {
                                Ok(()) => {
                                    tracing::debug!(event = ?control_event, "key scheduled");
                                }
                                // Controller terminated; nothing left to do.
                                Err(ControlError::QueueClosed) => break,
                                Err(err) => {
                                    tracing::warn!(%err, "failed to schedule event");
                                }
                            }
                        }
                    }
                    Ok(_) => {}
                    Err(err) => {
                        tracing::warn!(%err, "failed to read terminal event");
                    }
                },
                Ok(false) => {}
                Err(err) => {
                    tracing::warn!(%err, "failed to poll terminal events");
                    thread::sleep(poll_timeout);
                }
            }
        }
    }
}

impl Drop for InputListener {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_bindings_map_to_events() {
        let none = KeyModifiers::empty();
        assert_eq!(event_for_key(KeyCode::Char('s'), none), Some(Event::Start));
        assert_eq!(event_for_key(KeyCode::Enter, none), Some(Event::Start));
        assert_eq!(event_for_key(KeyCode::Char('p'), none), Some(Event::Stop));
        assert_eq!(event_for_key(KeyCode::Char(' '), none), Some(Event::Stop));
        assert_eq!(
            event_for_key(KeyCode::Char('r'), none),
            Some(Event::Restart)
        );
        assert_eq!(event_for_key(KeyCode::Char('l'), none), Some(Event::Loop));
        assert_eq!(event_for_key(KeyCode::Char('q'), none), Some(Event::Close));
        assert_eq!(event_for_key(KeyCode::Esc, none), Some(Event::Close));
        assert_eq!(event_for_key(KeyCode::Char('x'), none), None);
    }

    #[test]
    fn ctrl_c_closes_and_other_ctrl_keys_do_nothing() {
        let ctrl = KeyModifiers::CONTROL;
        assert_eq!(event_for_key(KeyCode::Char('c'), ctrl), Some(Event::Close));
        assert_eq!(event_for_key(KeyCode::Char('s'), ctrl), None);
    }
}
