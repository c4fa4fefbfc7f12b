//! Control events and the thread-safe queue that carries them.
//!
//! The queue is the single hand-off point between producer threads
//! (input listener, timer, the control loop itself) and the control
//! loop's consumer side. One consumer, any number of producers.

use std::sync::atomic::{AtomicBool, Ordering};

use crossbeam_channel::{unbounded, Receiver, Sender};

use crate::error::ControlError;

/// A control request for the simulation.
///
/// Events carry no payload beyond their tag and are processed strictly
/// in arrival order by the control thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Event {
    /// Start the simulation (from idle) or resume it (from stopped).
    Start,
    /// Pause the simulation; the view keeps the last frame on screen.
    Stop,
    /// Reset the model to its initial configuration and start fresh.
    Restart,
    /// Shut everything down. Irrevocable.
    Close,
    /// Toggle route looping on the model and view.
    Loop,
}

/// Result of waiting on the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dequeued {
    /// The front event, removed from the queue.
    Event(Event),
    /// The queue was shut down and all prior events have been drained.
    Shutdown,
}

/// Wire format inside the channel. The sentinel is ordered FIFO behind
/// every event pushed before `shutdown`, which gives the drain-then-stop
/// guarantee without a second flag check on the consumer side.
enum Envelope {
    Event(Event),
    Shutdown,
}

/// Thread-safe FIFO of control events with blocking wait semantics.
///
/// `push` never blocks (the channel is unbounded) and is rejected with
/// [`ControlError::QueueClosed`] once [`EventQueue::shutdown`] has run.
/// Dequeue is destructive; no event is ever delivered twice.
pub struct EventQueue {
    tx: Sender<Envelope>,
    rx: Receiver<Envelope>,
    closed: AtomicBool,
}

impl EventQueue {
    /// Create an open, empty queue.
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self {
            tx,
            rx,
            closed: AtomicBool::new(false),
        }
    }

    /// Append an event to the back of the queue, waking the consumer if
    /// it is blocked in [`EventQueue::wait_and_pop`].
    pub fn push(&self, event: Event) -> Result<(), ControlError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(ControlError::QueueClosed);
        }
        self.tx
            .send(Envelope::Event(event))
            .map_err(|_| ControlError::QueueClosed)
    }

    /// Block until an event is available or the queue has been shut
    /// down and drained. Once drained, every later call returns the
    /// sentinel immediately.
    pub fn wait_and_pop(&self) -> Dequeued {
        match self.rx.recv() {
            Ok(Envelope::Event(event)) => Dequeued::Event(event),
            Ok(Envelope::Shutdown) | Err(_) => {
                // Put the sentinel back so repeated calls keep seeing it.
                let _ = self.tx.send(Envelope::Shutdown);
                Dequeued::Shutdown
            }
        }
    }

    /// Close the queue. Later pushes fail with `QueueClosed`; events
    /// already queued are still delivered before the shutdown sentinel.
    /// Idempotent.
    pub fn shutdown(&self) {
        if !self.closed.swap(true, Ordering::AcqRel) {
            let _ = self.tx.send(Envelope::Shutdown);
        }
    }

    /// Whether `shutdown` has been called.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn events_pop_in_push_order() {
        let queue = EventQueue::new();
        queue.push(Event::Start).unwrap();
        queue.push(Event::Loop).unwrap();
        queue.push(Event::Stop).unwrap();

        assert_eq!(queue.wait_and_pop(), Dequeued::Event(Event::Start));
        assert_eq!(queue.wait_and_pop(), Dequeued::Event(Event::Loop));
        assert_eq!(queue.wait_and_pop(), Dequeued::Event(Event::Stop));
    }

    #[test]
    fn push_after_shutdown_is_rejected() {
        let queue = EventQueue::new();
        queue.shutdown();
        assert!(matches!(
            queue.push(Event::Start),
            Err(ControlError::QueueClosed)
        ));
        assert!(queue.is_closed());
    }

    #[test]
    fn queued_events_drain_before_sentinel() {
        let queue = EventQueue::new();
        queue.push(Event::Start).unwrap();
        queue.push(Event::Close).unwrap();
        queue.shutdown();

        assert_eq!(queue.wait_and_pop(), Dequeued::Event(Event::Start));
        assert_eq!(queue.wait_and_pop(), Dequeued::Event(Event::Close));
        assert_eq!(queue.wait_and_pop(), Dequeued::Shutdown);
    }

    #[test]
    fn shutdown_is_idempotent() {
        let queue = EventQueue::new();
        queue.shutdown();
        queue.shutdown();
        // The sentinel stays available however often it is popped.
        assert_eq!(queue.wait_and_pop(), Dequeued::Shutdown);
        assert_eq!(queue.wait_and_pop(), Dequeued::Shutdown);
    }

    #[test]
    fn sentinel_repeats_after_drain() {
        let queue = Arc::new(EventQueue::new());
        queue.push(Event::Start).unwrap();
        queue.shutdown();
        assert_eq!(queue.wait_and_pop(), Dequeued::Event(Event::Start));
        assert_eq!(queue.wait_and_pop(), Dequeued::Shutdown);

        // A consumer arriving after the sentinel was already popped
        // must see it too, without blocking.
        let (done_tx, done_rx) = crossbeam_channel::bounded(1);
        let late = {
            let queue = queue.clone();
            thread::spawn(move || {
                done_tx.send(queue.wait_and_pop()).unwrap();
            })
        };
        assert_eq!(
            done_rx.recv_timeout(Duration::from_millis(500)).unwrap(),
            Dequeued::Shutdown
        );
        late.join().unwrap();
    }

    #[test]
    fn shutdown_wakes_blocked_consumer() {
        let queue = Arc::new(EventQueue::new());
        let consumer = {
            let queue = queue.clone();
            thread::spawn(move || queue.wait_and_pop())
        };

        thread::sleep(Duration::from_millis(20));
        queue.shutdown();
        assert_eq!(consumer.join().unwrap(), Dequeued::Shutdown);
    }

    #[test]
    fn concurrent_producers_lose_nothing() {
        let queue = Arc::new(EventQueue::new());
        let producers: Vec<_> = (0..4)
            .map(|_| {
                let queue = queue.clone();
                thread::spawn(move || {
                    for _ in 0..25 {
                        queue.push(Event::Loop).unwrap();
                    }
                })
            })
            .collect();
        for p in producers {
            p.join().unwrap();
        }
        queue.shutdown();

        let mut delivered = 0;
        while queue.wait_and_pop() != Dequeued::Shutdown {
            delivered += 1;
        }
        assert_eq!(delivered, 100);
    }
}
