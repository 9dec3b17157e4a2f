//! Channel-based event delivery for multi-threaded hosts
//!
//! Platform callbacks may fire on any thread. They post [`CompassEvent`]s
//! through cloneable [`EventSender`]s, and the thread owning the
//! [`QiblaCompass`](crate::QiblaCompass) drains the [`EventQueue`] with
//! [`pump`](crate::QiblaCompass::pump). The compass state therefore has a
//! single writer and needs no locks.

use crate::activation::PermissionResult;
use crate::platform::{LocationResult, SessionId};
use crate::types::RawOrientationSample;
use std::sync::mpsc::{self, Receiver, Sender};

/// A state change request for the compass
#[derive(Debug, Clone, PartialEq)]
pub enum CompassEvent {
    Activate,
    PermissionResolved {
        session: SessionId,
        result: PermissionResult,
    },
    LocationResolved {
        session: SessionId,
        result: LocationResult,
    },
    Orientation {
        session: SessionId,
        sample: RawOrientationSample,
    },
    Deactivate,
}

/// Cloneable producer side of an [`EventQueue`]
#[derive(Debug, Clone)]
pub struct EventSender {
    sender: Sender<CompassEvent>,
}

impl EventSender {
    /// Post an event, returning `false` once the queue has been dropped
    pub fn send(&self, event: CompassEvent) -> bool {
        self.sender.send(event).is_ok()
    }

    pub fn permission(&self, session: SessionId, result: PermissionResult) -> bool {
        self.send(CompassEvent::PermissionResolved { session, result })
    }

    pub fn location(&self, session: SessionId, result: LocationResult) -> bool {
        self.send(CompassEvent::LocationResolved { session, result })
    }

    pub fn orientation(&self, session: SessionId, sample: RawOrientationSample) -> bool {
        self.send(CompassEvent::Orientation { session, sample })
    }
}

/// Single-consumer queue of compass events
#[derive(Debug)]
pub struct EventQueue {
    sender: Sender<CompassEvent>,
    receiver: Receiver<CompassEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self { sender, receiver }
    }

    /// New producer handle for this queue
    pub fn sender(&self) -> EventSender {
        EventSender {
            sender: self.sender.clone(),
        }
    }

    /// Next queued event without blocking
    pub fn try_next(&self) -> Option<CompassEvent> {
        self.receiver.try_recv().ok()
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
    use std::thread;

    #[test]
    fn test_events_preserve_order() {
        let queue = EventQueue::new();
        let sender = queue.sender();
        let session = SessionId::new(1);

        sender.orientation(session, RawOrientationSample::from_alpha(10.0, true));
        sender.location(session, Err("timeout".to_string()));
        sender.send(CompassEvent::Deactivate);

        assert!(matches!(queue.try_next(), Some(CompassEvent::Orientation { .. })));
        assert!(matches!(queue.try_next(), Some(CompassEvent::LocationResolved { .. })));
        assert_eq!(queue.try_next(), Some(CompassEvent::Deactivate));
        assert_eq!(queue.try_next(), None);
    }

    #[test]
    fn test_senders_across_threads() {
        let queue = EventQueue::new();
        let session = SessionId::new(7);

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let sender = queue.sender();
                thread::spawn(move || {
                    for j in 0..25 {
                        let alpha = (i * 25 + j) as f64;
                        sender.orientation(session, RawOrientationSample::from_alpha(alpha, true));
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let mut received = 0;
        while queue.try_next().is_some() {
            received += 1;
        }
        assert_eq!(received, 100);
    }
}
