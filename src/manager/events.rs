use std::sync::mpsc;

use crate::model::{Direction, PaneId};

/// Notifications emitted by the pane manager
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaneEvent {
    Opened(PaneId),
    Closed(PaneId),
    FocusChanged {
        from: Option<PaneId>,
        to: Option<PaneId>,
    },
    /// A navigation or move command found no pane in that direction
    NavigationMiss(Direction),
    /// A pane failed to initialize and was not opened
    PaneFailed { kind: String, error: String },
}

/// Fan-out of events to any number of subscribers. Subscribers that have
/// dropped their receiver are forgotten on the next send.
#[derive(Debug, Default)]
pub struct EventBus {
    senders: Vec<mpsc::Sender<PaneEvent>>,
}

impl EventBus {
    pub fn subscribe(&mut self) -> mpsc::Receiver<PaneEvent> {
        let (tx, rx) = mpsc::channel();
        self.senders.push(tx);
        rx
    }

    pub fn emit(&mut self, event: PaneEvent) {
        self.senders.retain(|tx| tx.send(event.clone()).is_ok());
    }

    pub fn subscriber_count(&self) -> usize {
        self.senders.len()
    }
}

/// Drain every event queued on a receiver without blocking
pub fn drain(rx: &mpsc::Receiver<PaneEvent>) -> Vec<PaneEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}
