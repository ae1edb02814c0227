use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use tokio::sync::mpsc;

// Bounded per subscriber; a subscriber that falls this far behind is dropped.
const EVENT_CHANNEL_BUFFER: usize = 256;

pub type EventSender = mpsc::Sender<GameEvent>;
pub type EventReceiver = mpsc::Receiver<GameEvent>;

/// State change notifications for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    CardRevealed {
        position: usize,
        kind: String,
    },
    PairMatched {
        kind: String,
        positions: [usize; 2],
        moves: u32,
    },
    PairMismatched {
        positions: [usize; 2],
        moves: u32,
    },
    CardsConcealed {
        positions: [usize; 2],
    },
    GameCompleted {
        moves: u32,
        best_score: u32,
        new_record: bool,
    },
    GameRestarted {
        round: u32,
    },
}

pub struct EventSubscription {
    bus: EventBus,
    subscriber_id: usize,
    pub receiver: EventReceiver,
}

impl EventSubscription {
    pub fn receiver(&mut self) -> &mut EventReceiver {
        &mut self.receiver
    }

    /// Everything delivered so far, without waiting.
    pub fn drain(&mut self) -> Vec<GameEvent> {
        let mut out = Vec::new();
        while let Ok(ev) = self.receiver.try_recv() {
            out.push(ev);
        }
        out
    }
}

impl Drop for EventSubscription {
    fn drop(&mut self) {
        self.bus.unsubscribe(self.subscriber_id);
    }
}

#[derive(Debug, Clone, Default)]
pub struct EventBus {
    inner: Arc<EventBusInner>,
}

#[derive(Debug, Default)]
struct EventBusInner {
    subscribers: RwLock<Vec<(usize, EventSender)>>,
    next_id: AtomicUsize,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> EventSubscription {
        let (subscriber_id, receiver) = self.subscribe_raw();
        EventSubscription {
            bus: self.clone(),
            subscriber_id,
            receiver,
        }
    }

    fn subscribe_raw(&self) -> (usize, EventReceiver) {
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_BUFFER);
        let id = self.inner.next_id.fetch_add(1, Ordering::AcqRel);
        if let Ok(mut guard) = self.inner.subscribers.write() {
            guard.push((id, tx));
        }
        tracing::debug!(subscriber_id = id, "presentation subscribed to game events");
        (id, rx)
    }

    pub fn broadcast(&self, event: GameEvent) {
        tracing::trace!(event_type = ?event, "broadcasting game event");

        let subscribers = match self.inner.subscribers.read() {
            Ok(guard) => guard.clone(),
            Err(_) => return,
        };

        let mut failed = Vec::new();
        for (id, sender) in subscribers {
            // try_send never blocks the engine; full or closed receivers are pruned
            if let Err(e) = sender.try_send(event.clone()) {
                tracing::warn!(
                    subscriber_id = id,
                    error = ?e,
                    "failed to send event to subscriber"
                );
                failed.push(id);
            }
        }
        if !failed.is_empty() {
            self.remove_subscribers(&failed);
        }
    }

    pub fn unsubscribe(&self, subscriber_id: usize) {
        self.remove_subscribers(&[subscriber_id]);
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner
            .subscribers
            .read()
            .map(|guard| guard.len())
            .unwrap_or(0)
    }

    fn remove_subscribers(&self, ids: &[usize]) {
        if let Ok(mut guard) = self.inner.subscribers.write() {
            guard.retain(|(id, _)| !ids.contains(id));
        }
    }
}
