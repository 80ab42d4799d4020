//! Typed publish/subscribe between the gallery surface and its controllers.
//!
//! - The surface (or embedding app) publishes container and pointer events
//! - Subscribers receive every event through their own flume inbox
//! - Subscribing returns an id that must be handed back to `unsubscribe`

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use flume::Sender;
use parking_lot::Mutex;
use tokio::time::Instant;
use tracing::trace;

use super::navigation::NavigationInput;

/// Events flowing into a theme controller.
#[derive(Debug, Clone, PartialEq)]
pub enum GalleryEvent {
    /// The container changed size; the payload is its new outer width.
    Resized { width: f32 },
    /// Items are about to be replaced.
    ReloadStarted,
    /// The new item set is available from the surface.
    ReloadCompleted,
    /// A tile of the visible pane was clicked.
    TileClicked { slot: usize },
    Navigation(NavigationInput),
    PointerEntered,
    PointerLeft,
    /// Emitted by the autoplay timer task.
    AutoplayTick { generation: u64, fired_at: Instant },
    /// Stop the controller's run loop.
    Shutdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Cloneable fan-out bus; clones share the same subscriber list.
#[derive(Debug, Clone, Default)]
pub struct EventBus {
    subscribers: Arc<Mutex<Vec<(SubscriptionId, Sender<GalleryEvent>)>>>,
    next_id: Arc<AtomicU64>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, sender: Sender<GalleryEvent>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.subscribers.lock().push((id, sender));
        trace!(?id, "Subscribed to gallery events");
        id
    }

    /// Returns false if `id` was not subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers.lock();
        let before = subscribers.len();
        subscribers.retain(|(sub_id, _)| *sub_id != id);
        let removed = subscribers.len() != before;
        if removed {
            trace!(?id, "Unsubscribed from gallery events");
        }
        removed
    }

    /// Delivers `event` to every live subscriber and returns how many got it.
    /// Subscribers whose inbox has been dropped are removed.
    pub fn publish(&self, event: GalleryEvent) -> usize {
        let mut subscribers = self.subscribers.lock();
        subscribers.retain(|(_, sender)| sender.send(event.clone()).is_ok());
        subscribers.len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().len()
    }
}
