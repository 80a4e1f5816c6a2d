//! Viewer notification channel.

use tokio::sync::broadcast;

const CHANNEL_CAPACITY: usize = 32;

/// Notifications the viewer shell publishes while a document is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerEvent {
    /// The visible page is changing (1-based page number).
    PageChanging { page_number: u32 },
    /// The viewer rotation is changing (degrees, a multiple of 90).
    RotationChanging { rotation: u32 },
}

/// Broadcast bus connecting the viewer shell to interested components.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<ViewerEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    /// Deliver an event to all current subscribers. Events published while
    /// nobody is subscribed are dropped.
    pub fn publish(&self, event: ViewerEvent) {
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ViewerEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn delivers_events_to_subscribers() {
        let bus = EventBus::new();
        let mut first = bus.subscribe();
        let mut second = bus.subscribe();

        bus.publish(ViewerEvent::PageChanging { page_number: 3 });

        let event = ViewerEvent::PageChanging { page_number: 3 };
        assert_eq!(first.recv().await.unwrap(), event);
        assert_eq!(second.recv().await.unwrap(), event);
    }

    #[test]
    fn publishing_without_subscribers_is_a_noop() {
        let bus = EventBus::new();
        bus.publish(ViewerEvent::RotationChanging { rotation: 90 });
    }
}
