//! # Event bus: ordered, isolated fan-out to long-lived subscribers.
//!
//! [`Bus`] delivers each published [`Event`] to every registered
//! [`Subscriber`](crate::subscribers::Subscriber), **synchronously and in
//! registration order**, on the publishing task. There is no queue between
//! the publisher and a subscriber: when `publish` returns, every subscriber
//! has seen the event.
//!
//! ## Rules
//! - **Ordered**: subscribers run one after another, in the order they were
//!   registered; no interleaving between two publishes on the same task.
//! - **Isolated**: a panicking subscriber is caught and logged; remaining
//!   subscribers still receive the event.
//! - **Long-lived**: there is no unsubscribe; consumers of this core live
//!   for the process lifetime.
//!
//! ## Diagram
//! ```text
//!    publish(&Event)
//!        │
//!        ├─► sub1.handle(&ev).await   (panic → warn, continue)
//!        ├─► sub2.handle(&ev).await
//!        └─► subN.handle(&ev).await
//! ```

use std::sync::{Arc, PoisonError, RwLock};

use futures::FutureExt;

use crate::events::Event;
use crate::subscribers::Subscriber;

/// Process-wide publish/subscribe channel for catalog events.
///
/// Cheap to clone; clones share the same subscriber list.
#[derive(Clone, Default)]
pub struct Bus {
    subscribers: Arc<RwLock<Vec<Arc<dyn Subscriber>>>>,
}

impl Bus {
    /// Creates a bus with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a subscriber. Delivery order follows registration order.
    pub fn subscribe(&self, subscriber: Arc<dyn Subscriber>) {
        self.subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(subscriber);
    }

    /// Delivers an event to all subscribers, in registration order.
    ///
    /// A subscriber that panics is logged and skipped; the rest of the set
    /// still receives the event.
    pub async fn publish(&self, event: &Event) {
        let subscribers: Vec<Arc<dyn Subscriber>> = self
            .subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        for subscriber in subscribers {
            let fut = subscriber.handle(event);
            if let Err(panic_err) = std::panic::AssertUnwindSafe(fut).catch_unwind().await {
                tracing::warn!(
                    subscriber = subscriber.name(),
                    kind = ?event.kind,
                    "subscriber panicked: {panic_err:?}"
                );
            }
        }
    }

    /// Number of registered subscribers.
    pub fn len(&self) -> usize {
        self.subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// True if no subscriber is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct Recorder {
        tag: &'static str,
        log: Arc<Mutex<Vec<&'static str>>>,
    }

    #[async_trait]
    impl Subscriber for Recorder {
        async fn handle(&self, _event: &Event) {
            self.log.lock().unwrap().push(self.tag);
        }

        fn name(&self) -> &'static str {
            self.tag
        }
    }

    struct Panicker;

    #[async_trait]
    impl Subscriber for Panicker {
        async fn handle(&self, _event: &Event) {
            panic!("boom");
        }

        fn name(&self) -> &'static str {
            "panicker"
        }
    }

    struct Counter(AtomicUsize);

    #[async_trait]
    impl Subscriber for Counter {
        async fn handle(&self, _event: &Event) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn test_delivery_in_registration_order() {
        let bus = Bus::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        bus.subscribe(Arc::new(Recorder {
            tag: "first",
            log: log.clone(),
        }));
        bus.subscribe(Arc::new(Recorder {
            tag: "second",
            log: log.clone(),
        }));

        bus.publish(&Event::new(EventKind::CatalogUpdated)).await;
        bus.publish(&Event::new(EventKind::CatalogUpdated)).await;

        assert_eq!(
            *log.lock().unwrap(),
            vec!["first", "second", "first", "second"]
        );
    }

    #[tokio::test]
    async fn test_panicking_subscriber_does_not_block_rest() {
        let bus = Bus::new();
        let counter = Arc::new(Counter(AtomicUsize::new(0)));
        bus.subscribe(Arc::new(Panicker));
        bus.subscribe(counter.clone());

        bus.publish(&Event::new(EventKind::CatalogUpdated)).await;

        assert_eq!(counter.0.load(Ordering::SeqCst), 1);
    }
}
