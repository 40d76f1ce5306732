//! # Core subscriber trait
//!
//! `Subscriber` is the extension point for plugging consumers into the
//! [`Bus`](crate::events::Bus). Delivery is synchronous and in registration
//! order on the publishing task, so implementations should stay quick;
//! anything slow belongs behind its own channel.
//!
//! ## Contract
//! - `handle` is awaited to completion before the next subscriber runs.
//! - Panics are caught by the bus and logged; they never reach other
//!   subscribers or the publisher.
//! - Subscribers are long-lived; there is no unsubscribe.

use async_trait::async_trait;

use crate::events::Event;

/// Contract for event subscribers.
///
/// Called on the publishing task. Implementations should avoid blocking the
/// async runtime (prefer async I/O and cooperative waits).
#[async_trait]
pub trait Subscriber: Send + Sync + 'static {
    /// Handles a single event.
    ///
    /// # Parameters
    /// - `event`: Reference to the event (does not transfer ownership)
    async fn handle(&self, event: &Event);

    /// Human-readable name (for logs).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
