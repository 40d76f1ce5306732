//! # Simple logging subscriber for debugging and demos.
//!
//! [`LogWriter`] prints events to stdout in a human-readable format.
//! This is primarily useful for development, debugging, and examples.
//!
//! ## Output format
//! ```text
//! [catalog-updated] provider=seventv
//! [notification] 7TV Emotes: PogU has been added to chat
//! [sync-started] provider=seventv
//! [sync-failed] provider=seventv reason="fetch: 503"
//! [push-connected] provider=seventv
//! [push-lost] provider=seventv reason="stream ended"
//! [channel-updated] channel=Some(ChannelContext { .. })
//! [feature-toggled] enabled=true
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscriber;

/// Simple stdout logging subscriber.
///
/// Not intended for production use - implement a custom [`Subscriber`] for
/// structured logging or metrics collection.
pub struct LogWriter;

#[async_trait]
impl Subscriber for LogWriter {
    async fn handle(&self, e: &Event) {
        match e.kind {
            EventKind::CatalogUpdated => {
                if let Some(provider) = e.provider {
                    println!("[catalog-updated] provider={}", provider.as_label());
                }
            }
            EventKind::Notification => {
                if let Some(text) = &e.text {
                    println!("[notification] {text}");
                }
            }
            EventKind::SyncStarted => {
                if let Some(provider) = e.provider {
                    println!("[sync-started] provider={}", provider.as_label());
                }
            }
            EventKind::SyncFailed => {
                println!(
                    "[sync-failed] provider={:?} reason={:?}",
                    e.provider, e.reason
                );
            }
            EventKind::PushConnected => {
                if let Some(provider) = e.provider {
                    println!("[push-connected] provider={}", provider.as_label());
                }
            }
            EventKind::PushLost => {
                println!("[push-lost] provider={:?} reason={:?}", e.provider, e.reason);
            }
            EventKind::ChannelUpdated => {
                println!("[channel-updated] channel={:?}", e.channel);
            }
            EventKind::FeatureToggled => {
                println!("[feature-toggled] enabled={:?}", e.enabled);
            }
        }
    }

    fn name(&self) -> &'static str {
        "log_writer"
    }
}
