//! # Channel emote synchronizer.
//!
//! Owns one catalog's lifecycle for the currently active channel: bulk
//! refresh, push-connection management, and delta application. All state
//! lives inside a single command loop, so catalog mutation and bus
//! publication never interleave with another message.
//!
//! ## State machine
//! ```text
//! Idle ──(channel set, feature on)──► Syncing ──(fetch ok)──► Live
//!   ▲                                    │                      │
//!   │                                    │ fetch err            │ user.update → full resync
//!   ├────────────────────────────────────┘                      │ emote_set.update → deltas
//!   │                                                           │ stream end → reconnect loop
//!   └──────────(channel cleared / feature off / teardown)───────┘
//! ```
//!
//! ## Command loop
//! ```text
//! SyncHandle ──► Channel / Enabled / Resync / Shutdown ─┐
//! fetch task ──► FetchDone { generation, result } ──────┤
//! listener   ──► Push { generation, raw }               ├──► run() loop
//! listener   ──► StreamEnded { generation }             │    (one command
//! timer      ──► Reconnect { generation, attempt } ─────┘     at a time)
//! ```
//!
//! ## Rules
//! - Every rebuild bumps `generation`; commands carrying an older
//!   generation are discarded. This is what makes stale fetch responses,
//!   messages from torn-down connections, and leftover reconnect timers
//!   harmless.
//! - The push connection is closed (errors swallowed) before the catalog
//!   is cleared, and a new one only opens from a fresh fetch response.
//! - A malformed push message fails only itself; the connection and the
//!   catalog survive.

use std::sync::{Arc, PoisonError, RwLockWriteGuard};

use async_trait::async_trait;
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::SyncConfig;
use crate::emotes::{Catalog, CatalogRef, Category, Provider};
use crate::error::SyncError;
use crate::events::{Bus, Event, EventKind};
use crate::subscribers::Subscriber;
use crate::sync::channel::{ChannelContext, PushScope};
use crate::sync::delta;
use crate::transport::{
    ChannelEmotePayload, ClosePush, Connect, FetchEmoteSet, PushConnection, PushKind, PushMessage,
};

/// Logical synchronizer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// No active channel or feature disabled; catalog empty.
    Idle,
    /// Bulk fetch in flight.
    Syncing,
    /// Catalog populated; push deltas apply (connection may be reopening).
    Live,
}

/// Commands processed by the synchronizer loop, one at a time.
enum Command {
    /// Active channel changed (`None` = no channel).
    Channel(Option<ChannelContext>),
    /// Feature flag toggled.
    Enabled(bool),
    /// Force a full resync for the current channel.
    Resync,
    /// Bulk fetch resolved.
    FetchDone {
        generation: u64,
        result: Result<ChannelEmotePayload, SyncError>,
    },
    /// Raw push message from the listener.
    Push { generation: u64, raw: String },
    /// The push stream ended.
    StreamEnded { generation: u64 },
    /// Reconnect timer fired.
    Reconnect { generation: u64, attempt: u32 },
    /// Explicit teardown (channel destroyed).
    Shutdown,
}

/// Handle to a running synchronizer.
///
/// Cheap to clone. Also usable as a bus [`Subscriber`]: it reacts to
/// `ChannelUpdated` and `FeatureToggled` events, which is how the external
/// channel-change and settings-change signals reach the synchronizer.
#[derive(Clone)]
pub struct SyncHandle {
    tx: mpsc::UnboundedSender<Command>,
    catalog: CatalogRef,
    provider: Provider,
}

impl SyncHandle {
    /// Signals a channel change (`None` = no active channel).
    pub fn set_channel(&self, channel: Option<ChannelContext>) {
        let _ = self.tx.send(Command::Channel(channel));
    }

    /// Signals a feature-flag change.
    pub fn set_enabled(&self, enabled: bool) {
        let _ = self.tx.send(Command::Enabled(enabled));
    }

    /// Forces a full resync for the current channel.
    pub fn resync(&self) {
        let _ = self.tx.send(Command::Resync);
    }

    /// Tears the synchronizer down: connection closed, catalog cleared.
    pub fn shutdown(&self) {
        let _ = self.tx.send(Command::Shutdown);
    }

    /// The catalog owned by this synchronizer, for registry wiring.
    pub fn catalog(&self) -> CatalogRef {
        Arc::clone(&self.catalog)
    }

    /// Provider this synchronizer serves.
    pub fn provider(&self) -> Provider {
        self.provider
    }
}

#[async_trait]
impl Subscriber for SyncHandle {
    async fn handle(&self, event: &Event) {
        match event.kind {
            EventKind::ChannelUpdated => self.set_channel(event.channel.clone()),
            EventKind::FeatureToggled => {
                if let Some(enabled) = event.enabled {
                    self.set_enabled(enabled);
                }
            }
            _ => {}
        }
    }

    fn name(&self) -> &'static str {
        "sync_handle"
    }
}

/// Synchronizer state, owned exclusively by the command loop.
pub struct Synchronizer {
    category: &'static Category,
    config: SyncConfig,
    fetcher: Arc<dyn FetchEmoteSet>,
    connector: Arc<dyn Connect>,
    bus: Bus,
    catalog: CatalogRef,

    tx: mpsc::UnboundedSender<Command>,
    rx: mpsc::UnboundedReceiver<Command>,

    phase: Phase,
    enabled: bool,
    channel: Option<ChannelContext>,
    /// Bumped on every rebuild; gates all asynchronous completions.
    generation: u64,
    /// Push scope captured from the last successful fetch.
    scope: Option<PushScope>,
    /// Closer of the currently open connection, owned by this instance.
    closer: Option<Box<dyn ClosePush>>,
    /// Cancels the listener task of the current connection.
    listener: Option<CancellationToken>,
}

impl Synchronizer {
    /// Spawns a synchronizer loop and returns its handle.
    ///
    /// The loop runs until [`SyncHandle::shutdown`] is called or every
    /// handle is dropped; either way the connection is closed and the
    /// catalog cleared on exit.
    pub fn spawn(
        category: &'static Category,
        config: SyncConfig,
        fetcher: Arc<dyn FetchEmoteSet>,
        connector: Arc<dyn Connect>,
        bus: Bus,
    ) -> SyncHandle {
        let (tx, rx) = mpsc::unbounded_channel();
        let catalog = Catalog::shared();
        let enabled = config.enabled;

        let sync = Synchronizer {
            category,
            config,
            fetcher,
            connector,
            bus,
            catalog: Arc::clone(&catalog),
            tx: tx.clone(),
            rx,
            phase: Phase::Idle,
            enabled,
            channel: None,
            generation: 0,
            scope: None,
            closer: None,
            listener: None,
        };
        let provider = category.provider;
        tokio::spawn(sync.run());

        SyncHandle {
            tx,
            catalog,
            provider,
        }
    }

    async fn run(mut self) {
        while let Some(command) = self.rx.recv().await {
            match command {
                Command::Channel(channel) => {
                    self.channel = channel;
                    self.rebuild().await;
                }
                Command::Enabled(enabled) => {
                    self.enabled = enabled;
                    self.rebuild().await;
                }
                Command::Resync => self.rebuild().await,
                Command::FetchDone { generation, result } => {
                    self.on_fetch_done(generation, result).await;
                }
                Command::Push { generation, raw } => self.on_push(generation, raw).await,
                Command::StreamEnded { generation } => self.on_stream_ended(generation).await,
                Command::Reconnect {
                    generation,
                    attempt,
                } => self.on_reconnect(generation, attempt).await,
                Command::Shutdown => break,
            }
        }
        self.teardown().await;
    }

    fn provider(&self) -> Provider {
        self.category.provider
    }

    fn catalog_mut(&self) -> RwLockWriteGuard<'_, Catalog> {
        self.catalog.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Discards all per-channel state and, when enabled with an active
    /// channel, starts a fresh bulk fetch.
    async fn rebuild(&mut self) {
        self.generation += 1;
        self.close_connection().await;
        self.scope = None;
        self.catalog_mut().clear();
        self.phase = Phase::Idle;

        if !self.enabled {
            debug!(provider = self.provider().as_label(), "live emotes disabled");
            return;
        }
        let Some(channel) = self.channel.clone() else {
            debug!(provider = self.provider().as_label(), "no active channel");
            return;
        };

        self.phase = Phase::Syncing;
        self.bus
            .publish(&Event::new(EventKind::SyncStarted).with_provider(self.provider()))
            .await;

        let generation = self.generation;
        let fetcher = Arc::clone(&self.fetcher);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = fetcher.fetch(&channel).await;
            let _ = tx.send(Command::FetchDone { generation, result });
        });
    }

    async fn on_fetch_done(
        &mut self,
        generation: u64,
        result: Result<ChannelEmotePayload, SyncError>,
    ) {
        if generation != self.generation {
            // channel or settings changed while the fetch was in flight
            debug!(
                provider = self.provider().as_label(),
                label = SyncError::Stale { generation }.as_label(),
                "discarding fetch response for superseded rebuild"
            );
            return;
        }

        let payload = match result {
            Ok(payload) => payload,
            Err(err) => {
                warn!(
                    provider = self.provider().as_label(),
                    label = err.as_label(),
                    "bulk fetch failed: {}",
                    err.as_message()
                );
                self.phase = Phase::Idle;
                self.bus
                    .publish(
                        &Event::new(EventKind::SyncFailed)
                            .with_provider(self.provider())
                            .with_reason(err.as_message()),
                    )
                    .await;
                return;
            }
        };

        {
            let mut catalog = self.catalog_mut();
            for entry in &payload.emote_set.emotes {
                if !entry.data.listed {
                    continue;
                }
                catalog.set(entry.to_emote(self.category));
            }
        }
        self.scope = Some(PushScope::new(
            payload.emote_set.id.as_str(),
            payload.user.id.as_str(),
        ));
        self.phase = Phase::Live;

        self.try_connect(0).await;
        self.bus
            .publish(&Event::catalog_updated(self.provider()))
            .await;
    }

    async fn on_push(&mut self, generation: u64, raw: String) {
        if generation != self.generation {
            debug!(
                provider = self.provider().as_label(),
                "discarding push message from superseded connection"
            );
            return;
        }

        let message: PushMessage = match serde_json::from_str(&raw) {
            Ok(message) => message,
            Err(err) => {
                let err = SyncError::Payload(err);
                warn!(
                    provider = self.provider().as_label(),
                    label = err.as_label(),
                    "dropping malformed push message: {}",
                    err.as_message()
                );
                return;
            }
        };

        match message.kind {
            PushKind::UserUpdate => {
                // the user's active emote set may have changed; every cached
                // id is potentially stale
                self.rebuild().await;
            }
            PushKind::EmoteSetUpdate => {
                let outcome = {
                    let mut catalog = self.catalog_mut();
                    delta::apply_body(&mut catalog, &message.body, self.category)
                };
                if outcome.changed {
                    self.bus
                        .publish(&Event::catalog_updated(self.provider()))
                        .await;
                }
                for notice in outcome.notices {
                    self.bus
                        .publish(&Event::notification(self.provider(), notice))
                        .await;
                }
            }
            PushKind::Unknown => {
                debug!(
                    provider = self.provider().as_label(),
                    "ignoring push message of unknown type"
                );
            }
        }
    }

    async fn on_stream_ended(&mut self, generation: u64) {
        if generation != self.generation || self.phase != Phase::Live {
            return;
        }
        self.listener = None;
        self.closer = None;
        self.bus
            .publish(
                &Event::new(EventKind::PushLost)
                    .with_provider(self.provider())
                    .with_reason("stream ended"),
            )
            .await;
        self.schedule_reconnect(0);
    }

    async fn on_reconnect(&mut self, generation: u64, attempt: u32) {
        if generation != self.generation || self.phase != Phase::Live {
            return;
        }
        if self.listener.is_some() {
            return;
        }
        self.try_connect(attempt).await;
    }

    /// Attempts to open the push connection for the captured scope.
    ///
    /// On failure, publishes `PushLost` and schedules the next attempt per
    /// the reconnect policy.
    async fn try_connect(&mut self, attempt: u32) {
        let Some(scope) = self.scope.clone() else {
            return;
        };

        match self.connector.connect(&scope).await {
            Ok(connection) => {
                self.install_listener(connection);
                self.bus
                    .publish(&Event::new(EventKind::PushConnected).with_provider(self.provider()))
                    .await;
            }
            Err(err) => {
                warn!(
                    provider = self.provider().as_label(),
                    label = err.as_label(),
                    attempt,
                    "push connect failed: {}",
                    err.as_message()
                );
                self.bus
                    .publish(
                        &Event::new(EventKind::PushLost)
                            .with_provider(self.provider())
                            .with_reason(err.as_message()),
                    )
                    .await;
                self.schedule_reconnect(attempt + 1);
            }
        }
    }

    /// Spawns the listener task forwarding connection messages into the
    /// command loop, tagged with the current generation.
    fn install_listener(&mut self, connection: PushConnection) {
        let token = CancellationToken::new();
        self.listener = Some(token.clone());
        self.closer = Some(connection.closer);

        let generation = self.generation;
        let tx = self.tx.clone();
        let mut messages = connection.messages;
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    message = messages.next() => match message {
                        Some(raw) => {
                            if tx.send(Command::Push { generation, raw }).is_err() {
                                break;
                            }
                        }
                        None => {
                            let _ = tx.send(Command::StreamEnded { generation });
                            break;
                        }
                    },
                }
            }
        });
    }

    fn schedule_reconnect(&self, attempt: u32) {
        if let Some(cap) = self.config.reconnect_cap() {
            if attempt >= cap {
                warn!(
                    provider = self.provider().as_label(),
                    attempts = attempt,
                    "reconnect attempts exhausted; waiting for next channel or settings signal"
                );
                return;
            }
        }

        let delay = self.config.reconnect.next(attempt);
        let generation = self.generation;
        let tx = self.tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(Command::Reconnect {
                generation,
                attempt,
            });
        });
    }

    /// Closes the current push connection, if any. Close errors are
    /// swallowed; the resource may already be defunct.
    async fn close_connection(&mut self) {
        if let Some(token) = self.listener.take() {
            token.cancel();
        }
        if let Some(closer) = self.closer.take() {
            if let Err(err) = closer.close().await {
                debug!(
                    provider = self.provider().as_label(),
                    "ignoring close failure: {}",
                    err.as_message()
                );
            }
        }
    }

    async fn teardown(&mut self) {
        self.generation += 1;
        self.close_connection().await;
        self.scope = None;
        self.catalog_mut().clear();
        self.phase = Phase::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emotes::SEVENTV_CHANNEL;
    use crate::policies::{BackoffPolicy, JitterPolicy};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Fetcher returning canned payloads by call index; repeats the last one.
    struct FakeFetch {
        payloads: Vec<Result<ChannelEmotePayload, String>>,
        calls: AtomicUsize,
        gate: Option<Arc<tokio::sync::Notify>>,
    }

    impl FakeFetch {
        fn make(payloads: Vec<Result<&'static str, &'static str>>) -> Self {
            let payloads = payloads
                .into_iter()
                .map(|r| {
                    r.map(|raw| serde_json::from_str(raw).unwrap())
                        .map_err(str::to_string)
                })
                .collect();
            Self {
                payloads,
                calls: AtomicUsize::new(0),
                gate: None,
            }
        }

        fn new(payloads: Vec<Result<&'static str, &'static str>>) -> Arc<Self> {
            Arc::new(Self::make(payloads))
        }

        /// First call blocks until the returned gate is notified.
        fn gated(
            payloads: Vec<Result<&'static str, &'static str>>,
        ) -> (Arc<Self>, Arc<tokio::sync::Notify>) {
            let gate = Arc::new(tokio::sync::Notify::new());
            let mut this = Self::make(payloads);
            this.gate = Some(gate.clone());
            (Arc::new(this), gate)
        }
    }

    #[async_trait]
    impl FetchEmoteSet for FakeFetch {
        async fn fetch(&self, _channel: &ChannelContext) -> Result<ChannelEmotePayload, SyncError> {
            // payload selection is keyed by invocation order, not by
            // completion order, so a gated first call still gets payload 0
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call == 0 {
                if let Some(gate) = &self.gate {
                    gate.notified().await;
                }
            }
            let index = call.min(self.payloads.len().saturating_sub(1));
            match self.payloads.get(index) {
                Some(Ok(payload)) => Ok(payload.clone()),
                Some(Err(message)) => Err(SyncError::Fetch {
                    message: message.clone(),
                }),
                None => Err(SyncError::fetch("no payload configured")),
            }
        }
    }

    /// Connector handing out message streams the test can write into.
    struct FakeConnect {
        senders: Mutex<Vec<futures::channel::mpsc::UnboundedSender<String>>>,
        fail_first: AtomicUsize,
        calls: AtomicUsize,
    }

    impl FakeConnect {
        fn new() -> Arc<Self> {
            Self::failing(0)
        }

        fn failing(fail_first: usize) -> Arc<Self> {
            Arc::new(Self {
                senders: Mutex::new(Vec::new()),
                fail_first: AtomicUsize::new(fail_first),
                calls: AtomicUsize::new(0),
            })
        }

        fn send(&self, raw: &str) {
            let guard = self.senders.lock().unwrap();
            let sender = guard.last().expect("no connection open");
            sender.unbounded_send(raw.to_string()).unwrap();
        }

        fn drop_stream(&self) {
            self.senders.lock().unwrap().pop();
        }
    }

    #[async_trait]
    impl Connect for FakeConnect {
        async fn connect(&self, _scope: &PushScope) -> Result<PushConnection, SyncError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self
                .fail_first
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok()
            {
                return Err(SyncError::connect("refused"));
            }
            let (tx, rx) = futures::channel::mpsc::unbounded();
            self.senders.lock().unwrap().push(tx);
            Ok(PushConnection {
                messages: Box::pin(rx),
                closer: Box::new(crate::transport::DropClose),
            })
        }
    }

    /// Forwards bus events into a channel the test can await.
    struct Forward(mpsc::UnboundedSender<Event>);

    #[async_trait]
    impl Subscriber for Forward {
        async fn handle(&self, event: &Event) {
            let _ = self.0.send(event.clone());
        }
    }

    const PAYLOAD_KAPPA: &str = r#"{
        "emote_set": {"id": "set-1", "emotes": [
            {"id": "1", "name": "Kappa", "data": {"listed": true, "animated": false, "owner": {"id": "u1"}}},
            {"id": "8", "name": "Secret", "data": {"listed": false}}
        ]},
        "user": {"id": "u-9"}
    }"#;

    const PAYLOAD_OTHER: &str = r#"{
        "emote_set": {"id": "set-2", "emotes": [
            {"id": "5", "name": "Pepega", "data": {"listed": true}}
        ]},
        "user": {"id": "u-9"}
    }"#;

    struct Rig {
        handle: SyncHandle,
        events: mpsc::UnboundedReceiver<Event>,
        fetch: Arc<FakeFetch>,
        connect: Arc<FakeConnect>,
    }

    fn rig_with(
        fetch: Arc<FakeFetch>,
        connect: Arc<FakeConnect>,
        config: SyncConfig,
    ) -> Rig {
        let bus = Bus::new();
        let (tx, events) = mpsc::unbounded_channel();
        bus.subscribe(Arc::new(Forward(tx)));
        let handle = Synchronizer::spawn(
            &SEVENTV_CHANNEL,
            config,
            fetch.clone(),
            connect.clone(),
            bus,
        );
        Rig {
            handle,
            events,
            fetch,
            connect,
        }
    }

    fn rig(payloads: Vec<Result<&'static str, &'static str>>) -> Rig {
        rig_with(FakeFetch::new(payloads), FakeConnect::new(), SyncConfig::default())
    }

    async fn next_event(rig: &mut Rig) -> Event {
        tokio::time::timeout(Duration::from_secs(5), rig.events.recv())
            .await
            .expect("timed out waiting for event")
            .expect("bus closed")
    }

    async fn wait_for(rig: &mut Rig, kind: EventKind) -> Event {
        loop {
            let event = next_event(rig).await;
            if event.kind == kind {
                return event;
            }
        }
    }

    fn catalog_codes(handle: &SyncHandle) -> Vec<String> {
        let catalog = handle.catalog();
        let guard = catalog.read().unwrap();
        guard.values().map(|e| e.code.to_string()).collect()
    }

    #[tokio::test]
    async fn test_bulk_fetch_populates_and_filters_unlisted() {
        let mut rig = rig(vec![Ok(PAYLOAD_KAPPA)]);
        rig.handle
            .set_channel(Some(ChannelContext::new("twitch", "c1")));

        wait_for(&mut rig, EventKind::CatalogUpdated).await;

        assert_eq!(catalog_codes(&rig.handle), vec!["Kappa"]);
        let catalog = rig.handle.catalog();
        let guard = catalog.read().unwrap();
        assert_eq!(&*guard.get_by_code("Kappa").unwrap().id, "1");
        assert!(guard.get_by_code("Secret").is_none(), "unlisted filtered");
    }

    #[tokio::test]
    async fn test_disabled_feature_performs_no_fetch() {
        let config = SyncConfig {
            enabled: false,
            ..SyncConfig::default()
        };
        let mut rig = rig_with(
            FakeFetch::new(vec![Ok(PAYLOAD_KAPPA)]),
            FakeConnect::new(),
            config,
        );
        rig.handle
            .set_channel(Some(ChannelContext::new("twitch", "c1")));
        // toggling on triggers the fetch; before that, nothing happens
        rig.handle.set_enabled(true);

        wait_for(&mut rig, EventKind::CatalogUpdated).await;
        assert_eq!(rig.fetch.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_fetch_failure_leaves_catalog_empty() {
        let mut rig = rig(vec![Err("http 503")]);
        rig.handle
            .set_channel(Some(ChannelContext::new("twitch", "c1")));

        let failed = wait_for(&mut rig, EventKind::SyncFailed).await;
        assert!(failed.reason.unwrap().contains("503"));
        assert!(catalog_codes(&rig.handle).is_empty());
        assert_eq!(rig.connect.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_pushed_delta_adds_entry_with_notification() {
        let mut rig = rig(vec![Ok(PAYLOAD_KAPPA)]);
        rig.handle
            .set_channel(Some(ChannelContext::new("twitch", "c1")));
        wait_for(&mut rig, EventKind::PushConnected).await;
        wait_for(&mut rig, EventKind::CatalogUpdated).await;

        rig.connect.send(
            r#"{"type": "emote_set.update", "body": {"pushed": [
                {"value": {"name": "PogU", "data": {"id": "2", "listed": true}}}
            ]}}"#,
        );

        wait_for(&mut rig, EventKind::CatalogUpdated).await;
        let notice = wait_for(&mut rig, EventKind::Notification).await;
        assert!(notice.text.unwrap().contains("PogU has been added"));
        assert_eq!(catalog_codes(&rig.handle), vec!["Kappa", "PogU"]);
    }

    #[tokio::test]
    async fn test_pulled_delta_removes_entry() {
        let mut rig = rig(vec![Ok(PAYLOAD_KAPPA)]);
        rig.handle
            .set_channel(Some(ChannelContext::new("twitch", "c1")));
        wait_for(&mut rig, EventKind::PushConnected).await;

        rig.connect
            .send(r#"{"type": "emote_set.update", "body": {"pulled": [{"old_value": {"id": "1"}}]}}"#);

        let notice = wait_for(&mut rig, EventKind::Notification).await;
        assert!(notice.text.unwrap().contains("Kappa has been removed"));
        assert!(catalog_codes(&rig.handle).is_empty());
    }

    #[tokio::test]
    async fn test_rename_keeps_id_under_new_code() {
        let mut rig = rig(vec![Ok(PAYLOAD_KAPPA)]);
        rig.handle
            .set_channel(Some(ChannelContext::new("twitch", "c1")));
        wait_for(&mut rig, EventKind::PushConnected).await;
        wait_for(&mut rig, EventKind::CatalogUpdated).await;

        rig.connect.send(
            r#"{"type": "emote_set.update", "body": {"updated": [
                {"old_value": {"id": "1"},
                 "value": {"name": "KappaHD", "data": {"id": "1", "listed": true}}}
            ]}}"#,
        );

        wait_for(&mut rig, EventKind::CatalogUpdated).await;
        let catalog = rig.handle.catalog();
        let guard = catalog.read().unwrap();
        assert!(guard.get_by_code("Kappa").is_none());
        assert_eq!(&*guard.find_by_id("1").unwrap().code, "KappaHD");
    }

    #[tokio::test]
    async fn test_malformed_push_is_isolated() {
        let mut rig = rig(vec![Ok(PAYLOAD_KAPPA)]);
        rig.handle
            .set_channel(Some(ChannelContext::new("twitch", "c1")));
        wait_for(&mut rig, EventKind::PushConnected).await;
        wait_for(&mut rig, EventKind::CatalogUpdated).await;

        rig.connect.send("{not json");
        rig.connect.send(
            r#"{"type": "emote_set.update", "body": {"pushed": [
                {"value": {"name": "PogU", "data": {"id": "2", "listed": true}}}
            ]}}"#,
        );

        // the valid message after the garbage still applies
        wait_for(&mut rig, EventKind::CatalogUpdated).await;
        assert_eq!(catalog_codes(&rig.handle), vec!["Kappa", "PogU"]);
        assert_eq!(
            rig.connect.calls.load(Ordering::SeqCst),
            1,
            "connection survived the malformed message"
        );
    }

    #[tokio::test]
    async fn test_user_update_triggers_full_resync() {
        let mut rig = rig(vec![Ok(PAYLOAD_KAPPA), Ok(PAYLOAD_OTHER)]);
        rig.handle
            .set_channel(Some(ChannelContext::new("twitch", "c1")));
        wait_for(&mut rig, EventKind::PushConnected).await;

        rig.connect.send(r#"{"type": "user.update", "body": {}}"#);

        wait_for(&mut rig, EventKind::SyncStarted).await;
        wait_for(&mut rig, EventKind::CatalogUpdated).await;

        assert_eq!(rig.fetch.calls.load(Ordering::SeqCst), 2);
        assert_eq!(catalog_codes(&rig.handle), vec!["Pepega"]);
    }

    #[tokio::test]
    async fn test_stale_fetch_response_is_discarded() {
        let (fetch, gate) = FakeFetch::gated(vec![Ok(PAYLOAD_KAPPA), Ok(PAYLOAD_OTHER)]);
        let mut rig = rig_with(fetch, FakeConnect::new(), SyncConfig::default());

        // first fetch blocks on the gate; switch channels while in flight
        rig.handle
            .set_channel(Some(ChannelContext::new("twitch", "c1")));
        wait_for(&mut rig, EventKind::SyncStarted).await;
        rig.handle
            .set_channel(Some(ChannelContext::new("twitch", "c2")));
        wait_for(&mut rig, EventKind::SyncStarted).await;
        gate.notify_one();

        wait_for(&mut rig, EventKind::CatalogUpdated).await;
        // only the second channel's payload may be applied
        assert_eq!(catalog_codes(&rig.handle), vec!["Pepega"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_lost_stream_reconnects_with_backoff() {
        let connect = FakeConnect::new();
        let config = SyncConfig {
            reconnect: BackoffPolicy {
                first: Duration::from_millis(100),
                max: Duration::from_secs(1),
                factor: 2.0,
                jitter: JitterPolicy::None,
            },
            ..SyncConfig::default()
        };
        let mut rig = rig_with(FakeFetch::new(vec![Ok(PAYLOAD_KAPPA)]), connect, config);
        rig.handle
            .set_channel(Some(ChannelContext::new("twitch", "c1")));
        wait_for(&mut rig, EventKind::PushConnected).await;

        rig.connect.drop_stream();
        wait_for(&mut rig, EventKind::PushLost).await;
        wait_for(&mut rig, EventKind::PushConnected).await;

        assert_eq!(rig.connect.calls.load(Ordering::SeqCst), 2);
        assert_eq!(catalog_codes(&rig.handle), vec!["Kappa"], "catalog kept");
    }

    #[tokio::test(start_paused = true)]
    async fn test_connect_failures_retry_until_success() {
        let connect = FakeConnect::failing(2);
        let config = SyncConfig {
            reconnect: BackoffPolicy {
                first: Duration::from_millis(100),
                max: Duration::from_secs(1),
                factor: 2.0,
                jitter: JitterPolicy::None,
            },
            ..SyncConfig::default()
        };
        let mut rig = rig_with(FakeFetch::new(vec![Ok(PAYLOAD_KAPPA)]), connect, config);
        rig.handle
            .set_channel(Some(ChannelContext::new("twitch", "c1")));

        wait_for(&mut rig, EventKind::PushLost).await;
        wait_for(&mut rig, EventKind::PushConnected).await;
        assert_eq!(rig.connect.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_clearing_channel_empties_catalog() {
        let mut rig = rig(vec![Ok(PAYLOAD_KAPPA)]);
        rig.handle
            .set_channel(Some(ChannelContext::new("twitch", "c1")));
        wait_for(&mut rig, EventKind::PushConnected).await;

        rig.handle.set_channel(None);
        // the rebuild runs before any later command; resync forces a
        // round-trip so the clear is observable
        rig.handle.resync();
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(catalog_codes(&rig.handle).is_empty());
    }

    #[tokio::test]
    async fn test_handle_reacts_to_bus_signals() {
        let bus = Bus::new();
        let (tx, events) = mpsc::unbounded_channel();
        bus.subscribe(Arc::new(Forward(tx)));
        let fetch = FakeFetch::new(vec![Ok(PAYLOAD_KAPPA)]);
        let connect = FakeConnect::new();
        let handle = Synchronizer::spawn(
            &SEVENTV_CHANNEL,
            SyncConfig::default(),
            fetch.clone(),
            connect.clone(),
            bus.clone(),
        );
        bus.subscribe(Arc::new(handle.clone()));

        bus.publish(
            &Event::new(EventKind::ChannelUpdated)
                .with_channel(ChannelContext::new("twitch", "c1")),
        )
        .await;

        let mut rig = Rig {
            handle,
            events,
            fetch,
            connect,
        };
        wait_for(&mut rig, EventKind::CatalogUpdated).await;
        assert_eq!(catalog_codes(&rig.handle), vec!["Kappa"]);
    }
}
