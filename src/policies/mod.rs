//! Reconnect policies.
//!
//! This module groups the knobs that control **how long** the push listener
//! waits between reconnect attempts after losing the stream.
//!
//! ## Contents
//! - [`BackoffPolicy`] how reconnect delays evolve (first / factor / max)
//! - [`JitterPolicy`]  randomization strategy to avoid reconnect storms
//!
//! ## Quick wiring
//! ```text
//! SyncConfig { reconnect: BackoffPolicy, max_reconnect_attempts }
//!      └─► sync::Synchronizer schedules Reconnect commands with
//!          reconnect.next(attempt) between connection attempts
//! ```
//!
//! ## Defaults
//! - `BackoffPolicy::default()` → first=1s, factor=2.0, max=60s, jitter=None.
//! - `JitterPolicy::None` by default; consider `Equal` for shared endpoints.

mod backoff;
mod jitter;

pub use backoff::BackoffPolicy;
pub use jitter::JitterPolicy;
