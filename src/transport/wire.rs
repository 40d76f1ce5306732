//! # Wire payload model for the provider API.
//!
//! Serde view of the two payloads the core consumes:
//!
//! - the **bulk fetch** response: an emote-set object plus the owning user,
//!   `{emote_set: {id, emotes: [..]}, user: {id}}`;
//! - **push messages**: `{type: "emote_set.update" | "user.update",
//!   body: {pushed?, pulled?, updated?}}`.
//!
//! Parsing is tolerant where the feed is known to be loose: list fields
//! default to empty, emote `data` defaults when absent, and unknown message
//! types map to [`PushKind::Unknown`] so a single odd message never fails
//! the connection.
//!
//! Conversion into domain records happens here ([`EmoteEntry::to_emote`],
//! [`PushedValue::to_emote`]); the listed-flag filtering stays with the
//! synchronizer, which owns that policy.

use serde::Deserialize;

use crate::emotes::{Category, Emote, EmoteOwner};

/// Bulk-fetch response: the channel's emote set and its owning user.
#[derive(Debug, Clone, Deserialize)]
pub struct ChannelEmotePayload {
    /// Active emote set of the channel.
    pub emote_set: EmoteSetPayload,
    /// Provider user owning the set.
    pub user: UserPayload,
}

/// Emote-set object from the bulk fetch.
#[derive(Debug, Clone, Deserialize)]
pub struct EmoteSetPayload {
    /// Set identifier; scopes the push connection.
    pub id: String,
    /// Entries of the set. Absent list parses as empty.
    #[serde(default)]
    pub emotes: Vec<EmoteEntry>,
}

/// Provider user object from the bulk fetch.
#[derive(Debug, Clone, Deserialize)]
pub struct UserPayload {
    /// User identifier; scopes the push connection.
    pub id: String,
}

/// One emote entry of the bulk-fetch set.
#[derive(Debug, Clone, Deserialize)]
pub struct EmoteEntry {
    /// Stable emote identifier.
    pub id: String,
    /// Current code; may differ from the upload name when aliased.
    pub name: String,
    /// Flags and attribution.
    #[serde(default)]
    pub data: EmoteData,
}

impl EmoteEntry {
    /// Builds the domain record for this entry.
    pub fn to_emote(&self, category: &'static Category) -> Emote {
        Emote::new(
            self.id.as_str(),
            self.name.as_str(),
            self.data.animated,
            self.data.owner.as_ref().map(OwnerPayload::to_owner),
            category,
        )
    }
}

/// Emote flags and attribution.
///
/// In bulk-fetch entries the id lives on the entry; in push messages it
/// lives here, so the field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmoteData {
    /// Stable emote identifier (push messages only).
    #[serde(default)]
    pub id: Option<String>,
    /// Provider-side visibility flag; unlisted emotes never enter a catalog.
    #[serde(default)]
    pub listed: bool,
    /// Whether the emote is animated.
    #[serde(default)]
    pub animated: bool,
    /// Optional uploader attribution.
    #[serde(default)]
    pub owner: Option<OwnerPayload>,
}

/// Uploader attribution as carried on the wire.
#[derive(Debug, Clone, Deserialize)]
pub struct OwnerPayload {
    /// Provider-assigned user id.
    pub id: String,
    /// Login name.
    #[serde(default)]
    pub username: Option<String>,
    /// Display name.
    #[serde(default)]
    pub display_name: Option<String>,
}

impl OwnerPayload {
    /// Builds the domain attribution value.
    pub fn to_owner(&self) -> EmoteOwner {
        EmoteOwner {
            id: self.id.as_str().into(),
            login: self.username.as_deref().map(Into::into),
            display_name: self.display_name.as_deref().map(Into::into),
        }
    }
}

/// One push message from the event stream.
#[derive(Debug, Clone, Deserialize)]
pub struct PushMessage {
    /// Message type.
    #[serde(rename = "type")]
    pub kind: PushKind,
    /// Delta lists; absent lists parse as empty.
    #[serde(default)]
    pub body: PushBody,
}

/// Push message type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum PushKind {
    /// Incremental emote-set delta.
    EmoteSetUpdate,
    /// The user's active emote set may have changed; full resync required.
    UserUpdate,
    /// Anything else; ignored per-message.
    Unknown,
}

impl From<String> for PushKind {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "emote_set.update" => PushKind::EmoteSetUpdate,
            "user.update" => PushKind::UserUpdate,
            _ => PushKind::Unknown,
        }
    }
}

/// Delta lists of an `emote_set.update` message.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PushBody {
    /// Emotes added to the set.
    #[serde(default)]
    pub pushed: Vec<PushedEntry>,
    /// Emotes removed from the set.
    #[serde(default)]
    pub pulled: Vec<PulledEntry>,
    /// Emotes renamed or re-flagged.
    #[serde(default)]
    pub updated: Vec<UpdatedEntry>,
}

/// An added emote.
#[derive(Debug, Clone, Deserialize)]
pub struct PushedEntry {
    /// New emote value.
    pub value: PushedValue,
}

/// A removed emote; only the old identity is carried.
#[derive(Debug, Clone, Deserialize)]
pub struct PulledEntry {
    /// Identity of the removed emote.
    pub old_value: OldValue,
}

/// A renamed/re-flagged emote: old identity plus new value.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdatedEntry {
    /// Identity before the update.
    pub old_value: OldValue,
    /// Value after the update.
    pub value: PushedValue,
}

/// Prior identity carried by `pulled`/`updated` entries.
#[derive(Debug, Clone, Deserialize)]
pub struct OldValue {
    /// Stable emote identifier.
    pub id: String,
}

/// New emote value carried by `pushed`/`updated` entries.
///
/// When an emote has an alias, the effective code only shows in `name`;
/// `data` carries the stable id and flags.
#[derive(Debug, Clone, Deserialize)]
pub struct PushedValue {
    /// Current code of the emote.
    pub name: String,
    /// Flags, id, and attribution.
    #[serde(default)]
    pub data: EmoteData,
}

impl PushedValue {
    /// Builds the domain record, keyed by the current `name`.
    ///
    /// Returns `None` when the payload carries no stable id; such entries
    /// cannot be joined later and are skipped by the caller.
    pub fn to_emote(&self, category: &'static Category) -> Option<Emote> {
        let id = self.data.id.as_deref()?;
        Some(Emote::new(
            id,
            self.name.as_str(),
            self.data.animated,
            self.data.owner.as_ref().map(OwnerPayload::to_owner),
            category,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emotes::SEVENTV_CHANNEL;

    #[test]
    fn test_parse_bulk_fetch_payload() {
        let raw = r#"{
            "emote_set": {
                "id": "set-1",
                "emotes": [
                    {"id": "1", "name": "Kappa",
                     "data": {"listed": true, "animated": false,
                              "owner": {"id": "u1", "username": "ash", "display_name": "Ash"}}}
                ]
            },
            "user": {"id": "u-9"}
        }"#;

        let payload: ChannelEmotePayload = serde_json::from_str(raw).unwrap();
        assert_eq!(payload.emote_set.id, "set-1");
        assert_eq!(payload.user.id, "u-9");

        let emote = payload.emote_set.emotes[0].to_emote(&SEVENTV_CHANNEL);
        assert_eq!(&*emote.code, "Kappa");
        let owner = emote.owner.unwrap();
        assert_eq!(owner.login.as_deref(), Some("ash"));
    }

    #[test]
    fn test_parse_push_message_with_alias() {
        let raw = r#"{
            "type": "emote_set.update",
            "body": {"pushed": [{"value": {"name": "AliasName",
                "data": {"id": "2", "listed": true, "animated": true}}}]}
        }"#;

        let msg: PushMessage = serde_json::from_str(raw).unwrap();
        assert_eq!(msg.kind, PushKind::EmoteSetUpdate);
        let emote = msg.body.pushed[0].value.to_emote(&SEVENTV_CHANNEL).unwrap();
        assert_eq!(&*emote.code, "AliasName");
        assert_eq!(&*emote.id, "2");
        assert!(emote.animated);
    }

    #[test]
    fn test_unknown_type_and_missing_body_tolerated() {
        let msg: PushMessage = serde_json::from_str(r#"{"type": "cosmetic.create"}"#).unwrap();
        assert_eq!(msg.kind, PushKind::Unknown);
        assert!(msg.body.pushed.is_empty());
        assert!(msg.body.pulled.is_empty());
        assert!(msg.body.updated.is_empty());
    }

    #[test]
    fn test_pushed_value_without_id_yields_no_record() {
        let value: PushedValue =
            serde_json::from_str(r#"{"name": "X", "data": {"listed": true}}"#).unwrap();
        assert!(value.to_emote(&SEVENTV_CHANNEL).is_none());
    }
}
