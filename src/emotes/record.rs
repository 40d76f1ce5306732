//! # Emote record and provider descriptors.
//!
//! An [`Emote`] is the immutable unit of catalog storage: built once by the
//! record factory ([`Emote::new`]), replaced wholesale on rename, never
//! mutated in place. Its `id` is the provider-assigned join key that stays
//! stable across renames; its `code` is the display/trigger text that is
//! unique within a catalog at any point in time.
//!
//! [`Category`] descriptors are process-constant and shared by reference:
//! one static instance per provider, never duplicated per record.

use std::sync::Arc;

/// Emote provider, in fixed registry-priority order.
///
/// The discriminant order is the lookup priority used by
/// [`CatalogRegistry`](crate::emotes::CatalogRegistry): lower = queried first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Provider {
    /// 7TV channel emotes.
    SevenTv,
    /// BetterTTV channel emotes.
    BetterTtv,
    /// FrankerFaceZ channel emotes.
    FrankerFaceZ,
}

impl Provider {
    /// Returns a short stable label (snake_case) for logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            Provider::SevenTv => "seventv",
            Provider::BetterTtv => "betterttv",
            Provider::FrankerFaceZ => "frankerfacez",
        }
    }
}

/// Static category descriptor: one instance per provider, constant for the
/// process lifetime. Shared across all records of a catalog by reference.
#[derive(Debug, PartialEq, Eq)]
pub struct Category {
    /// Provider-side category identifier.
    pub id: &'static str,
    /// Owning provider.
    pub provider: Provider,
    /// Human-readable name, used as the prefix of notification texts.
    pub display_name: &'static str,
}

/// 7TV channel-emote category.
pub static SEVENTV_CHANNEL: Category = Category {
    id: "seventv-channel",
    provider: Provider::SevenTv,
    display_name: "7TV Emotes",
};

/// Optional attribution metadata for an emote's uploader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmoteOwner {
    /// Provider-assigned user id.
    pub id: Arc<str>,
    /// Login name, when the provider supplies one.
    pub login: Option<Arc<str>>,
    /// Display name, when the provider supplies one.
    pub display_name: Option<Arc<str>>,
}

/// Immutable emote value.
///
/// Cheap to clone: string fields are `Arc<str>`, the category is a static
/// reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Emote {
    /// Opaque provider-assigned identifier; stable across renames.
    pub id: Arc<str>,
    /// Display/trigger text; unique within a catalog at a point in time.
    pub code: Arc<str>,
    /// Whether the emote is animated.
    pub animated: bool,
    /// Optional uploader attribution.
    pub owner: Option<EmoteOwner>,
    /// Provider category, shared by reference.
    pub category: &'static Category,
}

impl Emote {
    /// Builds an emote record from raw provider fields.
    ///
    /// Pure factory: no validation beyond field presence. Callers are
    /// responsible for filtering unlisted/invalid source entries before
    /// constructing a record.
    pub fn new(
        id: impl Into<Arc<str>>,
        code: impl Into<Arc<str>>,
        animated: bool,
        owner: Option<EmoteOwner>,
        category: &'static Category,
    ) -> Self {
        Self {
            id: id.into(),
            code: code.into(),
            animated,
            owner,
            category,
        }
    }
}
