//! # Delta application: pushed / pulled / updated entries against a catalog.
//!
//! Pure catalog mutation, factored out of the synchronizer so the per-entry
//! rules are testable without transports:
//!
//! - **pushed** (emote added): unlisted entries are skipped; the record is
//!   upserted under its *current* name (aliases only show there); one
//!   "added" notice per entry.
//! - **pulled** (emote removed): the victim is resolved by stable id; a
//!   miss is a silent no-op (duplicate or out-of-order event); otherwise
//!   the entry is deleted under its current code with a "removed" notice.
//! - **updated** (rename/re-flag): resolved by old id, miss ignored; the
//!   old code is deleted; an unlisted new value stops there (net removal);
//!   otherwise the new record lands under the new code. Pure renames emit
//!   no notice.
//!
//! Notices are collected per affected entry; the caller publishes them as
//! individual notification events.

use crate::emotes::{Catalog, Category};
use crate::transport::PushBody;

/// Result of applying one push body to a catalog.
#[derive(Debug, Default)]
pub(crate) struct DeltaOutcome {
    /// True if at least one structural change occurred.
    pub changed: bool,
    /// Human-readable notices, one per affected entry, in event order.
    pub notices: Vec<String>,
}

/// Applies the delta lists of one `emote_set.update` message.
pub(crate) fn apply_body(
    catalog: &mut Catalog,
    body: &PushBody,
    category: &'static Category,
) -> DeltaOutcome {
    let mut outcome = DeltaOutcome::default();

    for entry in &body.pushed {
        if !entry.value.data.listed {
            continue;
        }
        let Some(record) = entry.value.to_emote(category) else {
            continue;
        };
        let code = record.code.clone();
        catalog.set(record);
        outcome.changed = true;
        outcome.notices.push(format!(
            "{}: {} has been added to chat",
            category.display_name, code
        ));
    }

    for entry in &body.pulled {
        let Some(existing) = catalog.find_by_id(&entry.old_value.id) else {
            continue;
        };
        let code = existing.code.clone();
        catalog.delete(&code);
        outcome.changed = true;
        outcome.notices.push(format!(
            "{}: {} has been removed from chat",
            category.display_name, code
        ));
    }

    for entry in &body.updated {
        let Some(existing) = catalog.find_by_id(&entry.old_value.id) else {
            continue;
        };
        let old_code = existing.code.clone();
        catalog.delete(&old_code);
        outcome.changed = true;

        if !entry.value.data.listed {
            continue;
        }
        if let Some(record) = entry.value.to_emote(category) {
            catalog.set(record);
        }
    }

    outcome
}
