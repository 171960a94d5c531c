//! Set-difference logic for many-to-many selections.
//!
//! The wizard always submits the complete desired selection. Storage only
//! needs the rows that differ, so the diff is computed here without touching
//! a connection and applied by the repository layer inside one transaction.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::types::DbId;

/// Row changes that turn the current selection into the desired one.
///
/// Both lists are sorted ascending and free of duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SelectionDiff {
    /// Stored ids that are no longer desired.
    pub to_delete: Vec<DbId>,
    /// Desired ids that are not stored yet.
    pub to_insert: Vec<DbId>,
}

impl SelectionDiff {
    /// `true` when the stored selection already equals the desired one.
    pub fn is_noop(&self) -> bool {
        self.to_delete.is_empty() && self.to_insert.is_empty()
    }
}

/// Compute the minimal delete/insert sets for a selection.
///
/// Duplicates in either input are ignored.
pub fn diff_selection(desired: &[DbId], current: &[DbId]) -> SelectionDiff {
    let desired: BTreeSet<DbId> = desired.iter().copied().collect();
    let current: BTreeSet<DbId> = current.iter().copied().collect();

    SelectionDiff {
        to_delete: current.difference(&desired).copied().collect(),
        to_insert: desired.difference(&current).copied().collect(),
    }
}

/// Deduplicate and sort a submitted selection.
pub fn dedupe_ids(ids: &[DbId]) -> Vec<DbId> {
    ids.iter()
        .copied()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
