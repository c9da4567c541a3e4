//! Change classification between a baseline and a current table

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::matrix::{ConnectivityTable, RowKey};

/// How one element, row, column or cell changed between two snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeTag {
    New,
    Removed,
    Changed,
    Unchanged,
}

impl ChangeTag {
    /// New or removed outrank an inherited `Changed`.
    pub fn is_presence_change(self) -> bool {
        matches!(self, ChangeTag::New | ChangeTag::Removed)
    }

    fn from_presence(in_base: bool, in_current: bool) -> Option<ChangeTag> {
        match (in_base, in_current) {
            (true, false) => Some(ChangeTag::Removed),
            (false, true) => Some(ChangeTag::New),
            _ => None,
        }
    }
}

impl fmt::Display for ChangeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ChangeTag::New => "new",
            ChangeTag::Removed => "removed",
            ChangeTag::Changed => "changed",
            ChangeTag::Unchanged => "unchanged",
        };
        f.write_str(s)
    }
}

/// (A-element, interface, B-element).
pub type CellKey = (String, String, String);

/// Tags for every element, row, column and connected cell of a merged table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffAnnotations {
    pub elements: BTreeMap<String, ChangeTag>,
    pub rows: BTreeMap<RowKey, ChangeTag>,
    pub columns: BTreeMap<String, ChangeTag>,
    pub cells: BTreeMap<CellKey, ChangeTag>,
}

/// Counts for status output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DiffSummary {
    pub new_cells: usize,
    pub removed_cells: usize,
    pub changed_rows: usize,
    pub changed_columns: usize,
}

impl DiffAnnotations {
    pub fn element_tag(&self, element: &str) -> ChangeTag {
        self.elements.get(element).copied().unwrap_or(ChangeTag::Unchanged)
    }

    /// Row tag, overridden by the element's own new/removed status.
    pub fn row_tag(&self, element: &str, interface: &str) -> ChangeTag {
        let element_tag = self.element_tag(element);
        if element_tag.is_presence_change() {
            return element_tag;
        }
        self.rows
            .get(&(element.to_string(), interface.to_string()))
            .copied()
            .unwrap_or(ChangeTag::Unchanged)
    }

    pub fn column_tag(&self, column: &str) -> ChangeTag {
        self.columns.get(column).copied().unwrap_or(ChangeTag::Unchanged)
    }

    /// `None` when the merged table has no connection at this cell.
    pub fn cell_tag(&self, element: &str, interface: &str, column: &str) -> Option<ChangeTag> {
        let own = *self
            .cells
            .get(&(element.to_string(), interface.to_string(), column.to_string()))?;
        let row = self.row_tag(element, interface);
        if !own.is_presence_change() && row.is_presence_change() {
            return Some(row);
        }
        Some(own)
    }

    /// True when nothing differs between the two snapshots.
    pub fn is_empty(&self) -> bool {
        self.elements
            .values()
            .chain(self.rows.values())
            .chain(self.columns.values())
            .chain(self.cells.values())
            .all(|tag| *tag == ChangeTag::Unchanged)
    }

    pub fn summary(&self) -> DiffSummary {
        DiffSummary {
            new_cells: count_tags(self.cells.values(), ChangeTag::New),
            removed_cells: count_tags(self.cells.values(), ChangeTag::Removed),
            changed_rows: count_tags(self.rows.values(), ChangeTag::Changed),
            changed_columns: count_tags(self.columns.values(), ChangeTag::Changed),
        }
    }
}

fn count_tags<'a>(tags: impl Iterator<Item = &'a ChangeTag>, wanted: ChangeTag) -> usize {
    tags.filter(|tag| **tag == wanted).count()
}

/// Classify every element, row, column and connected cell of `merged`.
///
/// `merged` is expected to be `merge(base, current)`.
pub fn classify(base: &ConnectivityTable, current: &ConnectivityTable, merged: &ConnectivityTable) -> DiffAnnotations {
    let empty = BTreeSet::new();
    let mut annotations = DiffAnnotations::default();
    let mut moved_columns: BTreeSet<&str> = BTreeSet::new();

    for (key, targets) in &merged.rows {
        let before = base.rows.get(key);
        let after = current.rows.get(key);
        let before_set = before.unwrap_or(&empty);
        let after_set = after.unwrap_or(&empty);

        // any column whose membership flips in this row
        moved_columns.extend(before_set.symmetric_difference(after_set).map(String::as_str));

        let tag = ChangeTag::from_presence(before.is_some(), after.is_some()).unwrap_or(if before_set != after_set {
            ChangeTag::Changed
        } else {
            ChangeTag::Unchanged
        });
        annotations.rows.insert(key.clone(), tag);

        for target in targets {
            let cell = ChangeTag::from_presence(before_set.contains(target), after_set.contains(target));
            if let Some(tag) = cell {
                annotations
                    .cells
                    .insert((key.0.clone(), key.1.clone(), target.clone()), tag);
            }
        }
    }

    for column in merged.columns.keys() {
        let tag = ChangeTag::from_presence(base.columns.contains_key(column), current.columns.contains_key(column))
            .unwrap_or(if moved_columns.contains(column.as_str()) {
                ChangeTag::Changed
            } else {
                ChangeTag::Unchanged
            });
        annotations.columns.insert(column.clone(), tag);
    }

    for element in merged.elements.keys() {
        let tag = ChangeTag::from_presence(base.elements.contains_key(element), current.elements.contains_key(element))
            .unwrap_or_else(|| {
                let any_row_moved = merged
                    .interfaces_of(element)
                    .into_iter()
                    .any(|interface| annotations.rows.get(&(element.clone(), interface.to_string())) != Some(&ChangeTag::Unchanged));
                if any_row_moved { ChangeTag::Changed } else { ChangeTag::Unchanged }
            });
        annotations.elements.insert(element.clone(), tag);
    }

    // cells present on both sides inherit their column's change
    for (key, targets) in &merged.rows {
        for target in targets {
            let cell_key = (key.0.clone(), key.1.clone(), target.clone());
            if annotations.cells.contains_key(&cell_key) {
                continue;
            }
            let tag = if annotations.column_tag(target) == ChangeTag::Changed {
                ChangeTag::Changed
            } else {
                ChangeTag::Unchanged
            };
            annotations.cells.insert(cell_key, tag);
        }
    }

    let summary = annotations.summary();
    tracing::debug!(?summary, "diff classified");
    annotations
}
