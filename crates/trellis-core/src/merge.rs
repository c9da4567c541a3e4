//! Structural union of a baseline and a current connectivity table

use std::collections::{BTreeMap, BTreeSet};

use crate::matrix::ConnectivityTable;

/// Union both tables. Target sets of shared rows are unioned; domains follow
/// [`merge_domains`]. Presentation order is recomputed by the table itself.
pub fn merge(base: &ConnectivityTable, current: &ConnectivityTable) -> ConnectivityTable {
    let mut rows = base.rows.clone();
    for (key, targets) in &current.rows {
        rows.entry(key.clone()).or_insert_with(BTreeSet::new).extend(targets.iter().cloned());
    }

    let conflicts = base.conflicts.union(&current.conflicts).cloned().collect();
    let sentinels = base.sentinels.union(&current.sentinels).cloned().collect();

    let merged = ConnectivityTable {
        elements: merge_domains(&base.elements, &current.elements),
        rows,
        columns: merge_domains(&base.columns, &current.columns),
        conflicts,
        sentinels,
    };
    tracing::debug!(
        elements = merged.elements.len(),
        rows = merged.rows.len(),
        columns = merged.columns.len(),
        "tables merged"
    );
    merged
}

/// Current wins when the base domain is empty or differs; otherwise the base
/// value is kept. Names present on one side only keep that side's domain.
pub fn merge_domains(base: &BTreeMap<String, String>, current: &BTreeMap<String, String>) -> BTreeMap<String, String> {
    let mut merged = base.clone();
    for (name, domain) in current {
        match merged.get_mut(name) {
            Some(existing) if existing.is_empty() || existing != domain => {
                if !existing.is_empty() {
                    tracing::debug!(element = %name, from = %existing, to = %domain, "domain updated by current model");
                }
                *existing = domain.clone();
            }
            Some(_) => {}
            None => {
                merged.insert(name.clone(), domain.clone());
            }
        }
    }
    merged
}
