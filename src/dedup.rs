//! Collapses raw rows that describe the same physical call event.

use std::collections::HashSet;

use crate::core::CallRecord;

/// Keep one record per unique (date, time, manager id, client id) event,
/// first occurrence wins, first-seen order preserved.
pub fn dedup_records(records: &[CallRecord]) -> Vec<CallRecord> {
    let mut seen = HashSet::new();
    records
        .iter()
        .filter(|record| seen.insert(record.event_key()))
        .cloned()
        .collect()
}
