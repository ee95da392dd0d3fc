//! Filter/selection layer: narrows record sets by manager, client, and
//! date range, and derives the distinct option lists selectors offer.

use std::collections::HashSet;

use chrono::NaiveDate;

use crate::core::{CallRecord, FilterSelection};

/// Keep the records matching the selection, preserving input order.
pub fn apply_selection(records: &[CallRecord], selection: &FilterSelection) -> Vec<CallRecord> {
    records
        .iter()
        .filter(|record| matches_selection(record, selection))
        .cloned()
        .collect()
}

/// Selection predicate: trimmed manager/client equality plus inclusive
/// day bounds. Records whose date cannot be parsed are excluded whenever
/// a date bound is set.
pub fn matches_selection(record: &CallRecord, selection: &FilterSelection) -> bool {
    if let Some(manager) = &selection.manager {
        if record.manager_name.trim() != manager.trim() {
            return false;
        }
    }
    if let Some(client) = &selection.client {
        if record.client_phone.trim() != client.trim() {
            return false;
        }
    }

    if selection.date_from.is_some() || selection.date_to.is_some() {
        let Some(day) = record_day(record) else {
            return false;
        };
        if selection.date_from.is_some_and(|from| day < from) {
            return false;
        }
        if selection.date_to.is_some_and(|to| day > to) {
            return false;
        }
    }

    true
}

/// Distinct manager names in first-seen order, optionally narrowed to the
/// managers who contacted one specific client.
pub fn available_managers(records: &[CallRecord], client: Option<&str>) -> Vec<String> {
    distinct(
        records
            .iter()
            .filter(|record| {
                client.is_none_or(|c| record.client_phone.trim() == c.trim())
            })
            .map(|record| record.manager_name.as_str()),
    )
}

/// Distinct client phones in first-seen order, optionally narrowed to the
/// clients contacted by one specific manager.
pub fn available_clients(records: &[CallRecord], manager: Option<&str>) -> Vec<String> {
    distinct(
        records
            .iter()
            .filter(|record| {
                manager.is_none_or(|m| record.manager_name.trim() == m.trim())
            })
            .map(|record| record.client_phone.as_str()),
    )
}

fn record_day(record: &CallRecord) -> Option<NaiveDate> {
    record.timestamp().date()
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    values
        .filter(|value| !value.is_empty() && seen.insert(*value))
        .map(str::to_string)
        .collect()
}
