//! Average-score metrics over a filtered record set.
//!
//! Two modes: when the selection pins down both a manager and a client,
//! the engine returns the scores of the single matching record verbatim
//! (preferring the chronologically latest match); otherwise it averages
//! each score across the whole filtered set.

use log::debug;

use crate::core::timestamp::CallTimestamp;
use crate::core::{CallMetrics, CallRecord, FilterSelection};
use crate::group::round2;

/// Compute the five average-score metrics for an already-filtered record
/// set under the caller's selection.
pub fn compute_metrics(records: &[CallRecord], selection: &FilterSelection) -> CallMetrics {
    // Re-applied defensively: callers may hand over records that bypassed
    // the record builder.
    let valid: Vec<&CallRecord> = records
        .iter()
        .filter(|record| record.has_finite_scores())
        .collect();

    if valid.is_empty() {
        return CallMetrics::default();
    }

    if let (Some(manager), Some(client)) = (&selection.manager, &selection.client) {
        if let Some(record) = find_exact_pair(&valid, manager, client) {
            debug!(
                "exact-pair metrics for {} / {}",
                record.manager_name, record.client_phone
            );
            return CallMetrics::from_record(record);
        }
    }

    aggregate_metrics(&valid)
}

/// Locate the record matching the selected manager name and client phone
/// (trimmed). Among several matches the chronologically latest wins;
/// equal timestamps resolve to the later input position.
fn find_exact_pair<'a>(
    records: &[&'a CallRecord],
    manager: &str,
    client: &str,
) -> Option<&'a CallRecord> {
    let manager = manager.trim();
    let client = client.trim();

    let mut best: Option<(&'a CallRecord, CallTimestamp)> = None;
    for &record in records {
        if record.manager_name.trim() != manager || record.client_phone.trim() != client {
            continue;
        }
        let timestamp = record.timestamp();
        match &best {
            Some((_, best_ts)) if timestamp < *best_ts => {}
            _ => best = Some((record, timestamp)),
        }
    }
    best.map(|(record, _)| record)
}

/// Arithmetic mean of each score across the set, rounded to 2 decimals.
fn aggregate_metrics(records: &[&CallRecord]) -> CallMetrics {
    let count = records.len() as f64;
    let sums = records.iter().fold([0.0; 5], |mut acc, record| {
        for (slot, score) in acc.iter_mut().zip(record.scores()) {
            *slot += score;
        }
        acc
    });

    CallMetrics {
        avg_quality: round2(sums[0] / count),
        avg_script: round2(sums[1] / count),
        avg_errors: round2(sums[2] / count),
        avg_rating: round2(sums[3] / count),
        avg_kpi: round2(sums[4] / count),
    }
}
