//! Pipeline facade: one pure, synchronous transform from raw rows plus a
//! filter selection to canonical record sets and metrics.
//!
//! Each invocation is independent and idempotent; callers that refresh
//! concurrently must serialize invocations or discard stale results.

use serde::{Deserialize, Serialize};

use crate::builder::build_records;
use crate::core::{CallMetrics, CallRecord, FilterSelection, RawRow};
use crate::dedup::dedup_records;
use crate::filters::{apply_selection, available_clients, available_managers};
use crate::group::group_records;
use crate::metrics::compute_metrics;
use crate::normalize::TimeFallback;

/// Everything one pipeline invocation produces.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PipelineOutput {
    /// Deduplicated records, one per physical call event (detail views).
    pub detail: Vec<CallRecord>,
    /// Grouped records, one per manager-client relationship.
    pub summary: Vec<CallRecord>,
    /// Metrics over the filtered summary set under the given selection.
    pub metrics: CallMetrics,
    /// Distinct manager names available under the current client selection.
    pub managers: Vec<String>,
    /// Distinct client phones available under the current manager selection.
    pub clients: Vec<String>,
}

/// Run the full pipeline over an already-retrieved raw row set.
///
/// The detail path keeps unparseable times as raw passthrough for table
/// display; the summary path that feeds the metrics engine normalizes
/// them to empty instead. The selector option lists come from the full
/// deduplicated set, cross-filtered only by the opposite selection.
pub fn run(rows: &[RawRow], selection: &FilterSelection) -> PipelineOutput {
    let detail_records = build_records(rows, TimeFallback::RawPassthrough);
    let deduped = dedup_records(&detail_records);
    let managers = available_managers(&deduped, selection.client.as_deref());
    let clients = available_clients(&deduped, selection.manager.as_deref());
    let detail = apply_selection(&deduped, selection);

    let summary_records = build_records(rows, TimeFallback::Empty);
    let summary = apply_selection(&group_records(&summary_records), selection);

    let metrics = compute_metrics(&summary, selection);

    PipelineOutput {
        detail,
        summary,
        metrics,
        managers,
        clients,
    }
}
