//! Call-record quality analytics pipeline.
//!
//! callgauge ingests tabular call-record exports, normalizes their
//! heterogeneous date/time/numeric encodings, deduplicates and groups
//! records by manager-client relationship, and derives aggregate quality
//! metrics. The pipeline is a pure, synchronous, in-memory transform:
//! given the same raw rows and the same filter selection it always
//! produces identical output.

// Export modules for library usage
pub mod builder;
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod dedup;
pub mod filters;
pub mod group;
pub mod ingest;
pub mod insights;
pub mod io;
pub mod metrics;
pub mod normalize;
pub mod pipeline;

// Re-export commonly used types
pub use crate::core::{
    CallMetrics, CallRecord, CellValue, Column, FilterSelection, RawRow, COLUMN_COUNT,
};

pub use crate::core::timestamp::{parse_timestamp, CallTimestamp};

pub use crate::builder::{build_record, build_records, is_valid};
pub use crate::dedup::dedup_records;
pub use crate::filters::{apply_selection, available_clients, available_managers};
pub use crate::group::{group_records, PARAGRAPH_SEPARATOR};
pub use crate::ingest::parse_gviz_payload;
pub use crate::metrics::compute_metrics;
pub use crate::normalize::{normalize_date, normalize_number, normalize_time, TimeFallback};
pub use crate::pipeline::PipelineOutput;

pub use crate::io::output::{create_writer, AnalysisReport, OutputWriter};
