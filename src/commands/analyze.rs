use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use log::{info, warn};
use std::path::PathBuf;

use crate::core::timestamp::parse_timestamp;
use crate::core::FilterSelection;
use crate::io::output::{create_writer, AnalysisReport, OutputFormat};
use crate::{config, ingest, insights, io, pipeline};

pub struct AnalyzeConfig {
    pub path: PathBuf,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    pub selection: FilterSelection,
    pub top: Option<usize>,
}

pub fn handle_analyze(config: AnalyzeConfig) -> Result<()> {
    let payload = io::read_file(&config.path)
        .with_context(|| format!("failed to read payload {}", config.path.display()))?;
    let rows = ingest::parse_gviz_payload(&payload)
        .with_context(|| format!("failed to decode payload {}", config.path.display()))?;
    info!("loaded {} raw rows from {}", rows.len(), config.path.display());

    let result = pipeline::run(&rows, &config.selection);
    info!(
        "pipeline produced {} events and {} relationships",
        result.detail.len(),
        result.summary.len()
    );
    warn_on_unknown_selection(&config.selection, &result);

    let report = build_report(&config, rows.len(), result);
    let mut writer = create_writer(config.format, config.output.as_deref())?;
    writer.write_report(&report)
}

// The selector option lists come from the unfiltered set, so a selection
// that matches nothing is a typo worth flagging (the output itself stays
// an ordinary empty result).
fn warn_on_unknown_selection(selection: &FilterSelection, result: &pipeline::PipelineOutput) {
    if let Some(manager) = &selection.manager {
        if !result.managers.iter().any(|m| m.trim() == manager.trim()) {
            warn!("manager '{manager}' does not appear in the data");
        }
    }
    if let Some(client) = &selection.client {
        if !result.clients.iter().any(|c| c.trim() == client.trim()) {
            warn!("client '{client}' does not appear in the data");
        }
    }
}

fn build_report(
    config: &AnalyzeConfig,
    total_rows: usize,
    result: pipeline::PipelineOutput,
) -> AnalysisReport {
    let thresholds = &config::get_config().performance;

    // Insights are computed over the full summary; --top only trims what
    // the record tables display.
    let trends = insights::quality_trends(&result.summary);
    let managers = insights::manager_performance(&result.summary);
    let distribution = insights::performance_distribution(&result.summary, thresholds);

    // The free-text panel only makes sense for one concrete relationship.
    let latest = if config.selection.is_exact_pair() {
        insights::latest_record(&result.summary).cloned()
    } else {
        None
    };

    let mut summary = result.summary;
    let mut detail = result.detail;
    if let Some(top) = config.top {
        summary.truncate(top);
        detail.truncate(top);
    }

    AnalysisReport {
        generated_at: Utc::now(),
        source: config.path.display().to_string(),
        total_rows,
        metrics: result.metrics,
        summary,
        detail,
        latest,
        trends,
        managers,
        distribution,
    }
}

/// Parse a DD.MM.YYYY command-line date argument.
pub fn parse_cli_date(value: &str) -> Result<NaiveDate> {
    parse_timestamp(value, None)
        .date()
        .ok_or_else(|| anyhow::anyhow!("unrecognized date '{value}' (expected DD.MM.YYYY)"))
}
