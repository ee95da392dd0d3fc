use crate::core::{CallMetrics, CallRecord};
use crate::insights::{DailyQuality, ManagerPerformance, PerformanceBand};
use chrono::{DateTime, Utc};
use colored::*;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum OutputFormat {
    Json,
    Markdown,
    Terminal,
}

/// Everything one analysis run hands to presentation consumers.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub generated_at: DateTime<Utc>,
    pub source: String,
    pub total_rows: usize,
    pub metrics: CallMetrics,
    pub summary: Vec<CallRecord>,
    pub detail: Vec<CallRecord>,
    /// Latest interaction of the selected pair (exact-pair selections only).
    pub latest: Option<CallRecord>,
    pub trends: Vec<DailyQuality>,
    pub managers: Vec<ManagerPerformance>,
    pub distribution: Vec<PerformanceBand>,
}

pub trait OutputWriter {
    fn write_report(&mut self, report: &AnalysisReport) -> anyhow::Result<()>;
}

pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for JsonWriter<W> {
    fn write_report(&mut self, report: &AnalysisReport) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(report)?;
        self.writer.write_all(json.as_bytes())?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }
}

pub struct MarkdownWriter<W: Write> {
    writer: W,
}

impl<W: Write> MarkdownWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for MarkdownWriter<W> {
    fn write_report(&mut self, report: &AnalysisReport) -> anyhow::Result<()> {
        self.write_header(report)?;
        self.write_metrics(report)?;
        self.write_latest(report)?;
        self.write_managers(report)?;
        self.write_distribution(report)?;
        self.write_relationships(report)?;
        Ok(())
    }
}

impl<W: Write> MarkdownWriter<W> {
    fn write_header(&mut self, report: &AnalysisReport) -> anyhow::Result<()> {
        writeln!(self.writer, "# Callgauge Report")?;
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "Generated: {}",
            report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        )?;
        writeln!(self.writer, "Source: {}", report.source)?;
        writeln!(self.writer)?;
        writeln!(self.writer, "| Metric | Value |")?;
        writeln!(self.writer, "|--------|-------|")?;
        writeln!(self.writer, "| Raw rows | {} |", report.total_rows)?;
        writeln!(self.writer, "| Call events | {} |", report.detail.len())?;
        writeln!(self.writer, "| Relationships | {} |", report.summary.len())?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_metrics(&mut self, report: &AnalysisReport) -> anyhow::Result<()> {
        let m = &report.metrics;
        writeln!(self.writer, "## Average Scores")?;
        writeln!(self.writer)?;
        writeln!(self.writer, "| Quality | Script | Errors Free | Rating | KPI |")?;
        writeln!(self.writer, "|---------|--------|-------------|--------|-----|")?;
        writeln!(
            self.writer,
            "| {} | {} | {} | {} | {} |",
            m.avg_quality, m.avg_script, m.avg_errors, m.avg_rating, m.avg_kpi
        )?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_latest(&mut self, report: &AnalysisReport) -> anyhow::Result<()> {
        let Some(latest) = &report.latest else {
            return Ok(());
        };
        writeln!(self.writer, "## Latest Interaction")?;
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "{} at {} with {} ({})",
            latest.date, latest.time, latest.client_phone, latest.manager_name
        )?;
        writeln!(self.writer)?;
        write_text_block(&mut self.writer, "Recommendations", &latest.recommendations)?;
        write_text_block(&mut self.writer, "Brief", &latest.brief)?;
        write_text_block(&mut self.writer, "Next Best Action", &latest.next_best_action)?;
        Ok(())
    }

    fn write_managers(&mut self, report: &AnalysisReport) -> anyhow::Result<()> {
        if report.managers.is_empty() {
            return Ok(());
        }
        writeln!(self.writer, "## Manager Performance")?;
        writeln!(self.writer)?;
        writeln!(self.writer, "| Manager | Calls | Avg Rating |")?;
        writeln!(self.writer, "|---------|-------|------------|")?;
        for entry in &report.managers {
            writeln!(
                self.writer,
                "| {} | {} | {} |",
                entry.manager, entry.calls, entry.rating
            )?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_distribution(&mut self, report: &AnalysisReport) -> anyhow::Result<()> {
        if report.distribution.is_empty() {
            return Ok(());
        }
        writeln!(self.writer, "## Rating Distribution")?;
        writeln!(self.writer)?;
        for band in &report.distribution {
            writeln!(self.writer, "- {}: {}", band.label, band.count)?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_relationships(&mut self, report: &AnalysisReport) -> anyhow::Result<()> {
        if report.summary.is_empty() {
            return Ok(());
        }
        writeln!(self.writer, "## Relationships")?;
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "| Date | Time | Manager | Client | Rating | KPI |"
        )?;
        writeln!(
            self.writer,
            "|------|------|---------|--------|--------|-----|"
        )?;
        for record in &report.summary {
            writeln!(
                self.writer,
                "| {} | {} | {} | {} | {} | {} |",
                record.date,
                record.time,
                record.manager_name,
                record.client_phone,
                record.overall_rating,
                record.kpi
            )?;
        }
        writeln!(self.writer)?;
        Ok(())
    }
}

fn write_text_block<W: Write>(writer: &mut W, title: &str, text: &str) -> anyhow::Result<()> {
    if text.is_empty() {
        return Ok(());
    }
    writeln!(writer, "### {title}")?;
    writeln!(writer)?;
    writeln!(writer, "{text}")?;
    writeln!(writer)?;
    Ok(())
}

pub struct TerminalWriter;

impl Default for TerminalWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalWriter {
    pub fn new() -> Self {
        Self
    }
}

impl OutputWriter for TerminalWriter {
    fn write_report(&mut self, report: &AnalysisReport) -> anyhow::Result<()> {
        print_header(report);
        print_metrics(report);
        print_latest(report);
        print_relationships(report);
        print_managers(report);
        print_distribution(report);
        Ok(())
    }
}

fn print_header(report: &AnalysisReport) {
    println!("{}", "Callgauge Report".bold().blue());
    println!("{}", "================".blue());
    println!();
    println!("Source: {}", report.source);
    println!(
        "Rows: {}  Events: {}  Relationships: {}",
        report.total_rows,
        report.detail.len(),
        report.summary.len()
    );
    println!();
}

fn print_metrics(report: &AnalysisReport) {
    let thresholds = &crate::config::get_config().performance;
    let m = &report.metrics;

    let rating = if m.avg_rating >= thresholds.excellent_min {
        m.avg_rating.to_string().green()
    } else if m.avg_rating >= thresholds.good_min {
        m.avg_rating.to_string().yellow()
    } else {
        m.avg_rating.to_string().red()
    };

    println!("{}", "Average Scores:".bold());
    println!("  Quality of call: {}", m.avg_quality);
    println!("  Script match:    {}", m.avg_script);
    println!("  Errors free:     {}", m.avg_errors);
    println!("  Overall rating:  {rating}");
    println!("  KPI:             {}", m.avg_kpi);
    println!();
}

fn print_latest(report: &AnalysisReport) {
    let Some(latest) = &report.latest else {
        return;
    };
    println!("{}", "Latest Interaction:".bold());
    println!(
        "  {} at {} with {} ({})",
        latest.date, latest.time, latest.client_phone, latest.manager_name
    );
    if !latest.recommendations.is_empty() {
        println!("  Recommendations: {}", latest.recommendations);
    }
    if !latest.brief.is_empty() {
        println!("  Brief: {}", latest.brief);
    }
    if !latest.next_best_action.is_empty() {
        println!("  Next best action: {}", latest.next_best_action);
    }
    println!();
}

fn print_relationships(report: &AnalysisReport) {
    if report.summary.is_empty() {
        println!("{}", "No records matched the selection".yellow());
        println!();
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Date", "Time", "Manager", "Client", "Rating", "KPI"]);
    for record in &report.summary {
        table.add_row(vec![
            record.date.clone(),
            record.time.clone(),
            record.manager_name.clone(),
            record.client_phone.clone(),
            record.overall_rating.to_string(),
            record.kpi.to_string(),
        ]);
    }
    println!("{table}");
    println!();
}

fn print_managers(report: &AnalysisReport) {
    if report.managers.is_empty() {
        return;
    }
    println!("{}", "Manager Performance:".bold());
    for entry in &report.managers {
        println!(
            "  {} - {} calls, avg rating {}",
            entry.manager.cyan(),
            entry.calls,
            entry.rating
        );
    }
    println!();
}

fn print_distribution(report: &AnalysisReport) {
    if report.distribution.is_empty() {
        return;
    }
    println!("{}", "Rating Distribution:".bold());
    for band in &report.distribution {
        println!("  {}: {}", band.label, band.count);
    }
    println!();
}

/// Build the writer for a format, targeting a file when one is given.
/// The terminal format always renders to stdout.
pub fn create_writer(
    format: OutputFormat,
    output: Option<&Path>,
) -> anyhow::Result<Box<dyn OutputWriter>> {
    match (format, output) {
        (OutputFormat::Terminal, Some(_)) => {
            anyhow::bail!("terminal output cannot be redirected to a file; use json or markdown")
        }
        (OutputFormat::Terminal, None) => Ok(Box::new(TerminalWriter::new())),
        (OutputFormat::Json, Some(path)) => {
            Ok(Box::new(JsonWriter::new(std::fs::File::create(path)?)))
        }
        (OutputFormat::Json, None) => Ok(Box::new(JsonWriter::new(std::io::stdout()))),
        (OutputFormat::Markdown, Some(path)) => {
            Ok(Box::new(MarkdownWriter::new(std::fs::File::create(path)?)))
        }
        (OutputFormat::Markdown, None) => Ok(Box::new(MarkdownWriter::new(std::io::stdout()))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> AnalysisReport {
        AnalysisReport {
            generated_at: DateTime::<Utc>::UNIX_EPOCH,
            source: "calls.json".to_string(),
            total_rows: 2,
            metrics: CallMetrics {
                avg_quality: 7.0,
                avg_script: 80.0,
                avg_errors: 90.0,
                avg_rating: 8.0,
                avg_kpi: 75.5,
            },
            summary: vec![CallRecord {
                date: "23.01.2025".to_string(),
                time: "09:00".to_string(),
                manager_name: "Ann".to_string(),
                client_phone: "555".to_string(),
                overall_rating: 8.0,
                ..CallRecord::default()
            }],
            detail: Vec::new(),
            latest: None,
            trends: Vec::new(),
            managers: vec![ManagerPerformance {
                manager: "Ann".to_string(),
                calls: 1,
                rating: 8.0,
            }],
            distribution: vec![PerformanceBand {
                label: "Excellent (8-10)".to_string(),
                count: 1,
            }],
        }
    }

    #[test]
    fn json_writer_round_trips_the_report() {
        let mut buffer = Vec::new();
        JsonWriter::new(&mut buffer)
            .write_report(&sample_report())
            .unwrap();
        let parsed: AnalysisReport = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(parsed.metrics.avg_rating, 8.0);
        assert_eq!(parsed.summary.len(), 1);
    }

    #[test]
    fn markdown_writer_emits_every_section() {
        let mut buffer = Vec::new();
        MarkdownWriter::new(&mut buffer)
            .write_report(&sample_report())
            .unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("# Callgauge Report"));
        assert!(text.contains("## Average Scores"));
        assert!(text.contains("## Manager Performance"));
        assert!(text.contains("## Relationships"));
        assert!(text.contains("| 23.01.2025 | 09:00 | Ann | 555 | 8 | 0 |"));
    }

    #[test]
    fn markdown_writer_renders_the_latest_interaction() {
        let mut report = sample_report();
        report.latest = Some(CallRecord {
            date: "24.01.2025".to_string(),
            time: "10:00".to_string(),
            manager_name: "Ann".to_string(),
            client_phone: "555".to_string(),
            recommendations: "Call back".to_string(),
            brief: "First call\n\nSecond call".to_string(),
            ..CallRecord::default()
        });
        let mut buffer = Vec::new();
        MarkdownWriter::new(&mut buffer).write_report(&report).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("## Latest Interaction"));
        assert!(text.contains("### Recommendations"));
        assert!(text.contains("First call\n\nSecond call"));
        // Empty panels are left out entirely.
        assert!(!text.contains("### Next Best Action"));
    }

    #[test]
    fn markdown_writer_skips_empty_sections() {
        let mut report = sample_report();
        report.managers.clear();
        report.distribution.clear();
        let mut buffer = Vec::new();
        MarkdownWriter::new(&mut buffer).write_report(&report).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(!text.contains("## Manager Performance"));
        assert!(!text.contains("## Rating Distribution"));
    }

    #[test]
    fn terminal_format_rejects_file_output() {
        let err = create_writer(OutputFormat::Terminal, Some(Path::new("out.txt")));
        assert!(err.is_err());
    }
}
