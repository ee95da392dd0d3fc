pub mod errors;
pub mod timestamp;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::timestamp::{parse_timestamp, CallTimestamp};

/// Number of positional cells in one exported row.
pub const COLUMN_COUNT: usize = 16;

/// Positional schema of the tabular export. The order is fixed by the
/// upstream sheet and must not be reordered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Column {
    Date = 0,
    Time = 1,
    ManagerId = 2,
    ManagerName = 3,
    Link = 4,
    ClientPhone = 5,
    ClientId = 6,
    Duration = 7,
    QualityOfCall = 8,
    ScriptMatch = 9,
    ErrorsFree = 10,
    OverallRating = 11,
    Kpi = 12,
    Recommendations = 13,
    Brief = 14,
    NextBestAction = 15,
}

/// One raw cell as exported: plain text, a number, or a boolean.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Bool(bool),
    Text(String),
}

impl CellValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Render the cell the way a spreadsheet consumer sees it.
    pub fn display(&self) -> String {
        match self {
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => n.to_string(),
            CellValue::Bool(b) => b.to_string(),
        }
    }
}

/// One raw row: 16 optional scalar slots, validated once at ingestion.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRow {
    cells: [Option<CellValue>; COLUMN_COUNT],
}

impl RawRow {
    /// Build a row from an ordered cell list, padding short rows and
    /// discarding anything past the positional schema.
    pub fn from_cells(cells: Vec<Option<CellValue>>) -> Self {
        let mut row = Self::default();
        for (slot, cell) in row.cells.iter_mut().zip(cells) {
            *slot = cell;
        }
        row
    }

    pub fn cell(&self, column: Column) -> Option<&CellValue> {
        self.cells[column as usize].as_ref()
    }

    pub fn set(&mut self, column: Column, value: CellValue) {
        self.cells[column as usize] = Some(value);
    }
}

/// Canonical representation of one call event, or of one synthesized
/// manager-client relationship summary produced by grouping.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CallRecord {
    pub date: String,
    pub time: String,
    pub manager_id: String,
    pub manager_name: String,
    pub link: String,
    pub client_phone: String,
    pub client_id: String,
    pub duration: String,
    pub quality_of_call: f64,
    pub script_match: f64,
    pub errors_free: f64,
    pub overall_rating: f64,
    pub kpi: f64,
    pub recommendations: String,
    pub brief: String,
    pub next_best_action: String,
}

impl CallRecord {
    /// Orderable timestamp of the record (invalid timestamps order first).
    pub fn timestamp(&self) -> CallTimestamp {
        let time = (!self.time.is_empty()).then_some(self.time.as_str());
        parse_timestamp(&self.date, time)
    }

    /// Event-level identity: exact date, time, manager id, client id.
    pub fn event_key(&self) -> (String, String, String, String) {
        (
            self.date.clone(),
            self.time.clone(),
            self.manager_id.clone(),
            self.client_id.clone(),
        )
    }

    /// Relationship-level identity: manager id plus client id.
    pub fn relationship_key(&self) -> (String, String) {
        (self.manager_id.clone(), self.client_id.clone())
    }

    pub fn scores(&self) -> [f64; 5] {
        [
            self.quality_of_call,
            self.script_match,
            self.errors_free,
            self.overall_rating,
            self.kpi,
        ]
    }

    pub fn has_finite_scores(&self) -> bool {
        self.scores().iter().all(|score| score.is_finite())
    }
}

/// Fixed-shape result of the metrics engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CallMetrics {
    pub avg_quality: f64,
    pub avg_script: f64,
    pub avg_errors: f64,
    pub avg_rating: f64,
    pub avg_kpi: f64,
}

impl CallMetrics {
    /// Metrics taken verbatim from a single record (exact-pair mode).
    pub fn from_record(record: &CallRecord) -> Self {
        Self {
            avg_quality: record.quality_of_call,
            avg_script: record.script_match,
            avg_errors: record.errors_free,
            avg_rating: record.overall_rating,
            avg_kpi: record.kpi,
        }
    }
}

/// Immutable filter selection passed into the pipeline. `None` means
/// "all" for manager/client and "unbounded" for the date range.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSelection {
    pub manager: Option<String>,
    pub client: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

impl FilterSelection {
    /// True when both a specific manager and a specific client are chosen.
    pub fn is_exact_pair(&self) -> bool {
        self.manager.is_some() && self.client.is_some()
    }
}
