//! Builds canonical call records from raw positional rows.

use crate::core::{CallRecord, CellValue, Column, RawRow};
use crate::normalize::{normalize_date, normalize_number, normalize_time, TimeFallback};

// Spreadsheet null-date artifacts normalize to the 1899 epoch year.
const NULL_DATE_SENTINEL: &str = "1899";

/// Map one raw row onto a call record using the positional schema.
pub fn build_record(row: &RawRow, time_fallback: TimeFallback) -> CallRecord {
    CallRecord {
        date: normalize_date(row.cell(Column::Date)),
        time: normalize_time(row.cell(Column::Time), time_fallback),
        manager_id: text_cell(row, Column::ManagerId),
        manager_name: trimmed_cell(row, Column::ManagerName),
        link: text_cell(row, Column::Link),
        client_phone: trimmed_cell(row, Column::ClientPhone),
        client_id: text_cell(row, Column::ClientId),
        duration: text_cell(row, Column::Duration),
        quality_of_call: normalize_number(row.cell(Column::QualityOfCall)),
        script_match: normalize_number(row.cell(Column::ScriptMatch)),
        errors_free: normalize_number(row.cell(Column::ErrorsFree)),
        overall_rating: normalize_number(row.cell(Column::OverallRating)),
        kpi: normalize_number(row.cell(Column::Kpi)),
        recommendations: text_cell(row, Column::Recommendations),
        brief: text_cell(row, Column::Brief),
        next_best_action: text_cell(row, Column::NextBestAction),
    }
}

/// Validity filter applied before a record enters any downstream set:
/// a record needs a manager name, a client phone, and a real date.
pub fn is_valid(record: &CallRecord) -> bool {
    !record.manager_name.is_empty()
        && !record.client_phone.is_empty()
        && !record.date.is_empty()
        && !record.date.contains(NULL_DATE_SENTINEL)
}

/// Build and filter all records of a raw row set, preserving row order.
pub fn build_records(rows: &[RawRow], time_fallback: TimeFallback) -> Vec<CallRecord> {
    rows.iter()
        .map(|row| build_record(row, time_fallback))
        .filter(is_valid)
        .collect()
}

fn text_cell(row: &RawRow, column: Column) -> String {
    row.cell(column).map(CellValue::display).unwrap_or_default()
}

fn trimmed_cell(row: &RawRow, column: Column) -> String {
    row.cell(column)
        .map(|cell| cell.display().trim().to_string())
        .unwrap_or_default()
}
