//! Decodes the spreadsheet gviz export into raw rows.
//!
//! The export arrives as a JSONP-wrapped JSON document; the actual table
//! lives under `table.rows[].c[].v`. Cells may be missing, null, or carry
//! a string/number/boolean scalar. The wrapper and any cells past the
//! positional schema are discarded here, once, so the rest of the
//! pipeline only ever sees typed [`RawRow`] values.

use log::debug;
use serde::Deserialize;

use crate::core::errors::{Error, Result};
use crate::core::{CellValue, RawRow};

#[derive(Debug, Deserialize)]
struct GvizResponse {
    table: GvizTable,
}

#[derive(Debug, Deserialize)]
struct GvizTable {
    #[serde(default)]
    rows: Vec<GvizRow>,
}

#[derive(Debug, Deserialize)]
struct GvizRow {
    #[serde(default)]
    c: Vec<Option<GvizCell>>,
}

#[derive(Debug, Deserialize)]
struct GvizCell {
    #[serde(default)]
    v: Option<serde_json::Value>,
}

/// Parse a gviz response body (with or without its JSONP wrapper) into
/// the ordered raw row sequence the pipeline consumes.
pub fn parse_gviz_payload(text: &str) -> Result<Vec<RawRow>> {
    let json = extract_json(text)
        .ok_or_else(|| Error::payload("no JSON object found in payload"))?;
    let response: GvizResponse = serde_json::from_str(json)?;
    let rows: Vec<RawRow> = response.table.rows.into_iter().map(row_from_gviz).collect();
    debug!("decoded {} raw rows from payload", rows.len());
    Ok(rows)
}

// The wrapper is not stable across exports; slicing from the first to the
// last brace tolerates every observed variant.
fn extract_json(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start <= end).then(|| &text[start..=end])
}

fn row_from_gviz(row: GvizRow) -> RawRow {
    RawRow::from_cells(
        row.c
            .into_iter()
            .map(|cell| cell.and_then(|c| c.v).and_then(cell_value))
            .collect(),
    )
}

fn cell_value(value: serde_json::Value) -> Option<CellValue> {
    match value {
        serde_json::Value::String(s) => Some(CellValue::Text(s)),
        serde_json::Value::Number(n) => n.as_f64().map(CellValue::Number),
        serde_json::Value::Bool(b) => Some(CellValue::Bool(b)),
        _ => None,
    }
}
