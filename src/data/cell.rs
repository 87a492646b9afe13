//! Raw cell representation for roster rows
//!
//! Decouples the row decoder from the workbook backend: the sheet reader
//! maps every `calamine::Data` cell into a `CellValue`, tagging cells that
//! carry a formula so the decoder can unwrap their cached result.

use calamine::Data;
use chrono::NaiveDateTime;

/// A single raw spreadsheet cell
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Cell is absent or blank
    Empty,
    /// Plain text content
    Text(String),
    /// Numeric content (integers and floats share Excel's f64 storage)
    Number(f64),
    /// Boolean content
    Bool(bool),
    /// Date/time content, already resolved from Excel's serial form
    DateTime(NaiveDateTime),
    /// Spreadsheet error value such as `#DIV/0!` or `#N/A`
    Error(String),
    /// A formula cell: the formula text plus its cached result value
    Formula {
        formula: String,
        result: Box<CellValue>,
    },
}

impl From<&Data> for CellValue {
    fn from(data: &Data) -> Self {
        match data {
            Data::Empty => CellValue::Empty,
            Data::String(s) => CellValue::Text(s.clone()),
            Data::Float(f) => CellValue::Number(*f),
            Data::Int(i) => CellValue::Number(*i as f64),
            Data::Bool(b) => CellValue::Bool(*b),
            Data::DateTime(dt) => match dt.as_datetime() {
                Some(resolved) => CellValue::DateTime(resolved),
                // Serial values outside chrono's range stay numeric and go
                // through the serial-date fallback in the decoder.
                None => CellValue::Number(dt.as_f64()),
            },
            Data::DateTimeIso(s) => CellValue::Text(s.clone()),
            Data::DurationIso(s) => CellValue::Text(s.clone()),
            Data::Error(e) => CellValue::Error(e.to_string()),
        }
    }
}
