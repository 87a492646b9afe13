//! Workbook reader for employee rosters
//!
//! Decodes an entire `.xlsx`/`.xls` roster into employee records. The first
//! worksheet is the roster, row 1 is the header, and every following row is
//! one employee. Individual rows that cannot be decoded are logged and
//! skipped so one corrupt row never aborts the import; only file-level
//! failures (unreadable workbook, no worksheet) are fatal.

use std::path::Path;

use calamine::{open_workbook_auto, Reader};
use thiserror::Error;
use tracing::{info, warn};

use super::cell::CellValue;
use super::decode::{decode_row, RowError};
use super::Employee;

/// How many decoded rows between progress log lines on large imports
const PROGRESS_INTERVAL: usize = 100;

/// Fatal errors while reading a roster workbook
#[derive(Debug, Error)]
pub enum SheetError {
    /// The workbook could not be opened or its binary format decoded
    #[error("failed to read workbook: {0}")]
    Workbook(#[from] calamine::Error),

    /// The workbook contains no worksheet at all
    #[error("no worksheet found in Excel file")]
    NoWorksheet,
}

/// Result of decoding one roster worksheet
#[derive(Debug)]
pub struct ParsedSheet {
    /// Decoded records, in sheet row order with the header excluded
    pub employees: Vec<Employee>,
    /// Number of rows successfully decoded
    pub rows_processed: usize,
    /// Rows that were dropped, with the reason each failed
    pub row_errors: Vec<RowError>,
}

/// Reads the first worksheet of the workbook at `path` into employee records
pub fn read_workbook(path: &Path) -> Result<ParsedSheet, SheetError> {
    let mut workbook = open_workbook_auto(path)?;

    let sheet_names = workbook.sheet_names().to_vec();
    let roster_sheet = sheet_names.first().cloned().ok_or(SheetError::NoWorksheet)?;

    let range = workbook.worksheet_range(&roster_sheet)?;
    // Formula text is best-effort: some legacy decoders don't expose it, and
    // the cached cell values are still usable without it.
    let formulas = workbook.worksheet_formula(&roster_sheet).ok();

    info!(
        sheet = %roster_sheet,
        rows = range.height(),
        "processing roster worksheet"
    );

    let (start_row, start_col) = range.start().unwrap_or((0, 0));

    let mut employees = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_processed = 0usize;

    for (offset, row) in range.rows().enumerate() {
        let row_number = start_row as usize + offset + 1;
        if row_number == 1 {
            // Header row
            continue;
        }

        // Pad to absolute columns so field positions hold even when the
        // sheet's used range does not start at column A.
        let mut cells: Vec<CellValue> = Vec::with_capacity(start_col as usize + row.len());
        cells.resize(start_col as usize, CellValue::Empty);
        for (col_offset, data) in row.iter().enumerate() {
            let value = CellValue::from(data);
            let formula = formulas.as_ref().and_then(|f| {
                f.get_value((start_row + offset as u32, start_col + col_offset as u32))
            });
            cells.push(match formula {
                Some(formula) if !formula.is_empty() => CellValue::Formula {
                    formula: formula.clone(),
                    result: Box::new(value),
                },
                _ => value,
            });
        }

        match decode_row(&cells, row_number) {
            Ok(employee) => {
                employees.push(employee);
                rows_processed += 1;
                if rows_processed % PROGRESS_INTERVAL == 0 {
                    info!(rows_processed, "roster import progress");
                }
            }
            Err(error) => {
                warn!(row = error.row, %error, "skipping undecodable roster row");
                row_errors.push(error);
            }
        }
    }

    info!(
        records = employees.len(),
        skipped = row_errors.len(),
        "roster worksheet processed"
    );

    Ok(ParsedSheet {
        employees,
        rows_processed,
        row_errors,
    })
}
