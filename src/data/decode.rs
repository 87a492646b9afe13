//! Row decoder for roster spreadsheets
//!
//! Turns one raw spreadsheet row (34 cells, 1-indexed by column) into an
//! [`Employee`]. Source data quality is assumed poor, so every field is
//! coerced defensively: optional columns decode to `None` when blank or
//! malformed, required columns fall back to `""`, `0`, or today's date.
//! Only structurally broken rows (entirely empty, or carrying a spreadsheet
//! error value) fail, and the sheet reader drops those individually.

use chrono::{Duration, Local, NaiveDate};
use thiserror::Error;

use super::cell::CellValue;
use super::{Employee, JenisKelamin};

/// A row-level decode failure, identified by its 1-indexed sheet row
#[derive(Debug, Clone, Error)]
#[error("row {row}: {kind}")]
pub struct RowError {
    /// 1-indexed spreadsheet row number
    pub row: usize,
    /// What made the row undecodable
    pub kind: RowErrorKind,
}

/// Why a row could not be decoded at all
#[derive(Debug, Clone, Error)]
pub enum RowErrorKind {
    /// Every cell in the row is empty
    #[error("row is entirely empty")]
    Empty,
    /// A cell carries a spreadsheet error value such as `#DIV/0!`
    #[error("column {column} holds a spreadsheet error value: {message}")]
    CellError { column: usize, message: String },
}

static EMPTY_CELL: CellValue = CellValue::Empty;

/// Returns the cell at a 1-indexed column, treating missing cells as empty
fn cell(cells: &[CellValue], column: usize) -> &CellValue {
    cells.get(column - 1).unwrap_or(&EMPTY_CELL)
}

/// Blankness follows the legacy importer's truthiness rules: empty cells,
/// empty strings, numeric zero and `false` all count as absent.
fn is_blank(cell: &CellValue) -> bool {
    match cell {
        CellValue::Empty => true,
        CellValue::Text(s) => s.is_empty(),
        CellValue::Number(n) => *n == 0.0,
        CellValue::Bool(b) => !b,
        CellValue::Formula { result, .. } => is_blank(result),
        CellValue::DateTime(_) | CellValue::Error(_) => false,
    }
}

/// Textual form of a cell; `None` when blank. Formula cells render their
/// cached result, not the formula text.
fn safe_string(value: &CellValue) -> Option<String> {
    if is_blank(value) {
        return None;
    }
    match value {
        CellValue::Empty => None,
        CellValue::Text(s) => Some(s.clone()),
        CellValue::Number(n) => Some(format_number(*n)),
        CellValue::Bool(b) => Some(b.to_string()),
        CellValue::DateTime(dt) => Some(dt.format("%Y-%m-%d %H:%M:%S").to_string()),
        CellValue::Error(message) => Some(message.clone()),
        CellValue::Formula { result, .. } => safe_string(result),
    }
}

/// Integer form of a cell; `None` when blank or non-numeric
fn safe_number(value: &CellValue) -> Option<i64> {
    safe_string(value).as_deref().and_then(parse_int_prefix)
}

/// Calendar-date form of a cell; `None` when blank or unparseable
fn safe_date(value: &CellValue) -> Option<NaiveDate> {
    if is_blank(value) {
        return None;
    }
    match value {
        CellValue::DateTime(dt) => Some(dt.date()),
        CellValue::Number(serial) => serial_to_date(*serial),
        CellValue::Text(s) => parse_date_text(s),
        CellValue::Formula { result, .. } => safe_date(result),
        CellValue::Empty | CellValue::Bool(_) | CellValue::Error(_) => None,
    }
}

/// Renders integral floats without the trailing `.0` Excel never shows
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// Base-10 integer prefix parse: optional sign, leading digits, everything
/// after the digits ignored (`"12abc"` parses as 12, `"3.7"` as 3).
fn parse_int_prefix(s: &str) -> Option<i64> {
    let trimmed = s.trim();
    let (sign, rest) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let digit_count = rest.bytes().take_while(|b| b.is_ascii_digit()).count();
    if digit_count == 0 {
        return None;
    }
    rest[..digit_count].parse::<i64>().ok().map(|n| sign * n)
}

/// Excel 1900-system serial dates. The epoch sits at 1899-12-30 so the
/// fictitious 1900 leap day cancels out for every modern serial.
fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    // 2958465 is 9999-12-31, Excel's last representable day.
    if !(1.0..=2_958_465.0).contains(&serial) {
        return None;
    }
    NaiveDate::from_ymd_opt(1899, 12, 30)
        .and_then(|epoch| epoch.checked_add_signed(Duration::days(serial as i64)))
}

/// Accepted textual date layouts: ISO-8601 first, then the day-first forms
/// common in Indonesian rosters.
const DATE_TEXT_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y"];

fn parse_date_text(s: &str) -> Option<NaiveDate> {
    let trimmed = s.trim();
    // Drop any time-of-day suffix ("2024-05-01T00:00:00", "01/05/2024 07:30").
    let date_part = trimmed.split(['T', ' ']).next().unwrap_or(trimmed);
    DATE_TEXT_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(date_part, format).ok())
}

fn parse_jenis_kelamin(value: &CellValue) -> JenisKelamin {
    match safe_string(value).as_deref().map(str::trim) {
        Some(s) if s.eq_ignore_ascii_case("P") => JenisKelamin::P,
        _ => JenisKelamin::L,
    }
}

/// Decodes one roster row into an [`Employee`]
///
/// `cells` holds the raw row in column order; `row_number` is the 1-indexed
/// spreadsheet row, used only for error reporting. Fails only on structural
/// problems — an entirely empty row, or a spreadsheet error value in any
/// cell. Malformed but present content never fails; it coerces with the
/// per-field fallback rules, and required date columns that fall back to
/// today are recorded in [`Employee::defaulted_fields`].
pub fn decode_row(cells: &[CellValue], row_number: usize) -> Result<Employee, RowError> {
    if cells.iter().all(|c| matches!(c, CellValue::Empty)) {
        return Err(RowError {
            row: row_number,
            kind: RowErrorKind::Empty,
        });
    }
    for (index, value) in cells.iter().enumerate() {
        if let CellValue::Error(message) = value {
            return Err(RowError {
                row: row_number,
                kind: RowErrorKind::CellError {
                    column: index + 1,
                    message: message.clone(),
                },
            });
        }
    }

    let text = |column: usize| safe_string(cell(cells, column));
    let required_text = |column: usize| text(column).unwrap_or_default();
    let number = |column: usize| safe_number(cell(cells, column));
    let required_number = |column: usize| number(column).unwrap_or(0);
    let date = |column: usize| safe_date(cell(cells, column));

    let mut defaulted_fields = Vec::new();
    let mut required_date = |column: usize, field: &str| {
        date(column).unwrap_or_else(|| {
            defaulted_fields.push(field.to_string());
            Local::now().date_naive()
        })
    };

    let tmt_pensiun = required_date(1, "tmt_pensiun");
    let tanggal_lahir = required_date(5, "tanggal_lahir");
    let a_tmt = required_date(13, "a_tmt");
    let j_tmt = required_date(19, "j_tmt");

    Ok(Employee {
        tmt_pensiun,
        nip_baru: required_text(2),
        nama: required_text(3),
        tempat_lahir: required_text(4),
        tanggal_lahir,
        jenis_kelamin: parse_jenis_kelamin(cell(cells, 6)),
        agama: required_text(7),
        status_perkawinan: required_text(8),
        alamat: required_text(9),
        telpon: required_text(10),
        skpd_sekarang: required_text(11),
        a_gol: required_text(12),
        a_tmt,
        th: required_number(14),
        bl: required_number(15),
        pendidikan: required_text(16),
        p_th: required_number(17),
        jabatan: required_text(18),
        j_tmt,
        es: text(20),
        ket_jabatan: text(21),
        tmt_pertama_jab_struk: date(22),
        latih_struk: text(23),
        thn_latih_struk: number(24),
        status: required_text(25),
        nip: required_text(26),
        hukuman_disiplin: text(27),
        no_sk_mutasi: text(28),
        tgl_mutasi: date(29),
        no_sk_mutasi_masuk: text(30),
        tmt_pindah_masuk: date(31),
        asal: text(32),
        tk_pend: text(33),
        nik: text(34),
        defaulted_fields,
    })
}
