//! Core data models for the employee roster importer
//!
//! This module contains the decoded `Employee` record produced from one
//! spreadsheet row, along with the cell representation and decoding
//! machinery used to build it.

pub mod cell;
pub mod decode;
pub mod sheet;

pub use cell::CellValue;
pub use decode::{decode_row, RowError, RowErrorKind};
pub use sheet::{read_workbook, ParsedSheet, SheetError};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Employee gender as recorded in the roster
///
/// Roster cells carry `L` (laki-laki) or `P` (perempuan); anything absent or
/// unrecognized decodes to `L`, matching the legacy import behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum JenisKelamin {
    /// Laki-laki (male)
    #[default]
    L,
    /// Perempuan (female)
    P,
}

/// One decoded roster row
///
/// Field order mirrors the 34 fixed columns of the source spreadsheet.
/// Every field is populated on decode: optional columns become `None`,
/// required columns fall back to a default (`""`, `0`, or today's date for
/// the four required date columns). Records are immutable once decoded and
/// are replaced wholesale on re-import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Retirement effective date (column 1); today when the cell is blank
    pub tmt_pensiun: NaiveDate,
    /// New-format employee number (column 2)
    pub nip_baru: String,
    /// Full name (column 3)
    pub nama: String,
    /// Birthplace (column 4)
    pub tempat_lahir: String,
    /// Birth date (column 5); today when the cell is blank
    pub tanggal_lahir: NaiveDate,
    /// Gender (column 6)
    pub jenis_kelamin: JenisKelamin,
    /// Religion (column 7)
    pub agama: String,
    /// Marital status (column 8)
    pub status_perkawinan: String,
    /// Home address (column 9)
    pub alamat: String,
    /// Phone number (column 10)
    pub telpon: String,
    /// Current work unit / SKPD (column 11)
    pub skpd_sekarang: String,
    /// Rank/grade (column 12)
    pub a_gol: String,
    /// Grade effective date (column 13)
    pub a_tmt: NaiveDate,
    /// Years in grade (column 14)
    pub th: i64,
    /// Months in grade (column 15)
    pub bl: i64,
    /// Education (column 16)
    pub pendidikan: String,
    /// Education year (column 17)
    pub p_th: i64,
    /// Position (column 18)
    pub jabatan: String,
    /// Position effective date (column 19)
    pub j_tmt: NaiveDate,
    /// Echelon (column 20)
    pub es: Option<String>,
    /// Position note (column 21)
    pub ket_jabatan: Option<String>,
    /// First structural-position effective date (column 22)
    pub tmt_pertama_jab_struk: Option<NaiveDate>,
    /// Structural training (column 23)
    pub latih_struk: Option<String>,
    /// Structural training year (column 24)
    pub thn_latih_struk: Option<i64>,
    /// Employment status (column 25)
    pub status: String,
    /// Current employee number / NIP (column 26); formula-result aware
    pub nip: String,
    /// Disciplinary record (column 27)
    pub hukuman_disiplin: Option<String>,
    /// Outgoing-mutation decree number (column 28)
    pub no_sk_mutasi: Option<String>,
    /// Mutation date (column 29)
    pub tgl_mutasi: Option<NaiveDate>,
    /// Incoming-mutation decree number (column 30)
    pub no_sk_mutasi_masuk: Option<String>,
    /// Incoming-transfer effective date (column 31)
    pub tmt_pindah_masuk: Option<NaiveDate>,
    /// Origin unit (column 32)
    pub asal: Option<String>,
    /// Education level (column 33)
    pub tk_pend: Option<String>,
    /// National ID / NIK (column 34)
    pub nik: Option<String>,
    /// Names of required date fields that were blank or unparseable in the
    /// source and received the today-fallback. Empty for fully clean rows.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub defaulted_fields: Vec<String>,
}
