//! Cache store for parsed employee rosters
//!
//! Persists the decoded employee list plus a metadata record describing the
//! source file it came from. Freshness is exact identity: a cache entry is
//! only served when both the stored source path and the stored modification
//! time match the requested file.

use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::data::Employee;

/// File name of the serialized employee list
const PAYLOAD_FILE: &str = "employees.json";

/// File name of the source-identity metadata record
const META_FILE: &str = "employees.meta.json";

/// Errors raised when reading or writing the roster cache
///
/// Callers treat any of these as a cache miss; they never abort an import.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Reading or writing a cache file failed
    #[error("cache I/O failed: {0}")]
    Io(#[from] io::Error),

    /// A cache file exists but does not hold what it should
    #[error("cache content is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Identity of the source file a cache entry was parsed from
///
/// Stored with camelCase keys so the on-disk metadata stays readable as
/// `{ "mtimeMs": ..., "filePath": ..., "cachedAt": ... }`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CacheMeta {
    /// Source file modification time, in whole milliseconds since the epoch
    mtime_ms: i64,
    /// Source file path as supplied by the caller
    file_path: PathBuf,
    /// When this cache entry was written
    cached_at: DateTime<Utc>,
}

/// Manages the on-disk roster cache
///
/// The store keeps two sibling JSON files in a per-user application data
/// directory (`~/.local/share/sicuti/data/` on Linux, or the platform
/// equivalent): the employee payload and the metadata record. Date fields
/// round-trip through their ISO-8601 string form.
#[derive(Debug, Clone)]
pub struct CacheStore {
    /// Directory where the cache files are stored
    data_dir: PathBuf,
}

impl CacheStore {
    /// Creates a new CacheStore under the per-user application data directory
    ///
    /// Returns `None` if the data directory cannot be determined (e.g., no
    /// home directory).
    pub fn new() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "sicuti")?;
        let data_dir = project_dirs.data_dir().join("data");
        Some(Self { data_dir })
    }

    /// Creates a new CacheStore with a custom data directory
    ///
    /// Useful for testing or when a specific cache location is needed.
    pub fn with_dir(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    /// Path of the serialized employee list
    fn payload_path(&self) -> PathBuf {
        self.data_dir.join(PAYLOAD_FILE)
    }

    /// Path of the metadata record
    fn meta_path(&self) -> PathBuf {
        self.data_dir.join(META_FILE)
    }

    /// Ensures the data directory exists; idempotent
    pub fn ensure_ready(&self) -> io::Result<()> {
        fs::create_dir_all(&self.data_dir)
    }

    /// Whether the cache holds data parsed from exactly this source file
    ///
    /// True only when the stored path and modification time both match.
    /// Missing or unreadable metadata is "not fresh", never an error.
    pub fn is_fresh(&self, source: &Path, mtime_ms: i64) -> bool {
        let meta = match self.read_meta() {
            Some(meta) => meta,
            None => return false,
        };
        meta.mtime_ms == mtime_ms && meta.file_path == source
    }

    fn read_meta(&self) -> Option<CacheMeta> {
        let raw = fs::read_to_string(self.meta_path()).ok()?;
        serde_json::from_str(&raw).ok()
    }

    /// Loads the cached employee list
    ///
    /// Date fields are reconstructed from their serialized ISO-8601 form.
    /// Fails with [`CacheError`] on missing or corrupt cache files; the
    /// caller treats that as a miss and re-parses.
    pub fn load(&self) -> Result<Vec<Employee>, CacheError> {
        let raw = fs::read_to_string(self.payload_path())?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Writes the employee list and its source-identity metadata
    pub fn store(
        &self,
        employees: &[Employee],
        source: &Path,
        mtime_ms: i64,
    ) -> Result<(), CacheError> {
        self.ensure_ready()?;

        let payload = serde_json::to_string_pretty(employees)?;
        fs::write(self.payload_path(), payload)?;

        let meta = CacheMeta {
            mtime_ms,
            file_path: source.to_path_buf(),
            cached_at: Utc::now(),
        };
        fs::write(self.meta_path(), serde_json::to_string(&meta)?)?;

        Ok(())
    }

    /// Deletes the cache payload and metadata
    ///
    /// Absence of either file is not an error.
    pub fn clear(&self) -> io::Result<()> {
        for path in [self.payload_path(), self.meta_path()] {
            match fs::remove_file(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::JenisKelamin;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_store() -> (CacheStore, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = CacheStore::with_dir(temp_dir.path().to_path_buf());
        (store, temp_dir)
    }

    fn sample_employees() -> Vec<Employee> {
        vec![Employee {
            tmt_pensiun: NaiveDate::from_ymd_opt(2031, 5, 1).unwrap(),
            nip_baru: "197305012000031004".to_string(),
            nama: "Budi Santoso".to_string(),
            tempat_lahir: "Bandung".to_string(),
            tanggal_lahir: NaiveDate::from_ymd_opt(1973, 5, 1).unwrap(),
            jenis_kelamin: JenisKelamin::L,
            agama: "Islam".to_string(),
            status_perkawinan: "Kawin".to_string(),
            alamat: "Jl. Merdeka 10".to_string(),
            telpon: "081234567890".to_string(),
            skpd_sekarang: "Dinas Pendidikan".to_string(),
            a_gol: "IV/a".to_string(),
            a_tmt: NaiveDate::from_ymd_opt(2019, 4, 1).unwrap(),
            th: 5,
            bl: 3,
            pendidikan: "S1 Administrasi".to_string(),
            p_th: 1996,
            jabatan: "Kepala Seksi".to_string(),
            j_tmt: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            es: Some("IV.a".to_string()),
            ket_jabatan: None,
            tmt_pertama_jab_struk: NaiveDate::from_ymd_opt(2015, 7, 1),
            latih_struk: None,
            thn_latih_struk: None,
            status: "PNS".to_string(),
            nip: "197305012000031004".to_string(),
            hukuman_disiplin: None,
            no_sk_mutasi: None,
            tgl_mutasi: None,
            no_sk_mutasi_masuk: None,
            tmt_pindah_masuk: None,
            asal: None,
            tk_pend: Some("S1".to_string()),
            nik: None,
            defaulted_fields: Vec::new(),
        }]
    }

    #[test]
    fn test_store_then_load_roundtrip() {
        let (store, _temp_dir) = create_test_store();
        let employees = sample_employees();
        let source = Path::new("/data/roster.xlsx");

        store.store(&employees, source, 1_700_000_000_000).unwrap();
        let loaded = store.load().unwrap();

        assert_eq!(loaded, employees);
        // Dates come back as calendar dates, not strings.
        assert_eq!(
            loaded[0].tmt_pensiun,
            NaiveDate::from_ymd_opt(2031, 5, 1).unwrap()
        );
    }

    #[test]
    fn test_is_fresh_requires_exact_identity() {
        let (store, _temp_dir) = create_test_store();
        let source = Path::new("/data/roster.xlsx");

        store.store(&sample_employees(), source, 1_700_000_000_000).unwrap();

        assert!(store.is_fresh(source, 1_700_000_000_000));
        assert!(!store.is_fresh(source, 1_700_000_000_001));
        assert!(!store.is_fresh(Path::new("/data/other.xlsx"), 1_700_000_000_000));
    }

    #[test]
    fn test_is_fresh_without_metadata_is_false() {
        let (store, _temp_dir) = create_test_store();

        assert!(!store.is_fresh(Path::new("/data/roster.xlsx"), 1));
    }

    #[test]
    fn test_is_fresh_with_corrupt_metadata_is_false() {
        let (store, _temp_dir) = create_test_store();
        store.ensure_ready().unwrap();
        fs::write(store.meta_path(), "{not json").unwrap();

        assert!(!store.is_fresh(Path::new("/data/roster.xlsx"), 1));
    }

    #[test]
    fn test_load_missing_payload_is_an_error() {
        let (store, _temp_dir) = create_test_store();

        let result = store.load();
        assert!(matches!(result, Err(CacheError::Io(_))));
    }

    #[test]
    fn test_load_corrupt_payload_is_an_error() {
        let (store, _temp_dir) = create_test_store();
        store.ensure_ready().unwrap();
        fs::write(store.payload_path(), "[{\"nama\":").unwrap();

        let result = store.load();
        assert!(matches!(result, Err(CacheError::Corrupt(_))));
    }

    #[test]
    fn test_metadata_uses_camel_case_keys() {
        let (store, _temp_dir) = create_test_store();
        let source = Path::new("/data/roster.xlsx");

        store.store(&sample_employees(), source, 42).unwrap();
        let raw = fs::read_to_string(store.meta_path()).unwrap();

        assert!(raw.contains("\"mtimeMs\":42"));
        assert!(raw.contains("\"filePath\""));
        assert!(raw.contains("\"cachedAt\""));
    }

    #[test]
    fn test_store_creates_directory_if_missing() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("nested").join("data");
        let store = CacheStore::with_dir(nested.clone());

        store.store(&sample_employees(), Path::new("/r.xlsx"), 1).unwrap();

        assert!(nested.join(PAYLOAD_FILE).exists());
        assert!(nested.join(META_FILE).exists());
    }

    #[test]
    fn test_clear_removes_both_files() {
        let (store, _temp_dir) = create_test_store();
        store.store(&sample_employees(), Path::new("/r.xlsx"), 1).unwrap();

        store.clear().unwrap();

        assert!(!store.payload_path().exists());
        assert!(!store.meta_path().exists());
    }

    #[test]
    fn test_clear_is_idempotent() {
        let (store, _temp_dir) = create_test_store();

        store.clear().unwrap();
        store.clear().unwrap();
    }

    #[test]
    fn test_overwrite_replaces_previous_entry() {
        let (store, _temp_dir) = create_test_store();
        let mut employees = sample_employees();

        store.store(&employees, Path::new("/r.xlsx"), 1).unwrap();
        employees[0].nama = "Siti Rahayu".to_string();
        store.store(&employees, Path::new("/r.xlsx"), 2).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded[0].nama, "Siti Rahayu");
        assert!(store.is_fresh(Path::new("/r.xlsx"), 2));
        assert!(!store.is_fresh(Path::new("/r.xlsx"), 1));
    }
}
