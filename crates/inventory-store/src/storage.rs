//! CSV storage for inventory records.

use crate::error::{StoreError, StoreResult, ValidationError};
use crate::record::{Price, Record, parse_quantity};
use camino::{Utf8Path, Utf8PathBuf};
use std::fmt;
use std::fs;
use std::io::Write;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

/// Storage file used when no override is configured.
pub const DEFAULT_FILE: &str = "inventory.csv";

/// Environment variable overriding the storage path.
pub const PATH_ENV: &str = "INVENTORY_FILE";

const FIELDS_PER_ROW: usize = 3;

/// Why a stored row was left out of a load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Row did not have exactly three fields
    FieldCount(usize),
    Quantity(ValidationError),
    Price(ValidationError),
    /// Row was not valid UTF-8
    Encoding,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FieldCount(n) => {
                write!(f, "expected {} fields, found {}", FIELDS_PER_ROW, n)
            }
            Self::Quantity(e) | Self::Price(e) => write!(f, "{}", e),
            Self::Encoding => write!(f, "row is not valid UTF-8"),
        }
    }
}

/// A stored row that could not be turned into a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    /// 1-based line in the storage file
    pub line: u64,
    pub fields: Vec<String>,
    pub reason: SkipReason,
}

impl fmt::Display for SkippedRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.reason)?;
        if !self.fields.is_empty() {
            write!(f, " [{}]", self.fields.join(","))?;
        }
        Ok(())
    }
}

/// Result of reading the storage file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Accepted records in file order
    pub records: Vec<Record>,
    /// Rows that were skipped, in file order
    pub skipped: Vec<SkippedRow>,
}

/// CSV-backed record storage.
#[derive(Debug, Clone)]
pub struct RecordStore {
    /// Path to the CSV file
    path: Utf8PathBuf,
}

impl RecordStore {
    /// Create a new storage instance.
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Storage path from `INVENTORY_FILE`, or `inventory.csv` in the
    /// working directory.
    pub fn default_path() -> Utf8PathBuf {
        match std::env::var(PATH_ENV) {
            Ok(custom) if !custom.trim().is_empty() => Utf8PathBuf::from(custom),
            _ => Utf8PathBuf::from(DEFAULT_FILE),
        }
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Directory holding the storage file.
    fn dir(&self) -> &Utf8Path {
        match self.path.parent() {
            Some(parent) if !parent.as_str().is_empty() => parent,
            _ => Utf8Path::new("."),
        }
    }

    /// Ensure storage directory exists.
    fn ensure_dir(&self) -> StoreResult<()> {
        let dir = self.dir();
        fs::create_dir_all(dir).map_err(|e| StoreError::io(dir, e))
    }

    /// Load every record, creating an empty file if none exists.
    ///
    /// Malformed rows are skipped and reported; only I/O failures are
    /// returned as errors.
    pub fn load(&self) -> StoreResult<LoadReport> {
        if !self.path.exists() {
            self.ensure_dir()?;
            fs::File::create(&self.path).map_err(|e| StoreError::io(&self.path, e))?;
            debug!(path = %self.path, "created empty inventory file");
            return Ok(LoadReport::default());
        }

        let file = fs::File::open(&self.path).map_err(|e| StoreError::io(&self.path, e))?;
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(file);

        let mut report = LoadReport::default();
        for row in reader.records() {
            let row = match row {
                Ok(row) => row,
                Err(e) if e.is_io_error() => return Err(StoreError::csv(&self.path, e)),
                Err(e) => {
                    let line = e.position().map(|p| p.line()).unwrap_or_default();
                    self.skip(&mut report, line, Vec::new(), SkipReason::Encoding);
                    continue;
                }
            };

            let line = row.position().map(|p| p.line()).unwrap_or_default();
            let fields: Vec<String> = row.iter().map(String::from).collect();

            if fields.len() != FIELDS_PER_ROW {
                let count = fields.len();
                self.skip(&mut report, line, fields, SkipReason::FieldCount(count));
                continue;
            }

            let quantity = match parse_quantity(&fields[1]) {
                Ok(quantity) => quantity,
                Err(e) => {
                    self.skip(&mut report, line, fields, SkipReason::Quantity(e));
                    continue;
                }
            };
            let price = match Price::parse(&fields[2]) {
                Ok(price) => price,
                Err(e) => {
                    self.skip(&mut report, line, fields, SkipReason::Price(e));
                    continue;
                }
            };

            report
                .records
                .push(Record::new(fields[0].clone(), quantity, price));
        }

        debug!(
            path = %self.path,
            records = report.records.len(),
            skipped = report.skipped.len(),
            "loaded inventory"
        );
        Ok(report)
    }

    fn skip(&self, report: &mut LoadReport, line: u64, fields: Vec<String>, reason: SkipReason) {
        warn!(path = %self.path, line, %reason, "skipping malformed inventory row");
        report.skipped.push(SkippedRow {
            line,
            fields,
            reason,
        });
    }

    /// Replace the storage file with `records`, in order.
    ///
    /// Rows go to a temporary file next to the target which is then renamed
    /// over it, so a failed save leaves the previous contents in place.
    pub fn save(&self, records: &[Record]) -> StoreResult<()> {
        self.ensure_dir()?;

        let mut tmp =
            NamedTempFile::new_in(self.dir()).map_err(|e| StoreError::io(self.dir(), e))?;
        if let Ok(meta) = fs::metadata(&self.path) {
            tmp.as_file()
                .set_permissions(meta.permissions())
                .map_err(|e| StoreError::io(&self.path, e))?;
        }

        {
            let mut writer = csv::WriterBuilder::new()
                .has_headers(false)
                .from_writer(&mut tmp);
            for record in records {
                writer
                    .write_record([
                        record.name.clone(),
                        record.quantity.to_string(),
                        record.price.to_string(),
                    ])
                    .map_err(|e| StoreError::csv(&self.path, e))?;
            }
            writer.flush().map_err(|e| StoreError::io(&self.path, e))?;
        }

        tmp.flush().map_err(|e| StoreError::io(&self.path, e))?;
        tmp.as_file()
            .sync_all()
            .map_err(|e| StoreError::io(&self.path, e))?;
        tmp.persist(&self.path)
            .map_err(|e| StoreError::io(&self.path, e.error))?;

        debug!(path = %self.path, records = records.len(), "saved inventory");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn store_in(dir: &tempfile::TempDir) -> RecordStore {
        let path = dir.path().join("inventory.csv");
        RecordStore::new(Utf8PathBuf::from_path_buf(path).unwrap())
    }

    fn widget() -> Record {
        Record::new("Widget", 10, Price::from_cents(250))
    }

    #[test]
    fn test_load_creates_missing_file() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);

        let report = store.load().unwrap();
        assert!(report.records.is_empty());
        assert!(report.skipped.is_empty());
        assert!(store.path().exists());
    }

    #[test]
    fn test_load_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("stock.csv");
        let store = RecordStore::new(Utf8PathBuf::from_path_buf(path).unwrap());

        store.load().unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        let records = vec![
            widget(),
            Record::new("Gadget, large", 0, Price::from_cents(1999)),
            Record::new("Quote \"q\"\nline", 3, Price::from_cents(5)),
        ];

        store.save(&records).unwrap();
        let report = store.load().unwrap();
        assert_eq!(report.records, records);
        assert!(report.skipped.is_empty());
    }

    #[test]
    fn test_save_format() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);

        store
            .save(&[widget(), Record::new("a,b", 1, Price::from_cents(100))])
            .unwrap();
        let content = fs::read_to_string(store.path()).unwrap();
        assert_eq!(content, "Widget,10,2.50\n\"a,b\",1,1.00\n");
    }

    #[test]
    fn test_save_truncates_previous_contents() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);

        store
            .save(&[widget(), Record::new("Gadget", 1, Price::from_cents(1))])
            .unwrap();
        store.save(&[]).unwrap();

        assert_eq!(fs::read_to_string(store.path()).unwrap(), "");
        assert!(store.load().unwrap().records.is_empty());
    }

    #[test]
    fn test_failed_save_leaves_target_intact() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        // A directory in place of the file makes the final rename fail.
        fs::create_dir(store.path()).unwrap();
        fs::write(store.path().join("keep.txt"), "old contents").unwrap();

        let err = store.save(&[widget()]).unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
        assert_eq!(
            fs::read_to_string(store.path().join("keep.txt")).unwrap(),
            "old contents"
        );

        // The temporary file is cleaned up.
        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_unreachable_path_is_an_io_error() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("plain-file"), "").unwrap();
        let path = dir.path().join("plain-file").join("inventory.csv");
        let store = RecordStore::new(Utf8PathBuf::from_path_buf(path).unwrap());

        assert!(matches!(store.load(), Err(StoreError::Io { .. })));
        assert!(matches!(store.save(&[widget()]), Err(StoreError::Io { .. })));
        assert_eq!(fs::read_to_string(dir.path().join("plain-file")).unwrap(), "");
    }

    #[test]
    fn test_malformed_rows_are_skipped() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        fs::write(
            store.path(),
            "Widget,10,2.5\nGadget,4\nBolt,many,1.00\nNut,3,-1\nScrew,-2,0.10\n",
        )
        .unwrap();

        let report = store.load().unwrap();
        assert_eq!(report.records, vec![widget()]);

        let lines: Vec<u64> = report.skipped.iter().map(|s| s.line).collect();
        assert_eq!(lines, vec![2, 3, 4, 5]);
        assert_eq!(report.skipped[0].reason, SkipReason::FieldCount(2));
        assert_eq!(
            report.skipped[0].to_string(),
            "line 2: expected 3 fields, found 2 [Gadget,4]"
        );
        assert!(matches!(report.skipped[1].reason, SkipReason::Quantity(_)));
        assert!(matches!(report.skipped[2].reason, SkipReason::Price(_)));
        assert!(matches!(report.skipped[3].reason, SkipReason::Quantity(_)));
    }

    #[test]
    fn test_invalid_utf8_row_is_skipped() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        let mut bytes = b"Widget,10,2.50\n".to_vec();
        bytes.extend_from_slice(b"\xff\xfe,1,1.00\n");
        bytes.extend_from_slice(b"Gadget,1,0.01\n");
        fs::write(store.path(), bytes).unwrap();

        let report = store.load().unwrap();
        let names: Vec<&str> = report.records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Widget", "Gadget"]);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].reason, SkipReason::Encoding);
    }

    #[test]
    fn test_load_keeps_duplicates_in_order() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "Widget,1,1.00\nwidget,2,2.00\n").unwrap();

        let report = store.load().unwrap();
        assert_eq!(report.records.len(), 2);
        assert_eq!(report.records[1].name, "widget");
    }
}
