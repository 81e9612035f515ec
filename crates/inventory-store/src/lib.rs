//! Flat-file inventory store.
//!
//! Provides:
//! - Record model and field validation
//! - CSV storage with atomic rewrite
//! - Load/mutate/save operations keyed by case-insensitive name

pub mod error;
pub mod ops;
pub mod record;
pub mod storage;

pub use error::{StoreError, ValidationError};
pub use ops::{Cycle, FieldChange, Inventory, Outcome, UpdateReport, find_index};
pub use record::{Price, Record, names_match, parse_quantity};
pub use storage::{LoadReport, RecordStore, SkipReason, SkippedRow};
