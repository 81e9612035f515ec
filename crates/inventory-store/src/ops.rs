//! Record operations: lookup, add, update and delete.
//!
//! Nothing is cached between calls. Every operation opens a [`Cycle`],
//! which loads the full record set, and a mutating operation consumes the
//! cycle and writes the full set back. A failed precondition drops the
//! cycle without touching the file.

use crate::error::{StoreError, StoreResult, ValidationError};
use crate::record::{Price, Record, parse_quantity};
use crate::storage::{LoadReport, RecordStore, SkippedRow};
use tracing::info;

/// Index of the first record named `name` (case-insensitive).
pub fn find_index(records: &[Record], name: &str) -> Option<usize> {
    records.iter().position(|r| r.matches(name))
}

/// Value of an operation together with the rows its load skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome<T> {
    pub value: T,
    pub skipped: Vec<SkippedRow>,
}

/// What happened to one optional field of an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldChange<T> {
    /// Not provided (absent or blank)
    Unchanged,
    Applied { from: T, to: T },
    /// Provided but invalid; the stored value was kept
    Rejected(ValidationError),
}

impl<T> FieldChange<T> {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

/// Per-field result of [`Cycle::update`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateReport {
    /// Stored name of the updated record
    pub name: String,
    pub quantity: FieldChange<u64>,
    pub price: FieldChange<Price>,
}

impl UpdateReport {
    /// Validation failures of provided fields, in prompt order.
    pub fn rejected(&self) -> Vec<&ValidationError> {
        let mut rejected = Vec::new();
        if let FieldChange::Rejected(e) = &self.quantity {
            rejected.push(e);
        }
        if let FieldChange::Rejected(e) = &self.price {
            rejected.push(e);
        }
        rejected
    }
}

/// Provided value of an optional field; blank means "leave unchanged".
fn provided(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

fn apply<T: Copy>(
    slot: &mut T,
    raw: Option<&str>,
    parse: impl Fn(&str) -> Result<T, ValidationError>,
) -> FieldChange<T> {
    let Some(raw) = provided(raw) else {
        return FieldChange::Unchanged;
    };
    match parse(raw) {
        Ok(value) => {
            let from = *slot;
            *slot = value;
            FieldChange::Applied { from, to: value }
        }
        Err(e) => FieldChange::Rejected(e),
    }
}

/// One load/mutate/save pass over the record set.
#[derive(Debug)]
pub struct Cycle<'a> {
    store: &'a RecordStore,
    records: Vec<Record>,
    skipped: Vec<SkippedRow>,
}

impl Cycle<'_> {
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Rows the load skipped.
    pub fn skipped(&self) -> &[SkippedRow] {
        &self.skipped
    }

    pub fn find(&self, name: &str) -> Option<&Record> {
        find_index(&self.records, name).map(|i| &self.records[i])
    }

    /// Append `record` unless its name is already taken.
    pub fn add(mut self, record: Record) -> StoreResult<()> {
        if find_index(&self.records, &record.name).is_some() {
            return Err(StoreError::Duplicate(record.name));
        }
        info!(name = %record.name, "adding item");
        self.records.push(record);
        self.store.save(&self.records)
    }

    /// Apply each provided field independently.
    ///
    /// An invalid field is reported and left unchanged; the other field may
    /// still apply. Once the record is found the set is saved, even when
    /// neither field changed.
    pub fn update(
        mut self,
        name: &str,
        quantity: Option<&str>,
        price: Option<&str>,
    ) -> StoreResult<UpdateReport> {
        let index =
            find_index(&self.records, name).ok_or_else(|| StoreError::NotFound(name.to_string()))?;

        let record = &mut self.records[index];
        let report = UpdateReport {
            name: record.name.clone(),
            quantity: apply(&mut record.quantity, quantity, parse_quantity),
            price: apply(&mut record.price, price, Price::parse),
        };
        info!(
            name = %report.name,
            quantity = report.quantity.is_applied(),
            price = report.price.is_applied(),
            "updating item"
        );

        self.store.save(&self.records)?;
        Ok(report)
    }

    /// Remove the first record named `name`, keeping the order of the rest.
    pub fn delete(mut self, name: &str) -> StoreResult<Record> {
        let index =
            find_index(&self.records, name).ok_or_else(|| StoreError::NotFound(name.to_string()))?;
        let removed = self.records.remove(index);
        info!(name = %removed.name, "deleting item");
        self.store.save(&self.records)?;
        Ok(removed)
    }
}

/// Inventory operations over a [`RecordStore`].
#[derive(Debug, Clone)]
pub struct Inventory {
    store: RecordStore,
}

impl Inventory {
    pub fn new(store: RecordStore) -> Self {
        Self { store }
    }

    /// Inventory at [`RecordStore::default_path`].
    pub fn from_env() -> Self {
        Self::new(RecordStore::new(RecordStore::default_path()))
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Load the current record set for one action.
    pub fn begin(&self) -> StoreResult<Cycle<'_>> {
        let LoadReport { records, skipped } = self.store.load()?;
        Ok(Cycle {
            store: &self.store,
            records,
            skipped,
        })
    }

    pub fn list(&self) -> StoreResult<LoadReport> {
        self.store.load()
    }

    pub fn find(&self, name: &str) -> StoreResult<Outcome<Option<Record>>> {
        let cycle = self.begin()?;
        Ok(Outcome {
            value: cycle.find(name).cloned(),
            skipped: cycle.skipped,
        })
    }

    pub fn add(&self, record: Record) -> StoreResult<Outcome<()>> {
        let cycle = self.begin()?;
        let skipped = cycle.skipped.clone();
        cycle.add(record)?;
        Ok(Outcome { value: (), skipped })
    }

    pub fn update(
        &self,
        name: &str,
        quantity: Option<&str>,
        price: Option<&str>,
    ) -> StoreResult<Outcome<UpdateReport>> {
        let cycle = self.begin()?;
        let skipped = cycle.skipped.clone();
        let value = cycle.update(name, quantity, price)?;
        Ok(Outcome { value, skipped })
    }

    pub fn delete(&self, name: &str) -> StoreResult<Outcome<Record>> {
        let cycle = self.begin()?;
        let skipped = cycle.skipped.clone();
        let value = cycle.delete(name)?;
        Ok(Outcome { value, skipped })
    }
}
