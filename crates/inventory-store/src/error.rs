//! Error taxonomy for the inventory store.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Result type used by the store and its operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// A user-supplied or stored field failed its constraints.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("name must not be blank")]
    EmptyName,

    #[error("{field} '{value}' is not a number")]
    NotANumber { field: &'static str, value: String },

    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: String },

    #[error("{field} '{value}' is out of range")]
    OutOfRange { field: &'static str, value: String },
}

/// Failure of a store action.
///
/// Only `Io` and `Csv` come from the storage file itself; the rest are
/// named conditions that abort an action before anything is written.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access inventory file {path}: {source}")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to process inventory file {path} as CSV: {source}")]
    Csv {
        path: Utf8PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("an item named '{0}' already exists")]
    Duplicate(String),

    #[error("no item named '{0}'")]
    NotFound(String),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn csv(path: impl Into<Utf8PathBuf>, source: csv::Error) -> Self {
        Self::Csv {
            path: path.into(),
            source,
        }
    }

    /// True for the conditions that are reported to the user as a plain
    /// message rather than as a storage failure.
    pub fn is_user_condition(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::Duplicate(_) | Self::NotFound(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_names_field() {
        let err = ValidationError::Negative {
            field: "quantity",
            value: "-3".to_string(),
        };
        assert_eq!(err.to_string(), "quantity must not be negative (got -3)");
    }

    #[test]
    fn test_user_conditions() {
        assert!(StoreError::NotFound("x".into()).is_user_condition());
        assert!(StoreError::Duplicate("x".into()).is_user_condition());
        assert!(StoreError::from(ValidationError::EmptyName).is_user_condition());

        let io = StoreError::io(
            "inventory.csv",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(!io.is_user_condition());
        assert!(io.to_string().contains("inventory.csv"));
    }
}
