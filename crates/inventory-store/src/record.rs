//! Inventory record model.

use crate::error::ValidationError;
use std::fmt;

/// Largest cent amount an `f64` still represents exactly (2^53).
const MAX_CENTS: f64 = 9_007_199_254_740_992.0;

/// Non-negative monetary amount, held as whole cents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price(u64);

impl Price {
    pub fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    pub fn cents(self) -> u64 {
        self.0
    }

    /// Parse a decimal amount, rounding to two fractional digits.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let value = raw.trim();
        let amount: f64 = value.parse().map_err(|_| ValidationError::NotANumber {
            field: "price",
            value: value.to_string(),
        })?;

        if amount.is_nan() {
            return Err(ValidationError::NotANumber {
                field: "price",
                value: value.to_string(),
            });
        }
        if amount < 0.0 {
            return Err(ValidationError::Negative {
                field: "price",
                value: value.to_string(),
            });
        }

        let cents = (amount * 100.0).round();
        if !cents.is_finite() || cents > MAX_CENTS {
            return Err(ValidationError::OutOfRange {
                field: "price",
                value: value.to_string(),
            });
        }

        Ok(Self(cents as u64))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = format!("{}.{:02}", self.0 / 100, self.0 % 100);
        // Route through `pad` so width/alignment flags work in tables.
        f.pad(&text)
    }
}

/// Parse a non-negative integer count.
pub fn parse_quantity(raw: &str) -> Result<u64, ValidationError> {
    let value = raw.trim();
    match value.parse::<i128>() {
        Ok(n) if n < 0 => Err(ValidationError::Negative {
            field: "quantity",
            value: value.to_string(),
        }),
        Ok(n) => u64::try_from(n).map_err(|_| ValidationError::OutOfRange {
            field: "quantity",
            value: value.to_string(),
        }),
        Err(_) => Err(ValidationError::NotANumber {
            field: "quantity",
            value: value.to_string(),
        }),
    }
}

/// Simple case fold of one character.
///
/// Characters are folded one at a time so context rules (final sigma) do not
/// apply. Going through the uppercase form first joins variants that
/// lowercase differently, such as `ς`/`σ` or `ſ`/`s`. Multi-character
/// uppercase forms (`ß` -> `SS`) are not followed.
fn fold(c: char) -> std::char::ToLowercase {
    let mut upper = c.to_uppercase();
    let base = match (upper.next(), upper.next()) {
        (Some(single), None) => single,
        _ => c,
    };
    base.to_lowercase()
}

/// Case-insensitive name equality under simple Unicode case folding.
pub fn names_match(a: &str, b: &str) -> bool {
    a == b || a.chars().flat_map(fold).eq(b.chars().flat_map(fold))
}

/// A single inventory line item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Displayed verbatim, matched case-insensitively
    pub name: String,
    pub quantity: u64,
    pub price: Price,
}

impl Record {
    pub fn new(name: impl Into<String>, quantity: u64, price: Price) -> Self {
        Self {
            name: name.into(),
            quantity,
            price,
        }
    }

    /// Build a record from raw user input.
    pub fn parse(name: &str, quantity: &str, price: &str) -> Result<Self, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        Ok(Self::new(name, parse_quantity(quantity)?, Price::parse(price)?))
    }

    /// Whether this record answers to `name`.
    pub fn matches(&self, name: &str) -> bool {
        names_match(&self.name, name)
    }
}
