//! Monetary amounts as the platform represents them.

use serde::{Deserialize, Serialize};

/// A monetary amount with currency information.
///
/// The platform reports prices in the smallest currency unit
/// (`cent_amount`), so integer arithmetic is exact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    /// Amount in the smallest currency unit (e.g., cents for USD).
    pub cent_amount: i64,
    /// ISO 4217 currency code (e.g., "USD", "EUR").
    pub currency_code: String,
}

impl Money {
    /// Create a new amount.
    pub fn new(cent_amount: i64, currency_code: impl Into<String>) -> Self {
        Self {
            cent_amount,
            currency_code: currency_code.into(),
        }
    }

    /// Format for display in the currency's standard unit, e.g. `19.99 USD`.
    #[must_use]
    pub fn display(&self) -> String {
        let sign = if self.cent_amount < 0 { "-" } else { "" };
        let abs = self.cent_amount.unsigned_abs();
        format!(
            "{sign}{}.{:02} {}",
            abs / 100,
            abs % 100,
            self.currency_code
        )
    }
}
