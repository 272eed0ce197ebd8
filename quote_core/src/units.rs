//! # Unit Types
//!
//! Lightweight newtype wrappers for the two quantities the quote shows to
//! people: machine time and money. Calculations stay in plain `f64`; these
//! types only decide how values are rounded and printed.
//!
//! ## Example
//!
//! ```rust
//! use quote_core::units::{Hours, Money};
//!
//! assert_eq!(Hours(1.5).to_hms(), "01:30:00");
//! assert_eq!(Money(204.0).to_string(), "204.00");
//! assert_eq!(Money(0.125 + 0.25).rounded(), Money(0.38));
//! ```

use serde::{Deserialize, Serialize};

/// Round to two decimal places (cents), half away from zero.
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// ============================================================================
// Time
// ============================================================================

/// Machine time in hours
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Hours(pub f64);

impl Hours {
    /// Format as `HH:MM:SS`, rounded to the nearest second.
    ///
    /// Hours are not wrapped at 24.
    pub fn to_hms(&self) -> String {
        let total = if self.0.is_finite() && self.0 > 0.0 {
            (self.0 * 3600.0).round() as u64
        } else {
            0
        };
        let h = total / 3600;
        let m = (total % 3600) / 60;
        let s = total % 60;
        format!("{:02}:{:02}:{:02}", h, m, s)
    }
}

// ============================================================================
// Money
// ============================================================================

/// Monetary amount in the session currency
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(pub f64);

impl Money {
    /// Rounded to cents
    pub fn rounded(self) -> Money {
        Money(round_cents(self.0))
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Two decimals always; width and alignment come from the caller
        f.pad(&format!("{:.2}", self.0))
    }
}
