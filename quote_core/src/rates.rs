//! # Rate Table
//!
//! The configurable cost coefficients used to price every part:
//!
//! - cutting cost per machine hour, per material class
//! - material cost per kilogram, per material class
//! - one bending cost per bend operation, shared by all materials
//!
//! `RateTable` is a small `Copy` value. The session owns the only writable
//! instance and hands copies to the calculator, so there is no ambient rate
//! state anywhere in the crate.
//!
//! ## JSON Format
//!
//! ```json
//! {
//!   "cutting_rates": { "black_steel": 5.0, "stainless": 6.0, "aluminium": 4.5 },
//!   "material_rates": { "black_steel": 2.5, "stainless": 3.0, "aluminium": 1.5 },
//!   "bending_unit_cost": 0.0
//! }
//! ```
//!
//! Incoming updates go through [`RateUpdate`], which also understands the
//! legacy configuration keys (`cutting_costs`, `material_costs`,
//! `suma_kosztow_giecia`, `stal_czarna`, `stal_nierdzewna`).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::coerce;
use crate::materials::MaterialClass;

/// One rate per material class.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ClassRates {
    #[serde(default, deserialize_with = "coerce::de_amount")]
    pub black_steel: f64,
    #[serde(default, deserialize_with = "coerce::de_amount")]
    pub stainless: f64,
    #[serde(default, deserialize_with = "coerce::de_amount")]
    pub aluminium: f64,
}

impl ClassRates {
    pub fn new(black_steel: f64, stainless: f64, aluminium: f64) -> Self {
        ClassRates {
            black_steel,
            stainless,
            aluminium,
        }
    }

    /// Rate for a material class
    pub fn get(&self, class: MaterialClass) -> f64 {
        match class {
            MaterialClass::BlackSteel => self.black_steel,
            MaterialClass::Stainless => self.stainless,
            MaterialClass::Aluminium => self.aluminium,
        }
    }

    fn sanitized(self) -> Self {
        ClassRates {
            black_steel: coerce::non_negative(self.black_steel),
            stainless: coerce::non_negative(self.stainless),
            aluminium: coerce::non_negative(self.aluminium),
        }
    }
}

/// Current cost coefficients.
///
/// Fields are public for building tables by hand. The session passes every
/// table through [`RateTable::sanitized`] before storing it, and
/// deserialization coerces negative or malformed rates to 0, so stored
/// rates are always finite and non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateTable {
    /// Cutting cost per hour of machine time
    pub cutting_rates: ClassRates,
    /// Material cost per kilogram
    pub material_rates: ClassRates,
    /// Cost per bend operation
    #[serde(default, deserialize_with = "coerce::de_amount")]
    pub bending_unit_cost: f64,
}

impl RateTable {
    /// Cutting cost per hour for a material class
    pub fn cutting_rate(&self, class: MaterialClass) -> f64 {
        self.cutting_rates.get(class)
    }

    /// Material cost per kilogram for a material class
    pub fn material_rate(&self, class: MaterialClass) -> f64 {
        self.material_rates.get(class)
    }

    /// Copy with every negative or non-finite rate replaced by 0.
    pub fn sanitized(self) -> Self {
        RateTable {
            cutting_rates: self.cutting_rates.sanitized(),
            material_rates: self.material_rates.sanitized(),
            bending_unit_cost: coerce::non_negative(self.bending_unit_cost),
        }
    }

    /// All-zero table
    pub fn zero() -> Self {
        RateTable {
            cutting_rates: ClassRates::default(),
            material_rates: ClassRates::default(),
            bending_unit_cost: 0.0,
        }
    }

    /// Build a complete table from an update.
    ///
    /// Every field the update leaves out or fills with something that is not
    /// a non-negative number comes out as 0.
    ///
    /// ```rust
    /// use quote_core::materials::MaterialClass;
    /// use quote_core::rates::{RateTable, RateUpdate};
    ///
    /// let update: RateUpdate = serde_json::from_str(
    ///     r#"{"cutting_rates": {"stainless": "10"}, "bending_unit_cost": 2}"#,
    /// ).unwrap();
    /// let rates = RateTable::from_update(&update);
    /// assert_eq!(rates.cutting_rate(MaterialClass::Stainless), 10.0);
    /// assert_eq!(rates.cutting_rate(MaterialClass::Aluminium), 0.0);
    /// assert_eq!(rates.bending_unit_cost, 2.0);
    /// ```
    pub fn from_update(update: &RateUpdate) -> Self {
        RateTable {
            cutting_rates: update.cutting_rates.to_rates(),
            material_rates: update.material_rates.to_rates(),
            bending_unit_cost: coerce::amount(&update.bending_unit_cost),
        }
    }
}

impl Default for RateTable {
    /// Startup rates used before any configuration is delivered
    fn default() -> Self {
        RateTable {
            cutting_rates: ClassRates::new(5.0, 6.0, 4.5),
            material_rates: ClassRates::new(2.5, 3.0, 1.5),
            bending_unit_cost: 0.0,
        }
    }
}

/// Raw per-class values of an update, before coercion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassRatesUpdate {
    #[serde(default, alias = "stal_czarna")]
    pub black_steel: Value,
    #[serde(default, alias = "stal_nierdzewna")]
    pub stainless: Value,
    #[serde(default)]
    pub aluminium: Value,
}

impl ClassRatesUpdate {
    fn to_rates(&self) -> ClassRates {
        ClassRates {
            black_steel: coerce::amount(&self.black_steel),
            stainless: coerce::amount(&self.stainless),
            aluminium: coerce::amount(&self.aluminium),
        }
    }
}

/// A configuration update as delivered by the configuration collaborator.
///
/// Values are kept as raw JSON so that malformed input degrades to 0 in
/// [`RateTable::from_update`] instead of failing deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RateUpdate {
    #[serde(default, alias = "cutting_costs")]
    pub cutting_rates: ClassRatesUpdate,
    #[serde(default, alias = "material_costs")]
    pub material_rates: ClassRatesUpdate,
    #[serde(default, alias = "suma_kosztow_giecia")]
    pub bending_unit_cost: Value,
}

impl From<&RateTable> for RateUpdate {
    fn from(rates: &RateTable) -> Self {
        let section = |r: &ClassRates| ClassRatesUpdate {
            black_steel: Value::from(r.black_steel),
            stainless: Value::from(r.stainless),
            aluminium: Value::from(r.aluminium),
        };
        RateUpdate {
            cutting_rates: section(&rates.cutting_rates),
            material_rates: section(&rates.material_rates),
            bending_unit_cost: Value::from(rates.bending_unit_cost),
        }
    }
}
