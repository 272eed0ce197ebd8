//! # Part Pricing
//!
//! Computes the cost of one part from its attributes and a rate table:
//!
//! ```text
//! cutting  = cut_time_hours × cutting_rate[class]
//! material = weight_kg      × material_rate[class]
//! bending  = max(0, bending_count) × bending_unit_cost
//! detail   = cutting + material + bending        (one piece)
//! total    = detail × quantity
//! ```
//!
//! Results are kept at full precision. Use [`ComputedCosts::rounded`] for
//! display; aggregation works on the unrounded values.
//!
//! ## Example
//!
//! ```rust
//! use quote_core::pricing::calculate;
//! use quote_core::program::{LineItem, ProgramId};
//! use quote_core::rates::RateTable;
//!
//! let mut item = LineItem::new(ProgramId::new(), "bracket", "1.4301", 2.0, 5.0, 3).with_bending(4);
//! let mut rates = RateTable::zero();
//! rates.cutting_rates.stainless = 10.0;
//! rates.material_rates.stainless = 8.0;
//! rates.bending_unit_cost = 2.0;
//!
//! let costs = calculate(&mut item, &rates);
//! assert_eq!(costs.detail_cost, 68.0);
//! assert_eq!(costs.total_cost, 204.0);
//! ```

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::materials::{classify, MaterialClass};
use crate::program::LineItem;
use crate::rates::RateTable;
use crate::units::round_cents;

/// Costs derived for one part under one rate table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComputedCosts {
    /// Class the material description resolved to
    pub material_class: MaterialClass,
    /// Cutting cost of one piece
    pub cutting_cost: f64,
    /// Material cost of one piece
    pub material_cost: f64,
    /// Bending cost of one piece
    pub bending_cost: f64,
    /// Cost of one piece: cutting + material + bending
    pub detail_cost: f64,
    /// Cost of all pieces: detail × quantity
    pub total_cost: f64,
}

impl ComputedCosts {
    /// Copy with every amount rounded to cents
    pub fn rounded(&self) -> ComputedCosts {
        ComputedCosts {
            material_class: self.material_class,
            cutting_cost: round_cents(self.cutting_cost),
            material_cost: round_cents(self.material_cost),
            bending_cost: round_cents(self.bending_cost),
            detail_cost: round_cents(self.detail_cost),
            total_cost: round_cents(self.total_cost),
        }
    }
}

/// Price one part.
///
/// A negative `bending_count` is clamped to 0 and the clamp is written back
/// to the item, so later reads see the corrected value. A quantity of 0 is
/// treated as 1. Never fails.
pub fn calculate(item: &mut LineItem, rates: &RateTable) -> ComputedCosts {
    let class = classify(&item.material_description);

    let cutting_cost = item.cut_time_hours * rates.cutting_rate(class);
    let material_cost = item.weight_kg * rates.material_rate(class);

    if item.bending_count < 0 {
        warn!(
            item = %item.id,
            bending_count = item.bending_count,
            "negative bending count clamped to 0"
        );
        item.bending_count = 0;
    }
    let bending_cost = item.bending_count as f64 * rates.bending_unit_cost;

    let detail_cost = cutting_cost + material_cost + bending_cost;
    let total_cost = detail_cost * item.quantity.max(1) as f64;

    ComputedCosts {
        material_class: class,
        cutting_cost,
        material_cost,
        bending_cost,
        detail_cost,
        total_cost,
    }
}
