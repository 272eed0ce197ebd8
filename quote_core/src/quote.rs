//! # Quote Aggregation
//!
//! Sums the computed costs of every included part into a [`QuoteSummary`].
//! Parts are visited in program insertion order, then report order, so the
//! output is reproducible even though the sums themselves are commutative.
//!
//! ## Rounding
//!
//! [`RoundingPolicy::SumThenRound`] (the default) adds full-precision row
//! values and rounds only the final figures. [`RoundingPolicy::RoundThenSum`]
//! rounds each row to cents first, which matches quotes produced from
//! already-formatted tables but can drift by a few cents on large batches.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::materials::MaterialClass;
use crate::pricing::ComputedCosts;
use crate::program::{ItemId, Program};
use crate::units::{round_cents, Money};

/// How row values are rounded before they enter the aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingPolicy {
    /// Sum full-precision values, round the result
    #[default]
    SumThenRound,
    /// Round every row to cents, then sum
    RoundThenSum,
}

/// Aggregate quote over the included parts.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QuoteSummary {
    /// Total number of pieces (Σ quantity)
    pub included_part_count: u64,
    pub total_cutting_cost: f64,
    pub total_material_cost: f64,
    pub total_price: f64,
    /// Material cost per class, only for classes among the included parts
    pub material_breakdown: BTreeMap<MaterialClass, f64>,
}

impl QuoteSummary {
    /// Copy with every amount rounded to cents
    pub fn rounded(&self) -> QuoteSummary {
        QuoteSummary {
            included_part_count: self.included_part_count,
            total_cutting_cost: round_cents(self.total_cutting_cost),
            total_material_cost: round_cents(self.total_material_cost),
            total_price: round_cents(self.total_price),
            material_breakdown: self
                .material_breakdown
                .iter()
                .map(|(class, cost)| (*class, round_cents(*cost)))
                .collect(),
        }
    }

    /// True when no part is included
    pub fn is_empty(&self) -> bool {
        self.included_part_count == 0
    }
}

impl std::fmt::Display for QuoteSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Parts:              {}", self.included_part_count)?;
        writeln!(f, "Cutting cost:       {}", Money(self.total_cutting_cost).rounded())?;
        writeln!(f, "Material cost:      {}", Money(self.total_material_cost).rounded())?;
        for (class, cost) in &self.material_breakdown {
            writeln!(f, "  {:<18}{}", class.display_name(), Money(*cost).rounded())?;
        }
        write!(f, "Total price:        {}", Money(self.total_price).rounded())
    }
}

/// Sum the costs of all included parts.
///
/// `computed` must hold an entry for every part; a part without one
/// contributes its piece count but no cost. An empty selection yields all
/// zeros and an empty breakdown.
pub fn aggregate(
    programs: &[Program],
    computed: &HashMap<ItemId, ComputedCosts>,
    policy: RoundingPolicy,
) -> QuoteSummary {
    let row = |value: f64| match policy {
        RoundingPolicy::SumThenRound => value,
        RoundingPolicy::RoundThenSum => round_cents(value),
    };

    let mut summary = QuoteSummary::default();

    for item in programs.iter().flat_map(|p| p.items.iter()) {
        if !item.included {
            continue;
        }
        summary.included_part_count += u64::from(item.quantity.max(1));

        let Some(costs) = computed.get(&item.id) else {
            continue;
        };
        let material_cost = row(costs.material_cost);
        summary.total_cutting_cost += row(costs.cutting_cost);
        summary.total_material_cost += material_cost;
        *summary
            .material_breakdown
            .entry(costs.material_class)
            .or_insert(0.0) += material_cost;
        summary.total_price += row(costs.total_cost);
    }

    summary
}
