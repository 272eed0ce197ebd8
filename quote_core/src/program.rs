//! # Programs and Parts
//!
//! A [`Program`] is one cutting program as ingested from a machine report:
//! a header (name, sheet material, thickness, machine time) and the parts
//! cut from it. Each part is a [`LineItem`].
//!
//! ## Structure
//!
//! ```text
//! Program
//! ├── id: ProgramId
//! ├── name, material, thickness_mm, machine_time, program_counts
//! └── items: Vec<LineItem> (report order)
//! ```
//!
//! Seed types ([`ProgramSeed`], [`LineItemSeed`]) are what the ingestion
//! collaborator delivers. They deserialize leniently: numeric fields accept
//! numbers or numeric strings and fall back to their defaults.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::coerce;
use crate::units::Hours;

/// Identifier of a loaded program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgramId(pub Uuid);

impl ProgramId {
    pub fn new() -> Self {
        ProgramId(Uuid::new_v4())
    }
}

impl Default for ProgramId {
    fn default() -> Self {
        ProgramId::new()
    }
}

impl std::fmt::Display for ProgramId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a part, unique across the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub Uuid);

impl ItemId {
    pub fn new() -> Self {
        ItemId(Uuid::new_v4())
    }
}

impl Default for ItemId {
    fn default() -> Self {
        ItemId::new()
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One manufactured part.
///
/// `material_description`, `cut_time_hours`, `weight_kg` and `quantity` are
/// fixed at ingestion. `bending_count` and `included` are edited by the user
/// through the session.
///
/// ## JSON Example
///
/// ```json
/// {
///   "id": "6f1c0b8e-0d5e-4e4a-9a59-3c1f0e7d2a11",
///   "program_id": "0a3e2f55-7c1b-4d8e-8f0a-5b6c7d8e9f00",
///   "name": "bracket_01",
///   "material_description": "1.4301",
///   "cut_time_hours": 0.05,
///   "weight_kg": 1.2,
///   "quantity": 4,
///   "bending_count": 2,
///   "included": true,
///   "image_ref": null
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: ItemId,
    pub program_id: ProgramId,
    /// Part name from the report (usually the geometry file name)
    pub name: String,
    pub material_description: String,
    /// Cutting time of one piece in hours
    pub cut_time_hours: f64,
    /// Weight of one piece in kilograms
    pub weight_kg: f64,
    /// Number of pieces, at least 1
    pub quantity: u32,
    /// Bend operations per piece. Signed so that unvalidated input can be
    /// stored and then clamped by the calculator.
    pub bending_count: i64,
    /// Whether the part counts toward the quote
    pub included: bool,
    /// Drawing reference for the presentation layer; unused by pricing
    pub image_ref: Option<String>,
}

impl LineItem {
    /// Create a part with no bends, included in the quote.
    pub fn new(
        program_id: ProgramId,
        name: impl Into<String>,
        material_description: impl Into<String>,
        cut_time_hours: f64,
        weight_kg: f64,
        quantity: u32,
    ) -> Self {
        LineItem {
            id: ItemId::new(),
            program_id,
            name: name.into(),
            material_description: material_description.into(),
            cut_time_hours,
            weight_kg,
            quantity: quantity.max(1),
            bending_count: 0,
            included: true,
            image_ref: None,
        }
    }

    /// Set the bending count (builder style, used mostly in tests)
    pub fn with_bending(mut self, bending_count: i64) -> Self {
        self.bending_count = bending_count;
        self
    }

    /// Cutting time of one piece as `HH:MM:SS`
    pub fn cut_time_display(&self) -> String {
        Hours(self.cut_time_hours).to_hms()
    }
}

/// A batch of parts cut from one sheet material and thickness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub id: ProgramId,
    /// Program name from the report (e.g., "mc2809")
    pub name: String,
    /// Material description shared by the parts (e.g., "1.4301")
    pub material: String,
    /// Sheet thickness in millimetres
    pub thickness_mm: f64,
    /// Machine time per sheet as reported (free text, e.g., "0:02:28")
    pub machine_time: String,
    /// Number of program runs as reported
    pub program_counts: String,
    pub items: Vec<LineItem>,
}

impl Program {
    /// Build a program from ingestion seed data, assigning fresh IDs.
    ///
    /// Parts without their own material description inherit the program's.
    pub fn from_seed(seed: ProgramSeed) -> Self {
        let id = ProgramId::new();
        let items = seed
            .details
            .into_iter()
            .map(|detail| {
                let material = detail
                    .material
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| seed.material.clone());
                LineItem {
                    bending_count: detail.bending_count,
                    image_ref: detail.image_path,
                    ..LineItem::new(
                        id,
                        detail.name,
                        material,
                        detail.cut_time,
                        detail.weight,
                        detail.quantity,
                    )
                }
            })
            .collect();

        Program {
            id,
            name: seed.name,
            material: seed.material,
            thickness_mm: seed.thickness,
            machine_time: seed.machine_time,
            program_counts: seed.program_counts,
            items,
        }
    }

    /// Total cutting time for all pieces in hours (Σ cut time × quantity)
    pub fn total_cut_time_hours(&self) -> f64 {
        self.items
            .iter()
            .map(|item| item.cut_time_hours * item.quantity as f64)
            .sum()
    }

    /// Number of distinct parts
    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}

/// Part data delivered by the ingestion collaborator.
///
/// Field names follow the upload response of the report parsers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItemSeed {
    #[serde(default, deserialize_with = "coerce::de_text")]
    pub name: String,
    /// Overrides the program material when present
    #[serde(default, deserialize_with = "coerce::de_opt_text")]
    pub material: Option<String>,
    /// Cutting time of one piece in hours
    #[serde(default, deserialize_with = "coerce::de_amount")]
    pub cut_time: f64,
    /// Weight of one piece in kilograms
    #[serde(default, deserialize_with = "coerce::de_amount")]
    pub weight: f64,
    #[serde(default = "default_quantity", deserialize_with = "coerce::de_quantity")]
    pub quantity: u32,
    /// Bend operations per piece, usually absent at ingestion
    #[serde(default, deserialize_with = "coerce::de_bending_count")]
    pub bending_count: i64,
    #[serde(default)]
    pub image_path: Option<String>,
}

fn default_quantity() -> u32 {
    1
}

/// Program data delivered by the ingestion collaborator.
///
/// ## JSON Example
///
/// ```json
/// {
///   "name": "mc2809",
///   "material": "1.4301",
///   "thicknes": 5.0,
///   "machine_time": "0:02:28",
///   "program_counts": "1",
///   "details": [
///     { "name": "bracket_01", "cut_time": 0.05, "weight": 1.2, "quantity": 4 }
///   ]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgramSeed {
    #[serde(default, deserialize_with = "coerce::de_text")]
    pub name: String,
    #[serde(default, deserialize_with = "coerce::de_text")]
    pub material: String,
    /// Sheet thickness in millimetres
    #[serde(default, alias = "thicknes", deserialize_with = "coerce::de_amount")]
    pub thickness: f64,
    #[serde(default, deserialize_with = "coerce::de_text")]
    pub machine_time: String,
    #[serde(default, deserialize_with = "coerce::de_text")]
    pub program_counts: String,
    #[serde(default)]
    pub details: Vec<LineItemSeed>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_seed() -> ProgramSeed {
        serde_json::from_str(
            r#"{
                "name": "mc2809",
                "material": "1.4301",
                "thicknes": "5",
                "machine_time": "0:02:28",
                "program_counts": 1,
                "details": [
                    {"name": "bracket", "cut_time": 0.5, "weight": "1.5", "quantity": 2, "image_path": "static/images/bracket.bmp"},
                    {"name": "plate", "material": "ST37", "cut_time": "bad", "weight": 3.0, "bending_count": "2"},
                    {"name": "shim", "cut_time": 0.25, "weight": 0.1, "quantity": 0}
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_seed_deserialization_is_lenient() {
        let seed = sample_seed();
        assert_eq!(seed.thickness, 5.0);
        assert_eq!(seed.program_counts, "1");
        assert_eq!(seed.details[0].weight, 1.5);
        assert_eq!(seed.details[1].cut_time, 0.0);
        assert_eq!(seed.details[1].quantity, 1);
        assert_eq!(seed.details[1].bending_count, 2);
        assert_eq!(seed.details[2].quantity, 1);
        assert_eq!(seed.details[2].bending_count, 0);
    }

    #[test]
    fn test_program_from_seed() {
        let program = Program::from_seed(sample_seed());
        assert_eq!(program.name, "mc2809");
        assert_eq!(program.item_count(), 3);

        for item in &program.items {
            assert_eq!(item.program_id, program.id);
            assert!(item.included);
        }
        assert_eq!(program.items[1].bending_count, 2);

        assert_eq!(program.items[0].material_description, "1.4301");
        assert_eq!(program.items[1].material_description, "ST37");
        assert_eq!(program.items[0].image_ref.as_deref(), Some("static/images/bracket.bmp"));
        assert_ne!(program.items[0].id, program.items[1].id);
    }

    #[test]
    fn test_numeric_material_loads() {
        let seed: ProgramSeed = serde_json::from_str(
            r#"{"name": "mc2810", "material": 1.0038, "details": [
                {"name": "a", "material": 1.4301, "cut_time": 1, "weight": 1},
                {"name": "b", "material": null, "cut_time": 1, "weight": 1}
            ]}"#,
        )
        .unwrap();
        let program = Program::from_seed(seed);
        assert_eq!(program.material, "1.0038");
        assert_eq!(program.items[0].material_description, "1.4301");
        assert_eq!(program.items[1].material_description, "1.0038");
    }

    #[test]
    fn test_total_cut_time() {
        let program = Program::from_seed(sample_seed());
        // 0.5 * 2 + 0.0 * 1 + 0.25 * 1
        assert!((program.total_cut_time_hours() - 1.25).abs() < 1e-12);
    }

    #[test]
    fn test_line_item_defaults() {
        let item = LineItem::new(ProgramId::new(), "p", "ST37", 0.25, 1.0, 0);
        assert_eq!(item.quantity, 1);
        assert!(item.included);
        assert_eq!(item.cut_time_display(), "00:15:00");
        assert_eq!(item.with_bending(-2).bending_count, -2);
    }

    #[test]
    fn test_line_item_serialization() {
        let item = LineItem::new(ProgramId::new(), "bracket", "1.4301", 0.05, 1.2, 4);
        let json = serde_json::to_string_pretty(&item).unwrap();
        let roundtrip: LineItem = serde_json::from_str(&json).unwrap();
        assert_eq!(item, roundtrip);
    }
}
