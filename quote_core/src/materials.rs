//! # Material Classes
//!
//! Sheet material descriptions come out of the cutting machine reports as
//! free text ("1.4301-50", "ST37 2mm", "Aluminium AW-5754", ...). Every rate
//! lookup is keyed by one of three material classes, so the first step of
//! pricing a part is mapping its description onto a [`MaterialClass`].
//!
//! ## Example
//!
//! ```rust
//! use quote_core::materials::{classify, MaterialClass};
//!
//! assert_eq!(classify("1.4301"), MaterialClass::Stainless);
//! assert_eq!(classify("st37-30"), MaterialClass::BlackSteel);
//! assert_eq!(classify("ALUMINIUM 3mm"), MaterialClass::Aluminium);
//! assert_eq!(classify("unknown alloy"), MaterialClass::BlackSteel);
//! ```

use serde::{Deserialize, Serialize};

/// Material class driving rate lookup.
///
/// The derived ordering (black steel, stainless, aluminium) is the order
/// used for breakdown output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialClass {
    /// Carbon / black steel (1.0038, S235, ST37)
    #[default]
    BlackSteel,
    /// Stainless steel (1.4301)
    Stainless,
    /// Aluminium
    Aluminium,
}

impl MaterialClass {
    /// All material classes for iteration
    pub const ALL: [MaterialClass; 3] = [
        MaterialClass::BlackSteel,
        MaterialClass::Stainless,
        MaterialClass::Aluminium,
    ];

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            MaterialClass::BlackSteel => "Black steel",
            MaterialClass::Stainless => "Stainless steel",
            MaterialClass::Aluminium => "Aluminium",
        }
    }
}

impl std::fmt::Display for MaterialClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Classification rules, checked in order. Markers are lowercase.
const RULES: [(&[&str], MaterialClass); 3] = [
    (&["1.4301"], MaterialClass::Stainless),
    (&["1.0038", "st37"], MaterialClass::BlackSteel),
    (&["aluminium"], MaterialClass::Aluminium),
];

/// Map a free-text material description to its material class.
///
/// Case-insensitive substring match; the first matching rule wins and
/// anything unmatched falls back to [`MaterialClass::BlackSteel`].
pub fn classify(material_description: &str) -> MaterialClass {
    let description = material_description.to_lowercase();
    RULES
        .iter()
        .find(|(markers, _)| markers.iter().any(|m| description.contains(m)))
        .map(|(_, class)| *class)
        .unwrap_or_default()
}
