//! # quote_core - Sheet-Metal Quoting Engine
//!
//! `quote_core` prices laser-cut sheet-metal parts. A cutting program
//! delivers parts with a per-piece cutting time and weight; a configurable
//! rate table turns each part into a cost, and the parts the user selects
//! are summed into a quote. All types are JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **No ambient state**: rates are an explicit value passed to every calculation
//! - **Never fails on data**: malformed numbers coerce to 0 or their default
//! - **Always consistent**: every session mutation recalculates before returning
//!
//! ## Quick Start
//!
//! ```rust
//! use quote_core::program::ProgramSeed;
//! use quote_core::session::QuoteSession;
//!
//! let mut session = QuoteSession::default();
//! let seed: ProgramSeed = serde_json::from_str(r#"{
//!     "name": "mc2809",
//!     "material": "1.4301",
//!     "details": [{"name": "bracket", "cut_time": 0.5, "weight": 2.0, "quantity": 3}]
//! }"#).unwrap();
//! session.add_program(seed);
//!
//! // (0.5 h × 6.0 + 2 kg × 3.0) × 3
//! assert_eq!(session.summary().total_price, 27.0);
//! ```
//!
//! ## Modules
//!
//! - [`materials`] - Material classes and description classifier
//! - [`rates`] - Rate table and permissive rate updates
//! - [`program`] - Programs, parts and ingestion seeds
//! - [`pricing`] - Per-part cost calculation
//! - [`quote`] - Aggregate quote over included parts
//! - [`session`] - Recalculation coordinator owning all state
//! - [`units`] - Money and machine-time display helpers
//! - [`errors`] - Structured error types
//! - [`file_io`] - Read-only loaders for rate files and program seeds
//! - [`coerce`] - Lenient number parsing for collaborator input

pub mod coerce;
pub mod errors;
pub mod file_io;
pub mod materials;
pub mod pricing;
pub mod program;
pub mod quote;
pub mod rates;
pub mod session;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use errors::{QuoteError, QuoteResult};
pub use file_io::{load_program_seed, load_rate_table};
pub use materials::{classify, MaterialClass};
pub use pricing::{calculate, ComputedCosts};
pub use program::{ItemId, LineItem, Program, ProgramId, ProgramSeed};
pub use quote::{aggregate, QuoteSummary, RoundingPolicy};
pub use rates::{RateTable, RateUpdate};
pub use session::{QuoteSession, QuoteSettings, Trigger};
