//! # File I/O Module
//!
//! Read-only loaders for the two collaborator inputs that arrive as files:
//!
//! - **Rate files**: the JSON configuration with cutting, material and
//!   bending rates (same shape as [`RateUpdate`], legacy keys accepted)
//! - **Program seeds**: the JSON a report parser produces for one program
//!
//! Nothing here writes files; the session keeps configuration in memory.
//!
//! ## Example
//!
//! ```rust,no_run
//! use quote_core::file_io::{load_program_seed, load_rate_table};
//! use quote_core::session::QuoteSession;
//! use std::path::Path;
//!
//! let rates = load_rate_table(Path::new("config.json"))?;
//! let mut session = QuoteSession::new(rates);
//! session.add_program(load_program_seed(Path::new("mc2809.json"))?);
//! println!("{}", session.summary());
//! # Ok::<(), quote_core::errors::QuoteError>(())
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::errors::{QuoteError, QuoteResult};
use crate::program::ProgramSeed;
use crate::rates::{ClassRatesUpdate, RateTable, RateUpdate};

/// Rate file layout; a missing section keeps its default.
#[derive(Debug, Deserialize)]
struct RateFile {
    #[serde(default, alias = "cutting_costs")]
    cutting_rates: Option<ClassRatesUpdate>,
    #[serde(default, alias = "material_costs")]
    material_rates: Option<ClassRatesUpdate>,
    #[serde(default, alias = "suma_kosztow_giecia")]
    bending_unit_cost: Option<Value>,
}

impl RateFile {
    fn merge_into(self, mut base: RateUpdate) -> RateUpdate {
        if let Some(section) = self.cutting_rates {
            base.cutting_rates = section;
        }
        if let Some(section) = self.material_rates {
            base.material_rates = section;
        }
        if let Some(value) = self.bending_unit_cost {
            base.bending_unit_cost = value;
        }
        base
    }
}

fn read_to_string(path: &Path) -> QuoteResult<String> {
    fs::read_to_string(path)
        .map_err(|e| QuoteError::file_error("read", path.display().to_string(), e.to_string()))
}

/// Parse rate file contents.
///
/// Top-level sections missing from the file keep the default rates. Inside
/// a section that is present, a missing or malformed value becomes 0.
pub fn parse_rate_table(contents: &str) -> QuoteResult<RateTable> {
    let file: RateFile = serde_json::from_str(contents)?;
    let update = file.merge_into(RateUpdate::from(&RateTable::default()));
    Ok(RateTable::from_update(&update))
}

/// Load a rate table from a JSON file.
///
/// # Returns
///
/// * `Ok(RateTable)` - Loaded and coerced rates
/// * `Err(QuoteError::FileError)` - I/O error
/// * `Err(QuoteError::SerializationError)` - Not a JSON object
pub fn load_rate_table(path: &Path) -> QuoteResult<RateTable> {
    let contents = read_to_string(path)?;
    let rates = parse_rate_table(&contents).map_err(|e| QuoteError::SerializationError {
        reason: format!("Invalid rate file {}: {}", path.display(), e),
    })?;
    debug!(path = %path.display(), ?rates, "rate table loaded");
    Ok(rates)
}

/// Load one program's seed data from a JSON file.
pub fn load_program_seed(path: &Path) -> QuoteResult<ProgramSeed> {
    let contents = read_to_string(path)?;
    let seed: ProgramSeed =
        serde_json::from_str(&contents).map_err(|e| QuoteError::SerializationError {
            reason: format!("Invalid program file {}: {}", path.display(), e),
        })?;
    debug!(path = %path.display(), parts = seed.details.len(), "program seed loaded");
    Ok(seed)
}
