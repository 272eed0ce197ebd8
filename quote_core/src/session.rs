//! # Quote Session
//!
//! [`QuoteSession`] is the root container of a quoting session and the
//! only place state changes. It owns the writable rate table, the loaded
//! programs, the computed costs of every part and the current quote, and
//! keeps them consistent: every mutating method finishes its recalculation
//! before it returns, so any read afterwards sees fresh values.
//!
//! ## Structure
//!
//! ```text
//! QuoteSession
//! ├── meta: SessionMetadata (created / modified timestamps)
//! ├── settings: QuoteSettings (rounding policy, currency)
//! ├── rates: RateTable (the single writable copy)
//! ├── programs: Vec<Program> (insertion order)
//! ├── computed: HashMap<ItemId, ComputedCosts>
//! └── summary: QuoteSummary
//! ```
//!
//! Serialized sessions list the computed costs as an array in part order,
//! so the same input always produces the same JSON.
//!
//! ## Recalculation
//!
//! | trigger            | per-part recompute | quote recompute |
//! |--------------------|--------------------|-----------------|
//! | `RatesChanged`     | every part         | yes             |
//! | `ItemFieldChanged` | that part          | yes             |
//! | `InclusionChanged` | none               | yes             |
//! | `ItemSetChanged`   | none               | yes             |
//!
//! ## Example
//!
//! ```rust
//! use quote_core::program::ProgramSeed;
//! use quote_core::rates::RateTable;
//! use quote_core::session::QuoteSession;
//!
//! let mut session = QuoteSession::new(RateTable::default());
//! let seed: ProgramSeed = serde_json::from_str(
//!     r#"{"name": "mc2809", "material": "ST37", "details": [{"name": "plate", "cut_time": 1, "weight": 2}]}"#,
//! ).unwrap();
//! let program_id = session.add_program(seed);
//!
//! let item_id = session.program(program_id).unwrap().items[0].id;
//! session.set_bending_count(item_id, 3).unwrap();
//!
//! // 1 h × 5.0 + 2 kg × 2.5, no bending cost by default
//! assert_eq!(session.summary().total_price, 10.0);
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::{QuoteError, QuoteResult};
use crate::pricing::{calculate, ComputedCosts};
use crate::program::{ItemId, LineItem, Program, ProgramId, ProgramSeed};
use crate::quote::{aggregate, QuoteSummary, RoundingPolicy};
use crate::rates::{RateTable, RateUpdate};

/// Event that requires recalculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "item_id")]
pub enum Trigger {
    /// The rate table was replaced
    RatesChanged,
    /// A user-editable field of one part changed
    ItemFieldChanged(ItemId),
    /// One or more inclusion flags changed
    InclusionChanged,
    /// A program was added or removed
    ItemSetChanged,
}

/// Counters of recalculation work done by a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RecalcStats {
    /// Number of per-part cost computations
    pub items_recomputed: u64,
    /// Number of quote aggregations
    pub summaries_recomputed: u64,
}

/// Session settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteSettings {
    /// How row values enter the aggregate
    pub rounding: RoundingPolicy,
    /// Currency label for display (e.g., "PLN")
    pub currency: String,
}

impl Default for QuoteSettings {
    fn default() -> Self {
        QuoteSettings {
            rounding: RoundingPolicy::SumThenRound,
            currency: "PLN".to_string(),
        }
    }
}

/// Session metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionMetadata {
    /// When the session was created
    pub created: DateTime<Utc>,
    /// When state last changed
    pub modified: DateTime<Utc>,
}

/// A quoting session: rates, programs, computed costs and the quote.
#[derive(Debug, Clone, Serialize)]
#[serde(into = "SessionSnapshot")]
pub struct QuoteSession {
    pub meta: SessionMetadata,
    settings: QuoteSettings,
    rates: RateTable,
    programs: Vec<Program>,
    computed: HashMap<ItemId, ComputedCosts>,
    summary: QuoteSummary,
    stats: RecalcStats,
}

/// Costs of one part, keyed by its ID
#[derive(Debug, Clone, Serialize)]
struct PricedItem {
    item_id: ItemId,
    #[serde(flatten)]
    costs: ComputedCosts,
}

/// Serialized form of a session; recalc counters are left out
#[derive(Debug, Clone, Serialize)]
struct SessionSnapshot {
    meta: SessionMetadata,
    settings: QuoteSettings,
    rates: RateTable,
    computed: Vec<PricedItem>,
    programs: Vec<Program>,
    summary: QuoteSummary,
}

impl From<QuoteSession> for SessionSnapshot {
    fn from(session: QuoteSession) -> Self {
        let computed = session
            .items()
            .filter_map(|item| {
                session.computed.get(&item.id).map(|costs| PricedItem {
                    item_id: item.id,
                    costs: *costs,
                })
            })
            .collect();
        SessionSnapshot {
            meta: session.meta,
            settings: session.settings,
            rates: session.rates,
            computed,
            programs: session.programs,
            summary: session.summary,
        }
    }
}

impl QuoteSession {
    /// Create an empty session with the given starting rates.
    pub fn new(rates: RateTable) -> Self {
        Self::with_settings(rates, QuoteSettings::default())
    }

    /// Create an empty session with explicit settings.
    ///
    /// Negative or non-finite starting rates are stored as 0.
    pub fn with_settings(rates: RateTable, settings: QuoteSettings) -> Self {
        let now = Utc::now();
        QuoteSession {
            meta: SessionMetadata {
                created: now,
                modified: now,
            },
            settings,
            rates: rates.sanitized(),
            programs: Vec::new(),
            computed: HashMap::new(),
            summary: QuoteSummary::default(),
            stats: RecalcStats::default(),
        }
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    /// Snapshot of the current rate table
    pub fn rates(&self) -> RateTable {
        self.rates
    }

    pub fn settings(&self) -> &QuoteSettings {
        &self.settings
    }

    /// Current quote over the included parts
    pub fn summary(&self) -> &QuoteSummary {
        &self.summary
    }

    /// Loaded programs in insertion order
    pub fn programs(&self) -> &[Program] {
        &self.programs
    }

    pub fn program(&self, id: ProgramId) -> Option<&Program> {
        self.programs.iter().find(|p| p.id == id)
    }

    /// All parts, programs in insertion order then report order
    pub fn items(&self) -> impl Iterator<Item = &LineItem> {
        self.programs.iter().flat_map(|p| p.items.iter())
    }

    pub fn item(&self, id: ItemId) -> Option<&LineItem> {
        self.items().find(|item| item.id == id)
    }

    /// First part with this name, in session order
    pub fn find_item_by_name(&self, name: &str) -> Option<&LineItem> {
        self.items().find(|item| item.name == name)
    }

    /// Computed costs of one part
    pub fn costs(&self, id: ItemId) -> Option<&ComputedCosts> {
        self.computed.get(&id)
    }

    pub fn stats(&self) -> RecalcStats {
        self.stats
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    /// Apply a configuration update; missing or malformed fields become 0.
    ///
    /// The new table is built completely before it replaces the old one.
    pub fn update_rates(&mut self, update: &RateUpdate) -> RateTable {
        self.set_rates(RateTable::from_update(update))
    }

    /// Replace the rate table wholesale. Negative or non-finite rates are
    /// stored as 0.
    pub fn set_rates(&mut self, rates: RateTable) -> RateTable {
        info!("rate table updated");
        self.rates = rates.sanitized();
        self.handle(Trigger::RatesChanged);
        self.rates
    }

    /// Change the rounding policy used for the quote.
    pub fn set_rounding(&mut self, rounding: RoundingPolicy) {
        self.settings.rounding = rounding;
        self.refresh_summary();
        self.touch();
    }

    /// Ingest a program and price its parts.
    pub fn add_program(&mut self, seed: ProgramSeed) -> ProgramId {
        let mut program = Program::from_seed(seed);
        for item in &mut program.items {
            let costs = calculate(item, &self.rates);
            self.computed.insert(item.id, costs);
            self.stats.items_recomputed += 1;
        }
        let id = program.id;
        info!(program = %program.name, parts = program.items.len(), "program added");
        self.programs.push(program);
        self.handle(Trigger::ItemSetChanged);
        id
    }

    /// Remove a program and all its parts.
    pub fn remove_program(&mut self, id: ProgramId) -> QuoteResult<Program> {
        let index = self
            .programs
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| QuoteError::program_not_found(id))?;
        let program = self.programs.remove(index);
        for item in &program.items {
            self.computed.remove(&item.id);
        }
        info!(program = %program.name, parts = program.items.len(), "program removed");
        self.handle(Trigger::ItemSetChanged);
        Ok(program)
    }

    /// Set the number of bends of one part. Negative values are stored as 0.
    pub fn set_bending_count(&mut self, id: ItemId, bending_count: i64) -> QuoteResult<()> {
        self.item_mut(id)?.bending_count = bending_count;
        self.handle(Trigger::ItemFieldChanged(id));
        Ok(())
    }

    /// Include or exclude one part from the quote.
    pub fn set_included(&mut self, id: ItemId, included: bool) -> QuoteResult<()> {
        self.item_mut(id)?.included = included;
        self.handle(Trigger::InclusionChanged);
        Ok(())
    }

    /// Include or exclude every part at once.
    pub fn set_all_included(&mut self, included: bool) {
        for item in self.programs.iter_mut().flat_map(|p| p.items.iter_mut()) {
            item.included = included;
        }
        self.handle(Trigger::InclusionChanged);
    }

    /// Bring computed state up to date after `trigger`.
    ///
    /// Mutating methods call this themselves; it is public for
    /// collaborators that edit state out of band and need to resync.
    pub fn handle(&mut self, trigger: Trigger) {
        debug!(?trigger, "recalculating");
        match trigger {
            Trigger::RatesChanged => self.recompute_all_items(),
            Trigger::ItemFieldChanged(id) => self.recompute_item(id),
            Trigger::InclusionChanged | Trigger::ItemSetChanged => {}
        }
        self.refresh_summary();
        self.touch();
    }

    fn recompute_all_items(&mut self) {
        let rates = self.rates;
        for item in self.programs.iter_mut().flat_map(|p| p.items.iter_mut()) {
            self.computed.insert(item.id, calculate(item, &rates));
            self.stats.items_recomputed += 1;
        }
    }

    fn recompute_item(&mut self, id: ItemId) {
        let rates = self.rates;
        if let Some(item) = self
            .programs
            .iter_mut()
            .flat_map(|p| p.items.iter_mut())
            .find(|item| item.id == id)
        {
            self.computed.insert(id, calculate(item, &rates));
            self.stats.items_recomputed += 1;
        }
    }

    fn refresh_summary(&mut self) {
        self.summary = aggregate(&self.programs, &self.computed, self.settings.rounding);
        self.stats.summaries_recomputed += 1;
        debug!(
            parts = self.summary.included_part_count,
            total = self.summary.total_price,
            "quote refreshed"
        );
    }

    fn item_mut(&mut self, id: ItemId) -> QuoteResult<&mut LineItem> {
        self.programs
            .iter_mut()
            .flat_map(|p| p.items.iter_mut())
            .find(|item| item.id == id)
            .ok_or_else(|| QuoteError::item_not_found(id))
    }

    /// Update the modified timestamp.
    fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }
}

impl Default for QuoteSession {
    fn default() -> Self {
        QuoteSession::new(RateTable::default())
    }
}
