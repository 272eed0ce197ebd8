//! # Sheetquote CLI Application
//!
//! Terminal front end for the quoting engine. Loads a rate file and one or
//! more program files (as produced by the report parsers), applies bending
//! counts and exclusions given on the command line, and prints the parts
//! table and the quote.
//!
//! ```text
//! quote_cli --rates config.json mc2809.json mc2810.json \
//!     --bending bracket=4 --exclude shim
//! ```

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use quote_core::file_io::{load_program_seed, load_rate_table};
use quote_core::units::{Hours, Money};
use quote_core::{QuoteSession, QuoteSettings, RateTable, RoundingPolicy};

/// Quote laser-cut sheet-metal programs.
#[derive(Parser, Debug)]
#[command(name = "quote_cli")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Program files (JSON) to quote
    #[arg(required = true)]
    programs: Vec<PathBuf>,

    /// Rate file (JSON); built-in default rates when omitted
    #[arg(short, long)]
    rates: Option<PathBuf>,

    /// Bend operations for a part, as NAME=COUNT (repeatable)
    #[arg(short, long, value_parser = parse_bending)]
    bending: Vec<(String, i64)>,

    /// Leave a part out of the quote (repeatable)
    #[arg(short, long)]
    exclude: Vec<String>,

    /// Round each row to cents before summing
    #[arg(long)]
    round_each_row: bool,

    /// Print the session as JSON instead of tables
    #[arg(long)]
    json: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn parse_bending(s: &str) -> Result<(String, i64), String> {
    let (name, count) = s
        .rsplit_once('=')
        .ok_or_else(|| format!("expected NAME=COUNT, got '{}'", s))?;
    let count = count
        .trim()
        .parse()
        .map_err(|_| format!("invalid bending count '{}'", count))?;
    Ok((name.trim().to_string(), count))
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let rates = match &args.rates {
        Some(path) => load_rate_table(path)
            .with_context(|| format!("Failed to load rates from {}", path.display()))?,
        None => {
            info!("No rate file given, using default rates");
            RateTable::default()
        }
    };

    let settings = QuoteSettings {
        rounding: if args.round_each_row {
            RoundingPolicy::RoundThenSum
        } else {
            RoundingPolicy::SumThenRound
        },
        ..QuoteSettings::default()
    };
    let mut session = QuoteSession::with_settings(rates, settings);

    for path in &args.programs {
        let seed = load_program_seed(path)
            .with_context(|| format!("Failed to load program {}", path.display()))?;
        session.add_program(seed);
    }

    for (name, count) in &args.bending {
        let Some(id) = session.find_item_by_name(name).map(|item| item.id) else {
            bail!("No part named '{}'", name);
        };
        session.set_bending_count(id, *count)?;
    }

    for name in &args.exclude {
        match session.find_item_by_name(name).map(|item| item.id) {
            Some(id) => session.set_included(id, false)?,
            None => warn!("No part named '{}' to exclude", name),
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&session)?);
        return Ok(());
    }

    print_parts(&session);
    println!();
    println!("═══════════════════════════════════════");
    println!("  QUOTE ({})", session.settings().currency);
    println!("═══════════════════════════════════════");
    println!("{}", session.summary());

    Ok(())
}

fn print_parts(session: &QuoteSession) {
    for program in session.programs() {
        println!(
            "Program {} - {} {} mm, {} part(s), cut time {}",
            program.name,
            program.material,
            program.thickness_mm,
            program.item_count(),
            Hours(program.total_cut_time_hours()).to_hms()
        );
        println!(
            "  {:<3} {:<20} {:>5} {:>6} {:>9} {:>10} {:>10} {:>10} {:>11}",
            "", "Part", "Qty", "Bends", "Cut time", "Cutting", "Material", "Detail", "Total"
        );
        for item in &program.items {
            let Some(costs) = session.costs(item.id) else {
                continue;
            };
            println!(
                "  {:<3} {:<20} {:>5} {:>6} {:>9} {:>10} {:>10} {:>10} {:>11}",
                if item.included { "[x]" } else { "[ ]" },
                item.name,
                item.quantity,
                item.bending_count,
                item.cut_time_display(),
                Money(costs.cutting_cost).rounded(),
                Money(costs.material_cost).rounded(),
                Money(costs.detail_cost).rounded(),
                Money(costs.total_cost).rounded(),
            );
        }
    }
}
