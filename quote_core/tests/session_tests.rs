//! Integration tests for the quoting session.
//!
//! These drive the public API the way a front end does: load rates and
//! program files, apply user edits, and read back part costs and the quote.

use std::fs;
use std::path::PathBuf;

use pretty_assertions::assert_eq;
use quote_core::file_io::{load_program_seed, load_rate_table};
use quote_core::program::ItemId;
use quote_core::rates::RateUpdate;
use quote_core::{MaterialClass, ProgramSeed, QuoteSession, RateTable};
use tempfile::TempDir;

const MIXED_PROGRAM: &str = r#"{
    "name": "mc2809",
    "material": "1.4301-50",
    "thicknes": 5.0,
    "machine_time": "0:02:28",
    "program_counts": "1",
    "details": [
        {"name": "bracket", "cut_time": 2, "weight": 5, "quantity": 3},
        {"name": "base", "material": "ST37", "cut_time": 1, "weight": 2, "quantity": 1},
        {"name": "cover", "material": "Aluminium", "cut_time": "0.5", "weight": "4", "quantity": 2}
    ]
}"#;

fn write_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn example_rates() -> RateTable {
    let mut rates = RateTable::zero();
    rates.cutting_rates.stainless = 10.0;
    rates.material_rates.stainless = 8.0;
    rates.cutting_rates.black_steel = 5.0;
    rates.material_rates.black_steel = 3.0;
    rates.cutting_rates.aluminium = 4.0;
    rates.material_rates.aluminium = 1.5;
    rates.bending_unit_cost = 2.0;
    rates
}

fn loaded_session() -> QuoteSession {
    let seed: ProgramSeed = serde_json::from_str(MIXED_PROGRAM).unwrap();
    let mut session = QuoteSession::new(example_rates());
    session.add_program(seed);
    session
}

fn id_of(session: &QuoteSession, name: &str) -> ItemId {
    session.find_item_by_name(name).unwrap().id
}

#[test]
fn stainless_part_worked_example() {
    let mut session = loaded_session();
    let bracket = id_of(&session, "bracket");
    session.set_bending_count(bracket, 4).unwrap();

    let costs = session.costs(bracket).unwrap();
    assert_eq!(costs.material_class, MaterialClass::Stainless);
    assert_eq!(costs.cutting_cost, 20.0);
    assert_eq!(costs.material_cost, 40.0);
    assert_eq!(costs.bending_cost, 8.0);
    assert_eq!(costs.detail_cost, 68.0);
    assert_eq!(costs.total_cost, 204.0);
}

#[test]
fn black_steel_part_with_negative_bending() {
    let mut session = loaded_session();
    let base = id_of(&session, "base");
    session.set_bending_count(base, -3).unwrap();

    assert_eq!(session.item(base).unwrap().bending_count, 0);
    let costs = session.costs(base).unwrap();
    assert_eq!(costs.cutting_cost, 5.0);
    assert_eq!(costs.material_cost, 6.0);
    assert_eq!(costs.bending_cost, 0.0);
    assert_eq!(costs.detail_cost, 11.0);
    assert_eq!(costs.total_cost, 11.0);
}

#[test]
fn full_quote_over_mixed_program() {
    let session = loaded_session();
    let summary = session.summary().rounded();

    // bracket 60 × 3, base 11 × 1, cover (2 + 6) × 2
    assert_eq!(summary.included_part_count, 6);
    assert_eq!(summary.total_cutting_cost, 27.0);
    assert_eq!(summary.total_material_cost, 52.0);
    assert_eq!(summary.total_price, 207.0);
    assert_eq!(
        summary.material_breakdown.into_iter().collect::<Vec<_>>(),
        vec![
            (MaterialClass::BlackSteel, 6.0),
            (MaterialClass::Stainless, 40.0),
            (MaterialClass::Aluminium, 6.0),
        ]
    );
}

#[test]
fn toggling_inclusion_moves_total_by_item_total() {
    let mut session = loaded_session();
    let cover = id_of(&session, "cover");
    let cover_total = session.costs(cover).unwrap().total_cost;
    let bracket_costs = *session.costs(id_of(&session, "bracket")).unwrap();
    let before = session.summary().total_price;

    session.set_included(cover, false).unwrap();
    assert!((before - session.summary().total_price - cover_total).abs() < 1e-9);
    assert!(!session.summary().material_breakdown.contains_key(&MaterialClass::Aluminium));
    assert_eq!(*session.costs(id_of(&session, "bracket")).unwrap(), bracket_costs);

    session.set_included(cover, true).unwrap();
    assert!((session.summary().total_price - before).abs() < 1e-9);
}

#[test]
fn stainless_rate_change_leaves_aluminium_untouched() {
    let mut session = loaded_session();
    let cover = id_of(&session, "cover");
    let bracket = id_of(&session, "bracket");
    let cover_before = *session.costs(cover).unwrap();
    let bracket_before = *session.costs(bracket).unwrap();

    let mut rates = session.rates();
    rates.cutting_rates.stainless = 20.0;
    session.set_rates(rates);

    assert_eq!(*session.costs(cover).unwrap(), cover_before);
    assert!(session.costs(bracket).unwrap().total_cost > bracket_before.total_cost);

    rates.material_rates.aluminium = 3.0;
    session.set_rates(rates);
    assert!(session.costs(cover).unwrap().material_cost > cover_before.material_cost);
}

#[test]
fn empty_selection_yields_zero_quote() {
    let mut session = loaded_session();
    session.set_all_included(false);

    let summary = session.summary();
    assert_eq!(summary.included_part_count, 0);
    assert_eq!(summary.total_cutting_cost, 0.0);
    assert_eq!(summary.total_material_cost, 0.0);
    assert_eq!(summary.total_price, 0.0);
    assert!(summary.material_breakdown.is_empty());
}

#[test]
fn permissive_rate_update_zeroes_bad_fields() {
    let mut session = loaded_session();
    let update: RateUpdate = serde_json::from_value(serde_json::json!({
        "cutting_rates": {"black_steel": "7", "stainless": "n/a", "aluminium": 4},
        "material_rates": {"black_steel": 3, "stainless": 8, "aluminium": 1.5}
    }))
    .unwrap();
    session.update_rates(&update);

    let bracket = id_of(&session, "bracket");
    assert_eq!(session.costs(bracket).unwrap().cutting_cost, 0.0);
    assert_eq!(session.rates().bending_unit_cost, 0.0);
    assert_eq!(session.rates().cutting_rates.black_steel, 7.0);
}

#[test]
fn loads_rates_and_programs_from_files() {
    let dir = TempDir::new().unwrap();
    let rates_path = write_file(
        &dir,
        "config.json",
        r#"{
            "cutting_costs": {"stal_czarna": 5.0, "stal_nierdzewna": 10.0, "aluminium": 4.0},
            "material_costs": {"stal_czarna": 3.0, "stal_nierdzewna": 8.0, "aluminium": 1.5},
            "suma_kosztow_giecia": 2.0
        }"#,
    );
    let program_path = write_file(&dir, "mc2809.json", MIXED_PROGRAM);

    let rates = load_rate_table(&rates_path).unwrap();
    assert_eq!(rates, example_rates());

    let mut session = QuoteSession::new(rates);
    let id = session.add_program(load_program_seed(&program_path).unwrap());

    let program = session.program(id).unwrap();
    assert_eq!(program.name, "mc2809");
    assert_eq!(program.thickness_mm, 5.0);
    assert_eq!(program.items.len(), 3);
    assert_eq!(session.summary().rounded().total_price, 207.0);
}

#[test]
fn removing_a_program_drops_its_parts_from_the_quote() {
    let mut session = loaded_session();
    let second: ProgramSeed = serde_json::from_str(
        r#"{"name": "mc2810", "material": "ST37", "details": [{"name": "tab", "cut_time": 1, "weight": 1}]}"#,
    )
    .unwrap();
    let second_id = session.add_program(second);
    assert_eq!(session.summary().included_part_count, 7);

    session.remove_program(second_id).unwrap();
    assert_eq!(session.summary().included_part_count, 6);
    assert!(session.find_item_by_name("tab").is_none());
    assert_eq!(session.summary().rounded().total_price, 207.0);
}
