#![allow(clippy::unwrap_used)]

use std::io::Write;

use rust_decimal_macros::dec;

use super::app::{App, InputMode, PendingAction, Screen};
use super::commands::*;
use crate::db::Database;
use crate::engine::BudgetEngine;
use crate::models::{CategoryId, Currency, PlanSettings};

fn setup() -> (App, Database) {
    let settings = PlanSettings::default();
    let engine = BudgetEngine::from_settings(&settings);
    let app = App::new("trip".into(), settings, engine);
    (app, Database::open_in_memory().unwrap())
}

fn run(input: &str, app: &mut App, db: &mut Database) {
    handle_command(input, app, db).unwrap();
}

fn amount_of(app: &App, id: &str) -> rust_decimal::Decimal {
    app.engine.category(&CategoryId::new(id)).unwrap().amount
}

// ── Navigation ────────────────────────────────────────────────

#[test]
fn test_screen_commands() {
    let (mut app, mut db) = setup();
    run("chart", &mut app, &mut db);
    assert_eq!(app.screen, Screen::Chart);
    run("b", &mut app, &mut db);
    assert_eq!(app.screen, Screen::Breakdown);
    run("categories", &mut app, &mut db);
    assert_eq!(app.screen, Screen::Editor);
}

#[test]
fn test_quit_and_help() {
    let (mut app, mut db) = setup();
    run("help", &mut app, &mut db);
    assert!(app.show_help);
    run("q", &mut app, &mut db);
    assert!(!app.running);
}

#[test]
fn test_unknown_command_suggests() {
    let (mut app, mut db) = setup();
    run("buget 10", &mut app, &mut db);
    assert!(app.status_message.contains("Unknown command: :buget"));
    assert!(app.status_message.contains(":budget"));
}

#[test]
fn test_levenshtein_suggestion_skips_aliases() {
    let (mut app, mut db) = setup();
    run("qq", &mut app, &mut db);
    assert!(!app.status_message.ends_with(":q?"));
}

// ── Budget ────────────────────────────────────────────────────

#[test]
fn test_budget_command() {
    let (mut app, mut db) = setup();
    run("budget $2,000", &mut app, &mut db);
    assert_eq!(app.engine.budget(), dec!(2000));
    assert_eq!(app.status_message, "Budget set to $2,000");
    assert!(app.has_unsaved_changes());
}

#[test]
fn test_budget_command_rejects_negative() {
    let (mut app, mut db) = setup();
    run("budget -5", &mut app, &mut db);
    assert_eq!(app.engine.budget(), dec!(1500));
    assert!(app.status_message.starts_with("Invalid budget"));
    assert!(!app.has_unsaved_changes());
}

#[test]
fn test_budget_without_args_opens_prompt() {
    let (mut app, mut db) = setup();
    run("budget", &mut app, &mut db);
    assert_eq!(app.input_mode, InputMode::Budget);
    assert_eq!(app.command_input, "1500");
}

// ── Categories ────────────────────────────────────────────────

#[test]
fn test_add_command_selects_new_category() {
    let (mut app, mut db) = setup();
    run("add Souvenirs", &mut app, &mut db);
    assert_eq!(app.engine.categories().len(), 7);
    assert_eq!(app.selected_category().unwrap().name, "Souvenirs");
    assert_eq!(app.selected_id(), Some(CategoryId::new("custom-1")));
}

#[test]
fn test_add_without_args_opens_prompt() {
    let (mut app, mut db) = setup();
    run("add", &mut app, &mut db);
    assert_eq!(app.input_mode, InputMode::NewCategory);
    assert!(app.command_input.is_empty());
}

#[test]
fn test_add_blank_name_reports() {
    let (mut app, _db) = setup();
    add_category("   ", &mut app);
    assert_eq!(app.engine.categories().len(), 6);
    assert_eq!(app.status_message, "Category name cannot be empty");
}

#[test]
fn test_remove_asks_for_confirmation() {
    let (mut app, mut db) = setup();
    run("remove shopping", &mut app, &mut db);
    assert_eq!(app.input_mode, InputMode::Confirm);
    assert!(matches!(
        app.pending_action,
        Some(PendingAction::RemoveCategory { ref id, .. }) if id.as_str() == "shopping"
    ));
    // Nothing removed until confirmed
    assert_eq!(app.engine.categories().len(), 6);
}

#[test]
fn test_remove_unknown_category() {
    let (mut app, mut db) = setup();
    run("remove Yachts", &mut app, &mut db);
    assert_eq!(app.status_message, "Category 'Yachts' not found");
    assert!(app.pending_action.is_none());
}

#[test]
fn test_remove_locked_category_refused() {
    let settings = PlanSettings::default();
    let mut cats = crate::models::default_categories();
    cats[0].editable = false;
    let engine = BudgetEngine::new(dec!(1500), cats);
    let mut app = App::new("trip".into(), settings, engine);
    let mut db = Database::open_in_memory().unwrap();

    run("remove", &mut app, &mut db);
    assert!(app.status_message.contains("cannot be removed"));
    assert!(app.pending_action.is_none());
}

#[test]
fn test_set_selected_amount() {
    let (mut app, mut db) = setup();
    app.category_index = 2;
    run("set 320", &mut app, &mut db);
    assert_eq!(amount_of(&app, "food"), dec!(320));
    assert_eq!(app.status_message, "Food & Drinks set to $320");
}

#[test]
fn test_set_named_amount_with_spaces() {
    let (mut app, mut db) = setup();
    run("set food & drinks 90", &mut app, &mut db);
    assert_eq!(amount_of(&app, "food"), dec!(90));
}

#[test]
fn test_set_clamps_and_says_so() {
    let (mut app, mut db) = setup();
    run("set Transportation 99999", &mut app, &mut db);
    assert_eq!(amount_of(&app, "transportation"), dec!(1500));
    assert!(app.status_message.contains("limited"));

    run("set Transportation -40", &mut app, &mut db);
    assert_eq!(amount_of(&app, "transportation"), dec!(0));
}

#[test]
fn test_set_invalid_amount() {
    let (mut app, mut db) = setup();
    run("set Food lots", &mut app, &mut db);
    assert_eq!(app.status_message, "Invalid amount: lots");
}

#[test]
fn test_parse_amount_arg() {
    assert_eq!(parse_amount_arg("$1,200.50"), Some(dec!(1200.50)));
    assert_eq!(parse_amount_arg("-30"), Some(dec!(-30)));
    assert_eq!(parse_amount_arg("abc"), None);
}

#[test]
fn test_reset_asks_for_confirmation() {
    let (mut app, mut db) = setup();
    run("reset", &mut app, &mut db);
    assert!(matches!(app.pending_action, Some(PendingAction::Reset)));
    assert_eq!(app.input_mode, InputMode::Confirm);
}

// ── Settings ──────────────────────────────────────────────────

#[test]
fn test_currency_command() {
    let (mut app, mut db) = setup();
    run("currency eur", &mut app, &mut db);
    assert_eq!(app.settings.currency, Currency::Eur);
    assert_eq!(app.currency_symbol(), "€");
    assert!(app.has_unsaved_changes());

    run("currency XYZ", &mut app, &mut db);
    assert_eq!(app.settings.currency, Currency::Eur);
    assert!(app.status_message.starts_with("Usage"));
}

#[test]
fn test_title_command() {
    let (mut app, mut db) = setup();
    run("title Lisbon in May", &mut app, &mut db);
    assert_eq!(app.settings.title, "Lisbon in May");
}

#[test]
fn test_colors_command_keeps_autosave() {
    let (mut app, mut db) = setup();
    run("colors hashed", &mut app, &mut db);
    assert!(!app.has_unsaved_changes());
    run("add Tips", &mut app, &mut db);
    assert!(app.has_unsaved_changes());
    assert!(app.selected_category().unwrap().color.starts_with('#'));
}

// ── Persistence ───────────────────────────────────────────────

#[test]
fn test_save_and_plans() {
    let (mut app, mut db) = setup();
    run("budget 1800", &mut app, &mut db);
    run("save", &mut app, &mut db);
    assert!(!app.has_unsaved_changes());

    let stored = db.load_plan("trip").unwrap().unwrap();
    assert_eq!(stored.snapshot.budget, dec!(1800));

    run("plans", &mut app, &mut db);
    assert_eq!(app.status_message, "Plans: trip");
}

#[test]
fn test_listener_records_latest_plan() {
    let (mut app, _db) = setup();
    assert!(app.take_unsaved().is_none());

    app.engine.set_budget(dec!(900));
    app.engine.set_category_amount(&CategoryId::new("food"), dec!(75));
    let snapshot = app.take_unsaved().unwrap();
    assert_eq!(snapshot.budget, dec!(900));
    let food = snapshot.categories.iter().find(|c| c.id.as_str() == "food");
    assert_eq!(food.unwrap().amount, dec!(75));
    assert_eq!(snapshot, app.engine.snapshot());
    assert!(app.take_unsaved().is_none());
}

#[test]
fn test_plans_when_empty() {
    let (mut app, mut db) = setup();
    run("plans", &mut app, &mut db);
    assert_eq!(app.status_message, "No saved plans yet");
}

// ── Import / export ───────────────────────────────────────────

#[test]
fn test_import_command_merges() {
    let (mut app, mut db) = setup();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "Category,Description,Amount,Date").unwrap();
    writeln!(file, "Food & Drinks,Dinner,40.00,2026-05-01").unwrap();
    writeln!(file, "Food & Drinks,Lunch,12.50,2026-05-02").unwrap();
    writeln!(file, "Museums,Tickets,30,2026-05-02").unwrap();
    file.flush().unwrap();

    run(
        &format!("import {}", file.path().display()),
        &mut app,
        &mut db,
    );
    assert_eq!(amount_of(&app, "food"), dec!(52.50));
    assert_eq!(app.engine.categories().len(), 7);
    assert_eq!(
        app.status_message,
        "Imported 3 expenses: 1 categories updated, 1 added"
    );
}

#[test]
fn test_import_command_skips_other_currencies() {
    let (mut app, mut db) = setup();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "Category,Description,Amount,Currency").unwrap();
    writeln!(file, "Shopping,Hat,20,USD").unwrap();
    writeln!(file, "Shopping,Scarf,300,EUR").unwrap();
    writeln!(file, "visa,Fee,15,$").unwrap();
    writeln!(file, "Visa,Photos,5,USD").unwrap();
    file.flush().unwrap();

    run(
        &format!("import {}", file.path().display()),
        &mut app,
        &mut db,
    );
    assert_eq!(amount_of(&app, "shopping"), dec!(20));
    assert_eq!(amount_of(&app, "visa"), dec!(20));
    assert_eq!(
        app.status_message,
        "Imported 3 expenses: 1 categories updated, 1 added (1 in other currencies skipped)"
    );
}

#[test]
fn test_import_missing_file_reports() {
    let (mut app, mut db) = setup();
    run("import /definitely/not/here.csv", &mut app, &mut db);
    assert!(app.status_message.starts_with("Import failed"));
}

#[test]
fn test_export_command() {
    let (mut app, mut db) = setup();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plan.csv");
    run(&format!("export {}", path.display()), &mut app, &mut db);

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.starts_with("id,name,amount,color,editable,chart_share"));
    assert!(app.status_message.starts_with("Exported 6 categories"));
}
