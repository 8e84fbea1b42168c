use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;
use std::sync::LazyLock;

use rust_decimal::Decimal;

use super::app::{App, InputMode, PendingAction, Screen};
use super::util::format_amount;
use crate::db::Database;
use crate::engine::{HashedColors, PaletteColors};
use crate::import::{export_plan, merge_expenses, CsvImporter};
use crate::models::{CategoryId, Currency, ExpenseCategory};
use crate::run::shellexpand;

pub(crate) struct Command {
    pub(crate) description: &'static str,
    pub(crate) run: fn(&str, &mut App, &mut Database) -> anyhow::Result<()>,
}

macro_rules! register_command {
    ($name:expr, $desc:expr, $func:expr, $registry:expr) => {{
        $registry.insert(
            $name,
            Command {
                description: $desc,
                run: $func,
            },
        );
    }};
}

pub(crate) static COMMANDS: LazyLock<HashMap<&str, Command>> = LazyLock::new(|| {
    let mut r: HashMap<&str, Command> = HashMap::new();

    register_command!("q", "Quit TripBudget", cmd_quit, r);
    register_command!("quit", "Quit TripBudget", cmd_quit, r);
    register_command!("c", "Go to Categories", cmd_categories, r);
    register_command!("categories", "Go to Categories", cmd_categories, r);
    register_command!("chart", "Go to Chart", cmd_chart, r);
    register_command!("b", "Go to Breakdown", cmd_breakdown, r);
    register_command!("breakdown", "Go to Breakdown", cmd_breakdown, r);
    register_command!("help", "Show available commands", cmd_help, r);
    register_command!("h", "Show available commands", cmd_help, r);
    register_command!(
        "budget",
        "Set total budget (e.g. :budget 2000)",
        cmd_budget,
        r
    );
    register_command!(
        "add",
        "Add category (e.g. :add Souvenirs)",
        cmd_add,
        r
    );
    register_command!(
        "a",
        "Add category (e.g. :a Souvenirs)",
        cmd_add,
        r
    );
    register_command!(
        "remove",
        "Remove selected or named category (e.g. :remove Shopping)",
        cmd_remove,
        r
    );
    register_command!(
        "set",
        "Set amount for selected or named category (e.g. :set Food & Drinks 300)",
        cmd_set,
        r
    );
    register_command!("reset", "Restore the initial categories", cmd_reset, r);
    register_command!(
        "currency",
        "Set display currency (e.g. :currency EUR)",
        cmd_currency,
        r
    );
    register_command!(
        "title",
        "Rename the plan title (e.g. :title Lisbon in May)",
        cmd_title,
        r
    );
    register_command!(
        "colors",
        "Color mode for new categories (:colors palette|hashed)",
        cmd_colors,
        r
    );
    register_command!(
        "import",
        "Merge expenses from CSV (e.g. :import ~/expenses.csv)",
        cmd_import,
        r
    );
    register_command!(
        "export",
        "Export plan to CSV (e.g. :export ~/trip.csv)",
        cmd_export,
        r
    );
    register_command!("save", "Save the plan now", cmd_save, r);
    register_command!("plans", "List saved plans", cmd_plans, r);

    r
});

pub(crate) fn handle_command(input: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let trimmed = input.trim();
    let mut parts = trimmed.splitn(2, ' ');
    let cmd_name = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim();

    if let Some(cmd) = COMMANDS.get(cmd_name) {
        (cmd.run)(args, app, db)?;
    } else {
        let suggestion = find_closest(cmd_name);
        app.set_status(format!(
            "Unknown command: :{cmd_name}. Did you mean :{suggestion}?"
        ));
    }

    Ok(())
}

fn find_closest(input: &str) -> String {
    COMMANDS
        .keys()
        .filter(|k| k.len() > 1) // skip single-letter aliases for suggestions
        .min_by_key(|k| levenshtein(input, k))
        .unwrap_or(&"help")
        .to_string()
}

fn levenshtein(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Signed amount argument; currency symbols and thousand separators are ignored.
/// Out-of-range values are left for the engine to clamp.
pub(crate) fn parse_amount_arg(s: &str) -> Option<Decimal> {
    let cleaned = s.replace(['$', '€', '£', '¥', ','], "");
    Decimal::from_str(cleaned.trim()).ok()
}

// ── Command implementations ──────────────────────────────────

fn cmd_quit(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.running = false;
    Ok(())
}

fn cmd_categories(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.screen = Screen::Editor;
    Ok(())
}

fn cmd_chart(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.screen = Screen::Chart;
    Ok(())
}

fn cmd_breakdown(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.screen = Screen::Breakdown;
    Ok(())
}

fn cmd_help(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.show_help = true;
    Ok(())
}

fn cmd_budget(args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    if args.is_empty() {
        let current = app.engine.budget().normalize().to_string();
        app.start_prompt(InputMode::Budget, current);
        return Ok(());
    }
    apply_budget_input(args, app);
    Ok(())
}

/// Shared by `:budget` and the budget prompt.
pub(crate) fn apply_budget_input(input: &str, app: &mut App) {
    if app.engine.set_budget_input(input) {
        let shown = format_amount(app.engine.budget(), app.currency_symbol());
        app.set_status(format!("Budget set to {shown}"));
    } else {
        app.set_status(format!(
            "Invalid budget: '{}'. Enter a non-negative number",
            input.trim()
        ));
    }
}

fn cmd_add(args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    if args.is_empty() {
        app.start_prompt(InputMode::NewCategory, "");
        return Ok(());
    }
    add_category(args, app);
    Ok(())
}

/// Shared by `:add` and the new-category prompt.
pub(crate) fn add_category(name: &str, app: &mut App) {
    match app.engine.add_category(name) {
        Some(id) => {
            app.select_category(&id);
            app.set_status(format!("Added category: {}", name.trim()));
        }
        None => app.set_status("Category name cannot be empty"),
    }
}

fn cmd_remove(args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    let target = if args.is_empty() {
        app.selected_category()
    } else {
        ExpenseCategory::find_by_name(app.engine.categories(), args)
    };

    let Some(cat) = target else {
        app.set_status(if args.is_empty() {
            "No category selected".to_string()
        } else {
            format!("Category '{args}' not found")
        });
        return Ok(());
    };

    if !cat.editable {
        let msg = format!("'{}' is a fixed category and cannot be removed", cat.name);
        app.set_status(msg);
        return Ok(());
    }

    let (id, name) = (cat.id.clone(), cat.name.clone());
    app.confirm(
        PendingAction::RemoveCategory {
            id,
            name: name.clone(),
        },
        format!("Remove category '{name}'?"),
    );
    Ok(())
}

fn cmd_set(args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    if args.is_empty() {
        app.set_status("Usage: :set [category] <amount>");
        return Ok(());
    }

    // Last token is the amount, everything before is the category name
    let parts: Vec<&str> = args.rsplitn(2, ' ').collect();
    let amount_str = parts[0];
    let Some(amount) = parse_amount_arg(amount_str) else {
        app.set_status(format!("Invalid amount: {amount_str}"));
        return Ok(());
    };

    let target = match parts.get(1) {
        Some(name) => ExpenseCategory::find_by_name(app.engine.categories(), name),
        None => app.selected_category(),
    };
    let Some(id) = target.map(|c| c.id.clone()) else {
        app.set_status("Category not found");
        return Ok(());
    };

    set_amount(&id, amount, app);
    Ok(())
}

/// Shared by `:set` and the amount prompt.
pub(crate) fn set_amount(id: &CategoryId, amount: Decimal, app: &mut App) {
    if !app.engine.set_category_amount(id, amount) {
        app.set_status("Category not found");
        return;
    }
    if let Some(cat) = app.engine.category(id) {
        let shown = format_amount(cat.amount, app.currency_symbol());
        let msg = if cat.amount != amount {
            format!("{} set to {shown} (limited to 0..budget)", cat.name)
        } else {
            format!("{} set to {shown}", cat.name)
        };
        app.set_status(msg);
    }
}

fn cmd_reset(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.confirm(
        PendingAction::Reset,
        "Restore the initial categories? Custom categories will be lost",
    );
    Ok(())
}

fn cmd_currency(args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    match Currency::parse(args) {
        Some(currency) => {
            app.settings.currency = currency;
            app.mark_settings_changed();
            app.set_status(format!("Currency: {}, {currency}", currency.name()));
        }
        None => {
            let codes: Vec<&str> = Currency::all().iter().map(|c| c.code()).collect();
            app.set_status(format!("Usage: :currency <code>. Codes: {}", codes.join(", ")));
        }
    }
    Ok(())
}

fn cmd_title(args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    if args.is_empty() {
        app.set_status("Usage: :title <text>");
        return Ok(());
    }
    app.settings.title = args.to_string();
    app.mark_settings_changed();
    app.set_status(format!("Title: {args}"));
    Ok(())
}

fn cmd_colors(args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    match args {
        "palette" => {
            app.engine.set_colors(Box::new(PaletteColors::default()));
            app.set_status("New categories take the next free palette color");
        }
        "hashed" | "random" => {
            app.engine.set_colors(Box::new(HashedColors::from_clock()));
            app.set_status("New categories get scattered colors");
        }
        _ => app.set_status("Usage: :colors palette|hashed"),
    }
    Ok(())
}

fn cmd_import(args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    if args.is_empty() {
        app.set_status("Usage: :import <file.csv>");
        return Ok(());
    }
    let path = shellexpand(args);
    let expenses = match CsvImporter::read(Path::new(&path), app.settings.currency.code()) {
        Ok(expenses) => expenses,
        Err(e) => {
            app.set_status(format!("Import failed: {e:#}"));
            return Ok(());
        }
    };
    let summary = merge_expenses(&mut app.engine, &expenses, app.settings.currency);
    app.clamp_selection();
    let mut status = format!(
        "Imported {} expenses: {} categories updated, {} added",
        expenses.len() - summary.other_currency,
        summary.updated,
        summary.added
    );
    if summary.other_currency > 0 {
        status.push_str(&format!(
            " ({} in other currencies skipped)",
            summary.other_currency
        ));
    }
    app.set_status(status);
    Ok(())
}

fn cmd_export(args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    let path = if args.is_empty() {
        shellexpand(&format!("~/tripbudget-{}.csv", app.plan_name))
    } else {
        shellexpand(args)
    };
    let count = export_plan(Path::new(&path), &app.engine)?;
    app.set_status(format!("Exported {count} categories to {path}"));
    Ok(())
}

fn cmd_save(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let snapshot = app.take_unsaved().unwrap_or_else(|| app.engine.snapshot());
    db.save_plan(&app.plan_name, &app.settings, &snapshot)?;
    app.set_status(format!("Saved plan '{}'", app.plan_name));
    Ok(())
}

fn cmd_plans(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let plans = db.list_plans()?;
    if plans.is_empty() {
        app.set_status("No saved plans yet");
    } else {
        let names: Vec<&str> = plans.iter().map(|(name, _)| name.as_str()).collect();
        app.set_status(format!("Plans: {}", names.join(", ")));
    }
    Ok(())
}
