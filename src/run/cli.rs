use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

use crate::db::Database;
use crate::engine::BudgetEngine;
use crate::import::{export_plan, merge_expenses, CsvImporter};
use crate::models::{CategoryId, PlanSettings};
use crate::ui::commands::parse_amount_arg;
use crate::ui::util::{format_amount, format_percent};

/// The plan a one-shot command works on.
pub(crate) struct CliPlan {
    pub(crate) name: String,
    pub(crate) settings: PlanSettings,
    pub(crate) engine: BudgetEngine,
}

pub(crate) fn as_cli(args: &[String], plan: &mut CliPlan, db: &mut Database) -> Result<()> {
    let Some(command) = args.first() else {
        print_usage();
        return Ok(());
    };
    let rest = &args[1..];

    match command.as_str() {
        "summary" | "s" => {
            print_summary(plan);
            Ok(())
        }
        "plans" => cli_plans(db),
        "delete" => cli_delete(rest, db),
        "set-budget" => cli_set_budget(rest, plan, db),
        "add" => cli_add(rest, plan, db),
        "remove" | "rm" => cli_remove(rest, plan, db),
        "set" => cli_set(rest, plan, db),
        "reset" => {
            plan.engine.reset();
            save(plan, db)?;
            println!("Restored the initial categories of '{}'", plan.name);
            Ok(())
        }
        "import" => cli_import(rest, plan, db),
        "export" => cli_export(rest, plan),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("tripbudget {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("TripBudget - split a trip budget across expense categories");
    println!();
    println!("Usage: tripbudget [--plan <name>] [--db <path>] [command]");
    println!();
    println!("Commands:");
    println!("  (none)                        Launch interactive TUI");
    println!("  summary                       Print budget, allocation and categories");
    println!("  plans                         List saved plans");
    println!("  delete <plan>                 Delete a saved plan");
    println!("  set-budget <amount>           Set the total budget");
    println!("  add <name>                    Add a category");
    println!("  remove <id>                   Remove a category");
    println!("  set <id> <amount>             Set a category amount (clamped to 0..budget)");
    println!("  reset                         Restore the initial categories");
    println!("  import <file.csv>             Merge itemised expenses into the plan");
    println!("  export [path]                 Export the plan to CSV");
    println!("  --help, -h                    Show this help");
    println!("  --version, -V                 Show version");
    println!();
    println!("Options:");
    println!("  --plan <name>                 Plan to work on (default: trip)");
    println!("  --db <path>                   Database file (default: data directory)");
}

fn save(plan: &CliPlan, db: &mut Database) -> Result<()> {
    db.save_plan(&plan.name, &plan.settings, &plan.engine.snapshot())
        .with_context(|| format!("Failed to save plan '{}'", plan.name))?;
    Ok(())
}

fn print_summary(plan: &CliPlan) {
    let symbol = plan.settings.currency.symbol();
    let alloc = plan.engine.allocation();
    let standing = alloc.standing();

    println!("{} ({})", plan.settings.title, plan.name);
    println!("{}", plan.settings.description);
    println!("{}", "─".repeat(48));
    println!("  Total Budget:     {}", format_amount(alloc.budget, symbol));
    println!(
        "  Total Allocated:  {}",
        format_amount(alloc.total_allocated, symbol)
    );
    println!(
        "  {:<17} {} ({})",
        format!("{}:", standing.label()),
        format_amount(standing.amount(), symbol),
        format_percent(alloc.remaining_percentage().abs()),
    );

    let categories = plan.engine.categories();
    if categories.is_empty() {
        return;
    }
    println!();
    println!("{:<18} {:<24} {:>12}", "ID", "Category", "Amount");
    for cat in categories {
        let lock = if cat.editable { "" } else { " (fixed)" };
        println!(
            "{:<18} {:<24} {:>12}{lock}",
            cat.id,
            cat.name,
            format_amount(cat.amount, symbol)
        );
    }
}

fn cli_plans(db: &mut Database) -> Result<()> {
    let plans = db.list_plans()?;
    if plans.is_empty() {
        println!("No saved plans");
        return Ok(());
    }
    println!("{:<24} Last saved", "Plan");
    println!("{}", "─".repeat(48));
    for (name, updated_at) in &plans {
        println!("{name:<24} {updated_at}");
    }
    Ok(())
}

fn cli_delete(args: &[String], db: &mut Database) -> Result<()> {
    let Some(name) = args.first() else {
        anyhow::bail!("Usage: tripbudget delete <plan>");
    };
    if !db.delete_plan(name)? {
        anyhow::bail!("Plan '{name}' not found");
    }
    println!("Deleted plan '{name}'");
    Ok(())
}

fn cli_set_budget(args: &[String], plan: &mut CliPlan, db: &mut Database) -> Result<()> {
    let Some(input) = args.first() else {
        anyhow::bail!("Usage: tripbudget set-budget <amount>");
    };
    if !plan.engine.set_budget_input(input) {
        anyhow::bail!("Invalid budget: '{input}'. Enter a non-negative number");
    }
    save(plan, db)?;
    println!(
        "Budget set to {}",
        format_amount(plan.engine.budget(), plan.settings.currency.symbol())
    );
    print_standing(plan);
    Ok(())
}

fn cli_add(args: &[String], plan: &mut CliPlan, db: &mut Database) -> Result<()> {
    let name = args.join(" ");
    let Some(id) = plan.engine.add_category(&name) else {
        anyhow::bail!("Usage: tripbudget add <name>");
    };
    save(plan, db)?;
    println!("Added '{}' as {id}", name.trim());
    Ok(())
}

fn cli_remove(args: &[String], plan: &mut CliPlan, db: &mut Database) -> Result<()> {
    let Some(key) = args.first() else {
        anyhow::bail!("Usage: tripbudget remove <id>");
    };
    let id = CategoryId::new(key.as_str());
    let Some(cat) = plan.engine.category(&id) else {
        anyhow::bail!("Category '{key}' not found");
    };
    if !cat.editable {
        anyhow::bail!("'{}' is a fixed category and cannot be removed", cat.name);
    }
    let name = cat.name.clone();
    plan.engine.remove_category(&id);
    save(plan, db)?;
    println!("Removed '{name}'");
    print_standing(plan);
    Ok(())
}

fn cli_set(args: &[String], plan: &mut CliPlan, db: &mut Database) -> Result<()> {
    let [key, amount] = args else {
        anyhow::bail!("Usage: tripbudget set <id> <amount>");
    };
    let Some(amount) = parse_amount_arg(amount) else {
        anyhow::bail!("Invalid amount: {amount}");
    };
    let id = CategoryId::new(key.as_str());
    if !plan.engine.set_category_amount(&id, amount) {
        anyhow::bail!("Category '{key}' not found");
    }
    save(plan, db)?;

    let symbol = plan.settings.currency.symbol();
    if let Some(cat) = plan.engine.category(&id) {
        println!("{} set to {}", cat.name, format_amount(cat.amount, symbol));
    }
    print_standing(plan);
    Ok(())
}

fn cli_import(args: &[String], plan: &mut CliPlan, db: &mut Database) -> Result<()> {
    let Some(file_path) = args.first() else {
        anyhow::bail!("Usage: tripbudget import <file.csv>");
    };
    let file_path = shellexpand(file_path);
    let path = Path::new(&file_path);
    if !path.exists() {
        anyhow::bail!("File not found: {file_path}");
    }

    let expenses = CsvImporter::read(path, plan.settings.currency.code())?;
    println!("Parsed {} expenses", expenses.len());

    let summary = merge_expenses(&mut plan.engine, &expenses, plan.settings.currency);
    save(plan, db)?;
    info!(plan = %plan.name, ?summary, "cli import saved");

    if summary.other_currency > 0 {
        println!(
            "Skipped {} expenses not in {}",
            summary.other_currency,
            plan.settings.currency.code()
        );
    }
    if let Some((from, to)) = &summary.dates {
        println!("Expenses dated {from} to {to}");
    }
    println!(
        "Updated {} categories, added {}",
        summary.updated, summary.added
    );
    print_standing(plan);
    Ok(())
}

fn cli_export(args: &[String], plan: &CliPlan) -> Result<()> {
    // Output path is the first non-flag argument
    let output_path = args
        .first()
        .filter(|a| !a.starts_with('-'))
        .map(|a| shellexpand(a))
        .unwrap_or_else(|| shellexpand(&format!("~/tripbudget-{}.csv", plan.name)));

    let count = export_plan(Path::new(&output_path), &plan.engine)?;
    println!("Exported {count} categories to {output_path}");
    Ok(())
}

fn print_standing(plan: &CliPlan) {
    let alloc = plan.engine.allocation();
    let standing = alloc.standing();
    println!(
        "{}: {}",
        standing.label(),
        format_amount(standing.amount(), plan.settings.currency.symbol())
    );
}

pub(crate) fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/{rest}")
    } else {
        path.to_string()
    }
}
