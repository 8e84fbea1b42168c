mod db;
mod engine;
mod import;
mod logging;
mod models;
mod run;
mod ui;

use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::info;

const DEFAULT_PLAN: &str = "trip";

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let (options, rest) = parse_global_flags(&args)?;

    let data_dir = get_data_dir()?;
    if let Err(e) = logging::init(&data_dir) {
        eprintln!("Warning: logging disabled: {e:#}");
    }

    let db_path = options.db.unwrap_or_else(|| data_dir.join("tripbudget.db"));
    let mut db = db::Database::open(&db_path)?;

    let (settings, engine) = match db.load_plan(&options.plan)? {
        Some(stored) => {
            info!(plan = %stored.name, updated_at = %stored.updated_at, "plan loaded");
            (stored.settings, engine::BudgetEngine::restore(stored.snapshot))
        }
        None => {
            info!(plan = %options.plan, "starting a new plan");
            let settings = models::PlanSettings::default();
            let engine = engine::BudgetEngine::from_settings(&settings);
            (settings, engine)
        }
    };

    if rest.is_empty() {
        let mut app = ui::app::App::new(options.plan, settings, engine);
        run::as_tui(&mut app, &mut db)
    } else {
        let mut plan = run::CliPlan {
            name: options.plan,
            settings,
            engine,
        };
        run::as_cli(&rest, &mut plan, &mut db)
    }
}

struct GlobalOptions {
    plan: String,
    db: Option<PathBuf>,
}

/// Pull `--plan <name>` and `--db <path>` out of the argument list; everything
/// else is handed to the CLI unchanged.
fn parse_global_flags(args: &[String]) -> Result<(GlobalOptions, Vec<String>)> {
    let mut options = GlobalOptions {
        plan: DEFAULT_PLAN.to_string(),
        db: None,
    };
    let mut rest = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--plan" => {
                let name = iter
                    .next()
                    .filter(|n| !n.trim().is_empty())
                    .ok_or_else(|| anyhow::anyhow!("--plan needs a name"))?;
                options.plan = name.trim().to_string();
            }
            "--db" => {
                let path = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--db needs a path"))?;
                options.db = Some(PathBuf::from(run::shellexpand(path)));
            }
            _ => rest.push(arg.clone()),
        }
    }
    Ok((options, rest))
}

fn get_data_dir() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "tripbudget", "TripBudget")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
    Ok(data_dir.to_path_buf())
}
