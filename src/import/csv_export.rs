use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

use crate::engine::{chart_total, Allocation, BudgetEngine, SegmentKind};

/// Write one row per category plus a totals footer. Returns the category count.
pub(crate) fn export_plan(path: &Path, engine: &BudgetEngine) -> Result<usize> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    let segments = engine.segments();
    let total = chart_total(&segments);

    wtr.write_record(["id", "name", "amount", "color", "editable", "chart_share"])?;
    for cat in engine.categories() {
        let kind = SegmentKind::Category(cat.id.clone());
        let share = segments
            .iter()
            .find(|s| s.kind == kind)
            .map(|s| s.share(total).round_dp(2).normalize())
            .unwrap_or_default();
        let amount = cat.amount.to_string();
        let share = share.to_string();
        wtr.write_record([
            cat.id.as_str(),
            cat.name.as_str(),
            amount.as_str(),
            cat.color.as_str(),
            if cat.editable { "true" } else { "false" },
            share.as_str(),
        ])?;
    }

    let Allocation {
        budget,
        total_allocated,
        remaining,
    } = engine.allocation();
    for (label, value) in [
        ("Total Budget", budget),
        ("Total Allocated", total_allocated),
        ("Remaining", remaining),
    ] {
        let value = value.to_string();
        wtr.write_record(["", label, value.as_str(), "", "", ""])?;
    }
    wtr.flush().context("Failed to flush CSV export")?;

    info!(path = %path.display(), categories = engine.categories().len(), "plan exported");
    Ok(engine.categories().len())
}
