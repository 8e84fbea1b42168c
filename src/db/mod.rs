mod schema;

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

use crate::models::*;

/// A plan as stored: its settings plus the engine snapshot.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct StoredPlan {
    pub(crate) name: String,
    pub(crate) settings: PlanSettings,
    pub(crate) snapshot: PlanSnapshot,
    pub(crate) updated_at: String,
}

pub(crate) struct Database {
    conn: Connection,
}

impl Database {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
            .context("Failed to set database pragmas")?;
        let mut db = Self { conn };
        db.migrate().context("Database migration failed")?;
        info!(path = %path.display(), "database opened");
        Ok(db)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        let mut db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&mut self) -> Result<()> {
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            self.conn.execute_batch(schema::SCHEMA_V1)?;
            self.conn.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            return Ok(());
        }

        let current: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .unwrap_or(0);

        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                self.conn.execute_batch(sql)?;
            }
        }

        if current < schema::CURRENT_VERSION {
            self.conn.execute(
                "UPDATE schema_version SET version = ?1",
                params![schema::CURRENT_VERSION],
            )?;
        }

        Ok(())
    }

    // ── Plans ─────────────────────────────────────────────────

    /// Insert or replace a plan. Categories are rewritten in their current order.
    pub(crate) fn save_plan(
        &mut self,
        name: &str,
        settings: &PlanSettings,
        snapshot: &PlanSnapshot,
    ) -> Result<i64> {
        let now = chrono::Utc::now().to_rfc3339();
        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO plans (name, budget, currency, title, description, next_custom, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             ON CONFLICT(name) DO UPDATE SET
                budget = excluded.budget,
                currency = excluded.currency,
                title = excluded.title,
                description = excluded.description,
                next_custom = excluded.next_custom,
                updated_at = excluded.updated_at",
            params![
                name,
                snapshot.budget.to_string(),
                settings.currency.code(),
                settings.title,
                settings.description,
                snapshot.next_custom as i64,
                now,
            ],
        )?;
        let plan_id: i64 = tx.query_row(
            "SELECT id FROM plans WHERE name = ?1",
            params![name],
            |row| row.get(0),
        )?;

        write_categories(&tx, "plan_categories", plan_id, &snapshot.categories)?;
        write_categories(
            &tx,
            "plan_initial_categories",
            plan_id,
            &snapshot.initial_categories,
        )?;
        tx.commit()?;
        debug!(plan = name, categories = snapshot.categories.len(), "plan saved");
        Ok(plan_id)
    }

    pub(crate) fn load_plan(&self, name: &str) -> Result<Option<StoredPlan>> {
        let row = self
            .conn
            .query_row(
                "SELECT id, budget, currency, title, description, next_custom, updated_at
                 FROM plans WHERE name = ?1",
                params![name],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, String>(4)?,
                        row.get::<_, i64>(5)?,
                        row.get::<_, String>(6)?,
                    ))
                },
            )
            .optional()?;

        let Some((plan_id, budget, currency, title, description, next_custom, updated_at)) = row
        else {
            return Ok(None);
        };

        let budget = parse_stored_decimal(&budget)
            .with_context(|| format!("Plan '{name}' has a corrupt budget"))?;
        let categories = self
            .get_plan_categories("plan_categories", plan_id)
            .with_context(|| format!("Plan '{name}' has corrupt categories"))?;
        let initial_categories = self
            .get_plan_categories("plan_initial_categories", plan_id)
            .with_context(|| format!("Plan '{name}' has corrupt initial categories"))?;

        Ok(Some(StoredPlan {
            name: name.to_string(),
            settings: PlanSettings {
                initial_budget: budget,
                currency: Currency::parse(&currency).unwrap_or_default(),
                title,
                description,
            },
            snapshot: PlanSnapshot {
                budget,
                categories,
                initial_categories,
                next_custom: next_custom.max(1) as u64,
            },
            updated_at,
        }))
    }

    /// Categories of one plan from `table`, in saved order.
    fn get_plan_categories(&self, table: &str, plan_id: i64) -> Result<Vec<ExpenseCategory>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT key, name, amount, color, editable FROM {table}
             WHERE plan_id = ?1 ORDER BY position"
        ))?;
        let rows = stmt.query_map(params![plan_id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, bool>(4)?,
            ))
        })?;

        let mut categories = Vec::new();
        for row in rows {
            let (key, name, amount, color, editable) = row?;
            let amount = parse_stored_decimal(&amount)
                .with_context(|| format!("Category '{key}' has a corrupt amount"))?;
            categories.push(ExpenseCategory {
                id: CategoryId::new(key),
                name,
                amount,
                color,
                editable,
            });
        }
        Ok(categories)
    }

    /// Plan names with their last save time, most recent first.
    pub(crate) fn list_plans(&self) -> Result<Vec<(String, String)>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name, updated_at FROM plans ORDER BY updated_at DESC, name")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Returns whether a plan with that name existed.
    pub(crate) fn delete_plan(&self, name: &str) -> Result<bool> {
        let removed = self
            .conn
            .execute("DELETE FROM plans WHERE name = ?1", params![name])?;
        Ok(removed > 0)
    }
}

/// Replace the rows of `table` for one plan with `categories`, keeping their order.
fn write_categories(
    tx: &rusqlite::Transaction<'_>,
    table: &str,
    plan_id: i64,
    categories: &[ExpenseCategory],
) -> Result<()> {
    tx.execute(
        &format!("DELETE FROM {table} WHERE plan_id = ?1"),
        params![plan_id],
    )?;
    let mut stmt = tx.prepare(&format!(
        "INSERT INTO {table} (plan_id, position, key, name, amount, color, editable)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"
    ))?;
    for (position, cat) in categories.iter().enumerate() {
        stmt.execute(params![
            plan_id,
            position as i64,
            cat.id.as_str(),
            cat.name,
            cat.amount.to_string(),
            cat.color,
            cat.editable,
        ])?;
    }
    Ok(())
}

fn parse_stored_decimal(s: &str) -> Result<Decimal> {
    Decimal::from_str(s.trim()).with_context(|| format!("Failed to parse '{s}' as decimal"))
}
