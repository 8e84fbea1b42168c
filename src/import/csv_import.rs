use anyhow::{Context, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;
use tracing::{info, warn};

use crate::models::Expense;

/// Where each expense field lives in a sheet.
#[derive(Debug, Clone)]
pub(crate) struct CsvProfile {
    pub(crate) name: String,
    pub(crate) category_column: usize,
    pub(crate) description_column: Option<usize>,
    pub(crate) amount_column: usize,
    pub(crate) date_column: Option<usize>,
    pub(crate) currency_column: Option<usize>,
    pub(crate) date_format: String,
}

impl Default for CsvProfile {
    fn default() -> Self {
        Self {
            name: "Default".into(),
            category_column: 0,
            description_column: Some(1),
            amount_column: 2,
            date_column: Some(3),
            currency_column: None,
            date_format: "%Y-%m-%d".into(),
        }
    }
}

pub(crate) struct CsvImporter;

impl CsvImporter {
    /// Read the CSV and return headers + all rows as strings.
    pub(crate) fn preview(path: &Path) -> Result<(Vec<String>, Vec<Vec<String>>)> {
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .has_headers(false)
            .from_path(path)
            .with_context(|| format!("Failed to open CSV file: {}", path.display()))?;

        let mut all_rows: Vec<Vec<String>> = Vec::new();
        for result in rdr.records() {
            let record = result.context("Failed to read CSV record")?;
            all_rows.push(record.iter().map(|s| s.to_string()).collect());
        }

        if all_rows.is_empty() {
            anyhow::bail!("CSV file is empty");
        }

        // A header row has no numeric field at all
        let looks_like_header = all_rows[0]
            .iter()
            .all(|field| parse_decimal(field).is_err() || field.trim().is_empty());

        if looks_like_header {
            let headers = all_rows.remove(0);
            Ok((headers, all_rows))
        } else {
            let headers: Vec<String> = (0..all_rows[0].len())
                .map(|i| format!("Column {}", i + 1))
                .collect();
            Ok((headers, all_rows))
        }
    }

    /// Parse rows into expenses. Blank rows are skipped. A row whose amount
    /// cannot be read fails the whole import with the row number; a missing or
    /// unreadable date only leaves the expense undated.
    pub(crate) fn parse(
        rows: &[Vec<String>],
        profile: &CsvProfile,
        default_currency: &str,
    ) -> Result<Vec<Expense>> {
        let mut expenses = Vec::new();

        for (i, row) in rows.iter().enumerate() {
            if row.iter().all(|f| f.trim().is_empty()) {
                continue;
            }

            let field = |col: Option<usize>| {
                col.and_then(|c| row.get(c))
                    .map(|s| s.trim().to_string())
                    .unwrap_or_default()
            };

            let category = field(Some(profile.category_column));
            let description = field(profile.description_column);
            let raw_amount = field(Some(profile.amount_column));
            let amount = parse_decimal(&raw_amount)
                .with_context(|| format!("Row {}: failed to parse amount", i + 1))?;

            let raw_date = field(profile.date_column);
            let date = if raw_date.is_empty() {
                String::new()
            } else {
                match parse_date(&raw_date, &profile.date_format) {
                    Ok(date) => date.format("%Y-%m-%d").to_string(),
                    Err(e) => {
                        warn!(row = i + 1, error = %e, "undated expense");
                        String::new()
                    }
                }
            };

            let currency = Some(field(profile.currency_column))
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| default_currency.to_string());

            expenses.push(Expense {
                category,
                description,
                amount: amount.abs(),
                date,
                currency,
            });
        }

        let skipped = expenses.iter().filter(|e| !e.is_valid()).count();
        if skipped > 0 {
            warn!(skipped, "expenses without description or amount will be ignored");
        }
        info!(profile = %profile.name, count = expenses.len(), "expenses parsed");
        Ok(expenses)
    }

    /// Preview, detect columns, and parse in one go.
    pub(crate) fn read(path: &Path, default_currency: &str) -> Result<Vec<Expense>> {
        let (headers, rows) = Self::preview(path)?;
        let profile = super::detect_columns(&headers).unwrap_or_default();
        Self::parse(&rows, &profile, default_currency)
    }
}

fn parse_date(s: &str, fmt: &str) -> Result<NaiveDate> {
    if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
        return Ok(d);
    }
    for fallback in &["%Y-%m-%d", "%m/%d/%Y", "%d.%m.%Y", "%m/%d/%y", "%d/%m/%Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fallback) {
            return Ok(d);
        }
    }
    anyhow::bail!("Could not parse date: {}", s)
}

fn parse_decimal(s: &str) -> Result<Decimal> {
    let cleaned = s
        .replace(['$', '€', '£', '¥', ',', '"'], "")
        .replace('(', "-")
        .replace(')', "")
        .trim()
        .to_string();
    if cleaned.is_empty() {
        return Ok(Decimal::ZERO);
    }
    Decimal::from_str(&cleaned).context(format!("Failed to parse '{}' as decimal", s))
}

#[cfg(test)]
#[path = "csv_import_tests.rs"]
mod tests;
