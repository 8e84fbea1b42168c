#![allow(clippy::unwrap_used)]

use super::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::io::Write;

fn make_csv_file(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn row(fields: &[&str]) -> Vec<String> {
    fields.iter().map(|s| s.to_string()).collect()
}

// ── parse_decimal ─────────────────────────────────────────────

#[test]
fn test_parse_decimal_basic() {
    assert_eq!(parse_decimal("100.50").unwrap(), dec!(100.50));
    assert_eq!(parse_decimal("-42.99").unwrap(), dec!(-42.99));
}

#[test]
fn test_parse_decimal_with_currency() {
    assert_eq!(parse_decimal("$1,234.56").unwrap(), dec!(1234.56));
    assert_eq!(parse_decimal("€99.99").unwrap(), dec!(99.99));
    assert_eq!(parse_decimal("¥3000").unwrap(), dec!(3000));
}

#[test]
fn test_parse_decimal_parentheses_negative() {
    assert_eq!(parse_decimal("(500.00)").unwrap(), dec!(-500.00));
}

#[test]
fn test_parse_decimal_empty() {
    assert_eq!(parse_decimal("").unwrap(), Decimal::ZERO);
    assert_eq!(parse_decimal("  ").unwrap(), Decimal::ZERO);
}

#[test]
fn test_parse_decimal_quoted() {
    assert_eq!(parse_decimal("\"100.00\"").unwrap(), dec!(100.00));
}

#[test]
fn test_parse_decimal_invalid() {
    assert!(parse_decimal("lots").is_err());
}

// ── parse_date ────────────────────────────────────────────────

#[test]
fn test_parse_date_iso() {
    let d = parse_date("2024-06-01", "%Y-%m-%d").unwrap();
    assert_eq!(d, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
}

#[test]
fn test_parse_date_fallback() {
    let d = parse_date("06/01/2024", "%Y-%m-%d").unwrap();
    assert_eq!(d, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
    let d = parse_date("01.06.2024", "%Y-%m-%d").unwrap();
    assert_eq!(d, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
}

#[test]
fn test_parse_date_invalid() {
    assert!(parse_date("someday", "%Y-%m-%d").is_err());
}

// ── CsvImporter::parse ────────────────────────────────────────

#[test]
fn test_parse_rows_with_default_profile() {
    let rows = vec![
        row(&["Food", "Lunch", "12.50", "2024-06-01"]),
        row(&["Transportation", "Taxi", "-30", "06/02/2024"]),
    ];
    let expenses = CsvImporter::parse(&rows, &CsvProfile::default(), "USD").unwrap();
    assert_eq!(expenses.len(), 2);
    assert_eq!(expenses[0].category, "Food");
    assert_eq!(expenses[0].description, "Lunch");
    assert_eq!(expenses[0].amount, dec!(12.50));
    assert_eq!(expenses[0].currency, "USD");
    // Signs are dropped: every expense is money spent
    assert_eq!(expenses[1].amount, dec!(30));
    assert_eq!(expenses[1].date, "2024-06-02");
}

#[test]
fn test_parse_rows_skips_blank_lines() {
    let rows = vec![row(&["", "", ""]), row(&["Food", "Snack", "3"])];
    let expenses = CsvImporter::parse(&rows, &CsvProfile::default(), "EUR").unwrap();
    assert_eq!(expenses.len(), 1);
}

#[test]
fn test_parse_rows_missing_date_is_blank() {
    let rows = vec![row(&["Food", "Snack", "3"])];
    let expenses = CsvImporter::parse(&rows, &CsvProfile::default(), "USD").unwrap();
    assert_eq!(expenses[0].date, "");
}

#[test]
fn test_parse_rows_bad_date_keeps_the_row() {
    let rows = vec![
        row(&["Food", "Lunch", "12", "someday"]),
        row(&["Food", "Dinner", "20", "2024-06-01"]),
    ];
    let expenses = CsvImporter::parse(&rows, &CsvProfile::default(), "USD").unwrap();
    assert_eq!(expenses.len(), 2);
    assert_eq!(expenses[0].date, "");
    assert_eq!(expenses[0].amount, dec!(12));
    assert_eq!(expenses[1].date, "2024-06-01");
}

#[test]
fn test_parse_rows_bad_amount_reports_row() {
    let rows = vec![row(&["Food", "Lunch", "12"]), row(&["Food", "Dinner", "lots"])];
    let err = CsvImporter::parse(&rows, &CsvProfile::default(), "USD").unwrap_err();
    assert!(format!("{err:#}").contains("Row 2"));
}

#[test]
fn test_parse_rows_currency_column() {
    let profile = CsvProfile {
        currency_column: Some(4),
        ..CsvProfile::default()
    };
    let rows = vec![
        row(&["Food", "Lunch", "12", "2024-06-01", "EUR"]),
        row(&["Food", "Dinner", "20", "2024-06-01", ""]),
    ];
    let expenses = CsvImporter::parse(&rows, &profile, "USD").unwrap();
    assert_eq!(expenses[0].currency, "EUR");
    assert_eq!(expenses[1].currency, "USD");
}

// ── Files ─────────────────────────────────────────────────────

#[test]
fn test_preview_detects_header() {
    let file = make_csv_file("Category,Description,Amount\nFood,Lunch,12.50\n");
    let (headers, rows) = CsvImporter::preview(file.path()).unwrap();
    assert_eq!(headers, row(&["Category", "Description", "Amount"]));
    assert_eq!(rows.len(), 1);
}

#[test]
fn test_preview_without_header() {
    let file = make_csv_file("Food,Lunch,12.50\nFood,Dinner,20\n");
    let (headers, rows) = CsvImporter::preview(file.path()).unwrap();
    assert_eq!(headers, row(&["Column 1", "Column 2", "Column 3"]));
    assert_eq!(rows.len(), 2);
}

#[test]
fn test_preview_empty_file() {
    let file = make_csv_file("");
    assert!(CsvImporter::preview(file.path()).is_err());
}

#[test]
fn test_read_with_shuffled_header() {
    let file = make_csv_file(
        "Amount,Date,Item,Category\n\"$1,200.00\",2024-06-01,Hotel,Accommodation\n45,2024-06-02,Museum,Activities\n",
    );
    let expenses = CsvImporter::read(file.path(), "USD").unwrap();
    assert_eq!(expenses.len(), 2);
    assert_eq!(expenses[0].category, "Accommodation");
    assert_eq!(expenses[0].description, "Hotel");
    assert_eq!(expenses[0].amount, dec!(1200.00));
    assert_eq!(expenses[1].category, "Activities");
}

#[test]
fn test_read_then_group() {
    let file = make_csv_file(
        "Category,Description,Amount\nFood,Lunch,10\nFood,Dinner,15\nShopping,Hat,20\n",
    );
    let expenses = CsvImporter::read(file.path(), "USD").unwrap();
    let cats = crate::models::group_by_category(&expenses);
    assert_eq!(cats.len(), 2);
    assert_eq!(cats[0].amount, dec!(25));
}

#[test]
fn test_missing_file() {
    assert!(CsvImporter::read(Path::new("/definitely/not/here.csv"), "USD").is_err());
}

// ── Export ────────────────────────────────────────────────────

#[test]
fn test_export_plan() {
    use crate::engine::BudgetEngine;
    use crate::models::default_categories;

    let engine = BudgetEngine::new(dec!(2000), default_categories());
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plan.csv");
    let count = super::super::export_plan(&path, &engine).unwrap();
    assert_eq!(count, 6);

    let content = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines[0], "id,name,amount,color,editable,chart_share");
    assert_eq!(lines[1], "accommodation,Accommodation,500,#FF6384,true,25");
    assert!(lines.iter().any(|l| l.contains("Total Allocated,1500")));
    assert!(lines.iter().any(|l| l.contains("Remaining,500")));
}
