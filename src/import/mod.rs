mod csv_export;
mod csv_import;
mod detect;

pub(crate) use csv_export::export_plan;
pub(crate) use csv_import::{CsvImporter, CsvProfile};
pub(crate) use detect::detect_columns;

use tracing::{debug, warn};

use crate::engine::BudgetEngine;
use crate::models::{group_by_category, Currency, Expense, ExpenseCategory};

/// What one import did to a plan.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct ImportSummary {
    pub(crate) updated: usize,
    pub(crate) added: usize,
    /// Expenses left out because they were paid in another currency.
    pub(crate) other_currency: usize,
    /// Earliest and latest expense date, when any merged row had one.
    pub(crate) dates: Option<(String, String)>,
}

/// Fold itemised expenses into a plan. Only expenses in the plan's currency
/// count. They are grouped by category name; a group matching an existing
/// category sets that category's amount, any other group is added with its
/// own id and color. Amounts go through the usual clamp to the budget.
pub(crate) fn merge_expenses(
    engine: &mut BudgetEngine,
    expenses: &[Expense],
    currency: Currency,
) -> ImportSummary {
    let mut summary = ImportSummary::default();
    let kept: Vec<Expense> = expenses
        .iter()
        .filter(|e| e.is_in(currency))
        .cloned()
        .collect();
    summary.other_currency = expenses.len() - kept.len();
    if summary.other_currency > 0 {
        warn!(
            skipped = summary.other_currency,
            currency = currency.code(),
            "expenses in another currency left out"
        );
    }

    for group in group_by_category(&kept) {
        let existing = ExpenseCategory::find_by_name(engine.categories(), &group.name)
            .map(|c| c.id.clone());
        match existing {
            Some(id) => {
                engine.set_category_amount(&id, group.amount);
                summary.updated += 1;
            }
            None => {
                if engine.insert_category(group).is_some() {
                    summary.added += 1;
                }
            }
        }
    }

    let mut dates = kept
        .iter()
        .filter(|e| e.is_valid())
        .map(|e| e.date.as_str())
        .filter(|d| !d.is_empty());
    if let Some(first) = dates.next() {
        let (from, to) = dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));
        summary.dates = Some((from.to_string(), to.to_string()));
    }

    debug!(?summary, "expenses merged into plan");
    summary
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::{default_categories, CategoryId};

    fn expense(category: &str, amount: Decimal, date: &str) -> Expense {
        Expense {
            category: category.into(),
            description: "item".into(),
            amount,
            date: date.into(),
            currency: "USD".into(),
        }
    }

    #[test]
    fn test_merge_updates_and_adds() {
        let mut engine = BudgetEngine::new(dec!(2000), default_categories());
        let expenses = vec![
            expense("shopping", dec!(75), "2026-05-02"),
            expense("Visa Fees", dec!(60), "2026-05-01"),
        ];
        let summary = merge_expenses(&mut engine, &expenses, Currency::Usd);
        assert_eq!((summary.updated, summary.added), (1, 1));

        let shopping = ExpenseCategory::find_by_name(engine.categories(), "Shopping").unwrap();
        assert_eq!(shopping.amount, dec!(75));
        let visa = engine.categories().last().unwrap();
        assert_eq!(visa.name, "Visa Fees");
        assert_eq!(visa.amount, dec!(60));
        // Second group: slug id and second import palette color
        assert_eq!(visa.id, CategoryId::new("visa-fees"));
        assert_eq!(visa.color, "#36A2EB");
        assert_eq!(
            summary.dates,
            Some(("2026-05-01".to_string(), "2026-05-02".to_string()))
        );
    }

    #[test]
    fn test_merge_adds_names_differing_in_case() {
        let mut engine = BudgetEngine::new(dec!(500), Vec::new());
        let expenses = vec![
            expense("Visa", dec!(10), ""),
            expense("visa", dec!(20), ""),
        ];
        let summary = merge_expenses(&mut engine, &expenses, Currency::Usd);
        assert_eq!(summary.added, 1);
        assert_eq!(engine.categories().len(), 1);
        assert_eq!(engine.categories()[0].amount, dec!(30));
        assert_eq!(summary.dates, None);
    }

    #[test]
    fn test_merge_leaves_out_other_currencies() {
        let mut engine = BudgetEngine::new(dec!(500), default_categories());
        let mut euro = expense("Shopping", dec!(99), "2026-05-03");
        euro.currency = "EUR".into();
        let expenses = vec![expense("Shopping", dec!(40), "2026-05-01"), euro];
        let summary = merge_expenses(&mut engine, &expenses, Currency::Usd);
        assert_eq!(summary.other_currency, 1);
        assert_eq!(summary.updated, 1);
        let shopping = ExpenseCategory::find_by_name(engine.categories(), "Shopping").unwrap();
        assert_eq!(shopping.amount, dec!(40));
        assert_eq!(
            summary.dates,
            Some(("2026-05-01".to_string(), "2026-05-01".to_string()))
        );
    }

    #[test]
    fn test_merge_slug_collision_falls_back_to_custom_id() {
        let mut engine = BudgetEngine::new(dec!(500), default_categories());
        // "Food" does not match "Food & Drinks" by name, but its slug is taken
        merge_expenses(&mut engine, &[expense("Food", dec!(5), "")], Currency::Usd);
        let added = engine.categories().last().unwrap();
        assert_eq!(added.name, "Food");
        assert_eq!(added.id.as_str(), "custom-1");
    }

    #[test]
    fn test_merge_clamps_to_budget() {
        let mut engine = BudgetEngine::new(dec!(100), Vec::new());
        merge_expenses(&mut engine, &[expense("Hotel", dec!(450), "")], Currency::Usd);
        assert_eq!(engine.categories()[0].amount, dec!(100));
    }

    #[test]
    fn test_merge_nothing() {
        let mut engine = BudgetEngine::new(dec!(100), default_categories());
        let summary = merge_expenses(&mut engine, &[], Currency::Usd);
        assert_eq!(summary, ImportSummary::default());
        assert_eq!(engine.categories().len(), 6);
    }
}
