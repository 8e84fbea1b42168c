use rust_decimal::Decimal;

use super::{CategoryId, Currency, ExpenseCategory};

/// Colors handed out, in order, to categories built from expenses.
const EXPENSE_PALETTE: [&str; 8] = [
    "#FF6384", "#36A2EB", "#FFCE56", "#4BC0C0", "#9966FF", "#FF9F40", "#8AC926", "#1982C4",
];

/// A single itemised trip expense.
#[derive(Debug, Clone)]
pub struct Expense {
    pub category: String,
    pub description: String,
    pub amount: Decimal,
    /// Format: "YYYY-MM-DD", empty when the sheet gave no usable date.
    pub date: String,
    pub currency: String,
}

impl Expense {
    /// An expense counts only with a description and a non-zero amount.
    pub fn is_valid(&self) -> bool {
        !self.description.trim().is_empty() && !self.amount.is_zero()
    }

    /// Whether the expense was paid in `currency` (code or symbol).
    pub fn is_in(&self, currency: Currency) -> bool {
        Currency::parse(&self.currency) == Some(currency)
    }
}

/// Fold expenses into one category per distinct category name, in first-seen
/// order. Names match the way [`ExpenseCategory::find_by_name`] does, and the
/// first spelling seen is kept. Totals saturate instead of overflowing.
pub fn group_by_category(expenses: &[Expense]) -> Vec<ExpenseCategory> {
    let mut groups: Vec<(String, Decimal)> = Vec::new();
    for expense in expenses.iter().filter(|e| e.is_valid()) {
        let name = expense.category.trim();
        if name.is_empty() {
            continue;
        }
        let key = name.to_lowercase();
        match groups.iter_mut().find(|(n, _)| n.to_lowercase() == key) {
            Some((_, total)) => *total = total.saturating_add(expense.amount.abs()),
            None => groups.push((name.to_string(), expense.amount.abs())),
        }
    }

    groups
        .into_iter()
        .enumerate()
        .map(|(i, (name, total))| {
            let color = EXPENSE_PALETTE[i % EXPENSE_PALETTE.len()].to_string();
            ExpenseCategory::new(CategoryId::slug(&name), name, color).with_amount(total)
        })
        .collect()
}
