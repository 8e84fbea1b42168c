use rust_decimal::Decimal;

use super::{Currency, ExpenseCategory};

/// Construction inputs for a budget plan.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanSettings {
    pub initial_budget: Decimal,
    pub currency: Currency,
    pub title: String,
    pub description: String,
}

impl Default for PlanSettings {
    fn default() -> Self {
        Self {
            initial_budget: Decimal::from(1500),
            currency: Currency::Usd,
            title: "Travel Budget Calculator".into(),
            description: "Plan your trip expenses by category".into(),
        }
    }
}

/// Everything needed to rebuild a plan: what the change listener hands out
/// and what the database stores.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanSnapshot {
    pub budget: Decimal,
    pub categories: Vec<ExpenseCategory>,
    /// What reset goes back to: the categories the plan was first built with.
    pub initial_categories: Vec<ExpenseCategory>,
    /// Next value for `custom-N` ids, so removed ids are never handed out again.
    pub next_custom: u64,
}
