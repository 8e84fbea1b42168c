mod category;
mod currency;
mod expense;
mod plan;

pub use category::{default_categories, CategoryId, ExpenseCategory};
pub use currency::Currency;
pub use expense::{group_by_category, Expense};
pub use plan::{PlanSettings, PlanSnapshot};

#[cfg(test)]
mod tests;
