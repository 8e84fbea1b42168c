use rust_decimal::Decimal;

use crate::models::ExpenseCategory;

/// Totals derived from a budget and its categories. Never stored; build one
/// with [`Allocation::compute`] whenever you need it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Allocation {
    pub(crate) budget: Decimal,
    pub(crate) total_allocated: Decimal,
    /// Negative when the categories add up to more than the budget.
    pub(crate) remaining: Decimal,
}

impl Allocation {
    pub(crate) fn compute(budget: Decimal, categories: &[ExpenseCategory]) -> Self {
        let total_allocated = categories
            .iter()
            .fold(Decimal::ZERO, |acc, c| acc.saturating_add(c.amount));
        Self {
            budget,
            total_allocated,
            remaining: budget.saturating_sub(total_allocated),
        }
    }

    /// `remaining / budget * 100`, or zero for a zero budget.
    pub(crate) fn remaining_percentage(&self) -> Decimal {
        if self.budget <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        self.remaining
            .checked_div(self.budget)
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
            .unwrap_or(Decimal::ZERO)
    }

    pub(crate) fn is_over_budget(&self) -> bool {
        self.remaining < Decimal::ZERO
    }

    pub(crate) fn standing(&self) -> Standing {
        if self.is_over_budget() {
            Standing::OverBudget(self.remaining.abs())
        } else {
            Standing::Remaining(self.remaining)
        }
    }
}

/// How the remaining amount is presented: always a non-negative figure with a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Standing {
    Remaining(Decimal),
    OverBudget(Decimal),
}

impl Standing {
    pub(crate) fn label(&self) -> &'static str {
        match self {
            Self::Remaining(_) => "Remaining",
            Self::OverBudget(_) => "Over budget",
        }
    }

    pub(crate) fn amount(&self) -> Decimal {
        match self {
            Self::Remaining(a) | Self::OverBudget(a) => *a,
        }
    }
}

impl std::fmt::Display for Standing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.label(), self.amount().normalize())
    }
}
