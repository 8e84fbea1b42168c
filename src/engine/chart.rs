use rust_decimal::Decimal;

use crate::models::{CategoryId, ExpenseCategory};

pub(crate) const REMAINING_LABEL: &str = "Remaining";
pub(crate) const REMAINING_COLOR: &str = "#E8E8E8";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SegmentKind {
    Category(CategoryId),
    /// Unallocated budget, only present while something is left.
    Remaining,
}

/// One slice of the budget pie.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Segment {
    pub(crate) kind: SegmentKind,
    pub(crate) name: String,
    pub(crate) amount: Decimal,
    pub(crate) color: String,
}

impl Segment {
    pub(crate) fn is_remaining(&self) -> bool {
        self.kind == SegmentKind::Remaining
    }

    /// Percentage of `total` this slice covers, zero when the chart is empty.
    pub(crate) fn share(&self, total: Decimal) -> Decimal {
        if total <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        self.amount
            .checked_div(total)
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
            .unwrap_or(Decimal::ZERO)
    }
}

/// Build the pie slices: every category with a positive amount, in order,
/// followed by a "Remaining" slice when `remaining > 0`.
///
/// When the plan is over budget there is no remaining slice, so the slices add
/// up to the allocated total rather than the budget.
pub(crate) fn project(categories: &[ExpenseCategory], remaining: Decimal) -> Vec<Segment> {
    let mut segments: Vec<Segment> = categories
        .iter()
        .filter(|c| c.amount > Decimal::ZERO)
        .map(|c| Segment {
            kind: SegmentKind::Category(c.id.clone()),
            name: c.name.clone(),
            amount: c.amount,
            color: c.color.clone(),
        })
        .collect();

    if remaining > Decimal::ZERO {
        segments.push(Segment {
            kind: SegmentKind::Remaining,
            name: REMAINING_LABEL.into(),
            amount: remaining,
            color: REMAINING_COLOR.into(),
        });
    }

    segments
}

pub(crate) fn chart_total(segments: &[Segment]) -> Decimal {
    segments
        .iter()
        .fold(Decimal::ZERO, |acc, s| acc.saturating_add(s.amount))
}
