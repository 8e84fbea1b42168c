mod allocation;
mod chart;
mod color;
mod input;

pub(crate) use allocation::{Allocation, Standing};
pub(crate) use chart::{chart_total, project, Segment, SegmentKind};
pub(crate) use color::{ColorAssigner, HashedColors, PaletteColors};
pub(crate) use input::parse_budget_input;

use rust_decimal::Decimal;
use tracing::{debug, trace, warn};

use crate::models::{default_categories, CategoryId, ExpenseCategory, PlanSettings, PlanSnapshot};

/// Size of one slider step when nudging a category amount.
pub(crate) const AMOUNT_STEP: Decimal = Decimal::TEN;

/// Called with `(budget, categories)` after every applied change.
pub(crate) type ChangeListener = Box<dyn FnMut(Decimal, &[ExpenseCategory])>;

/// A single user intent against the plan.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Action {
    SetBudget(Decimal),
    AddCategory(String),
    /// Add a prepared category, e.g. one built from imported expenses. Its id
    /// and color are kept when usable; the amount is clamped like any other.
    Insert(ExpenseCategory),
    RemoveCategory(CategoryId),
    SetAmount(CategoryId, Decimal),
    /// Move an amount by whole slider steps (negative to decrease).
    Nudge(CategoryId, i64),
    /// Go back to the categories the engine was built with. The budget stays.
    Reset,
}

/// What an applied action changed. Rejected actions produce no `Change`.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Change {
    Budget(Decimal),
    Added(CategoryId),
    Removed(CategoryId),
    Amount(CategoryId, Decimal),
    Reset,
}

/// Owns one plan's budget and ordered categories.
///
/// Every mutation goes through [`BudgetEngine::dispatch`]: the action is
/// applied to the state first, and only if it was accepted is the listener
/// told about it. Totals and chart slices are derived on each read.
pub(crate) struct BudgetEngine {
    budget: Decimal,
    categories: Vec<ExpenseCategory>,
    initial_categories: Vec<ExpenseCategory>,
    next_custom: u64,
    colors: Box<dyn ColorAssigner>,
    listener: Option<ChangeListener>,
}

impl BudgetEngine {
    pub(crate) fn new(budget: Decimal, categories: Vec<ExpenseCategory>) -> Self {
        let categories = dedupe_ids(categories);
        let next_custom = next_free_custom(&categories, 1);
        Self {
            budget: budget.max(Decimal::ZERO),
            initial_categories: categories.clone(),
            categories,
            next_custom,
            colors: Box::new(PaletteColors::default()),
            listener: None,
        }
    }

    pub(crate) fn from_settings(settings: &PlanSettings) -> Self {
        Self::new(settings.initial_budget, default_categories())
    }

    /// Rebuild from a saved snapshot. Reset returns to the snapshot's
    /// initial categories, not to the state that was saved.
    pub(crate) fn restore(snapshot: PlanSnapshot) -> Self {
        let mut engine = Self::new(snapshot.budget, snapshot.categories);
        engine.initial_categories = dedupe_ids(snapshot.initial_categories);
        engine.next_custom = next_free_custom(&engine.initial_categories, engine.next_custom)
            .max(snapshot.next_custom);
        engine
    }

    /// Swap how new categories pick their color. Existing colors are kept.
    pub(crate) fn set_colors(&mut self, colors: Box<dyn ColorAssigner>) {
        self.colors = colors;
    }

    /// Register the change listener, replacing any previous one.
    pub(crate) fn on_change(&mut self, listener: ChangeListener) {
        self.listener = Some(listener);
    }

    // ── Reads ─────────────────────────────────────────────────

    pub(crate) fn budget(&self) -> Decimal {
        self.budget
    }

    pub(crate) fn categories(&self) -> &[ExpenseCategory] {
        &self.categories
    }

    pub(crate) fn category(&self, id: &CategoryId) -> Option<&ExpenseCategory> {
        ExpenseCategory::find_by_id(&self.categories, id)
    }

    pub(crate) fn allocation(&self) -> Allocation {
        Allocation::compute(self.budget, &self.categories)
    }

    pub(crate) fn segments(&self) -> Vec<Segment> {
        project(&self.categories, self.allocation().remaining)
    }

    pub(crate) fn snapshot(&self) -> PlanSnapshot {
        PlanSnapshot {
            budget: self.budget,
            categories: self.categories.clone(),
            initial_categories: self.initial_categories.clone(),
            next_custom: self.next_custom,
        }
    }

    // ── Mutations ─────────────────────────────────────────────

    /// Set the budget. Negative values are rejected and the old budget kept.
    /// Existing amounts are not re-clamped, so a smaller budget can show overrun.
    pub(crate) fn set_budget(&mut self, amount: Decimal) -> bool {
        self.dispatch(Action::SetBudget(amount)).is_some()
    }

    /// Set the budget from free text, see [`parse_budget_input`].
    pub(crate) fn set_budget_input(&mut self, input: &str) -> bool {
        match parse_budget_input(input) {
            Some(amount) => self.set_budget(amount),
            None => {
                trace!(input, "budget input rejected");
                false
            }
        }
    }

    pub(crate) fn add_category(&mut self, name: &str) -> Option<CategoryId> {
        match self.dispatch(Action::AddCategory(name.to_string())) {
            Some(Change::Added(id)) => Some(id),
            _ => None,
        }
    }

    pub(crate) fn insert_category(&mut self, category: ExpenseCategory) -> Option<CategoryId> {
        match self.dispatch(Action::Insert(category)) {
            Some(Change::Added(id)) => Some(id),
            _ => None,
        }
    }

    pub(crate) fn remove_category(&mut self, id: &CategoryId) -> bool {
        self.dispatch(Action::RemoveCategory(id.clone())).is_some()
    }

    /// Set an amount, clamped into `[0, budget]`.
    pub(crate) fn set_category_amount(&mut self, id: &CategoryId, amount: Decimal) -> bool {
        self.dispatch(Action::SetAmount(id.clone(), amount)).is_some()
    }

    pub(crate) fn nudge_category(&mut self, id: &CategoryId, steps: i64) -> bool {
        self.dispatch(Action::Nudge(id.clone(), steps)).is_some()
    }

    pub(crate) fn reset(&mut self) -> bool {
        self.dispatch(Action::Reset).is_some()
    }

    /// Apply an action and, if it was accepted, notify the listener once.
    pub(crate) fn dispatch(&mut self, action: Action) -> Option<Change> {
        let change = self.apply(action);
        match &change {
            Some(change) => {
                debug!(?change, budget = %self.budget, "plan updated");
                self.notify();
            }
            None => trace!("action ignored"),
        }
        change
    }

    fn apply(&mut self, action: Action) -> Option<Change> {
        match action {
            Action::SetBudget(amount) => {
                if amount < Decimal::ZERO {
                    return None;
                }
                self.budget = amount;
                Some(Change::Budget(amount))
            }
            Action::AddCategory(name) => {
                let name = name.trim();
                if name.is_empty() {
                    return None;
                }
                self.next_custom = next_free_custom(&self.categories, self.next_custom);
                let id = CategoryId::custom(self.next_custom);
                self.next_custom += 1;
                let color = self.colors.assign(name, &self.categories);
                self.categories
                    .push(ExpenseCategory::new(id.clone(), name.to_string(), color));
                Some(Change::Added(id))
            }
            Action::Insert(mut category) => {
                category.name = category.name.trim().to_string();
                if category.name.is_empty() {
                    return None;
                }
                // custom-N ids belong to the counter, even ones already removed
                let id_taken = category.id.as_str().is_empty()
                    || category.id.as_str().starts_with("custom-")
                    || self.category(&category.id).is_some();
                if id_taken {
                    self.next_custom = next_free_custom(&self.categories, self.next_custom);
                    category.id = CategoryId::custom(self.next_custom);
                    self.next_custom += 1;
                }
                if category.color.is_empty() {
                    category.color = self.colors.assign(&category.name, &self.categories);
                }
                category.amount = self.clamp(category.amount);
                let id = category.id.clone();
                self.categories.push(category);
                Some(Change::Added(id))
            }
            Action::RemoveCategory(id) => {
                let idx = self.categories.iter().position(|c| c.id == id)?;
                if !self.categories[idx].editable {
                    return None;
                }
                self.categories.remove(idx);
                Some(Change::Removed(id))
            }
            Action::SetAmount(id, amount) => {
                let clamped = self.clamp(amount);
                let category = self.categories.iter_mut().find(|c| c.id == id)?;
                category.amount = clamped;
                Some(Change::Amount(id, clamped))
            }
            Action::Nudge(id, steps) => {
                let current = self.category(&id)?.amount;
                let delta = AMOUNT_STEP.saturating_mul(Decimal::from(steps));
                self.apply(Action::SetAmount(id, current.saturating_add(delta)))
            }
            Action::Reset => {
                self.categories = self.initial_categories.clone();
                self.next_custom = next_free_custom(&self.categories, self.next_custom);
                Some(Change::Reset)
            }
        }
    }

    fn clamp(&self, amount: Decimal) -> Decimal {
        amount.max(Decimal::ZERO).min(self.budget)
    }

    fn notify(&mut self) {
        if let Some(listener) = self.listener.as_mut() {
            listener(self.budget, &self.categories);
        }
    }
}

/// Keep the first category for each id; later duplicates are dropped.
fn dedupe_ids(categories: Vec<ExpenseCategory>) -> Vec<ExpenseCategory> {
    let mut kept: Vec<ExpenseCategory> = Vec::with_capacity(categories.len());
    for category in categories {
        if kept.iter().any(|c| c.id == category.id) {
            warn!(id = %category.id, "dropping category with duplicate id");
            continue;
        }
        kept.push(category);
    }
    kept
}

/// Smallest `n >= from` such that `custom-n` is not in use.
fn next_free_custom(categories: &[ExpenseCategory], from: u64) -> u64 {
    let highest = categories
        .iter()
        .filter_map(|c| c.id.as_str().strip_prefix("custom-")?.parse::<u64>().ok())
        .max()
        .unwrap_or(0);
    from.max(highest.saturating_add(1))
}
