use std::cell::RefCell;
use std::rc::Rc;

use rust_decimal::Decimal;

use crate::engine::BudgetEngine;
use crate::models::{CategoryId, ExpenseCategory, PlanSettings, PlanSnapshot};

/// Latest `(budget, categories)` the engine reported and nobody saved yet.
type ReportedPlan = (Decimal, Vec<ExpenseCategory>);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    Editor,
    Chart,
    Breakdown,
}

impl Screen {
    pub(crate) fn all() -> &'static [Screen] {
        &[Self::Editor, Self::Chart, Self::Breakdown]
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Editor => write!(f, "Categories"),
            Self::Chart => write!(f, "Chart"),
            Self::Breakdown => write!(f, "Breakdown"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputMode {
    Normal,
    Command,
    /// Typing a new total budget.
    Budget,
    /// Typing the name of a category to add.
    NewCategory,
    /// Typing an exact amount for the selected category.
    Amount,
    Confirm,
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::Command => write!(f, "COMMAND"),
            Self::Budget => write!(f, "BUDGET"),
            Self::NewCategory => write!(f, "ADD"),
            Self::Amount => write!(f, "AMOUNT"),
            Self::Confirm => write!(f, "CONFIRM"),
        }
    }
}

/// Pending action that requires user confirmation.
#[derive(Debug, Clone)]
pub(crate) enum PendingAction {
    RemoveCategory { id: CategoryId, name: String },
    Reset,
}

pub(crate) struct App {
    pub(crate) running: bool,
    pub(crate) screen: Screen,
    pub(crate) input_mode: InputMode,
    /// Shared text buffer for the command line and the inline prompts.
    pub(crate) command_input: String,
    pub(crate) status_message: String,
    pub(crate) show_help: bool,

    // Plan
    pub(crate) plan_name: String,
    pub(crate) settings: PlanSettings,
    pub(crate) engine: BudgetEngine,
    unsaved_changes: Rc<RefCell<Option<ReportedPlan>>>,
    settings_changed: bool,

    // Category list
    pub(crate) category_index: usize,
    pub(crate) category_scroll: usize,

    // Confirmation
    pub(crate) pending_action: Option<PendingAction>,
    pub(crate) confirm_message: String,

    // Layout (updated each render frame)
    pub(crate) visible_rows: usize,
}

impl App {
    pub(crate) fn new(plan_name: String, settings: PlanSettings, mut engine: BudgetEngine) -> Self {
        let unsaved_changes = Rc::new(RefCell::new(None));
        let latest = Rc::clone(&unsaved_changes);
        engine.on_change(Box::new(move |budget, categories| {
            *latest.borrow_mut() = Some((budget, categories.to_vec()));
        }));

        Self {
            running: true,
            screen: Screen::Editor,
            input_mode: InputMode::Normal,
            command_input: String::new(),
            status_message: String::new(),
            show_help: false,

            plan_name,
            settings,
            engine,
            unsaved_changes,
            settings_changed: false,

            category_index: 0,
            category_scroll: 0,

            pending_action: None,
            confirm_message: String::new(),

            visible_rows: 20,
        }
    }

    pub(crate) fn currency_symbol(&self) -> &'static str {
        self.settings.currency.symbol()
    }

    pub(crate) fn selected_category(&self) -> Option<&ExpenseCategory> {
        self.engine.categories().get(self.category_index)
    }

    pub(crate) fn selected_id(&self) -> Option<CategoryId> {
        self.selected_category().map(|c| c.id.clone())
    }

    /// Keep the cursor on a real row after the list shrinks.
    pub(crate) fn clamp_selection(&mut self) {
        let len = self.engine.categories().len();
        if self.category_index >= len {
            self.category_index = len.saturating_sub(1);
        }
        if self.category_scroll > self.category_index {
            self.category_scroll = self.category_index;
        }
    }

    pub(crate) fn select_category(&mut self, id: &CategoryId) {
        if let Some(idx) = self.engine.categories().iter().position(|c| &c.id == id) {
            self.category_index = idx;
            if idx >= self.category_scroll + self.visible_rows {
                self.category_scroll = idx.saturating_sub(self.visible_rows.saturating_sub(1));
            }
        }
    }

    pub(crate) fn mark_settings_changed(&mut self) {
        self.settings_changed = true;
    }

    pub(crate) fn has_unsaved_changes(&self) -> bool {
        self.settings_changed || self.unsaved_changes.borrow().is_some()
    }

    /// Snapshot to persist if anything changed since the last call.
    pub(crate) fn take_unsaved(&mut self) -> Option<PlanSnapshot> {
        let latest = self.unsaved_changes.borrow_mut().take();
        let settings_changed = std::mem::take(&mut self.settings_changed);
        match latest {
            Some((budget, categories)) => Some(PlanSnapshot {
                budget,
                categories,
                ..self.engine.snapshot()
            }),
            None if settings_changed => Some(self.engine.snapshot()),
            None => None,
        }
    }

    pub(crate) fn start_prompt(&mut self, mode: InputMode, initial: impl Into<String>) {
        self.input_mode = mode;
        self.command_input = initial.into();
    }

    pub(crate) fn confirm(&mut self, action: PendingAction, message: impl Into<String>) {
        self.pending_action = Some(action);
        self.confirm_message = message.into();
        self.input_mode = InputMode::Confirm;
    }

    pub(crate) fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }
}
