use rust_decimal::Decimal;

/// Stable identifier of a category within one plan.
///
/// Seeded categories use readable keys (`"food"`), user-added ones get
/// `"custom-N"` from a counter that never goes backwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CategoryId(String);

impl CategoryId {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn custom(n: u64) -> Self {
        Self(format!("custom-{n}"))
    }

    /// Derive an id from a display name, e.g. `"Food & Dining"` → `"food-dining"`.
    pub fn slug(name: &str) -> Self {
        let slug = name
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .map(|w| w.to_lowercase())
            .collect::<Vec<_>>()
            .join("-");
        Self(slug)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CategoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseCategory {
    pub id: CategoryId,
    pub name: String,
    pub amount: Decimal,
    /// Hex color token, e.g. `#FF6384`.
    pub color: String,
    pub editable: bool,
}

impl ExpenseCategory {
    /// A user-facing category: editable, starting at zero.
    pub fn new(id: CategoryId, name: String, color: String) -> Self {
        Self {
            id,
            name,
            amount: Decimal::ZERO,
            color,
            editable: true,
        }
    }

    pub fn with_amount(mut self, amount: Decimal) -> Self {
        self.amount = amount.max(Decimal::ZERO);
        self
    }

    /// Find a category by name (case-insensitive, surrounding whitespace ignored).
    pub fn find_by_name<'a>(
        categories: &'a [ExpenseCategory],
        name: &str,
    ) -> Option<&'a ExpenseCategory> {
        let lower = name.trim().to_lowercase();
        categories.iter().find(|c| c.name.to_lowercase() == lower)
    }

    pub fn find_by_id<'a>(
        categories: &'a [ExpenseCategory],
        id: &CategoryId,
    ) -> Option<&'a ExpenseCategory> {
        categories.iter().find(|c| &c.id == id)
    }
}

impl std::fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// The six categories a new trip plan starts with (total 1500).
pub fn default_categories() -> Vec<ExpenseCategory> {
    [
        ("accommodation", "Accommodation", 500, "#FF6384"),
        ("transportation", "Transportation", 300, "#36A2EB"),
        ("food", "Food & Drinks", 250, "#FFCE56"),
        ("activities", "Activities", 200, "#4BC0C0"),
        ("shopping", "Shopping", 150, "#9966FF"),
        ("misc", "Miscellaneous", 100, "#FF9F40"),
    ]
    .into_iter()
    .map(|(key, name, amount, color)| {
        ExpenseCategory::new(CategoryId::new(key), name.into(), color.into())
            .with_amount(Decimal::from(amount))
    })
    .collect()
}
