#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;

fn make_expense(category: &str, description: &str, amount: Decimal) -> Expense {
    Expense {
        category: category.into(),
        description: description.into(),
        amount,
        date: "2024-06-01".into(),
        currency: "USD".into(),
    }
}

// ── CategoryId ────────────────────────────────────────────────

#[test]
fn test_category_id_custom() {
    assert_eq!(CategoryId::custom(3).as_str(), "custom-3");
}

#[test]
fn test_category_id_slug() {
    assert_eq!(CategoryId::slug("Food & Dining").as_str(), "food-dining");
    assert_eq!(CategoryId::slug("  Day Trips  ").as_str(), "day-trips");
    assert_eq!(CategoryId::slug("Misc").as_str(), "misc");
}

#[test]
fn test_category_id_display() {
    assert_eq!(format!("{}", CategoryId::new("food")), "food");
}

// ── ExpenseCategory ───────────────────────────────────────────

#[test]
fn test_category_new_defaults() {
    let cat = ExpenseCategory::new(CategoryId::new("x"), "Souvenirs".into(), "#123456".into());
    assert_eq!(cat.amount, Decimal::ZERO);
    assert!(cat.editable);
    assert_eq!(format!("{cat}"), "Souvenirs");
}

#[test]
fn test_category_with_negative_amount_floors_at_zero() {
    let cat = ExpenseCategory::new(CategoryId::new("x"), "X".into(), String::new())
        .with_amount(dec!(-5));
    assert_eq!(cat.amount, Decimal::ZERO);
}

#[test]
fn test_find_by_name_case_insensitive() {
    let cats = default_categories();
    let found = ExpenseCategory::find_by_name(&cats, "  food & drinks ").unwrap();
    assert_eq!(found.id.as_str(), "food");
    assert!(ExpenseCategory::find_by_name(&cats, "Flights").is_none());
}

#[test]
fn test_find_by_id() {
    let cats = default_categories();
    let found = ExpenseCategory::find_by_id(&cats, &CategoryId::new("misc")).unwrap();
    assert_eq!(found.name, "Miscellaneous");
}

#[test]
fn test_default_categories() {
    let cats = default_categories();
    assert_eq!(cats.len(), 6);
    let total: Decimal = cats.iter().map(|c| c.amount).sum();
    assert_eq!(total, dec!(1500));
    assert!(cats.iter().all(|c| c.editable));
    assert_eq!(cats[0].name, "Accommodation");
    assert_eq!(cats[5].color, "#FF9F40");
}

// ── Currency ──────────────────────────────────────────────────

#[test]
fn test_currency_parse() {
    assert_eq!(Currency::parse("eur"), Some(Currency::Eur));
    assert_eq!(Currency::parse("GBP"), Some(Currency::Gbp));
    assert_eq!(Currency::parse("¥"), Some(Currency::Jpy));
    assert_eq!(Currency::parse("CHF"), None);
}

#[test]
fn test_currency_roundtrip() {
    for c in Currency::all() {
        assert_eq!(Currency::parse(c.code()), Some(*c), "Roundtrip failed for {c}");
    }
}

#[test]
fn test_currency_default_is_dollar() {
    assert_eq!(Currency::default().symbol(), "$");
}

// ── PlanSettings ──────────────────────────────────────────────

#[test]
fn test_plan_settings_defaults() {
    let settings = PlanSettings::default();
    assert_eq!(settings.initial_budget, dec!(1500));
    assert_eq!(settings.currency, Currency::Usd);
    assert_eq!(settings.title, "Travel Budget Calculator");
}

// ── Expense grouping ──────────────────────────────────────────

#[test]
fn test_group_by_category_sums_in_first_seen_order() {
    let expenses = vec![
        make_expense("Food & Dining", "Lunch", dec!(12.50)),
        make_expense("Transportation", "Taxi", dec!(30)),
        make_expense("Food & Dining", "Dinner", dec!(40)),
    ];
    let cats = group_by_category(&expenses);
    assert_eq!(cats.len(), 2);
    assert_eq!(cats[0].name, "Food & Dining");
    assert_eq!(cats[0].id.as_str(), "food-dining");
    assert_eq!(cats[0].amount, dec!(52.50));
    assert_eq!(cats[1].amount, dec!(30));
    assert_eq!(cats[0].color, "#FF6384");
    assert_eq!(cats[1].color, "#36A2EB");
}

#[test]
fn test_group_by_category_skips_invalid_expenses() {
    let expenses = vec![
        make_expense("Food", "", dec!(10)),
        make_expense("Food", "Snack", Decimal::ZERO),
        make_expense("", "Orphan", dec!(5)),
        make_expense("Shopping", "Hat", dec!(20)),
    ];
    let cats = group_by_category(&expenses);
    assert_eq!(cats.len(), 1);
    assert_eq!(cats[0].name, "Shopping");
}

#[test]
fn test_group_by_category_palette_wraps() {
    let expenses: Vec<Expense> = (0..9)
        .map(|i| make_expense(&format!("Cat {i}"), "item", dec!(1)))
        .collect();
    let cats = group_by_category(&expenses);
    assert_eq!(cats[8].color, cats[0].color);
}

#[test]
fn test_group_by_category_ignores_case() {
    let expenses = vec![
        make_expense("Visa", "Embassy fee", dec!(10)),
        make_expense(" visa ", "Photos", dec!(20)),
    ];
    let cats = group_by_category(&expenses);
    assert_eq!(cats.len(), 1);
    assert_eq!(cats[0].name, "Visa");
    assert_eq!(cats[0].amount, dec!(30));
}

#[test]
fn test_group_by_category_saturates_huge_totals() {
    let expenses = vec![
        make_expense("Hotel", "Suite", Decimal::MAX),
        make_expense("Hotel", "Minibar", Decimal::MAX),
    ];
    let cats = group_by_category(&expenses);
    assert_eq!(cats[0].amount, Decimal::MAX);
}

#[test]
fn test_expense_currency_match() {
    let mut expense = make_expense("Food", "Lunch", dec!(5));
    assert!(expense.is_in(Currency::Usd));
    expense.currency = "€".into();
    assert!(expense.is_in(Currency::Eur));
    assert!(!expense.is_in(Currency::Usd));
    expense.currency = "CHF".into();
    assert!(!expense.is_in(Currency::Usd));
}
