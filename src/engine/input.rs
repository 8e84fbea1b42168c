use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Leading unsigned number. Thousands separators must split the integer part
/// into groups of three.
static LEADING_NUMBER: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{1,3}(?:,[0-9]{3})+|[0-9]+)(\.[0-9]+)?").ok()
});

/// Read a budget typed into a text field.
///
/// Surrounding whitespace and a currency symbol are skipped, then the leading
/// number is taken and anything after it ignored (`"1500abc"` → 1500).
/// Negative, non-numeric or badly grouped input (`"1,,5"`) yields `None`.
pub(crate) fn parse_budget_input(input: &str) -> Option<Decimal> {
    let trimmed = input
        .trim()
        .trim_start_matches(['$', '€', '£', '¥'])
        .trim_start();
    if trimmed.starts_with('-') {
        return None;
    }
    let trimmed = trimmed.strip_prefix('+').unwrap_or(trimmed);

    let caps = LEADING_NUMBER.as_ref()?.captures(trimmed)?;
    let rest = &trimmed[caps.get(0)?.end()..];
    if rest.starts_with(',') {
        return None;
    }
    let int_part = caps.get(1)?.as_str().replace(',', "");
    let frac_part = caps.get(2).map_or("", |m| m.as_str());
    Decimal::from_str(&format!("{int_part}{frac_part}")).ok()
}
