use super::CsvProfile;

/// Header names accepted for each expense field, compared lowercased.
const CATEGORY_NAMES: &[&str] = &["category", "type", "bucket"];
const DESCRIPTION_NAMES: &[&str] = &["description", "item", "note", "notes", "memo", "name"];
const AMOUNT_NAMES: &[&str] = &["amount", "cost", "price", "total", "spent"];
const DATE_NAMES: &[&str] = &["date", "day", "spent on"];
const CURRENCY_NAMES: &[&str] = &["currency", "ccy"];

/// Work out column positions from an expense sheet's header row.
/// Returns None unless at least the category and amount columns are found.
pub(crate) fn detect_columns(headers: &[String]) -> Option<CsvProfile> {
    let h: Vec<String> = headers
        .iter()
        .map(|s| s.to_lowercase().trim().to_string())
        .collect();

    let category_column = col_index(&h, CATEGORY_NAMES)?;
    let amount_column = col_index(&h, AMOUNT_NAMES)?;
    let description_column = col_index(&h, DESCRIPTION_NAMES);
    let date_column = col_index(&h, DATE_NAMES);
    let currency_column = col_index(&h, CURRENCY_NAMES);

    Some(CsvProfile {
        name: "Detected".into(),
        category_column,
        description_column,
        amount_column,
        date_column,
        currency_column,
        ..CsvProfile::default()
    })
}

fn col_index(headers: &[String], names: &[&str]) -> Option<usize> {
    names
        .iter()
        .find_map(|name| headers.iter().position(|h| h == name))
}
