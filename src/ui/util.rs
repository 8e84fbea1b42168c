use ratatui::style::Color;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Format an amount with a currency symbol, thousand separators and no
/// trailing zeros: `1234567.5` → `"$1,234,567.5"`, `-500` → `"-$500"`.
pub(crate) fn format_amount(val: Decimal, symbol: &str) -> String {
    let abs = val.abs().round_dp(2).normalize();
    let formatted = abs.to_string();
    let mut parts = formatted.split('.');
    let int_part = parts.next().unwrap_or("0");
    let dec_part = parts.next();

    let with_commas: String = int_part
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or(""))
        .collect::<Vec<_>>()
        .join(",");

    let sign = if val < Decimal::ZERO { "-" } else { "" };
    match dec_part {
        Some(d) => format!("{sign}{symbol}{with_commas}.{d}"),
        None => format!("{sign}{symbol}{with_commas}"),
    }
}

/// One decimal place, e.g. `3.3333` → `"3.3%"`.
pub(crate) fn format_percent(val: Decimal) -> String {
    format!("{:.1}%", val.round_dp(1))
}

/// Parse a `#RRGGBB` token; anything else renders grey.
pub(crate) fn hex_color(token: &str) -> Color {
    let hex = token.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return Color::Gray;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    match (channel(0), channel(2), channel(4)) {
        (Some(r), Some(g), Some(b)) => Color::Rgb(r, g, b),
        _ => Color::Gray,
    }
}

/// Slider track showing `amount` out of `max`.
pub(crate) fn slider(amount: Decimal, max: Decimal, width: usize) -> String {
    let ratio = if max > Decimal::ZERO {
        (amount / max).to_f64().unwrap_or(0.0).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let filled = (ratio * width as f64).round() as usize;
    let empty = width.saturating_sub(filled);
    format!("[{}{}]", "█".repeat(filled), "░".repeat(empty))
}

/// Truncate a string to `max` visible characters, appending "…" if truncated.
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    let char_count = s.chars().count();
    if char_count <= max {
        return s.to_string();
    }
    let truncated: String = s.chars().take(max.saturating_sub(1)).collect();
    format!("{truncated}…")
}

/// Move a list cursor down by one, adjusting scroll to keep cursor visible.
pub(crate) fn scroll_down(index: &mut usize, scroll: &mut usize, len: usize, page: usize) {
    if *index + 1 < len {
        *index += 1;
        if *index >= *scroll + page {
            *scroll = index.saturating_sub(page.saturating_sub(1));
        }
    }
}

/// Move a list cursor up by one, adjusting scroll to keep cursor visible.
pub(crate) fn scroll_up(index: &mut usize, scroll: &mut usize) {
    *index = index.saturating_sub(1);
    if *index < *scroll {
        *scroll = *index;
    }
}

pub(crate) fn scroll_to_top(index: &mut usize, scroll: &mut usize) {
    *index = 0;
    *scroll = 0;
}

pub(crate) fn scroll_to_bottom(index: &mut usize, scroll: &mut usize, len: usize, page: usize) {
    if len > 0 {
        *index = len - 1;
        *scroll = index.saturating_sub(page.saturating_sub(1));
    }
}
