use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};
use rust_decimal::Decimal;

use crate::engine::chart_total;
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_amount, format_percent, hex_color};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7), // Totals cards
            Constraint::Min(5),    // Per-category table
        ])
        .split(area);

    render_totals(f, chunks[0], app);
    render_table(f, chunks[1], app);
}

fn render_totals(f: &mut Frame, area: Rect, app: &App) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(34),
            Constraint::Percentage(33),
            Constraint::Percentage(33),
        ])
        .split(area);

    let symbol = app.currency_symbol();
    let alloc = app.engine.allocation();

    render_card(
        f,
        cards[0],
        "Total Budget",
        format_amount(alloc.budget, symbol),
        theme::ACCENT,
    );
    render_card(
        f,
        cards[1],
        "Total Allocated",
        format_amount(alloc.total_allocated, symbol),
        theme::TEXT,
    );
    render_card(
        f,
        cards[2],
        "Remaining",
        format_amount(alloc.remaining, symbol),
        if alloc.remaining < Decimal::ZERO {
            theme::RED
        } else {
            theme::GREEN
        },
    );
}

fn render_card(
    f: &mut Frame,
    area: Rect,
    title: &str,
    display: String,
    color: ratatui::style::Color,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(
            format!(" {title} "),
            Style::default()
                .fg(theme::TEXT_DIM)
                .add_modifier(Modifier::BOLD),
        ));

    let text = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            display,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
    ])
    .centered()
    .block(block);

    f.render_widget(text, area);
}

fn render_table(f: &mut Frame, area: Rect, app: &App) {
    let symbol = app.currency_symbol();
    let budget = app.engine.budget();
    let total = chart_total(&app.engine.segments());

    let header = Row::new(vec!["", "Category", "Amount", "% of budget", "% of chart"])
        .style(
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD),
        )
        .bottom_margin(1);

    let percent_of = |amount: Decimal, whole: Decimal| {
        if whole <= Decimal::ZERO {
            return "-".to_string();
        }
        amount
            .checked_div(whole)
            .and_then(|r| r.checked_mul(Decimal::ONE_HUNDRED))
            .map(format_percent)
            .unwrap_or_else(|| "-".to_string())
    };

    let rows: Vec<Row> = app
        .engine
        .categories()
        .iter()
        .enumerate()
        .map(|(i, cat)| {
            let style = if i % 2 == 0 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };
            let chart_share = if cat.amount > Decimal::ZERO {
                percent_of(cat.amount, total)
            } else {
                "-".to_string()
            };
            Row::new(vec![
                Cell::from(Span::styled(
                    "●",
                    Style::default().fg(hex_color(&cat.color)),
                )),
                Cell::from(cat.name.clone()),
                Cell::from(format_amount(cat.amount, symbol)),
                Cell::from(percent_of(cat.amount, budget)),
                Cell::from(chart_share),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(2),
        Constraint::Min(20),
        Constraint::Length(14),
        Constraint::Length(12),
        Constraint::Length(12),
    ];

    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::OVERLAY))
            .title(Span::styled(
                " Breakdown ",
                Style::default()
                    .fg(theme::TEXT_DIM)
                    .add_modifier(Modifier::BOLD),
            )),
    );
    f.render_widget(table, area);
}
