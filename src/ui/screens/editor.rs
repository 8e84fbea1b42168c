use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::engine::Standing;
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_amount, format_percent, hex_color, slider, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Summary
            Constraint::Min(5),    // Category sliders
        ])
        .split(area);

    render_summary(f, chunks[0], app);
    render_categories(f, chunks[1], app);
}

fn render_summary(f: &mut Frame, area: Rect, app: &App) {
    let symbol = app.currency_symbol();
    let alloc = app.engine.allocation();
    let standing = alloc.standing();
    let badge_style = match standing {
        Standing::Remaining(_) => theme::under_budget_style(),
        Standing::OverBudget(_) => theme::over_budget_style(),
    };

    let lines = vec![
        Line::from(Span::styled(&app.settings.description, theme::dim_style())),
        Line::from(vec![
            Span::styled("Total budget  ", theme::dim_style()),
            Span::styled(
                format_amount(alloc.budget, symbol),
                Style::default()
                    .fg(theme::TEXT)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("    Allocated  ", theme::dim_style()),
            Span::styled(format_amount(alloc.total_allocated, symbol), theme::normal_style()),
        ]),
        Line::from(vec![
            Span::styled(
                format!(
                    " {}: {} ",
                    standing.label(),
                    format_amount(standing.amount(), symbol)
                ),
                badge_style.add_modifier(Modifier::REVERSED),
            ),
            Span::styled(
                format!("  {} of budget", format_percent(alloc.remaining_percentage().abs())),
                badge_style,
            ),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(format!(" {} ", app.settings.title), theme::title_style()));
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_categories(f: &mut Frame, area: Rect, app: &App) {
    let categories = app.engine.categories();
    let budget = app.engine.budget();
    let symbol = app.currency_symbol();

    if categories.is_empty() {
        let msg = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled("No categories yet", theme::dim_style())),
            Line::from(""),
            Line::from(Span::styled(
                "Press a or use :add <name> to create one",
                theme::dim_style(),
            )),
        ])
        .centered()
        .block(categories_block(0));
        f.render_widget(msg, area);
        return;
    }

    let bar_width = (area.width as usize).saturating_sub(48).clamp(10, 40);

    let items: Vec<ListItem> = categories
        .iter()
        .enumerate()
        .skip(app.category_scroll)
        .take(area.height.saturating_sub(2) as usize)
        .map(|(i, cat)| {
            let style = if i == app.category_index {
                theme::selected_style()
            } else if i % 2 == 0 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };
            let marker = if cat.editable { " " } else { "🔒" };
            let swatch = Style::default().fg(hex_color(&cat.color));

            ListItem::new(Line::from(vec![
                Span::styled("● ", swatch),
                Span::styled(format!("{:<20}", truncate(&cat.name, 19)), style),
                Span::styled(format!("{marker} "), theme::dim_style()),
                Span::styled(slider(cat.amount, budget, bar_width), swatch),
                Span::styled(
                    format!(" {:>12}", format_amount(cat.amount, symbol)),
                    style.add_modifier(Modifier::BOLD),
                ),
            ]))
        })
        .collect();

    let list = List::new(items).block(categories_block(categories.len()));
    f.render_widget(list, area);
}

fn categories_block(count: usize) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(
            format!(" Expense Categories ({count}) "),
            Style::default()
                .fg(theme::TEXT_DIM)
                .add_modifier(Modifier::BOLD),
        ))
}
