use std::f64::consts::TAU;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Points},
        Block, Borders, List, ListItem, Paragraph,
    },
    Frame,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::engine::{chart_total, Segment};
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_amount, hex_color, truncate};

/// Inner radius of the ring as a fraction of the outer one.
const HOLE: f64 = 0.6;
const RINGS: usize = 12;

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let segments = app.engine.segments();
    let total = chart_total(&segments);

    if segments.is_empty() || total <= Decimal::ZERO {
        let msg = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled("Nothing to chart", theme::dim_style())),
            Line::from(""),
            Line::from(Span::styled(
                "Set a budget with :budget or give a category an amount",
                theme::dim_style(),
            )),
        ])
        .centered()
        .block(chart_block(" Budget Allocation "));
        f.render_widget(msg, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    render_donut(f, chunks[0], &segments, total);
    render_legend(f, chunks[1], app, &segments, total);
}

fn render_donut(f: &mut Frame, area: Rect, segments: &[Segment], total: Decimal) {
    let total = total.to_f64().unwrap_or(0.0);
    let rings: Vec<(ratatui::style::Color, Vec<(f64, f64)>)> = {
        let mut start = 0.0;
        segments
            .iter()
            .map(|s| {
                let sweep = s.amount.to_f64().unwrap_or(0.0) / total * TAU;
                let points = arc_points(start, sweep);
                start += sweep;
                (hex_color(&s.color), points)
            })
            .collect()
    };

    // Terminal cells are about twice as tall as they are wide
    let inner_w = f64::from(area.width.saturating_sub(2).max(1));
    let inner_h = f64::from(area.height.saturating_sub(2).max(1)) * 2.0;
    let y_half = 1.1;
    let x_half = y_half * inner_w / inner_h;

    let canvas = Canvas::default()
        .block(chart_block(" Budget Allocation "))
        .marker(Marker::Braille)
        .x_bounds([-x_half, x_half])
        .y_bounds([-y_half, y_half])
        .paint(move |ctx| {
            for (color, coords) in &rings {
                ctx.draw(&Points {
                    coords,
                    color: *color,
                });
            }
        });
    f.render_widget(canvas, area);
}

/// Sample an annular sector starting at 12 o'clock and running clockwise.
fn arc_points(start: f64, sweep: f64) -> Vec<(f64, f64)> {
    let steps = ((sweep / TAU) * 360.0).ceil().max(1.0) as usize;
    let mut points = Vec::with_capacity(steps * RINGS);
    for step in 0..=steps {
        let theta = start + sweep * (step as f64 / steps as f64);
        let (sin, cos) = theta.sin_cos();
        for ring in 0..RINGS {
            let r = HOLE + (1.0 - HOLE) * (ring as f64 / (RINGS - 1) as f64);
            points.push((r * sin, r * cos));
        }
    }
    points
}

fn render_legend(f: &mut Frame, area: Rect, app: &App, segments: &[Segment], total: Decimal) {
    let symbol = app.currency_symbol();
    let name_width = (area.width as usize).saturating_sub(22).max(6);

    let items: Vec<ListItem> = segments
        .iter()
        .map(|s| {
            let share = s.share(total).round_dp(0).normalize();
            let name_style = if s.is_remaining() {
                theme::dim_style()
            } else {
                theme::normal_style()
            };
            ListItem::new(Line::from(vec![
                Span::styled("■ ", Style::default().fg(hex_color(&s.color))),
                Span::styled(
                    format!("{:<w$}", truncate(&s.name, name_width), w = name_width),
                    name_style,
                ),
                Span::styled(
                    format!(" {share:>3}%"),
                    Style::default()
                        .fg(theme::TEXT)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(format!(" {}", format_amount(s.amount, symbol)), theme::dim_style()),
            ]))
        })
        .collect();

    let list = List::new(items).block(chart_block(" Legend "));
    f.render_widget(list, area);
}

fn chart_block(title: &'static str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(
            title,
            Style::default()
                .fg(theme::TEXT_DIM)
                .add_modifier(Modifier::BOLD),
        ))
}
