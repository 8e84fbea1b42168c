use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyModifiers};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use tracing::{info, warn};

use crate::db::Database;
use crate::engine::AMOUNT_STEP;
use crate::ui::app::{App, InputMode, PendingAction, Screen};
use crate::ui::commands;
use crate::ui::util::{scroll_down, scroll_to_bottom, scroll_to_top, scroll_up};

/// Slider steps moved by `H`/`L`.
const BIG_NUDGE: i64 = 10;

pub(crate) fn as_tui(app: &mut App, db: &mut Database) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, app, db);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        eprintln!("Error: {e:?}");
    }

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    db: &mut Database,
) -> Result<()> {
    info!(plan = %app.plan_name, "tui started");
    while app.running {
        terminal.draw(|f| {
            // tab + status + command bars, summary box, list borders
            let content_height = f.area().height.saturating_sub(10) as usize;
            app.visible_rows = content_height.max(1);
            crate::ui::render::render(f, app);
        })?;

        if let Event::Key(key) = event::read()? {
            if app.show_help {
                app.show_help = false;
                continue;
            }
            match app.input_mode {
                InputMode::Normal => handle_normal_input(key, app),
                InputMode::Command => handle_command_input(key, app, db),
                InputMode::Budget | InputMode::NewCategory | InputMode::Amount => {
                    handle_prompt_input(key, app)
                }
                InputMode::Confirm => handle_confirm_input(key, app),
            }
            autosave(app, db);
        }
    }

    // Settings-only edits made right before quitting
    autosave(app, db);
    info!(plan = %app.plan_name, "tui stopped");
    Ok(())
}

/// Write the plan back whenever the engine or settings reported a change.
fn autosave(app: &mut App, db: &mut Database) {
    let Some(snapshot) = app.take_unsaved() else {
        return;
    };
    if let Err(e) = db.save_plan(&app.plan_name, &app.settings, &snapshot) {
        warn!(plan = %app.plan_name, error = %e, "auto-save failed");
        app.set_status(format!("Auto-save failed: {e:#}"));
    }
}

// ── Input handlers ───────────────────────────────────────────

fn handle_normal_input(key: event::KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Char(':') => {
            app.input_mode = InputMode::Command;
            app.command_input.clear();
        }
        KeyCode::Char('q') | KeyCode::Char('c')
            if key.modifiers.contains(KeyModifiers::CONTROL) =>
        {
            app.running = false;
        }
        KeyCode::Char('q') => app.running = false,
        KeyCode::Char('j') | KeyCode::Down => handle_move_down(app),
        KeyCode::Char('k') | KeyCode::Up => handle_move_up(app),
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            let half_page = app.visible_rows / 2;
            for _ in 0..half_page {
                handle_move_down(app);
            }
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            let half_page = app.visible_rows / 2;
            for _ in 0..half_page {
                handle_move_up(app);
            }
        }
        KeyCode::Char('g') => scroll_to_top(&mut app.category_index, &mut app.category_scroll),
        KeyCode::Char('G') => {
            let len = app.engine.categories().len();
            scroll_to_bottom(
                &mut app.category_index,
                &mut app.category_scroll,
                len,
                app.visible_rows,
            );
        }
        KeyCode::Char('1') => app.screen = Screen::Editor,
        KeyCode::Char('2') => app.screen = Screen::Chart,
        KeyCode::Char('3') => app.screen = Screen::Breakdown,
        KeyCode::Tab => {
            let screens = Screen::all();
            let idx = screens.iter().position(|s| *s == app.screen).unwrap_or(0);
            app.screen = screens[(idx + 1) % screens.len()];
        }
        KeyCode::BackTab => {
            let screens = Screen::all();
            let idx = screens.iter().position(|s| *s == app.screen).unwrap_or(0);
            let prev = if idx == 0 { screens.len() - 1 } else { idx - 1 };
            app.screen = screens[prev];
        }
        KeyCode::Char('?') => app.show_help = true,
        KeyCode::Esc => app.status_message.clear(),

        KeyCode::Char('h') | KeyCode::Char('-') | KeyCode::Left => nudge_selected(app, -1),
        KeyCode::Char('l') | KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Right => {
            nudge_selected(app, 1)
        }
        KeyCode::Char('H') => nudge_selected(app, -BIG_NUDGE),
        KeyCode::Char('L') => nudge_selected(app, BIG_NUDGE),
        KeyCode::Char('0') => {
            if let Some(id) = app.selected_id() {
                commands::set_amount(&id, rust_decimal::Decimal::ZERO, app);
            }
        }
        KeyCode::Char('e') | KeyCode::Enter => {
            if let Some(cat) = app.selected_category() {
                let current = cat.amount.normalize().to_string();
                app.start_prompt(InputMode::Amount, current);
            }
        }
        KeyCode::Char('a') => app.start_prompt(InputMode::NewCategory, ""),
        KeyCode::Char('B') => {
            let current = app.engine.budget().normalize().to_string();
            app.start_prompt(InputMode::Budget, current);
        }
        KeyCode::Char('d') | KeyCode::Char('x') => request_remove(app),
        KeyCode::Char('R') => app.confirm(
            PendingAction::Reset,
            "Restore the initial categories? Custom categories will be lost",
        ),
        _ => {}
    }
}

fn nudge_selected(app: &mut App, steps: i64) {
    let Some(id) = app.selected_id() else {
        return;
    };
    app.engine.nudge_category(&id, steps);
    if let Some(cat) = app.engine.category(&id) {
        let shown = crate::ui::util::format_amount(cat.amount, app.currency_symbol());
        let step = crate::ui::util::format_amount(AMOUNT_STEP, app.currency_symbol());
        let msg = format!("{}: {shown} (step {step})", cat.name);
        app.set_status(msg);
    }
}

fn request_remove(app: &mut App) {
    let Some(cat) = app.selected_category() else {
        return;
    };
    if !cat.editable {
        let msg = format!("'{}' is a fixed category and cannot be removed", cat.name);
        app.set_status(msg);
        return;
    }
    let (id, name) = (cat.id.clone(), cat.name.clone());
    let message = format!("Remove category '{name}'?");
    app.confirm(PendingAction::RemoveCategory { id, name }, message);
}

fn handle_command_input(key: event::KeyEvent, app: &mut App, db: &mut Database) {
    match key.code {
        KeyCode::Enter => {
            let input = app.command_input.clone();
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
            if let Err(e) = commands::handle_command(&input, app, db) {
                warn!(command = %input, error = %e, "command failed");
                app.set_status(format!("Error: {e:#}"));
            }
        }
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
        }
        KeyCode::Backspace => {
            app.command_input.pop();
            if app.command_input.is_empty() {
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.command_input.clear();
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Char('w') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            let trimmed = app.command_input.trim_end();
            if let Some(pos) = trimmed.rfind(' ') {
                app.command_input.truncate(pos + 1);
            } else {
                app.command_input.clear();
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Char(c) => {
            app.command_input.push(c);
        }
        _ => {}
    }
}

/// Budget, new-category and amount prompts share the command buffer.
fn handle_prompt_input(key: event::KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Enter => {
            let input = std::mem::take(&mut app.command_input);
            let mode = app.input_mode;
            app.input_mode = InputMode::Normal;
            submit_prompt(mode, &input, app);
        }
        KeyCode::Esc => {
            app.command_input.clear();
            app.input_mode = InputMode::Normal;
            app.set_status("Cancelled");
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.command_input.clear();
        }
        KeyCode::Backspace => {
            app.command_input.pop();
        }
        KeyCode::Char(c) => {
            app.command_input.push(c);
        }
        _ => {}
    }
}

fn submit_prompt(mode: InputMode, input: &str, app: &mut App) {
    match mode {
        InputMode::Budget => commands::apply_budget_input(input, app),
        InputMode::NewCategory => commands::add_category(input, app),
        InputMode::Amount => {
            let Some(id) = app.selected_id() else {
                return;
            };
            match commands::parse_amount_arg(input) {
                Some(amount) => commands::set_amount(&id, amount, app),
                None => app.set_status(format!("Invalid amount: {}", input.trim())),
            }
        }
        InputMode::Normal | InputMode::Command | InputMode::Confirm => {}
    }
}

fn handle_confirm_input(key: event::KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            if let Some(action) = app.pending_action.take() {
                match action {
                    PendingAction::RemoveCategory { id, name } => {
                        if app.engine.remove_category(&id) {
                            app.clamp_selection();
                            app.set_status(format!("Removed: {name}"));
                        } else {
                            app.set_status(format!("Could not remove: {name}"));
                        }
                    }
                    PendingAction::Reset => {
                        app.engine.reset();
                        app.clamp_selection();
                        app.set_status("Categories restored");
                    }
                }
            }
            app.confirm_message.clear();
            app.input_mode = InputMode::Normal;
        }
        _ => {
            app.pending_action = None;
            app.confirm_message.clear();
            app.input_mode = InputMode::Normal;
            app.set_status("Cancelled");
        }
    }
}

fn handle_move_down(app: &mut App) {
    let len = app.engine.categories().len();
    scroll_down(
        &mut app.category_index,
        &mut app.category_scroll,
        len,
        app.visible_rows,
    );
}

fn handle_move_up(app: &mut App) {
    scroll_up(&mut app.category_index, &mut app.category_scroll);
}
