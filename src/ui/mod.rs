pub mod components;
pub mod rows;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::{AppState, ModalState};

pub fn render(f: &mut Frame, app: &mut AppState) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(5),
                Constraint::Length(3),
                Constraint::Length(1),
            ]
            .as_ref(),
        )
        .split(f.area());

    let p = Paragraph::new(format!(
        "Users ({})   [n] Add New   Enter: edit/press; a: add after; d: delete; s: save; ?: help; q: quit",
        app.form.len()
    ))
    .block(
        Block::default()
            .title("userform")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    )
    .style(Style::default().fg(app.theme.header_fg).bg(app.theme.header_bg));
    f.render_widget(p, root[0]);

    rows::render_rows(f, root[1], app);
    render_save_button(f, root[2], app);
    components::render_status_bar(f, root[3], app);

    if app.modal.is_some() {
        render_modal(f, f.area(), app);
    }
}

/// The global submit control; dimmed while the form cannot be submitted.
fn render_save_button(f: &mut Frame, area: Rect, app: &AppState) {
    let (label, style) = if app.submitting {
        (
            "[s] Save Changes  (submitting...)".to_string(),
            Style::default().fg(app.theme.muted),
        )
    } else if app.can_submit() {
        (
            "[s] Save Changes".to_string(),
            Style::default()
                .fg(app.theme.button)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        (
            format!(
                "[s] Save Changes  (disabled: {} invalid field(s))",
                app.form.invalid_count()
            ),
            Style::default()
                .fg(app.theme.muted)
                .add_modifier(Modifier::DIM),
        )
    };
    let p = Paragraph::new(label).style(style).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(p, area);
}

fn render_modal(f: &mut Frame, area: Rect, app: &AppState) {
    match &app.modal {
        Some(state @ ModalState::Info { .. }) => {
            components::render_info_modal(f, area, app, state);
        }
        Some(ModalState::Help { scroll }) => {
            components::render_help_modal(f, area, app, *scroll);
        }
        None => {}
    }
}
