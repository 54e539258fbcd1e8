//! Shared UI components (status bar, modal helpers).
//!
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::{AppState, InputMode, KeyAction, ModalState, SeedStatus};

/// Render the bottom status bar with mode, counts and seed state.
pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let mode = match app.input_mode {
        InputMode::Normal => "NORMAL",
        InputMode::Editing => "EDIT",
        InputMode::Modal => "MODAL",
    };
    let seed = match &app.seed_status {
        SeedStatus::Skipped => "off".to_string(),
        SeedStatus::Loading => "loading...".to_string(),
        SeedStatus::Loaded(n) => format!("loaded {n}"),
        SeedStatus::Failed(reason) => format!("seed failed: {reason}"),
    };
    let msg = format!(
        "mode: {mode}  rows:{}  invalid:{}  seed: {seed}",
        app.form.len(),
        app.form.invalid_count(),
    );
    let style = match app.seed_status {
        SeedStatus::Failed(_) => Style::default()
            .fg(app.theme.error)
            .bg(app.theme.status_bg)
            .add_modifier(Modifier::BOLD),
        _ => Style::default()
            .fg(app.theme.status_fg)
            .bg(app.theme.status_bg),
    };
    f.render_widget(Paragraph::new(msg).style(style), area);
}

/// Compute a rectangle centered within `area` with a maximum size.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Render the acknowledgment dialog.
pub fn render_info_modal(f: &mut Frame, area: Rect, app: &AppState, state: &ModalState) {
    if let ModalState::Info { message } = state {
        let max_w = area.width.saturating_sub(6).max(30);
        let width = 44u16.min(max_w);
        let approx_lines = (message.len() as u16 / width.saturating_sub(4).max(10)).max(1);
        let height = (approx_lines + 4).min(area.height.saturating_sub(6).max(5)).max(5);
        let rect = centered_rect(width, height, area);
        let lines = vec![
            Line::from(message.clone()),
            Line::from(""),
            Line::from(Span::styled(
                "Press Enter to continue",
                Style::default().fg(app.theme.muted),
            )),
        ];
        let p = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
            Block::default()
                .title("Info")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        );
        f.render_widget(Clear, rect);
        f.render_widget(p, rect);
    }
}

/// Render the key reference, built from the active keymap.
pub fn render_help_modal(f: &mut Frame, area: Rect, app: &AppState, scroll: u16) {
    let width = 64u16.min(area.width.saturating_sub(4)).max(40);
    let height = 22u16.min(area.height.saturating_sub(4)).max(10);
    let rect = centered_rect(width, height, area);

    let entries = [
        (KeyAction::InsertFront, "Add a new row at the top"),
        (KeyAction::InsertAfter, "Add a row after the focused one"),
        (KeyAction::DeleteRow, "Delete the focused row"),
        (KeyAction::Activate, "Edit field / press button"),
        (KeyAction::Submit, "Save changes (all fields valid)"),
        (KeyAction::MoveUp, "Previous row"),
        (KeyAction::MoveDown, "Next row"),
        (KeyAction::NextCell, "Next cell"),
        (KeyAction::PrevCell, "Previous cell"),
        (KeyAction::PageUp, "Page up"),
        (KeyAction::PageDown, "Page down"),
        (KeyAction::OpenHelp, "This help"),
        (KeyAction::Quit, "Quit"),
    ];

    let mut lines: Vec<Line> = vec![
        Line::from(Span::styled(
            "Keys",
            Style::default()
                .fg(app.theme.title)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    for (action, what) in entries {
        let keys = app.keymap.keys_for(action).join(", ");
        lines.push(Line::from(vec![
            Span::styled(format!("{keys:<22}"), Style::default().fg(app.theme.focus_fg)),
            Span::raw(what),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(
        "While editing: type to change the value, Backspace deletes, Tab moves on, Enter/Esc stop.",
    ));
    lines.push(Line::from(
        "Fields are validated on every change; Save stays disabled while any field is invalid.",
    ));

    let p = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0))
        .block(
            Block::default()
                .title("Help")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_rect_stays_inside_area() {
        let area = Rect::new(0, 0, 20, 10);
        let r = centered_rect(40, 4, area);
        assert_eq!(r.width, 20);
        assert_eq!(r.y, 3);
    }
}
