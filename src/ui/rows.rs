//! Form rows: one line of inputs and buttons per record, with inline errors beneath.
//!
use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};

use crate::app::{AppState, Column, InputMode};
use crate::form::Field;

/// Terminal lines taken by one form row.
const ROW_HEIGHT: u16 = 2;

pub fn render_rows(f: &mut Frame, area: Rect, app: &mut AppState) {
    let block = Block::default()
        .title("Users")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border));

    if app.form.is_empty() {
        let p = Paragraph::new("No rows. Press [n] to add one.")
            .style(Style::default().fg(app.theme.muted))
            .block(block);
        f.render_widget(p, area);
        return;
    }

    let body_height = area.height.saturating_sub(3) / ROW_HEIGHT;
    if body_height > 0 {
        app.rows_per_page = body_height as usize;
    }
    let start = (app.cursor.row / app.rows_per_page) * app.rows_per_page;
    let end = (start + app.rows_per_page).min(app.form.len());

    let rows = (start..end).map(|index| {
        let cells = Column::ALL.map(|column| render_cell(app, index, column));
        let mut all = vec![Cell::from(format!("{}", index + 1))];
        all.extend(cells);
        Row::new(all).height(ROW_HEIGHT)
    });

    let widths = [
        Constraint::Length(4),
        Constraint::Percentage(35),
        Constraint::Percentage(45),
        Constraint::Length(11),
        Constraint::Length(8),
    ];
    let header = Row::new(vec!["#", "USERNAME", "EMAIL", "", ""]).style(
        Style::default()
            .fg(app.theme.title)
            .add_modifier(Modifier::BOLD),
    );

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .column_spacing(1);
    f.render_widget(table, area);
}

fn render_cell(app: &AppState, index: usize, column: Column) -> Cell<'static> {
    let focused = app.cursor.row == index && app.cursor.column == column;
    let focus = Style::default()
        .fg(app.theme.focus_fg)
        .bg(app.theme.focus_bg)
        .add_modifier(Modifier::REVERSED);

    match column.field() {
        Some(field) => {
            let value = app.form.value(index, field).unwrap_or_default();
            let editing = focused && app.input_mode == InputMode::Editing;
            let input = if value.is_empty() && !editing {
                Span::styled(placeholder(field), Style::default().fg(app.theme.muted))
            } else if editing {
                Span::raw(format!("{value}▏"))
            } else {
                Span::styled(value.to_string(), Style::default().fg(app.theme.text))
            };
            let input = if focused { input.patch_style(focus) } else { input };
            let error = app
                .form
                .error(index, field)
                .map(|_| Span::styled(field.error_message(), Style::default().fg(app.theme.error)))
                .unwrap_or_default();
            Cell::from(Text::from(vec![Line::from(input), Line::from(error)]))
        }
        None => {
            let label = match column {
                Column::AddAfter => "[Add after]",
                _ => "[Delete]",
            };
            let style = if focused {
                focus
            } else {
                Style::default().fg(app.theme.button)
            };
            Cell::from(Span::styled(label, style))
        }
    }
}

fn placeholder(field: Field) -> &'static str {
    match field {
        Field::Username => "user.username",
        Field::Email => "user.email",
    }
}
