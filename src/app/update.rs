use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::app::{AppEvent, AppState, Column, InputMode, KeyAction, ModalState, SeedStatus, Settings};
use crate::form::FormValues;
use crate::seed::SeedClient;
use crate::submit::{MockSubmitter, SUCCESS_MESSAGE};
use crate::ui;

/// What the loop must do after a key press.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Quit,
    Submit(FormValues),
}

pub fn run_app(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    rt: &Handle,
    settings: &Settings,
    fetch_seed: bool,
) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel::<AppEvent>();
    let mut app = AppState::new();
    let submitter = MockSubmitter::new(settings.submit_delay());

    if fetch_seed {
        match SeedClient::new(settings.endpoint.clone(), settings.fetch_timeout()) {
            Ok(client) => app.start_seed(rt, client, tx.clone()),
            Err(e) => {
                warn!(error = %e, "seed loader unavailable");
                app.seed_status = SeedStatus::Failed(e.to_string());
            }
        }
    }

    loop {
        while let Ok(ev) = rx.try_recv() {
            apply_event(&mut app, ev);
        }

        terminal.draw(|f| {
            ui::render(f, &mut app);
        })?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match handle_key(&mut app, key) {
                        Some(Command::Quit) => break,
                        Some(Command::Submit(values)) => {
                            submitter.spawn(rt, values, tx.clone());
                        }
                        None => {}
                    }
                }
            }
        }
    }

    app.teardown();
    info!(uptime = ?app.started_at.elapsed(), "session closed");
    Ok(())
}

/// Apply a background result on the UI thread.
pub fn apply_event(app: &mut AppState, ev: AppEvent) {
    match ev {
        AppEvent::SeedLoaded { epoch, result } => {
            if epoch != app.epoch {
                debug!(epoch, current = app.epoch, "discarding stale seed result");
                return;
            }
            app.seed_task = None;
            match result {
                Ok(records) => {
                    let n = records.len();
                    app.form.replace_all(records);
                    app.cursor = Default::default();
                    // The row being edited no longer exists.
                    if app.input_mode == InputMode::Editing {
                        app.input_mode = InputMode::Normal;
                    }
                    app.seed_status = SeedStatus::Loaded(n);
                }
                Err(e) => {
                    app.seed_status = SeedStatus::Failed(e.to_string());
                }
            }
        }
        AppEvent::SubmitFinished { result } => {
            app.submitting = false;
            let message = match result {
                Ok(()) => SUCCESS_MESSAGE.to_string(),
                Err(e) => {
                    warn!(error = %e, "submission failed");
                    format!("Submission failed: {e}")
                }
            };
            app.open_modal(ModalState::Info { message });
        }
    }
}

/// Handle one key press. Returns a command when the loop has work to do.
pub fn handle_key(app: &mut AppState, key: KeyEvent) -> Option<Command> {
    match app.input_mode {
        InputMode::Modal => {
            handle_modal_key(app, key.code);
            None
        }
        InputMode::Editing => {
            handle_edit_key(app, key.code);
            None
        }
        InputMode::Normal => {
            let action = app.keymap.resolve(&key)?;
            perform_action(app, action)
        }
    }
}

fn perform_action(app: &mut AppState, action: KeyAction) -> Option<Command> {
    match action {
        KeyAction::Quit => return Some(Command::Quit),
        KeyAction::OpenHelp => app.open_modal(ModalState::Help { scroll: 0 }),
        KeyAction::InsertFront => {
            app.form.insert_front();
            app.cursor.row = 0;
            app.cursor.column = Column::Username;
        }
        KeyAction::InsertAfter => insert_after_cursor(app),
        KeyAction::DeleteRow => delete_at_cursor(app),
        KeyAction::Submit => return submit(app),
        KeyAction::Activate => return activate(app),
        KeyAction::MoveUp => app.cursor.row = app.cursor.row.saturating_sub(1),
        KeyAction::MoveDown => {
            if app.cursor.row + 1 < app.form.len() {
                app.cursor.row += 1;
            }
        }
        KeyAction::MoveLeft | KeyAction::PrevCell => app.cursor.column = app.cursor.column.prev(),
        KeyAction::MoveRight | KeyAction::NextCell => app.cursor.column = app.cursor.column.next(),
        KeyAction::PageUp => {
            let rpp = app.rows_per_page.max(1);
            app.cursor.row = app.cursor.row.saturating_sub(rpp);
        }
        KeyAction::PageDown => {
            let rpp = app.rows_per_page.max(1);
            app.cursor.row = app.cursor.row.saturating_add(rpp);
            app.clamp_cursor();
        }
        KeyAction::Ignore => {}
    }
    None
}

fn activate(app: &mut AppState) -> Option<Command> {
    if app.form.is_empty() {
        return None;
    }
    match app.cursor.column {
        Column::Username | Column::Email => app.input_mode = InputMode::Editing,
        Column::AddAfter => insert_after_cursor(app),
        Column::Delete => delete_at_cursor(app),
    }
    None
}

fn insert_after_cursor(app: &mut AppState) {
    if app.form.is_empty() {
        return;
    }
    if app.form.insert_after(app.cursor.row).is_ok() {
        app.cursor.row += 1;
        app.cursor.column = Column::Username;
    }
}

fn delete_at_cursor(app: &mut AppState) {
    if app.form.delete(app.cursor.row).is_ok() {
        app.clamp_cursor();
    }
}

fn submit(app: &mut AppState) -> Option<Command> {
    if !app.can_submit() {
        debug!(
            invalid = app.form.invalid_count(),
            submitting = app.submitting,
            "submit ignored"
        );
        return None;
    }
    app.submitting = true;
    Some(Command::Submit(app.form.values()))
}

fn handle_edit_key(app: &mut AppState, code: KeyCode) {
    let Some(field) = app.cursor.column.field() else {
        app.input_mode = InputMode::Normal;
        return;
    };
    let row = app.cursor.row;
    let Some(current) = app.form.value(row, field) else {
        app.input_mode = InputMode::Normal;
        return;
    };
    let mut value = current.to_string();
    match code {
        KeyCode::Enter | KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            return;
        }
        KeyCode::Tab => {
            app.cursor.column = app.cursor.column.next();
            if app.cursor.column.field().is_none() {
                app.input_mode = InputMode::Normal;
            }
            return;
        }
        KeyCode::Backspace => {
            if value.pop().is_none() {
                return;
            }
        }
        KeyCode::Char(c) => value.push(c),
        _ => return,
    }
    if let Err(e) = app.form.edit(row, field, value) {
        warn!(error = %e, "edit rejected");
        app.input_mode = InputMode::Normal;
    }
}

fn handle_modal_key(app: &mut AppState, code: KeyCode) {
    match &mut app.modal {
        Some(ModalState::Info { .. }) => {
            if matches!(code, KeyCode::Enter | KeyCode::Esc) {
                app.close_modal();
            }
        }
        Some(ModalState::Help { scroll }) => match code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') | KeyCode::Char('?') => {
                app.close_modal()
            }
            KeyCode::Up | KeyCode::Char('k') => *scroll = scroll.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => *scroll = scroll.saturating_add(1),
            _ => {}
        },
        None => app.close_modal(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{Keymap, Theme};
    use crate::form::{Field, UserRecord};
    use crossterm::event::KeyModifiers;

    fn press(app: &mut AppState, code: KeyCode) -> Option<Command> {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn app_with(records: Vec<UserRecord>) -> AppState {
        let mut app = AppState::with_config(Theme::dark(), Keymap::default());
        app.form.replace_all(records);
        app
    }

    #[test]
    fn typing_edits_focused_field_and_revalidates() {
        let mut app = app_with(vec![UserRecord::new("alice", "a@x.com")]);
        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.cursor.row, 1);
        assert!(!app.can_submit());

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.input_mode, InputMode::Editing);
        for c in "eve".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        // Tab moves to email and stays in edit mode.
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.input_mode, InputMode::Editing);
        for c in "e@v.io".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        assert_eq!(app.form.record(1), Some(UserRecord::new("eve", "e@v.io")));
        assert!(app.can_submit());

        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.form.value(1, Field::Email), Some("e@v.i"));
        assert!(!app.can_submit());
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn buttons_activate_with_enter() {
        let mut app = app_with(vec![UserRecord::new("alice", "a@x.com")]);
        app.cursor.column = Column::AddAfter;
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.form.len(), 2);

        app.cursor = Default::default();
        app.cursor.column = Column::Delete;
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.form.records(), vec![UserRecord::default()]);
    }

    #[test]
    fn delete_last_row_clamps_cursor() {
        let mut app = app_with(vec![
            UserRecord::new("a", "a@x.com"),
            UserRecord::new("b", "b@x.com"),
        ]);
        app.cursor.row = 1;
        press(&mut app, KeyCode::Char('d'));
        assert_eq!(app.cursor.row, 0);
        press(&mut app, KeyCode::Char('d'));
        assert!(app.form.is_empty());
        assert_eq!(press(&mut app, KeyCode::Char('d')), None);
    }

    #[test]
    fn submit_is_gated_and_not_repeated() {
        let mut app = app_with(vec![UserRecord::new("alice", "a@x.com")]);
        let cmd = press(&mut app, KeyCode::Char('s'));
        assert_eq!(
            cmd,
            Some(Command::Submit(FormValues {
                users: vec![UserRecord::new("alice", "a@x.com")]
            }))
        );
        assert!(app.submitting);
        assert_eq!(press(&mut app, KeyCode::Char('s')), None);

        apply_event(&mut app, AppEvent::SubmitFinished { result: Ok(()) });
        assert!(!app.submitting);
        assert_eq!(
            app.modal,
            Some(ModalState::Info {
                message: SUCCESS_MESSAGE.to_string()
            })
        );
        // Modal swallows keys until acknowledged.
        assert_eq!(press(&mut app, KeyCode::Char('q')), None);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn failed_submit_reenables_control() {
        let mut app = app_with(vec![UserRecord::new("alice", "a@x.com")]);
        press(&mut app, KeyCode::Char('s'));
        apply_event(
            &mut app,
            AppEvent::SubmitFinished {
                result: Err(crate::error::simple_error("remote said no")),
            },
        );
        assert!(app.can_submit());
        assert_eq!(
            app.modal,
            Some(ModalState::Info {
                message: "Submission failed: remote said no".to_string()
            })
        );
    }

    #[test]
    fn stale_seed_result_is_discarded() {
        let mut app = app_with(vec![]);
        let old = app.epoch;
        app.teardown();
        apply_event(
            &mut app,
            AppEvent::SeedLoaded {
                epoch: old,
                result: Ok(vec![UserRecord::new("late", "late@x.com")]),
            },
        );
        assert!(app.form.is_empty());
    }

    #[test]
    fn seed_replaces_local_rows_and_ends_editing() {
        let mut app = app_with(vec![]);
        press(&mut app, KeyCode::Char('n'));
        press(&mut app, KeyCode::Char('n'));
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.input_mode, InputMode::Editing);

        let epoch = app.epoch;
        apply_event(
            &mut app,
            AppEvent::SeedLoaded {
                epoch,
                result: Ok(vec![UserRecord::new("alice", "a@x.com")]),
            },
        );
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.seed_status, SeedStatus::Loaded(1));

        // 'z' is unbound in normal mode, so nothing reaches the seeded row.
        press(&mut app, KeyCode::Char('z'));
        assert_eq!(app.form.records(), vec![UserRecord::new("alice", "a@x.com")]);
    }

    #[test]
    fn seed_failure_leaves_list_empty() {
        let mut app = app_with(vec![]);
        let epoch = app.epoch;
        let err = crate::seed::parse_seed(b"not json").unwrap_err();
        apply_event(&mut app, AppEvent::SeedLoaded { epoch, result: Err(err) });
        assert!(app.form.is_empty());
        assert!(matches!(app.seed_status, SeedStatus::Failed(ref m) if m.starts_with("malformed")));
    }

    #[test]
    fn quit_and_help() {
        let mut app = app_with(vec![]);
        press(&mut app, KeyCode::Char('?'));
        assert_eq!(app.modal, Some(ModalState::Help { scroll: 0 }));
        press(&mut app, KeyCode::Down);
        assert_eq!(app.modal, Some(ModalState::Help { scroll: 1 }));
        press(&mut app, KeyCode::Esc);
        assert_eq!(press(&mut app, KeyCode::Char('q')), Some(Command::Quit));
    }
}
