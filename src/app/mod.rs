//! Application state types and entry glue.
//!
//! Defines the state of the form editor (rows, cursor, input mode, modals,
//! background work) and the config file helpers, and re-exports the event
//! loop as `run`.
//!
pub mod keymap;
pub mod settings;
pub mod theme;
pub mod update;

use std::path::PathBuf;
use std::time::Instant;

use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedSender;

use crate::form::{Field, FormState, UserRecord};
use crate::seed::{SeedClient, SeedError, SeedTask};

pub use keymap::{KeyAction, Keymap};
pub use settings::Settings;
pub use theme::Theme;

/// Current input mode for key handling.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    /// Typing into the focused field.
    Editing,
    Modal,
}

/// The four focusable cells of a row, left to right.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Column {
    Username,
    Email,
    AddAfter,
    Delete,
}

impl Column {
    pub const ALL: [Column; 4] = [Column::Username, Column::Email, Column::AddAfter, Column::Delete];

    pub fn field(self) -> Option<Field> {
        match self {
            Column::Username => Some(Field::Username),
            Column::Email => Some(Field::Email),
            Column::AddAfter | Column::Delete => None,
        }
    }

    pub fn next(self) -> Self {
        let i = Self::ALL.iter().position(|c| *c == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let i = Self::ALL.iter().position(|c| *c == self).unwrap_or(0);
        Self::ALL[(i + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Focused cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Cursor {
    pub row: usize,
    pub column: Column,
}

impl Default for Cursor {
    fn default() -> Self {
        Self {
            row: 0,
            column: Column::Username,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModalState {
    /// Acknowledgment dialog; blocks other input until dismissed.
    Info { message: String },
    Help { scroll: u16 },
}

/// Progress of the one-time seed load, shown in the status bar.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SeedStatus {
    Skipped,
    Loading,
    Loaded(usize),
    Failed(String),
}

/// Results of background work, delivered to the UI thread.
#[derive(Debug)]
pub enum AppEvent {
    SeedLoaded {
        epoch: u64,
        result: Result<Vec<UserRecord>, SeedError>,
    },
    SubmitFinished {
        result: crate::Result<()>,
    },
}

pub struct AppState {
    pub started_at: Instant,
    pub form: FormState,
    pub cursor: Cursor,
    pub input_mode: InputMode,
    pub modal: Option<ModalState>,
    pub theme: Theme,
    pub keymap: Keymap,
    pub rows_per_page: usize,
    pub seed_status: SeedStatus,
    pub submitting: bool,
    /// Session counter; seed results tagged with another epoch are stale.
    pub epoch: u64,
    pub seed_task: Option<SeedTask>,
}

impl AppState {
    /// Create state with theme and keybinds read from the config dir.
    pub fn new() -> Self {
        let theme = Theme::load_or_init(&config_file_write_path("theme.conf"));
        let keymap = Keymap::load_or_init(&config_file_write_path("keybinds.conf"));
        Self::with_config(theme, keymap)
    }

    pub fn with_config(theme: Theme, keymap: Keymap) -> Self {
        Self {
            started_at: Instant::now(),
            form: FormState::new(),
            cursor: Cursor::default(),
            input_mode: InputMode::Normal,
            modal: None,
            theme,
            keymap,
            rows_per_page: 10,
            seed_status: SeedStatus::Skipped,
            submitting: false,
            epoch: 1,
            seed_task: None,
        }
    }

    /// Start the one-time seed fetch for the current epoch.
    pub fn start_seed(&mut self, rt: &Handle, client: SeedClient, tx: UnboundedSender<AppEvent>) {
        self.seed_status = SeedStatus::Loading;
        self.seed_task = Some(SeedTask::spawn(rt, client, self.epoch, tx));
    }

    /// The submit control is enabled only when every field passes and nothing is in flight.
    pub fn can_submit(&self) -> bool {
        self.form.is_valid() && !self.submitting
    }

    /// End the session: abort the seed fetch and invalidate any result still on its way.
    pub fn teardown(&mut self) {
        self.epoch += 1;
        if let Some(task) = self.seed_task.take() {
            task.cancel();
        }
    }

    /// Keep the cursor on an existing row.
    pub fn clamp_cursor(&mut self) {
        self.cursor.row = self.cursor.row.min(self.form.len().saturating_sub(1));
    }

    pub fn open_modal(&mut self, modal: ModalState) {
        self.modal = Some(modal);
        self.input_mode = InputMode::Modal;
    }

    pub fn close_modal(&mut self) {
        self.modal = None;
        self.input_mode = InputMode::Normal;
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// `$XDG_CONFIG_HOME/userform`, falling back to `$HOME/.config/userform`.
pub fn config_dir() -> Option<PathBuf> {
    let base = std::env::var_os("XDG_CONFIG_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
    Some(base.join("userform"))
}

/// Path of an existing config file named `name`, if there is one.
pub fn config_file_read_path(name: &str) -> Option<String> {
    let path = config_dir()?.join(name);
    path.exists().then(|| path.to_string_lossy().into_owned())
}

/// Where to write config file `name`; the working directory if the config dir is unusable.
pub fn config_file_write_path(name: &str) -> String {
    match config_dir() {
        Some(dir) if std::fs::create_dir_all(&dir).is_ok() => {
            dir.join(name).to_string_lossy().into_owned()
        }
        _ => name.to_string(),
    }
}

/// Non-empty, non-comment `key = value` pairs of a config file.
pub(crate) fn conf_pairs(contents: &str) -> impl Iterator<Item = (&str, &str)> {
    contents.lines().filter_map(|raw| {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            return None;
        }
        let (key, val) = line.split_once('=')?;
        let (key, val) = (key.trim(), val.trim());
        (!key.is_empty() && !val.is_empty()).then_some((key, val))
    })
}

/// Re-export the application event loop entry function.
pub use update::run_app as run;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_cycles_both_ways() {
        assert_eq!(Column::Delete.next(), Column::Username);
        assert_eq!(Column::Username.prev(), Column::Delete);
        assert_eq!(Column::Email.next(), Column::AddAfter);
    }

    #[test]
    fn conf_pairs_skips_comments_and_blanks() {
        let pairs: Vec<_> = conf_pairs("# c\n\nkey = v = w\nempty =\n = x\nok=1").collect();
        assert_eq!(pairs, vec![("key", "v = w"), ("ok", "1")]);
    }

    #[test]
    fn teardown_bumps_epoch() {
        let mut app = AppState::with_config(Theme::dark(), Keymap::default());
        let before = app.epoch;
        app.teardown();
        assert_eq!(app.epoch, before + 1);
        assert!(app.seed_task.is_none());
    }
}
