//! Form model for the user rows editor.
//!
//! The form is an ordered list of rows. Each row owns a stable [`RowId`]
//! generated at creation time; every per-field value, rule and validation
//! result lives in one [`registry::FieldRegistry`] keyed by `(RowId, Field)`.
//! Display order comes from [`state::FormState`]'s row sequence only.
//!
pub mod registry;
pub mod rules;
pub mod state;

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub use rules::{FieldError, ValidationRule};
pub use state::FormState;

/// One user record as shown in a form row.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub username: String,
    pub email: String,
}

impl UserRecord {
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
        }
    }

    /// Borrow the value of one field.
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Username => &self.username,
            Field::Email => &self.email,
        }
    }
}

/// Editable fields of a row.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Username,
    Email,
}

impl Field {
    pub const ALL: [Field; 2] = [Field::Username, Field::Email];

    pub fn name(self) -> &'static str {
        match self {
            Field::Username => "username",
            Field::Email => "email",
        }
    }

    /// Inline message shown under the input whenever its rule fails,
    /// whether the value is missing or malformed.
    pub fn error_message(self) -> &'static str {
        match self {
            Field::Username => "Username is required",
            Field::Email => "Valid email is required",
        }
    }
}

/// Stable row identity, independent of the row's display position.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct RowId(Uuid);

impl RowId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RowId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for RowId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Values handed to the submit handler, in display order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FormValues {
    pub users: Vec<UserRecord>,
}
