//! Row list operations over the field registry.
//!
//! `FormState` keeps the display order as a sequence of [`RowId`]s and stores
//! everything else in its [`FieldRegistry`]. Positions are resolved to ids at
//! the start of every operation, so inserting or deleting a row never moves
//! another row's values or validation results.
//!
use tracing::debug;

use super::registry::FieldRegistry;
use super::rules::FieldError;
use super::{Field, FormValues, RowId, UserRecord};
use crate::error::{Result, index_error};

#[derive(Clone, Debug, Default)]
pub struct FormState {
    order: Vec<RowId>,
    registry: FieldRegistry,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a form from records, in order.
    pub fn from_records(records: impl IntoIterator<Item = UserRecord>) -> Self {
        let mut state = Self::new();
        state.replace_all(records);
        state
    }

    /// Replace every row; all rows get fresh identities.
    pub fn replace_all(&mut self, records: impl IntoIterator<Item = UserRecord>) {
        self.order.clear();
        self.registry.clear();
        for record in records {
            self.push_row(self.order.len(), record);
        }
        debug!(rows = self.order.len(), "replaced row list");
        self.check_invariant();
    }

    /// Prepend an empty row.
    pub fn insert_front(&mut self) -> RowId {
        let id = self.push_row(0, UserRecord::default());
        debug!(%id, rows = self.order.len(), "inserted row at front");
        self.check_invariant();
        id
    }

    /// Insert an empty row right after position `index`.
    pub fn insert_after(&mut self, index: usize) -> Result<RowId> {
        if index >= self.order.len() {
            return Err(index_error(index, self.order.len()));
        }
        let id = self.push_row(index + 1, UserRecord::default());
        debug!(%id, position = index + 1, rows = self.order.len(), "inserted row");
        self.check_invariant();
        Ok(id)
    }

    /// Remove the row at `index` along with its registered fields.
    pub fn delete(&mut self, index: usize) -> Result<UserRecord> {
        if index >= self.order.len() {
            return Err(index_error(index, self.order.len()));
        }
        let id = self.order.remove(index);
        let removed = self.registry.record(id).unwrap_or_default();
        self.registry.unregister_row(id);
        debug!(%id, position = index, rows = self.order.len(), "deleted row");
        self.check_invariant();
        Ok(removed)
    }

    /// Set one field of the row at `index` and revalidate it.
    pub fn edit(&mut self, index: usize, field: Field, value: impl Into<String>) -> Result<()> {
        let id = self
            .row_id(index)
            .ok_or_else(|| index_error(index, self.order.len()))?;
        self.registry.set_value(id, field, value.into());
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn row_id(&self, index: usize) -> Option<RowId> {
        self.order.get(index).copied()
    }

    pub fn index_of(&self, id: RowId) -> Option<usize> {
        self.order.iter().position(|r| *r == id)
    }

    pub fn value(&self, index: usize, field: Field) -> Option<&str> {
        let id = self.row_id(index)?;
        self.registry.slot(id, field).map(|s| s.value())
    }

    pub fn error(&self, index: usize, field: Field) -> Option<FieldError> {
        let id = self.row_id(index)?;
        self.registry.slot(id, field).and_then(|s| s.error())
    }

    pub fn record(&self, index: usize) -> Option<UserRecord> {
        self.registry.record(self.row_id(index)?)
    }

    /// All records in display order.
    pub fn records(&self) -> Vec<UserRecord> {
        self.order
            .iter()
            .filter_map(|id| self.registry.record(*id))
            .collect()
    }

    pub fn is_valid(&self) -> bool {
        self.registry.is_valid()
    }

    pub fn invalid_count(&self) -> usize {
        self.registry.invalid_count()
    }

    /// Submit payload derived from the registry.
    pub fn values(&self) -> FormValues {
        FormValues {
            users: self.records(),
        }
    }

    pub fn registry(&self) -> &FieldRegistry {
        &self.registry
    }

    fn push_row(&mut self, position: usize, record: UserRecord) -> RowId {
        let id = RowId::new();
        self.registry.register_row(id, record);
        self.order.insert(position, id);
        id
    }

    fn check_invariant(&self) {
        debug_assert_eq!(
            self.registry.len(),
            self.order.len() * Field::ALL.len(),
            "every row must own exactly one slot per field"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(u: &str, e: &str) -> UserRecord {
        UserRecord::new(u, e)
    }

    fn seeded() -> FormState {
        FormState::from_records(vec![
            rec("alice", "a@x.com"),
            rec("bob", "bob@y.com"),
            rec("carol", "carol@z.org"),
        ])
    }

    #[test]
    fn insert_front_places_empty_row_first() {
        let mut form = seeded();
        form.insert_front();
        assert_eq!(form.len(), 4);
        assert_eq!(form.record(0), Some(UserRecord::default()));
        assert_eq!(form.record(1), Some(rec("alice", "a@x.com")));
    }

    #[test]
    fn insert_after_shifts_later_rows() {
        let mut form = seeded();
        form.insert_after(0).unwrap();
        assert_eq!(
            form.records(),
            vec![
                rec("alice", "a@x.com"),
                UserRecord::default(),
                rec("bob", "bob@y.com"),
                rec("carol", "carol@z.org"),
            ]
        );
    }

    #[test]
    fn insert_after_last_appends() {
        let mut form = seeded();
        form.insert_after(2).unwrap();
        assert_eq!(form.record(3), Some(UserRecord::default()));
    }

    #[test]
    fn insert_after_out_of_range_is_error() {
        let mut form = FormState::new();
        assert!(form.insert_after(0).is_err());
        assert!(form.is_empty());
    }

    #[test]
    fn delete_removes_exactly_one_row() {
        let mut form = seeded();
        let removed = form.delete(1).unwrap();
        assert_eq!(removed, rec("bob", "bob@y.com"));
        assert_eq!(
            form.records(),
            vec![rec("alice", "a@x.com"), rec("carol", "carol@z.org")]
        );
        assert_eq!(form.registry().len(), 4);
    }

    #[test]
    fn deleting_only_row_yields_empty_list() {
        let mut form = FormState::from_records(vec![rec("alice", "a@x.com")]);
        form.delete(0).unwrap();
        assert!(form.is_empty());
        assert!(form.registry().is_empty());
        assert!(form.delete(0).is_err());
    }

    #[test]
    fn new_row_is_invalid_until_filled() {
        let mut form = FormState::from_records(vec![rec("alice", "a@x.com")]);
        assert!(form.is_valid());
        form.insert_after(0).unwrap();
        assert_eq!(form.records(), vec![rec("alice", "a@x.com"), UserRecord::default()]);
        assert_eq!(form.error(1, Field::Username), Some(FieldError::Required));
        assert_eq!(form.error(1, Field::Email), Some(FieldError::Required));
        assert!(!form.is_valid());

        form.edit(1, Field::Username, "dave").unwrap();
        assert!(!form.is_valid());
        form.edit(1, Field::Email, "dave@w.net").unwrap();
        assert!(form.is_valid());
    }

    #[test]
    fn edit_revalidates_immediately() {
        let mut form = seeded();
        form.edit(0, Field::Email, "a@b").unwrap();
        assert_eq!(form.error(0, Field::Email), Some(FieldError::Pattern));
        assert!(!form.is_valid());
        form.edit(0, Field::Email, "a@b.co").unwrap();
        assert_eq!(form.error(0, Field::Email), None);
        assert!(form.edit(9, Field::Email, "x").is_err());
    }

    #[test]
    fn edits_follow_row_identity_across_inserts_and_deletes() {
        let mut form = seeded();
        form.edit(2, Field::Username, "").unwrap();
        let carol = form.row_id(2).unwrap();

        form.insert_front();
        form.insert_after(0).unwrap();
        form.delete(2).unwrap();

        let idx = form.index_of(carol).unwrap();
        assert_eq!(idx, 3);
        assert_eq!(form.value(idx, Field::Username), Some(""));
        assert_eq!(form.error(idx, Field::Username), Some(FieldError::Required));
        assert_eq!(form.value(idx, Field::Email), Some("carol@z.org"));
    }

    #[test]
    fn length_tracks_inserts_minus_deletes() {
        let mut form = seeded();
        let mut expected = form.len();
        // Fixed pseudo-random walk over the three structural operations.
        let mut x: u32 = 7;
        for _ in 0..200 {
            x = x.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            match (x >> 16) % 3 {
                0 => {
                    form.insert_front();
                    expected += 1;
                }
                1 if !form.is_empty() => {
                    let i = (x as usize) % form.len();
                    form.insert_after(i).unwrap();
                    expected += 1;
                }
                _ if !form.is_empty() => {
                    let i = (x as usize) % form.len();
                    form.delete(i).unwrap();
                    expected -= 1;
                }
                _ => {}
            }
            assert_eq!(form.len(), expected);
            assert_eq!(form.registry().len(), 2 * expected);
        }
    }

    #[test]
    fn values_follow_display_order() {
        let mut form = seeded();
        form.delete(0).unwrap();
        form.insert_front();
        form.edit(0, Field::Username, "zed").unwrap();
        form.edit(0, Field::Email, "zed@q.io").unwrap();
        let values = form.values();
        assert_eq!(values.users[0], rec("zed", "zed@q.io"));
        assert_eq!(values.users.len(), 3);
    }
}
