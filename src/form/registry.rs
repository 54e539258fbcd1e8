//! Field registry: the single store of per-field values, rules and validity.

use std::collections::HashMap;

use super::rules::{FieldError, ValidationRule};
use super::{Field, RowId, UserRecord};

/// Value, rule and current validation result of one field.
#[derive(Clone, Debug)]
pub struct FieldSlot {
    value: String,
    rule: ValidationRule,
    error: Option<FieldError>,
}

impl FieldSlot {
    fn new(rule: ValidationRule, value: String) -> Self {
        let error = rule.check(&value);
        Self { value, rule, error }
    }

    fn set(&mut self, value: String) {
        self.error = self.rule.check(&value);
        self.value = value;
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn error(&self) -> Option<FieldError> {
        self.error
    }

    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Clone, Debug, Default)]
pub struct FieldRegistry {
    slots: HashMap<(RowId, Field), FieldSlot>,
}

impl FieldRegistry {
    /// Register both fields of a row, validating the initial values.
    pub fn register_row(&mut self, id: RowId, record: UserRecord) {
        let UserRecord { username, email } = record;
        self.slots.insert(
            (id, Field::Username),
            FieldSlot::new(ValidationRule::for_field(Field::Username), username),
        );
        self.slots.insert(
            (id, Field::Email),
            FieldSlot::new(ValidationRule::for_field(Field::Email), email),
        );
    }

    pub fn unregister_row(&mut self, id: RowId) {
        for field in Field::ALL {
            self.slots.remove(&(id, field));
        }
    }

    /// Replace a field value and revalidate it. Returns `None` if the row is not registered.
    pub fn set_value(&mut self, id: RowId, field: Field, value: String) -> Option<&FieldSlot> {
        let slot = self.slots.get_mut(&(id, field))?;
        slot.set(value);
        Some(slot)
    }

    pub fn slot(&self, id: RowId, field: Field) -> Option<&FieldSlot> {
        self.slots.get(&(id, field))
    }

    /// Rebuild the record of a registered row.
    pub fn record(&self, id: RowId) -> Option<UserRecord> {
        let username = self.slot(id, Field::Username)?.value().to_string();
        let email = self.slot(id, Field::Email)?.value().to_string();
        Some(UserRecord { username, email })
    }

    /// Logical AND across every registered field.
    pub fn is_valid(&self) -> bool {
        self.slots.values().all(FieldSlot::is_valid)
    }

    pub fn invalid_count(&self) -> usize {
        self.slots.values().filter(|s| !s.is_valid()).count()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_validates_initial_values() {
        let mut reg = FieldRegistry::default();
        let id = RowId::new();
        reg.register_row(id, UserRecord::new("alice", "nope"));
        assert!(reg.slot(id, Field::Username).unwrap().is_valid());
        assert_eq!(
            reg.slot(id, Field::Email).unwrap().error(),
            Some(FieldError::Pattern)
        );
        assert!(!reg.is_valid());
        assert_eq!(reg.invalid_count(), 1);
    }

    #[test]
    fn set_value_revalidates_changed_field() {
        let mut reg = FieldRegistry::default();
        let id = RowId::new();
        reg.register_row(id, UserRecord::default());
        assert_eq!(reg.invalid_count(), 2);

        let slot = reg.set_value(id, Field::Email, "a@b.co".into()).unwrap();
        assert!(slot.is_valid());
        assert_eq!(reg.invalid_count(), 1);
    }

    #[test]
    fn unregister_drops_both_slots() {
        let mut reg = FieldRegistry::default();
        let a = RowId::new();
        let b = RowId::new();
        reg.register_row(a, UserRecord::default());
        reg.register_row(b, UserRecord::new("bob", "bob@y.com"));
        reg.unregister_row(a);
        assert_eq!(reg.len(), 2);
        assert!(reg.is_valid());
        assert!(reg.set_value(a, Field::Username, "x".into()).is_none());
        assert_eq!(reg.record(b), Some(UserRecord::new("bob", "bob@y.com")));
    }

    #[test]
    fn empty_registry_is_valid() {
        assert!(FieldRegistry::default().is_valid());
    }
}
