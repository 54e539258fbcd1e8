//! Validation rules for username and email fields.

use regex::Regex;
use std::fmt::{Display, Formatter};
use std::sync::LazyLock;

use super::Field;

/// Local part, `@`, domain, a literal dot, then 2+ chars excluding `@`, space and dot.
pub const EMAIL_PATTERN: &str = r"^[^@ ]+@[^@ ]+\.[^@ .]{2,}$";

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(EMAIL_PATTERN).expect("email pattern is a valid regex"));

/// Why a field currently fails its rule.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FieldError {
    Required,
    Pattern,
}

impl Display for FieldError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldError::Required => write!(f, "value is required"),
            FieldError::Pattern => write!(f, "value does not match the expected format"),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ValidationRule {
    pub required: bool,
    pub pattern: Option<Regex>,
}

impl ValidationRule {
    /// The rule registered for `field` on every row.
    pub fn for_field(field: Field) -> Self {
        match field {
            Field::Username => Self {
                required: true,
                pattern: None,
            },
            Field::Email => Self {
                required: true,
                pattern: Some(EMAIL_RE.clone()),
            },
        }
    }

    /// Evaluate the rule; `None` means the value passes.
    ///
    /// An empty value is only checked for required-ness, never against the pattern.
    pub fn check(&self, value: &str) -> Option<FieldError> {
        if value.is_empty() {
            return self.required.then_some(FieldError::Required);
        }
        match &self.pattern {
            Some(re) if !re.is_match(value) => Some(FieldError::Pattern),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email(v: &str) -> Option<FieldError> {
        ValidationRule::for_field(Field::Email).check(v)
    }

    #[test]
    fn username_invalid_only_when_empty() {
        let rule = ValidationRule::for_field(Field::Username);
        assert_eq!(rule.check(""), Some(FieldError::Required));
        assert_eq!(rule.check(" "), None);
        assert_eq!(rule.check("alice"), None);
    }

    #[test]
    fn email_pattern_cases() {
        assert_eq!(email("a@b.co"), None);
        assert_eq!(email("a@b"), Some(FieldError::Pattern));
        assert_eq!(email("a b@c.de"), Some(FieldError::Pattern));
        assert_eq!(email("@b.co"), Some(FieldError::Pattern));
        assert_eq!(email(""), Some(FieldError::Required));
    }

    #[test]
    fn email_tld_needs_two_chars_without_dots() {
        assert_eq!(email("a@b.c"), Some(FieldError::Pattern));
        assert_eq!(email("a@b.c.d"), Some(FieldError::Pattern));
        assert_eq!(email("a@b.c.de"), None);
        assert_eq!(email("a@@b.co"), Some(FieldError::Pattern));
        assert_eq!(email("Sincere@april.biz"), None);
    }

    #[test]
    fn optional_rule_accepts_empty() {
        let rule = ValidationRule::default();
        assert_eq!(rule.check(""), None);
    }

    #[test]
    fn error_messages_are_per_field() {
        assert_eq!(Field::Username.error_message(), "Username is required");
        assert_eq!(Field::Email.error_message(), "Valid email is required");
    }
}
