//! Form submissions and the per-field error report handed back to a form on failure.
//!
//! Validation is exhaustive: every rule of every field is evaluated and all
//! failures are collected, so a single round trip can report several problems.

use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;

/// Key under which errors that concern the whole form are reported.
pub const FORM_FIELD: &str = "_form";

/// Reported for an absent field, in place of zod's "Expected string, received null".
pub const REQUIRED_MESSAGE: &str = "Required";

/// Raw key/value input as received from a form post.
#[derive(Clone, Eq, PartialEq, Debug, Default, Deserialize)]
#[serde(transparent)]
pub struct Submission(HashMap<String, String>);

impl Submission {
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Submission {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash)]
pub enum Rule {
    MinChars(usize),
}

impl Rule {
    #[must_use]
    pub fn holds(self, value: &str) -> bool {
        match self {
            Rule::MinChars(min) => value.chars().count() >= min,
        }
    }

    #[must_use]
    pub fn message(self) -> String {
        match self {
            Rule::MinChars(min) => format!("String must contain at least {min} character(s)"),
        }
    }
}

/// Ordered rule list for one named field.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub struct FieldRules {
    pub name: &'static str,
    pub rules: &'static [Rule],
}

impl FieldRules {
    /// Runs every rule against the field and records each failure in `errors`.
    ///
    /// Returns the value only if the field is present and passed all rules.
    pub fn check(&self, submission: &Submission, errors: &mut FieldErrors) -> Option<String> {
        let Some(value) = submission.get(self.name) else {
            errors.push(self.name, REQUIRED_MESSAGE);
            return None;
        };

        let mut valid = true;
        for rule in self.rules {
            if !rule.holds(value) {
                errors.push(self.name, rule.message());
                valid = false;
            }
        }

        valid.then(|| value.to_owned())
    }
}

/// Field name to messages, in the order the messages were produced.
#[derive(Clone, Eq, PartialEq, Debug, Default, Hash)]
pub struct FieldErrors {
    entries: Vec<(String, Vec<String>)>,
}

impl FieldErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A report carrying a single whole-form message.
    #[must_use]
    pub fn form(message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.push(FORM_FIELD, message);
        errors
    }

    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        let message = message.into();
        match self.entries.iter_mut().find(|(name, _)| name == field) {
            Some((_, messages)) => messages.push(message),
            None => self.entries.push((field.to_owned(), vec![message])),
        }
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, messages)| messages.as_slice())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }
}

impl Serialize for FieldErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.entries.iter().map(|(name, messages)| (name, messages)))
    }
}

#[cfg(test)]
mod tests {
    use crate::form::{FORM_FIELD, FieldErrors, FieldRules, REQUIRED_MESSAGE, Rule, Submission};

    const NAME: FieldRules = FieldRules {
        name: "name",
        rules: &[Rule::MinChars(2)],
    };
    const STRICT: FieldRules = FieldRules {
        name: "strict",
        rules: &[Rule::MinChars(5), Rule::MinChars(8)],
    };

    #[test]
    fn passing_field_is_returned() {
        let submission = Submission::from_iter([("name", "abc")]);
        let mut errors = FieldErrors::new();

        assert_eq!(NAME.check(&submission, &mut errors).as_deref(), Some("abc"));
        assert!(errors.is_empty());
    }

    #[test]
    fn missing_field_is_required_only() {
        let submission = Submission::default();
        let mut errors = FieldErrors::new();

        assert_eq!(STRICT.check(&submission, &mut errors), None);
        assert_eq!(
            errors.get("strict"),
            Some([REQUIRED_MESSAGE.to_owned()].as_slice())
        );
    }

    #[test]
    fn every_failing_rule_is_reported_in_order() {
        let submission = Submission::from_iter([("strict", "four")]);
        let mut errors = FieldErrors::new();

        assert_eq!(STRICT.check(&submission, &mut errors), None);
        assert_eq!(
            errors.get("strict").unwrap(),
            [
                "String must contain at least 5 character(s)",
                "String must contain at least 8 character(s)",
            ]
        );
    }

    #[test]
    fn length_counts_chars_not_bytes() {
        assert!(Rule::MinChars(2).holds("éé"));
        assert!(!Rule::MinChars(3).holds("éé"));
    }

    #[test]
    fn serializes_in_insertion_order() {
        let mut errors = FieldErrors::new();
        errors.push("title", "first");
        errors.push("content", "second");
        errors.push("title", "third");
        errors.push(FORM_FIELD, "whole form");

        assert_eq!(
            serde_json::to_string(&errors).unwrap(),
            r#"{"title":["first","third"],"content":["second"],"_form":["whole form"]}"#
        );
        assert_eq!(
            errors.fields().collect::<Vec<_>>(),
            ["title", "content", FORM_FIELD]
        );
    }

    #[test]
    fn form_error_uses_reserved_key() {
        let errors = FieldErrors::form("Topic not found");
        assert_eq!(
            errors.get(FORM_FIELD),
            Some(["Topic not found".to_owned()].as_slice())
        );
        assert_eq!(errors.get("title"), None);
    }
}
