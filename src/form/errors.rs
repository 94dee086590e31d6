//! Field-keyed validation messages

use std::collections::BTreeMap;
use std::fmt;

/// Message attached to a required field that extracted as empty
pub const BLANK: &str = "can't be blank";

/// Validation messages keyed by field name.
///
/// Empty means the form is valid. Fields iterate in name order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    by_field: BTreeMap<String, Vec<String>>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the messages for `field`.
    pub fn set(&mut self, field: impl Into<String>, messages: Vec<String>) {
        self.by_field.insert(field.into(), messages);
    }

    /// Messages for `field`, if it has any.
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.by_field.get(field).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.by_field.is_empty()
    }

    /// Iterates `(field, messages)` in field-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.by_field
            .iter()
            .map(|(field, messages)| (field.as_str(), messages.as_slice()))
    }

    /// `"<field> <message>"` for every message, e.g. `"title can't be blank"`.
    pub fn full_messages(&self) -> Vec<String> {
        self.iter()
            .flat_map(|(field, messages)| {
                messages
                    .iter()
                    .map(move |message| format!("{} {}", field, message))
            })
            .collect()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.full_messages().join(", "))
    }
}
