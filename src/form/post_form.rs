//! Post form: extraction and validation of create/update input
//!
//! Validation rules:
//! - `title` must be non-empty after extraction
//!
//! Whitespace is not trimmed, so a title of only spaces passes. No other
//! field is validated.

use super::errors::{FieldErrors, BLANK};
use super::source::FormSource;
use crate::post::PostAttributes;

pub const TITLE: &str = "title";
pub const DESCRIPTION: &str = "description";
pub const BODY: &str = "body";

/// Transient holder of extracted post fields and their validation errors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostForm {
    title: String,
    description: String,
    body: String,
    errors: FieldErrors,
}

impl PostForm {
    /// Extracts `title`, `description` and `body` from `source`.
    ///
    /// Missing fields become empty strings. The new form carries no errors
    /// until [`validate`](Self::validate) runs.
    pub fn new<S: FormSource + ?Sized>(source: &S) -> Self {
        Self {
            title: source.extract(TITLE),
            description: source.extract(DESCRIPTION),
            body: source.extract(BODY),
            errors: FieldErrors::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Runs the validation rules, recording failures in the error map.
    /// Running it again yields the same errors.
    pub fn validate(&mut self) {
        if self.title.is_empty() {
            self.errors.set(TITLE, vec![BLANK.to_string()]);
        }
    }

    /// True iff the error map is empty.
    pub fn valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// The extracted fields only, without errors.
    pub fn to_attributes(&self) -> PostAttributes {
        PostAttributes {
            title: self.title.clone(),
            description: self.description.clone(),
            body: self.body.clone(),
        }
    }
}

impl FormSource for PostForm {
    fn attribute(&self, name: &str) -> Option<String> {
        match name {
            TITLE => Some(self.title.clone()),
            DESCRIPTION => Some(self.description.clone()),
            BODY => Some(self.body.clone()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_blank_form() {
        let form = PostForm::default();
        assert_eq!(form.title(), "");
        assert_eq!(form.description(), "");
        assert_eq!(form.body(), "");
        assert!(form.valid());
    }

    #[test]
    fn test_extracts_fields() {
        let form = PostForm::new(&params(&[
            ("title", "Hello"),
            ("description", "D"),
            ("body", "B"),
            ("ignored", "x"),
        ]));
        assert_eq!(form.title(), "Hello");
        assert_eq!(form.description(), "D");
        assert_eq!(form.body(), "B");
    }

    #[test]
    fn test_missing_fields_extract_as_empty() {
        let form = PostForm::new(&params(&[("title", "Only")]));
        assert_eq!(form.description(), "");
        assert_eq!(form.body(), "");
    }

    #[test]
    fn test_not_validated_until_asked() {
        let form = PostForm::new(&params(&[]));
        assert!(form.valid());
    }

    #[test]
    fn test_missing_title_is_blank() {
        let mut form = PostForm::new(&params(&[("body", "text")]));
        form.validate();
        assert!(!form.valid());
        assert_eq!(
            form.errors().get("title"),
            Some(&["can't be blank".to_string()][..])
        );
    }

    #[test]
    fn test_empty_title_is_blank() {
        let mut form = PostForm::new(&params(&[("title", "")]));
        form.validate();
        assert!(!form.valid());
        assert_eq!(form.errors().full_messages(), vec!["title can't be blank"]);
    }

    #[test]
    fn test_whitespace_title_is_accepted() {
        let mut form = PostForm::new(&params(&[("title", "   ")]));
        form.validate();
        assert!(form.valid());
        assert_eq!(form.title(), "   ");
    }

    #[test]
    fn test_validate_is_idempotent() {
        let mut form = PostForm::new(&params(&[]));
        form.validate();
        let first = form.errors().clone();
        form.validate();
        assert_eq!(form.errors(), &first);
        assert_eq!(form.errors().get("title").unwrap().len(), 1);
    }

    #[test]
    fn test_to_attributes_excludes_errors() {
        let mut form = PostForm::new(&params(&[("description", "D")]));
        form.validate();
        let attrs = form.to_attributes();
        assert_eq!(attrs, PostAttributes::new("").with_description("D"));
    }

    #[test]
    fn test_form_from_form_keeps_fields_drops_errors() {
        let mut form = PostForm::new(&params(&[("body", "B")]));
        form.validate();
        let copy = PostForm::new(&form);
        assert_eq!(copy.body(), "B");
        assert!(copy.valid());
    }
}
