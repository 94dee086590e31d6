//! Outcome of a validated mutation
//!
//! Every create/update goes through [`process_form`]: build the form,
//! validate it, and only call the persistence step when it is valid. An
//! invalid form comes back inside [`ResultStatus::Failure`]; it is never an
//! `Err`. Only persistence failures are errors.

mod pipeline;

pub use pipeline::process_form;

use crate::form::{FieldErrors, PostForm};

/// Success, or a validation failure carrying the rejected form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultStatus {
    /// Input was valid and has been persisted
    Success,
    /// Input was invalid; nothing was persisted
    Failure(PostForm),
}

impl ResultStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, ResultStatus::Success)
    }

    /// The rejected form, for re-rendering with inline errors
    pub fn form(&self) -> Option<&PostForm> {
        match self {
            ResultStatus::Success => None,
            ResultStatus::Failure(form) => Some(form),
        }
    }

    /// Field errors of the rejected form
    pub fn errors(&self) -> Option<&FieldErrors> {
        self.form().map(PostForm::errors)
    }

    pub fn into_form(self) -> Option<PostForm> {
        match self {
            ResultStatus::Success => None,
            ResultStatus::Failure(form) => Some(form),
        }
    }
}
