//! Form subsystem
//!
//! Forms turn untyped input into a validated attribute set before anything
//! reaches the store.
//!
//! # Design Principles
//!
//! - Extraction never yields an absent value (missing fields are `""`)
//! - Validation collects field-keyed messages instead of failing
//! - A form is valid iff its error map is empty
//! - Forms are never persisted

mod errors;
mod post_form;
mod source;

pub use errors::{FieldErrors, BLANK};
pub use post_form::{PostForm, BODY, DESCRIPTION, TITLE};
pub use source::FormSource;
