//! aeroblog - a strict, transactional blog-post core
//!
//! Validates post input through forms and persists posts in a
//! single-file transactional store. Routing, templating and rendering
//! belong to the caller.

pub mod blog;
pub mod form;
pub mod post;
pub mod status;
pub mod store;

pub use form::{FieldErrors, FormSource, PostForm};
pub use post::{Post, PostAttributes, PostPatch};
pub use status::ResultStatus;
pub use store::{PostStore, StoreConfig, StoreError, StoreResult};
