//! Post records
//!
//! A [`Post`] is immutable once built; updates produce a new post by laying
//! a [`PostPatch`] over the stored one.

mod attributes;
mod record;

pub use attributes::{PostAttributes, PostPatch};
pub use record::Post;
