//! Words and word-sets curated by the teacher.
//!
//! The progress engine only reads from here.

pub mod models;
pub mod store;

pub use models::*;
pub use store::ContentStore;
