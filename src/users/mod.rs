//! Students and teachers.
//!
//! The engine is addressed by explicit student id; resolving "who is the
//! current student" is the caller's job and lives here.

pub mod directory;
pub mod models;

pub use directory::UserDirectory;
pub use models::*;
