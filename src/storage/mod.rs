//! SQLite storage shared by every engine component.
//!
//! All state lives in a single database file. Each operation opens its own
//! connection, so nothing mutable is kept in-process between calls.

mod database;
mod schema;

pub use database::{Database, StorageError};

#[cfg(test)]
pub(crate) use database::open_temp;
