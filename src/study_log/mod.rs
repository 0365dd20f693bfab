//! Append-only audit trail of review actions.

pub mod logger;
pub mod models;

pub use logger::StudyLogger;
pub use models::*;
