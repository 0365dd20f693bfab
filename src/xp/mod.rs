//! Experience points and levels.
//!
//! Level is always derived from total XP (100 XP per level); it is never
//! stored independently of the XP it came from.

pub mod ledger;
pub mod models;

pub use ledger::XpLedger;
pub use models::*;
