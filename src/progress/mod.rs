//! Per-student word mastery tracking
//!
//! This module provides:
//! - The mastery record for each (student, word) pair
//! - The fixed-offset review policy (KNOWN: +3 days, UNKNOWN: +1 day)
//! - The review action that drives XP awards and the study log

pub mod models;
pub mod policy;
pub mod tracker;

pub use models::*;
pub use tracker::ProgressTracker;
