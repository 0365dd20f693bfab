pub mod auth;
pub mod clock;
pub mod config;
pub mod content;
pub mod engine;
pub mod error;
pub mod progress;
pub mod stats;
pub mod storage;
pub mod study_log;
pub mod users;
pub mod xp;

pub use engine::LearningEngine;
pub use error::{EngineError, Result};
