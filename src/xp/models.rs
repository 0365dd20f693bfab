//! Data models for XP and levels

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const XP_PER_LEVEL: u32 = 100;

/// Level reached with the given total XP: `xp / 100 + 1`
pub fn level_for_xp(xp: u32) -> u32 {
    xp / XP_PER_LEVEL + 1
}

/// XP still needed to reach the next level
pub fn xp_to_next_level(xp: u32) -> u32 {
    XP_PER_LEVEL - xp % XP_PER_LEVEL
}

/// A student's gamification state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentProfile {
    pub student_id: Uuid,
    pub level: u32,
    pub xp: u32,
    /// Words mastered on their first review
    pub total_words_learned: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StudentProfile {
    pub fn xp_to_next_level(&self) -> u32 {
        xp_to_next_level(self.xp)
    }
}

/// An immutable award record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XpEvent {
    pub id: i64,
    pub student_id: Uuid,
    pub points: i64,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}
