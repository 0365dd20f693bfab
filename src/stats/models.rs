use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Learning activity rollup for one student, computed on request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentStats {
    pub student_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    /// All review actions ever logged
    pub total_logs: u32,
    pub known_logs: u32,
    pub unknown_logs: u32,
    /// Words currently MASTERED
    pub mastered_words: u32,
    /// Words currently flagged as strangers
    pub stranger_words: u32,
    /// Time of the latest review action
    pub last_activity: Option<DateTime<Utc>>,
    /// `None` until the student has a profile
    pub level: Option<u32>,
    pub xp: Option<u32>,
}
