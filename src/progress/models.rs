//! Data models for word progress

use chrono::{DateTime, Utc};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::study_log::StudyAction;

/// Mastery status of a word for a student. Absence of a record means no history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WordStatus {
    Learning,
    Mastered,
}

impl WordStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Learning => "LEARNING",
            Self::Mastered => "MASTERED",
        }
    }
}

impl ToSql for WordStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for WordStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "LEARNING" => Ok(Self::Learning),
            "MASTERED" => Ok(Self::Mastered),
            other => Err(FromSqlError::Other(
                format!("unknown word status: {}", other).into(),
            )),
        }
    }
}

/// What the student answered for a word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReviewOutcome {
    /// "I know this word"
    Known,
    /// "I don't know this word"
    Unknown,
}

impl ReviewOutcome {
    /// XP granted for the review
    pub fn xp_points(&self) -> i64 {
        match self {
            Self::Known => 10,
            Self::Unknown => 2,
        }
    }

    /// Reason recorded on the XP event
    pub fn xp_reason(&self) -> &'static str {
        match self {
            Self::Known => "mark_known_word",
            Self::Unknown => "mark_unknown_word",
        }
    }

    pub fn study_action(&self) -> StudyAction {
        match self {
            Self::Known => StudyAction::MarkKnown,
            Self::Unknown => StudyAction::MarkUnknown,
        }
    }
}

/// One student's relationship to one word
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentWordProgress {
    pub id: Uuid,
    pub student_id: Uuid,
    pub word_id: Uuid,
    pub status: WordStatus,
    /// Flagged for extra review; set together with `status`
    pub is_stranger: bool,
    /// 0-100
    pub familiarity_score: u8,
    pub correct_count: u32,
    pub wrong_count: u32,
    pub dont_know_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_reviewed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_review_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StudentWordProgress {
    /// Check if the word is due for review
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_review_at.map_or(false, |due| due <= now)
    }
}
