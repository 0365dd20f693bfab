use chrono::{DateTime, Utc};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StudyAction {
    MarkKnown,
    MarkUnknown,
}

impl StudyAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MarkKnown => "mark_known",
            Self::MarkUnknown => "mark_unknown",
        }
    }

    /// Whether the student considered the word familiar
    pub fn is_familiar(&self) -> bool {
        matches!(self, Self::MarkKnown)
    }

    /// Whether the action flags the word as a stranger
    pub fn is_stranger(&self) -> bool {
        matches!(self, Self::MarkUnknown)
    }
}

impl ToSql for StudyAction {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for StudyAction {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "mark_known" => Ok(Self::MarkKnown),
            "mark_unknown" => Ok(Self::MarkUnknown),
            other => Err(FromSqlError::Other(
                format!("unknown study action: {}", other).into(),
            )),
        }
    }
}

/// One recorded review action. Never updated or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyLog {
    pub id: i64,
    pub student_id: Uuid,
    pub word_id: Uuid,
    pub action: StudyAction,
    pub is_familiar: bool,
    pub is_stranger: bool,
    /// Caller-supplied key used to recognise a replayed submission
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idempotency_key: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Log counts for one student
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivitySummary {
    pub total_logs: u32,
    pub known_logs: u32,
    pub unknown_logs: u32,
    pub last_activity: Option<DateTime<Utc>>,
}
