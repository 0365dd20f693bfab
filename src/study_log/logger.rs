use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

use super::models::*;
use crate::error::Result;

const LOG_COLUMNS: &str =
    "id, student_id, word_id, action, is_familiar, is_stranger, idempotency_key, created_at";

fn log_from_row(row: &Row) -> rusqlite::Result<StudyLog> {
    Ok(StudyLog {
        id: row.get(0)?,
        student_id: row.get(1)?,
        word_id: row.get(2)?,
        action: row.get(3)?,
        is_familiar: row.get(4)?,
        is_stranger: row.get(5)?,
        idempotency_key: row.get(6)?,
        created_at: row.get(7)?,
    })
}

pub struct StudyLogger<'c> {
    conn: &'c Connection,
}

impl<'c> StudyLogger<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// Append one entry for a review action.
    pub fn append(
        &self,
        student_id: Uuid,
        word_id: Uuid,
        action: StudyAction,
        idempotency_key: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<StudyLog> {
        self.conn.execute(
            "INSERT INTO study_logs (student_id, word_id, action, is_familiar, is_stranger, idempotency_key, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                student_id,
                word_id,
                action,
                action.is_familiar(),
                action.is_stranger(),
                idempotency_key,
                now,
            ],
        )?;

        Ok(StudyLog {
            id: self.conn.last_insert_rowid(),
            student_id,
            word_id,
            action,
            is_familiar: action.is_familiar(),
            is_stranger: action.is_stranger(),
            idempotency_key: idempotency_key.map(String::from),
            created_at: now,
        })
    }

    pub fn find_by_idempotency_key(&self, key: &str) -> Result<Option<StudyLog>> {
        let log = self
            .conn
            .query_row(
                &format!("SELECT {} FROM study_logs WHERE idempotency_key = ?1", LOG_COLUMNS),
                params![key],
                log_from_row,
            )
            .optional()?;
        Ok(log)
    }

    /// Most recent entries first.
    pub fn list_for_student(&self, student_id: Uuid, limit: usize) -> Result<Vec<StudyLog>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM study_logs WHERE student_id = ?1 \
             ORDER BY created_at DESC, id DESC LIMIT ?2",
            LOG_COLUMNS
        ))?;
        let logs = stmt
            .query_map(params![student_id, limit as i64], log_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(logs)
    }

    /// Counts per action and the latest activity time.
    pub fn summary(&self, student_id: Uuid) -> Result<ActivitySummary> {
        let summary = self.conn.query_row(
            "SELECT COUNT(*), \
                    COALESCE(SUM(action = 'mark_known'), 0), \
                    COALESCE(SUM(action = 'mark_unknown'), 0), \
                    MAX(created_at) \
             FROM study_logs WHERE student_id = ?1",
            params![student_id],
            |row| {
                Ok(ActivitySummary {
                    total_logs: row.get(0)?,
                    known_logs: row.get(1)?,
                    unknown_logs: row.get(2)?,
                    last_activity: row.get(3)?,
                })
            },
        )?;
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{ContentStore, NewWord};
    use crate::storage::open_temp;
    use crate::users::UserDirectory;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 2, 7, 30, 0).unwrap()
    }

    fn seed(conn: &Connection) -> (Uuid, Uuid) {
        let student = UserDirectory::new(conn).create_student("Lin", t0()).unwrap();
        let word = ContentStore::new(conn)
            .create_word(NewWord::new("tide"), t0())
            .unwrap();
        (student.id, word.id)
    }

    #[test]
    fn test_append_and_list_newest_first() {
        let (db, _temp) = open_temp();
        let conn = db.connect().unwrap();
        let (student, word) = seed(&conn);
        let logger = StudyLogger::new(&conn);

        let first = logger
            .append(student, word, StudyAction::MarkUnknown, None, t0())
            .unwrap();
        let second = logger
            .append(student, word, StudyAction::MarkKnown, None, t0() + Duration::minutes(1))
            .unwrap();

        assert!(first.is_stranger && !first.is_familiar);
        assert!(second.is_familiar && !second.is_stranger);

        let logs = logger.list_for_student(student, 10).unwrap();
        assert_eq!(logs, vec![second, first]);
        assert_eq!(logger.list_for_student(student, 1).unwrap().len(), 1);
    }

    #[test]
    fn test_summary_counts_actions() {
        let (db, _temp) = open_temp();
        let conn = db.connect().unwrap();
        let (student, word) = seed(&conn);
        let logger = StudyLogger::new(&conn);

        assert_eq!(logger.summary(student).unwrap(), ActivitySummary::default());

        logger.append(student, word, StudyAction::MarkKnown, None, t0()).unwrap();
        logger.append(student, word, StudyAction::MarkKnown, None, t0()).unwrap();
        let last = t0() + Duration::hours(3);
        logger.append(student, word, StudyAction::MarkUnknown, None, last).unwrap();

        let summary = logger.summary(student).unwrap();
        assert_eq!(summary.total_logs, 3);
        assert_eq!(summary.known_logs, 2);
        assert_eq!(summary.unknown_logs, 1);
        assert_eq!(summary.last_activity, Some(last));
    }

    #[test]
    fn test_idempotency_key_is_unique() {
        let (db, _temp) = open_temp();
        let conn = db.connect().unwrap();
        let (student, word) = seed(&conn);
        let logger = StudyLogger::new(&conn);

        logger
            .append(student, word, StudyAction::MarkKnown, Some("req-1"), t0())
            .unwrap();
        assert!(logger
            .append(student, word, StudyAction::MarkKnown, Some("req-1"), t0())
            .is_err());

        let found = logger.find_by_idempotency_key("req-1").unwrap().unwrap();
        assert_eq!(found.action, StudyAction::MarkKnown);
        assert!(logger.find_by_idempotency_key("req-2").unwrap().is_none());
    }
}
