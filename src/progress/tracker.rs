//! Storage and orchestration for word progress
//!
//! `review_word` is the only writer of mastery records. It applies the policy,
//! then awards XP, then appends to the study log, in that order, all on the
//! connection it was given. Callers pass a transaction so the four effects
//! commit or roll back together.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

use super::models::*;
use super::policy::apply_review;
use crate::content::ContentStore;
use crate::error::{EngineError, Result};
use crate::study_log::StudyLogger;
use crate::users::UserDirectory;
use crate::xp::XpLedger;

const PROGRESS_COLUMNS: &str = "id, student_id, word_id, status, is_stranger, familiarity_score, \
                                correct_count, wrong_count, dont_know_count, last_reviewed_at, \
                                next_review_at, created_at, updated_at";

fn progress_from_row(row: &Row) -> rusqlite::Result<StudentWordProgress> {
    Ok(StudentWordProgress {
        id: row.get(0)?,
        student_id: row.get(1)?,
        word_id: row.get(2)?,
        status: row.get(3)?,
        is_stranger: row.get(4)?,
        familiarity_score: row.get(5)?,
        correct_count: row.get(6)?,
        wrong_count: row.get(7)?,
        dont_know_count: row.get(8)?,
        last_reviewed_at: row.get(9)?,
        next_review_at: row.get(10)?,
        created_at: row.get(11)?,
        updated_at: row.get(12)?,
    })
}

pub struct ProgressTracker<'c> {
    conn: &'c Connection,
}

impl<'c> ProgressTracker<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// Record a review and apply its side effects.
    ///
    /// Fails with `NotFound` before touching anything when the student or
    /// word does not exist.
    pub fn review_word(
        &self,
        student_id: Uuid,
        word_id: Uuid,
        outcome: ReviewOutcome,
        idempotency_key: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<StudentWordProgress> {
        UserDirectory::new(self.conn).require_student(student_id)?;
        if ContentStore::new(self.conn).get_word(word_id)?.is_none() {
            return Err(EngineError::NotFound(format!("Word {}", word_id)));
        }

        let existing = self.get_progress(student_id, word_id)?;
        let transition = apply_review(existing.as_ref(), student_id, word_id, outcome, now);
        self.save(&transition.progress)?;

        let ledger = XpLedger::new(self.conn);
        if transition.first_mastery {
            ledger.increment_words_learned(student_id, now)?;
        }
        ledger.award(student_id, outcome.xp_points(), outcome.xp_reason(), now)?;

        StudyLogger::new(self.conn).append(
            student_id,
            word_id,
            outcome.study_action(),
            idempotency_key,
            now,
        )?;

        log::debug!(
            "Student {} reviewed word {}: {:?} -> {:?} (familiarity {})",
            student_id,
            word_id,
            outcome,
            transition.progress.status,
            transition.progress.familiarity_score
        );

        Ok(transition.progress)
    }

    /// The record for a pair, or `None` when the word was never reviewed
    pub fn get_progress(
        &self,
        student_id: Uuid,
        word_id: Uuid,
    ) -> Result<Option<StudentWordProgress>> {
        let progress = self
            .conn
            .query_row(
                &format!(
                    "SELECT {} FROM student_word_progress WHERE student_id = ?1 AND word_id = ?2",
                    PROGRESS_COLUMNS
                ),
                params![student_id, word_id],
                progress_from_row,
            )
            .optional()?;
        Ok(progress)
    }

    fn save(&self, progress: &StudentWordProgress) -> Result<()> {
        self.conn.execute(
            &format!(
                "INSERT INTO student_word_progress ({}) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13) \
                 ON CONFLICT (student_id, word_id) DO UPDATE SET \
                    status = excluded.status, \
                    is_stranger = excluded.is_stranger, \
                    familiarity_score = excluded.familiarity_score, \
                    correct_count = excluded.correct_count, \
                    wrong_count = excluded.wrong_count, \
                    dont_know_count = excluded.dont_know_count, \
                    last_reviewed_at = excluded.last_reviewed_at, \
                    next_review_at = excluded.next_review_at, \
                    updated_at = excluded.updated_at",
                PROGRESS_COLUMNS
            ),
            params![
                progress.id,
                progress.student_id,
                progress.word_id,
                progress.status,
                progress.is_stranger,
                progress.familiarity_score,
                progress.correct_count,
                progress.wrong_count,
                progress.dont_know_count,
                progress.last_reviewed_at,
                progress.next_review_at,
                progress.created_at,
                progress.updated_at,
            ],
        )?;
        Ok(())
    }

    /// Words flagged as strangers, most recently updated first
    pub fn list_stranger_words(&self, student_id: Uuid) -> Result<Vec<StudentWordProgress>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM student_word_progress \
             WHERE student_id = ?1 AND is_stranger = 1 \
             ORDER BY updated_at DESC, rowid DESC",
            PROGRESS_COLUMNS
        ))?;
        let records = stmt
            .query_map(params![student_id], progress_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(records)
    }

    /// Records due at `now`, longest overdue first
    pub fn list_due_words(
        &self,
        student_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Vec<StudentWordProgress>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM student_word_progress \
             WHERE student_id = ?1 AND next_review_at IS NOT NULL AND next_review_at <= ?2 \
             ORDER BY next_review_at ASC, rowid ASC",
            PROGRESS_COLUMNS
        ))?;
        let records = stmt
            .query_map(params![student_id, now], progress_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(records)
    }

    pub fn count_mastered(&self, student_id: Uuid) -> Result<u32> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM student_word_progress WHERE student_id = ?1 AND status = ?2",
            params![student_id, WordStatus::Mastered],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    pub fn count_strangers(&self, student_id: Uuid) -> Result<u32> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM student_word_progress WHERE student_id = ?1 AND is_stranger = 1",
            params![student_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::NewWord;
    use crate::storage::open_temp;
    use crate::study_log::StudyAction;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 7, 1, 9, 0, 0).unwrap()
    }

    fn seed(conn: &Connection, words: &[&str]) -> (Uuid, Vec<Uuid>) {
        let student = UserDirectory::new(conn).create_student("Kai", t0()).unwrap();
        let store = ContentStore::new(conn);
        let ids = words
            .iter()
            .map(|w| store.create_word(NewWord::new(*w), t0()).unwrap().id)
            .collect();
        (student.id, ids)
    }

    #[test]
    fn test_review_applies_all_effects() {
        let (db, _temp) = open_temp();
        let conn = db.connect().unwrap();
        let (student, words) = seed(&conn, &["ember"]);
        let tracker = ProgressTracker::new(&conn);

        let progress = tracker
            .review_word(student, words[0], ReviewOutcome::Known, None, t0())
            .unwrap();
        assert_eq!(progress.status, WordStatus::Mastered);
        assert_eq!(
            tracker.get_progress(student, words[0]).unwrap(),
            Some(progress)
        );

        let profile = XpLedger::new(&conn).get_profile(student).unwrap().unwrap();
        assert_eq!((profile.xp, profile.level, profile.total_words_learned), (10, 1, 1));

        let logs = StudyLogger::new(&conn).list_for_student(student, 10).unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].action, StudyAction::MarkKnown);
    }

    #[test]
    fn test_review_unknown_word_fails_without_effects() {
        let (db, _temp) = open_temp();
        let conn = db.connect().unwrap();
        let (student, _) = seed(&conn, &[]);
        let tracker = ProgressTracker::new(&conn);

        let err = tracker
            .review_word(student, Uuid::new_v4(), ReviewOutcome::Known, None, t0())
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(XpLedger::new(&conn).get_profile(student).unwrap().is_none());
        assert_eq!(StudyLogger::new(&conn).summary(student).unwrap().total_logs, 0);
    }

    #[test]
    fn test_review_for_unknown_student_fails() {
        let (db, _temp) = open_temp();
        let conn = db.connect().unwrap();
        let (_, words) = seed(&conn, &["ember"]);

        let err = ProgressTracker::new(&conn)
            .review_word(Uuid::new_v4(), words[0], ReviewOutcome::Unknown, None, t0())
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_stranger_list_most_recent_first() {
        let (db, _temp) = open_temp();
        let conn = db.connect().unwrap();
        let (student, words) = seed(&conn, &["one", "two", "three"]);
        let tracker = ProgressTracker::new(&conn);

        assert!(tracker.list_stranger_words(student).unwrap().is_empty());

        tracker
            .review_word(student, words[0], ReviewOutcome::Unknown, None, t0())
            .unwrap();
        tracker
            .review_word(student, words[1], ReviewOutcome::Unknown, None, t0() + Duration::minutes(1))
            .unwrap();
        tracker
            .review_word(student, words[2], ReviewOutcome::Known, None, t0() + Duration::minutes(2))
            .unwrap();
        // Touching the first word again moves it to the front
        tracker
            .review_word(student, words[0], ReviewOutcome::Unknown, None, t0() + Duration::minutes(3))
            .unwrap();

        let order: Vec<Uuid> = tracker
            .list_stranger_words(student)
            .unwrap()
            .into_iter()
            .map(|p| p.word_id)
            .collect();
        assert_eq!(order, vec![words[0], words[1]]);
        assert_eq!(tracker.count_strangers(student).unwrap(), 2);
        assert_eq!(tracker.count_mastered(student).unwrap(), 1);
    }

    #[test]
    fn test_due_words() {
        let (db, _temp) = open_temp();
        let conn = db.connect().unwrap();
        let (student, words) = seed(&conn, &["soon", "later"]);
        let tracker = ProgressTracker::new(&conn);

        tracker
            .review_word(student, words[0], ReviewOutcome::Unknown, None, t0())
            .unwrap();
        tracker
            .review_word(student, words[1], ReviewOutcome::Known, None, t0())
            .unwrap();

        assert!(tracker.list_due_words(student, t0()).unwrap().is_empty());

        let due: Vec<Uuid> = tracker
            .list_due_words(student, t0() + Duration::days(1))
            .unwrap()
            .into_iter()
            .map(|p| p.word_id)
            .collect();
        assert_eq!(due, vec![words[0]]);

        let due = tracker
            .list_due_words(student, t0() + Duration::days(3))
            .unwrap();
        assert_eq!(due.len(), 2);
        assert!(due.iter().all(|p| p.is_due(t0() + Duration::days(3))));
    }

    #[test]
    fn test_counters_never_decrease() {
        let (db, _temp) = open_temp();
        let conn = db.connect().unwrap();
        let (student, words) = seed(&conn, &["steady"]);
        let tracker = ProgressTracker::new(&conn);

        let outcomes = [
            ReviewOutcome::Unknown,
            ReviewOutcome::Known,
            ReviewOutcome::Known,
            ReviewOutcome::Unknown,
            ReviewOutcome::Known,
        ];
        let mut previous: Option<StudentWordProgress> = None;
        for (i, outcome) in outcomes.into_iter().enumerate() {
            let current = tracker
                .review_word(student, words[0], outcome, None, t0() + Duration::minutes(i as i64))
                .unwrap();
            assert!(current.familiarity_score <= 100);
            if let Some(prev) = &previous {
                assert!(current.correct_count >= prev.correct_count);
                assert!(current.wrong_count >= prev.wrong_count);
                assert!(current.dont_know_count >= prev.dont_know_count);
                assert_eq!(current.id, prev.id);
            }
            previous = Some(current);
        }

        let last = previous.unwrap();
        assert_eq!((last.correct_count, last.wrong_count, last.dont_know_count), (3, 2, 2));
        // First review was UNKNOWN, so no first-mastery bonus
        let profile = XpLedger::new(&conn).get_profile(student).unwrap().unwrap();
        assert_eq!(profile.total_words_learned, 0);
        assert_eq!(profile.xp, 3 * 10 + 2 * 2);
    }
}
