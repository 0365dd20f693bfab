//! Entry point for the learning progress engine.
//!
//! Every call opens its own connection. Writes run in an IMMEDIATE
//! transaction: the database write lock is held from the first read of a
//! progress row or profile until commit, so concurrent reviews for the same
//! student are serialized and nothing is lost. Dropping an uncommitted
//! transaction rolls it back, so a failed review leaves no partial effect.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rusqlite::{Connection, TransactionBehavior};
use uuid::Uuid;

use crate::clock::{Clock, SystemClock};
use crate::config::LexiGrowConfig;
use crate::content::{ContentStore, NewWord, NewWordSet, Word, WordOrder, WordSet};
use crate::error::{EngineError, Result};
use crate::progress::{ProgressTracker, ReviewOutcome, StudentWordProgress};
use crate::stats::{StatsAggregator, StudentStats};
use crate::storage::Database;
use crate::study_log::{StudyLog, StudyLogger};
use crate::users::{User, UserDirectory};
use crate::xp::{StudentProfile, XpEvent, XpLedger};

pub struct LearningEngine {
    db: Database,
    clock: Arc<dyn Clock>,
}

impl LearningEngine {
    /// Open the database named by the configuration.
    pub fn open(config: &LexiGrowConfig) -> Result<Self> {
        let db = Database::open(config.database_path(), config.busy_timeout())?;
        Ok(Self::new(db))
    }

    pub fn new(db: Database) -> Self {
        Self {
            db,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the time source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    fn write<T>(&self, op: impl FnOnce(&Connection, DateTime<Utc>) -> Result<T>) -> Result<T> {
        let mut conn = self.db.connect()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        // Read the clock only once the lock is held so timestamps follow commit order
        let now = self.clock.now();
        let value = op(&tx, now)?;
        tx.commit()?;
        Ok(value)
    }

    fn read<T>(&self, op: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let mut conn = self.db.connect()?;
        // Deferred: one consistent snapshot, never takes the write lock
        let tx = conn.transaction()?;
        let value = op(&tx)?;
        tx.commit()?;
        Ok(value)
    }

    // ==================== Review ====================

    /// Record that a student knows (or does not know) a word.
    pub fn review_word(
        &self,
        student_id: Uuid,
        word_id: Uuid,
        outcome: ReviewOutcome,
    ) -> Result<StudentWordProgress> {
        validate_ids(student_id, word_id)?;
        self.write(|conn, now| {
            ProgressTracker::new(conn).review_word(student_id, word_id, outcome, None, now)
        })
    }

    /// Like `review_word`, but safe to retry: a repeated `idempotency_key`
    /// returns the current record without awarding or logging again.
    pub fn review_word_once(
        &self,
        student_id: Uuid,
        word_id: Uuid,
        outcome: ReviewOutcome,
        idempotency_key: &str,
    ) -> Result<StudentWordProgress> {
        validate_ids(student_id, word_id)?;
        let key = idempotency_key.trim();
        if key.is_empty() {
            return Err(EngineError::Validation(
                "Idempotency key must not be empty".to_string(),
            ));
        }

        self.write(|conn, now| {
            if let Some(previous) = StudyLogger::new(conn).find_by_idempotency_key(key)? {
                if previous.student_id != student_id
                    || previous.word_id != word_id
                    || previous.action != outcome.study_action()
                {
                    return Err(EngineError::Validation(format!(
                        "Idempotency key '{}' was already used for a different review",
                        key
                    )));
                }
                log::warn!("Ignoring replayed review '{}' for student {}", key, student_id);
                return ProgressTracker::new(conn)
                    .get_progress(student_id, word_id)?
                    .ok_or_else(|| EngineError::NotFound(format!("Progress for word {}", word_id)));
            }

            ProgressTracker::new(conn).review_word(student_id, word_id, outcome, Some(key), now)
        })
    }

    pub fn get_progress(
        &self,
        student_id: Uuid,
        word_id: Uuid,
    ) -> Result<Option<StudentWordProgress>> {
        self.read(|conn| ProgressTracker::new(conn).get_progress(student_id, word_id))
    }

    /// Review queue of stranger words, most recently touched first
    pub fn list_stranger_words(&self, student_id: Uuid) -> Result<Vec<StudentWordProgress>> {
        self.read(|conn| ProgressTracker::new(conn).list_stranger_words(student_id))
    }

    /// Stranger words joined with their content, for display
    pub fn list_stranger_words_with_words(
        &self,
        student_id: Uuid,
    ) -> Result<Vec<(StudentWordProgress, Word)>> {
        self.read(|conn| {
            let store = ContentStore::new(conn);
            let mut joined = Vec::new();
            for progress in ProgressTracker::new(conn).list_stranger_words(student_id)? {
                let word = store
                    .get_word(progress.word_id)?
                    .ok_or_else(|| EngineError::NotFound(format!("Word {}", progress.word_id)))?;
                joined.push((progress, word));
            }
            Ok(joined)
        })
    }

    /// Words whose next review time has passed
    pub fn list_due_words(&self, student_id: Uuid) -> Result<Vec<StudentWordProgress>> {
        let now = self.clock.now();
        self.read(|conn| ProgressTracker::new(conn).list_due_words(student_id, now))
    }

    // ==================== XP ====================

    /// The student's profile, created on first access
    pub fn get_profile(&self, student_id: Uuid) -> Result<StudentProfile> {
        self.write(|conn, now| {
            UserDirectory::new(conn).require_student(student_id)?;
            XpLedger::new(conn).get_or_create_profile(student_id, now)
        })
    }

    /// Grant XP outside of a review.
    ///
    /// Non-positive amounts change nothing, not even profile creation, and
    /// return the profile only if it already exists.
    pub fn award_xp(
        &self,
        student_id: Uuid,
        points: i64,
        reason: &str,
    ) -> Result<Option<StudentProfile>> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(EngineError::Validation("XP reason is required".to_string()));
        }
        if points > i64::from(u32::MAX) {
            return Err(EngineError::Validation(format!(
                "XP award of {} is out of range",
                points
            )));
        }
        self.write(|conn, now| {
            UserDirectory::new(conn).require_student(student_id)?;
            let ledger = XpLedger::new(conn);
            if points <= 0 {
                return ledger.get_profile(student_id);
            }
            ledger.award(student_id, points, reason, now)?;
            ledger.get_or_create_profile(student_id, now).map(Some)
        })
    }

    pub fn recent_xp_events(&self, student_id: Uuid, limit: usize) -> Result<Vec<XpEvent>> {
        self.read(|conn| XpLedger::new(conn).recent_events(student_id, limit))
    }

    pub fn recent_study_logs(&self, student_id: Uuid, limit: usize) -> Result<Vec<StudyLog>> {
        self.read(|conn| StudyLogger::new(conn).list_for_student(student_id, limit))
    }

    // ==================== Stats ====================

    pub fn get_student_stats(&self, student_id: Uuid) -> Result<StudentStats> {
        self.read(|conn| StatsAggregator::new(conn).student_stats(student_id))
    }

    pub fn list_all_student_stats(&self) -> Result<Vec<StudentStats>> {
        self.read(|conn| StatsAggregator::new(conn).all_student_stats())
    }

    // ==================== Users ====================

    /// The shared default student, created on first use
    pub fn resolve_current_student(&self) -> Result<User> {
        self.write(|conn, now| UserDirectory::new(conn).resolve_current_student(now))
    }

    pub fn resolve_default_teacher(&self) -> Result<User> {
        self.write(|conn, now| UserDirectory::new(conn).resolve_default_teacher(now))
    }

    pub fn create_student(&self, name: &str) -> Result<User> {
        self.write(|conn, now| UserDirectory::new(conn).create_student(name, now))
    }

    pub fn get_student(&self, id: Uuid) -> Result<Option<User>> {
        self.read(|conn| UserDirectory::new(conn).get_student(id))
    }

    pub fn list_students(&self) -> Result<Vec<User>> {
        self.read(|conn| UserDirectory::new(conn).list_students())
    }

    // ==================== Content ====================

    pub fn create_word(&self, new_word: NewWord) -> Result<Word> {
        self.write(|conn, now| ContentStore::new(conn).create_word(new_word, now))
    }

    pub fn get_word(&self, id: Uuid) -> Result<Option<Word>> {
        self.read(|conn| ContentStore::new(conn).get_word(id))
    }

    pub fn find_word_by_text(&self, text: &str) -> Result<Option<Word>> {
        self.read(|conn| ContentStore::new(conn).find_word_by_text(text))
    }

    pub fn list_words(&self, limit: usize, order: WordOrder) -> Result<Vec<Word>> {
        self.read(|conn| ContentStore::new(conn).list_words(limit, order))
    }

    /// Create a word-set credited to the given teacher, or the default teacher
    pub fn create_word_set(&self, new_set: NewWordSet, created_by: Option<Uuid>) -> Result<WordSet> {
        self.write(|conn, now| {
            let users = UserDirectory::new(conn);
            let creator = match created_by {
                Some(id) => users
                    .get_user(id)?
                    .ok_or_else(|| EngineError::NotFound(format!("User {}", id)))?
                    .id,
                None => users.resolve_default_teacher(now)?.id,
            };
            ContentStore::new(conn).create_word_set(new_set, creator, now)
        })
    }

    pub fn get_word_set(&self, id: Uuid) -> Result<Option<WordSet>> {
        self.read(|conn| ContentStore::new(conn).get_word_set(id))
    }

    pub fn list_word_sets(&self) -> Result<Vec<WordSet>> {
        self.read(|conn| ContentStore::new(conn).list_word_sets())
    }

    pub fn words_in_set(&self, word_set_id: Uuid) -> Result<Vec<Word>> {
        self.read(|conn| ContentStore::new(conn).words_in_set(word_set_id))
    }
}

fn validate_ids(student_id: Uuid, word_id: Uuid) -> Result<()> {
    if student_id.is_nil() {
        return Err(EngineError::Validation("Missing student identifier".to_string()));
    }
    if word_id.is_nil() {
        return Err(EngineError::Validation("Missing word identifier".to_string()));
    }
    Ok(())
}
