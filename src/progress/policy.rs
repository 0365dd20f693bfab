//! Fixed-offset review policy
//!
//! Pure state transitions for a mastery record. No storage access here so the
//! rules can be checked in isolation.
//!
//! - KNOWN: status MASTERED, familiarity +10 (starts at 80), review again in 3 days
//! - UNKNOWN: status LEARNING + stranger flag, familiarity -10 (starts at 20),
//!   review again tomorrow

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use super::models::{ReviewOutcome, StudentWordProgress, WordStatus};

pub const MAX_FAMILIARITY: u8 = 100;
pub const FAMILIARITY_STEP: u8 = 10;
pub const KNOWN_INITIAL_FAMILIARITY: u8 = 80;
pub const UNKNOWN_INITIAL_FAMILIARITY: u8 = 20;
pub const KNOWN_REVIEW_OFFSET_DAYS: i64 = 3;
pub const UNKNOWN_REVIEW_OFFSET_DAYS: i64 = 1;

/// Result of applying one review to a record
#[derive(Debug, Clone)]
pub struct ReviewTransition {
    pub progress: StudentWordProgress,
    /// First-ever review of this word and it was KNOWN
    pub first_mastery: bool,
}

/// When the word should be reviewed next
pub fn next_review_at(outcome: ReviewOutcome, now: DateTime<Utc>) -> DateTime<Utc> {
    let days = match outcome {
        ReviewOutcome::Known => KNOWN_REVIEW_OFFSET_DAYS,
        ReviewOutcome::Unknown => UNKNOWN_REVIEW_OFFSET_DAYS,
    };
    now + Duration::days(days)
}

/// Compute the record after a review.
pub fn apply_review(
    existing: Option<&StudentWordProgress>,
    student_id: Uuid,
    word_id: Uuid,
    outcome: ReviewOutcome,
    now: DateTime<Utc>,
) -> ReviewTransition {
    let first_mastery = existing.is_none() && outcome == ReviewOutcome::Known;

    let mut progress = match existing {
        Some(record) => record.clone(),
        None => StudentWordProgress {
            id: Uuid::new_v4(),
            student_id,
            word_id,
            status: WordStatus::Learning,
            is_stranger: false,
            familiarity_score: 0,
            correct_count: 0,
            wrong_count: 0,
            dont_know_count: 0,
            last_reviewed_at: None,
            next_review_at: None,
            created_at: now,
            updated_at: now,
        },
    };

    match outcome {
        ReviewOutcome::Known => {
            progress.status = WordStatus::Mastered;
            progress.is_stranger = false;
            progress.familiarity_score = match existing {
                Some(record) => record
                    .familiarity_score
                    .saturating_add(FAMILIARITY_STEP)
                    .min(MAX_FAMILIARITY),
                None => KNOWN_INITIAL_FAMILIARITY,
            };
            progress.correct_count += 1;
        }
        ReviewOutcome::Unknown => {
            progress.status = WordStatus::Learning;
            progress.is_stranger = true;
            progress.familiarity_score = match existing {
                Some(record) => record
                    .familiarity_score
                    .min(MAX_FAMILIARITY)
                    .saturating_sub(FAMILIARITY_STEP),
                None => UNKNOWN_INITIAL_FAMILIARITY,
            };
            progress.wrong_count += 1;
            progress.dont_know_count += 1;
        }
    }

    progress.last_reviewed_at = Some(now);
    progress.next_review_at = Some(next_review_at(outcome, now));
    progress.updated_at = now;

    ReviewTransition {
        progress,
        first_mastery,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 4, 1, 10, 0, 0).unwrap()
    }

    fn review(
        existing: Option<&StudentWordProgress>,
        outcome: ReviewOutcome,
    ) -> ReviewTransition {
        apply_review(existing, Uuid::new_v4(), Uuid::new_v4(), outcome, now())
    }

    #[test]
    fn test_first_review_known() {
        let result = review(None, ReviewOutcome::Known);
        let p = &result.progress;

        assert!(result.first_mastery);
        assert_eq!(p.status, WordStatus::Mastered);
        assert!(!p.is_stranger);
        assert_eq!(p.familiarity_score, 80);
        assert_eq!(p.correct_count, 1);
        assert_eq!(p.wrong_count, 0);
        assert_eq!(p.last_reviewed_at, Some(now()));
        assert_eq!(p.next_review_at, Some(now() + Duration::days(3)));
    }

    #[test]
    fn test_first_review_unknown() {
        let result = review(None, ReviewOutcome::Unknown);
        let p = &result.progress;

        assert!(!result.first_mastery);
        assert_eq!(p.status, WordStatus::Learning);
        assert!(p.is_stranger);
        assert_eq!(p.familiarity_score, 20);
        assert_eq!(p.wrong_count, 1);
        assert_eq!(p.dont_know_count, 1);
        assert_eq!(p.correct_count, 0);
        assert_eq!(p.next_review_at, Some(now() + Duration::days(1)));
    }

    #[test]
    fn test_mastery_regresses_on_unknown() {
        let known = review(None, ReviewOutcome::Known).progress;
        let result = review(Some(&known), ReviewOutcome::Unknown);
        let p = &result.progress;

        assert!(!result.first_mastery);
        assert_eq!(p.id, known.id);
        assert_eq!(p.status, WordStatus::Learning);
        assert!(p.is_stranger);
        assert_eq!(p.familiarity_score, 70);
        assert_eq!(p.correct_count, 1);
        assert_eq!(p.wrong_count, 1);
        assert_eq!(p.dont_know_count, 1);
        assert_eq!(p.created_at, known.created_at);
    }

    #[test]
    fn test_repeat_known_is_not_first_mastery() {
        let unknown = review(None, ReviewOutcome::Unknown).progress;
        let result = review(Some(&unknown), ReviewOutcome::Known);

        assert!(!result.first_mastery);
        assert_eq!(result.progress.status, WordStatus::Mastered);
        assert!(!result.progress.is_stranger);
        assert_eq!(result.progress.familiarity_score, 30);
    }

    #[test]
    fn test_familiarity_clamped() {
        let mut record = review(None, ReviewOutcome::Known).progress;
        for _ in 0..10 {
            record = review(Some(&record), ReviewOutcome::Known).progress;
        }
        assert_eq!(record.familiarity_score, MAX_FAMILIARITY);

        for _ in 0..20 {
            record = review(Some(&record), ReviewOutcome::Unknown).progress;
        }
        assert_eq!(record.familiarity_score, 0);
        assert_eq!(record.wrong_count, 20);
        assert_eq!(record.correct_count, 11);
    }

    #[test]
    fn test_stranger_flag_follows_last_outcome() {
        let mut record = review(None, ReviewOutcome::Unknown).progress;
        for outcome in [
            ReviewOutcome::Known,
            ReviewOutcome::Unknown,
            ReviewOutcome::Unknown,
            ReviewOutcome::Known,
        ] {
            record = review(Some(&record), outcome).progress;
            assert_eq!(record.is_stranger, outcome == ReviewOutcome::Unknown);
            assert_eq!(record.is_stranger, record.status == WordStatus::Learning);
        }
    }
}
