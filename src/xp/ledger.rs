//! XP awards and profile upkeep

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

use super::models::*;
use crate::error::{EngineError, Result};

const PROFILE_COLUMNS: &str =
    "student_id, level, xp, total_words_learned, created_at, updated_at";

fn profile_from_row(row: &Row) -> rusqlite::Result<StudentProfile> {
    Ok(StudentProfile {
        student_id: row.get(0)?,
        level: row.get(1)?,
        xp: row.get(2)?,
        total_words_learned: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

fn event_from_row(row: &Row) -> rusqlite::Result<XpEvent> {
    Ok(XpEvent {
        id: row.get(0)?,
        student_id: row.get(1)?,
        points: row.get(2)?,
        reason: row.get(3)?,
        created_at: row.get(4)?,
    })
}

/// XP ledger bound to one connection or transaction.
pub struct XpLedger<'c> {
    conn: &'c Connection,
}

impl<'c> XpLedger<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// Profile if one has been created
    pub fn get_profile(&self, student_id: Uuid) -> Result<Option<StudentProfile>> {
        let profile = self
            .conn
            .query_row(
                &format!(
                    "SELECT {} FROM student_profiles WHERE student_id = ?1",
                    PROFILE_COLUMNS
                ),
                params![student_id],
                profile_from_row,
            )
            .optional()?;
        Ok(profile)
    }

    /// Profile, created with level 1 / 0 XP when absent
    pub fn get_or_create_profile(
        &self,
        student_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<StudentProfile> {
        self.ensure_profile(student_id, now)?;
        let profile = self.conn.query_row(
            &format!(
                "SELECT {} FROM student_profiles WHERE student_id = ?1",
                PROFILE_COLUMNS
            ),
            params![student_id],
            profile_from_row,
        )?;
        Ok(profile)
    }

    fn ensure_profile(&self, student_id: Uuid, now: DateTime<Utc>) -> Result<()> {
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO student_profiles \
             (student_id, level, xp, total_words_learned, created_at, updated_at) \
             VALUES (?1, 1, 0, 0, ?2, ?2)",
            params![student_id, now],
        )?;
        if inserted > 0 {
            log::debug!("Created profile for student {}", student_id);
        }
        Ok(())
    }

    /// Count a first-time mastery
    pub fn increment_words_learned(&self, student_id: Uuid, now: DateTime<Utc>) -> Result<()> {
        self.ensure_profile(student_id, now)?;
        self.conn.execute(
            "UPDATE student_profiles SET total_words_learned = total_words_learned + 1, updated_at = ?2 \
             WHERE student_id = ?1",
            params![student_id, now],
        )?;
        Ok(())
    }

    /// Award XP and recompute the level.
    ///
    /// Non-positive awards change nothing and record no event. The increment
    /// and level recompute happen in one UPDATE so concurrent awards cannot
    /// overwrite each other. An award that would overflow the XP total is a
    /// `Validation` error and leaves the profile untouched.
    pub fn award(
        &self,
        student_id: Uuid,
        points: i64,
        reason: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<XpEvent>> {
        if points <= 0 {
            return Ok(None);
        }

        self.ensure_profile(student_id, now)?;

        let (new_xp, new_level): (u32, u32) = self
            .conn
            .query_row(
                "UPDATE student_profiles \
                 SET xp = xp + ?2, level = (xp + ?2) / ?3 + 1, updated_at = ?4 \
                 WHERE student_id = ?1 AND xp + ?2 <= ?5 \
                 RETURNING xp, level",
                params![student_id, points, XP_PER_LEVEL, now, u32::MAX],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?
            .ok_or_else(|| {
                EngineError::Validation(format!(
                    "Awarding {} XP to student {} would exceed the XP limit",
                    points, student_id
                ))
            })?;

        self.conn.execute(
            "INSERT INTO xp_events (student_id, points, reason, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![student_id, points, reason, now],
        )?;
        let event = XpEvent {
            id: self.conn.last_insert_rowid(),
            student_id,
            points,
            reason: reason.to_string(),
            created_at: now,
        };

        let old_level = level_for_xp((i64::from(new_xp) - points).max(0) as u32);
        if new_level > old_level {
            log::info!(
                "Student {} reached level {} ({} XP)",
                student_id,
                new_level,
                new_xp
            );
        }

        Ok(Some(event))
    }

    /// Most recent awards first
    pub fn recent_events(&self, student_id: Uuid, limit: usize) -> Result<Vec<XpEvent>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, student_id, points, reason, created_at FROM xp_events \
             WHERE student_id = ?1 ORDER BY created_at DESC, id DESC LIMIT ?2",
        )?;
        let events = stmt
            .query_map(params![student_id, limit as i64], event_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::open_temp;
    use crate::users::UserDirectory;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 15, 18, 0, 0).unwrap()
    }

    fn student(conn: &Connection) -> Uuid {
        UserDirectory::new(conn).create_student("Mei", t0()).unwrap().id
    }

    #[test]
    fn test_get_or_create_is_idempotent() {
        let (db, _temp) = open_temp();
        let conn = db.connect().unwrap();
        let id = student(&conn);
        let ledger = XpLedger::new(&conn);

        assert!(ledger.get_profile(id).unwrap().is_none());

        let first = ledger.get_or_create_profile(id, t0()).unwrap();
        let second = ledger
            .get_or_create_profile(id, t0() + Duration::days(1))
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(first.level, 1);
        assert_eq!(first.xp, 0);
        assert_eq!(first.total_words_learned, 0);
    }

    #[test]
    fn test_non_positive_award_is_noop() {
        let (db, _temp) = open_temp();
        let conn = db.connect().unwrap();
        let id = student(&conn);
        let ledger = XpLedger::new(&conn);

        assert!(ledger.award(id, 0, "nothing", t0()).unwrap().is_none());
        assert!(ledger.award(id, -5, "penalty", t0()).unwrap().is_none());

        assert!(ledger.get_profile(id).unwrap().is_none());
        assert!(ledger.recent_events(id, 10).unwrap().is_empty());
    }

    #[test]
    fn test_award_crosses_level_boundary() {
        let (db, _temp) = open_temp();
        let conn = db.connect().unwrap();
        let id = student(&conn);
        let ledger = XpLedger::new(&conn);

        ledger.award(id, 95, "seed", t0()).unwrap();
        let profile = ledger.get_profile(id).unwrap().unwrap();
        assert_eq!((profile.xp, profile.level), (95, 1));

        let event = ledger
            .award(id, 10, "mark_known_word", t0() + Duration::minutes(1))
            .unwrap()
            .unwrap();
        assert_eq!(event.points, 10);
        assert_eq!(event.reason, "mark_known_word");

        let profile = ledger.get_profile(id).unwrap().unwrap();
        assert_eq!(profile.xp, 105);
        assert_eq!(profile.level, 2);
        assert_eq!(profile.level, level_for_xp(profile.xp));
    }

    #[test]
    fn test_recent_events_newest_first() {
        let (db, _temp) = open_temp();
        let conn = db.connect().unwrap();
        let id = student(&conn);
        let ledger = XpLedger::new(&conn);

        for i in 0..5 {
            ledger
                .award(id, i + 1, "review", t0() + Duration::minutes(i))
                .unwrap();
        }

        let points: Vec<i64> = ledger
            .recent_events(id, 3)
            .unwrap()
            .into_iter()
            .map(|e| e.points)
            .collect();
        assert_eq!(points, vec![5, 4, 3]);
    }

    #[test]
    fn test_award_past_xp_limit_is_rejected() {
        let (db, _temp) = open_temp();
        let conn = db.connect().unwrap();
        let id = student(&conn);
        let ledger = XpLedger::new(&conn);

        ledger.award(id, i64::from(u32::MAX) - 1, "import", t0()).unwrap();
        let err = ledger.award(id, 2, "review", t0()).unwrap_err();
        assert!(err.is_validation());

        let profile = ledger.get_profile(id).unwrap().unwrap();
        assert_eq!(profile.xp, u32::MAX - 1);
        assert_eq!(ledger.recent_events(id, 10).unwrap().len(), 1);

        // Landing exactly on the limit is allowed
        ledger.award(id, 1, "review", t0()).unwrap();
        assert_eq!(ledger.get_profile(id).unwrap().unwrap().xp, u32::MAX);
    }

    #[test]
    fn test_increment_words_learned_creates_profile() {
        let (db, _temp) = open_temp();
        let conn = db.connect().unwrap();
        let id = student(&conn);
        let ledger = XpLedger::new(&conn);

        ledger.increment_words_learned(id, t0()).unwrap();
        ledger.increment_words_learned(id, t0()).unwrap();

        let profile = ledger.get_profile(id).unwrap().unwrap();
        assert_eq!(profile.total_words_learned, 2);
        assert_eq!(profile.xp, 0);
        assert_eq!(profile.level, 1);
    }
}
