//! Stats computed fresh from progress, ledger and log tables.

use rusqlite::Connection;
use uuid::Uuid;

use super::models::StudentStats;
use crate::error::Result;
use crate::progress::ProgressTracker;
use crate::study_log::StudyLogger;
use crate::users::{User, UserDirectory};
use crate::xp::XpLedger;

pub struct StatsAggregator<'c> {
    conn: &'c Connection,
}

impl<'c> StatsAggregator<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// Stats for one student; `NotFound` if the student does not exist
    pub fn student_stats(&self, student_id: Uuid) -> Result<StudentStats> {
        let student = UserDirectory::new(self.conn).require_student(student_id)?;
        self.stats_for(&student)
    }

    /// Stats for every student, oldest account first
    pub fn all_student_stats(&self) -> Result<Vec<StudentStats>> {
        UserDirectory::new(self.conn)
            .list_students()?
            .iter()
            .map(|student| self.stats_for(student))
            .collect()
    }

    fn stats_for(&self, student: &User) -> Result<StudentStats> {
        let activity = StudyLogger::new(self.conn).summary(student.id)?;
        let tracker = ProgressTracker::new(self.conn);
        let profile = XpLedger::new(self.conn).get_profile(student.id)?;

        Ok(StudentStats {
            student_id: student.id,
            name: student.name.clone(),
            created_at: student.created_at,
            total_logs: activity.total_logs,
            known_logs: activity.known_logs,
            unknown_logs: activity.unknown_logs,
            mastered_words: tracker.count_mastered(student.id)?,
            stranger_words: tracker.count_strangers(student.id)?,
            last_activity: activity.last_activity,
            level: profile.as_ref().map(|p| p.level),
            xp: profile.as_ref().map(|p| p.xp),
        })
    }
}
