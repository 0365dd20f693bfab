//! User lookups and get-or-create identity resolution.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

use super::models::*;
use crate::error::{EngineError, Result};

const USER_COLUMNS: &str = "id, name, role, created_at";

fn user_from_row(row: &Row) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        role: row.get(2)?,
        created_at: row.get(3)?,
    })
}

/// User records, bound to one connection or transaction.
pub struct UserDirectory<'c> {
    conn: &'c Connection,
}

impl<'c> UserDirectory<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    pub fn create_user(&self, name: &str, role: UserRole, now: DateTime<Utc>) -> Result<User> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EngineError::Validation("User name is required".to_string()));
        }

        let user = User::new(name.to_string(), role, now);
        self.conn.execute(
            "INSERT INTO users (id, name, role, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![user.id, user.name, user.role, user.created_at],
        )?;

        log::info!("Created {} '{}' ({})", role.as_str().to_lowercase(), user.name, user.id);
        Ok(user)
    }

    pub fn create_student(&self, name: &str, now: DateTime<Utc>) -> Result<User> {
        self.create_user(name, UserRole::Student, now)
    }

    pub fn get_user(&self, id: Uuid) -> Result<Option<User>> {
        let user = self
            .conn
            .query_row(
                &format!("SELECT {} FROM users WHERE id = ?1", USER_COLUMNS),
                params![id],
                user_from_row,
            )
            .optional()?;
        Ok(user)
    }

    pub fn get_student(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.get_user(id)?.filter(User::is_student))
    }

    /// Like `get_student`, but a missing student is an error.
    pub fn require_student(&self, id: Uuid) -> Result<User> {
        self.get_student(id)?
            .ok_or_else(|| EngineError::NotFound(format!("Student {}", id)))
    }

    /// All students, oldest first.
    pub fn list_students(&self) -> Result<Vec<User>> {
        self.list_by_role(UserRole::Student)
    }

    fn list_by_role(&self, role: UserRole) -> Result<Vec<User>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM users WHERE role = ?1 ORDER BY created_at ASC, rowid ASC",
            USER_COLUMNS
        ))?;
        let users = stmt
            .query_map(params![role], user_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(users)
    }

    fn first_by_role(&self, role: UserRole) -> Result<Option<User>> {
        let user = self
            .conn
            .query_row(
                &format!(
                    "SELECT {} FROM users WHERE role = ?1 ORDER BY created_at ASC, rowid ASC LIMIT 1",
                    USER_COLUMNS
                ),
                params![role],
                user_from_row,
            )
            .optional()?;
        Ok(user)
    }

    /// The shared student identity: first student, created on demand.
    ///
    /// Run inside a write transaction so concurrent callers cannot both create one.
    pub fn resolve_current_student(&self, now: DateTime<Utc>) -> Result<User> {
        match self.first_by_role(UserRole::Student)? {
            Some(student) => Ok(student),
            None => self.create_user(DEFAULT_STUDENT_NAME, UserRole::Student, now),
        }
    }

    /// The placeholder teacher credited with word-sets.
    pub fn resolve_default_teacher(&self, now: DateTime<Utc>) -> Result<User> {
        match self.first_by_role(UserRole::Teacher)? {
            Some(teacher) => Ok(teacher),
            None => self.create_user(DEFAULT_TEACHER_NAME, UserRole::Teacher, now),
        }
    }
}
