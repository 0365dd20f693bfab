//! Table definitions.
//!
//! Identifiers are stored as 16-byte UUID blobs and timestamps as UTC text,
//! which sorts chronologically.

use rusqlite::Connection;

pub(super) fn create_tables(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id BLOB PRIMARY KEY,
            name TEXT NOT NULL,
            role TEXT NOT NULL CHECK (role IN ('STUDENT', 'TEACHER')),
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS words (
            id BLOB PRIMARY KEY,
            text TEXT NOT NULL,
            phonetic TEXT,
            pos TEXT,
            meaning_en TEXT,
            meaning_zh TEXT,
            example_en TEXT,
            example_zh TEXT,
            syllables TEXT,
            word_roots TEXT,
            mnemonics TEXT,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS word_sets (
            id BLOB PRIMARY KEY,
            name TEXT NOT NULL,
            description TEXT,
            story_en TEXT,
            story_zh TEXT,
            created_by BLOB NOT NULL REFERENCES users(id),
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS word_set_words (
            word_set_id BLOB NOT NULL REFERENCES word_sets(id) ON DELETE CASCADE,
            word_id BLOB NOT NULL REFERENCES words(id),
            order_index INTEGER NOT NULL,
            PRIMARY KEY (word_set_id, word_id)
        );

        CREATE TABLE IF NOT EXISTS student_word_progress (
            id BLOB PRIMARY KEY,
            student_id BLOB NOT NULL REFERENCES users(id),
            word_id BLOB NOT NULL REFERENCES words(id),
            status TEXT NOT NULL CHECK (status IN ('LEARNING', 'MASTERED')),
            is_stranger INTEGER NOT NULL,
            familiarity_score INTEGER NOT NULL CHECK (familiarity_score BETWEEN 0 AND 100),
            correct_count INTEGER NOT NULL DEFAULT 0 CHECK (correct_count >= 0),
            wrong_count INTEGER NOT NULL DEFAULT 0 CHECK (wrong_count >= 0),
            dont_know_count INTEGER NOT NULL DEFAULT 0 CHECK (dont_know_count >= 0),
            last_reviewed_at TEXT,
            next_review_at TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            UNIQUE (student_id, word_id)
        );

        CREATE TABLE IF NOT EXISTS student_profiles (
            student_id BLOB PRIMARY KEY REFERENCES users(id),
            level INTEGER NOT NULL DEFAULT 1 CHECK (level >= 1),
            xp INTEGER NOT NULL DEFAULT 0 CHECK (xp >= 0),
            total_words_learned INTEGER NOT NULL DEFAULT 0 CHECK (total_words_learned >= 0),
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS xp_events (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            student_id BLOB NOT NULL REFERENCES users(id),
            points INTEGER NOT NULL,
            reason TEXT NOT NULL,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS study_logs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            student_id BLOB NOT NULL REFERENCES users(id),
            word_id BLOB NOT NULL REFERENCES words(id),
            action TEXT NOT NULL,
            is_familiar INTEGER NOT NULL,
            is_stranger INTEGER NOT NULL,
            idempotency_key TEXT UNIQUE,
            created_at TEXT NOT NULL
        );

        -- History tables are append-only
        CREATE TRIGGER IF NOT EXISTS xp_events_no_update BEFORE UPDATE ON xp_events
        BEGIN SELECT RAISE(ABORT, 'xp_events is append-only'); END;
        CREATE TRIGGER IF NOT EXISTS xp_events_no_delete BEFORE DELETE ON xp_events
        BEGIN SELECT RAISE(ABORT, 'xp_events is append-only'); END;
        CREATE TRIGGER IF NOT EXISTS study_logs_no_update BEFORE UPDATE ON study_logs
        BEGIN SELECT RAISE(ABORT, 'study_logs is append-only'); END;
        CREATE TRIGGER IF NOT EXISTS study_logs_no_delete BEFORE DELETE ON study_logs
        BEGIN SELECT RAISE(ABORT, 'study_logs is append-only'); END;

        CREATE INDEX IF NOT EXISTS idx_users_role_created ON users(role, created_at);
        CREATE INDEX IF NOT EXISTS idx_words_created ON words(created_at);
        CREATE INDEX IF NOT EXISTS idx_progress_student_stranger ON student_word_progress(student_id, is_stranger);
        CREATE INDEX IF NOT EXISTS idx_progress_student_due ON student_word_progress(student_id, next_review_at);
        CREATE INDEX IF NOT EXISTS idx_xp_events_student ON xp_events(student_id, created_at);
        CREATE INDEX IF NOT EXISTS idx_study_logs_student ON study_logs(student_id, created_at);
        "#,
    )
}
