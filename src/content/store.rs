//! Storage operations for words and word-sets

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

use super::models::*;
use crate::error::{EngineError, Result};

const WORD_COLUMNS: &str = "id, text, phonetic, pos, meaning_en, meaning_zh, example_en, \
                            example_zh, syllables, word_roots, mnemonics, created_at";

fn word_from_row(row: &Row) -> rusqlite::Result<Word> {
    Ok(Word {
        id: row.get(0)?,
        text: row.get(1)?,
        phonetic: row.get(2)?,
        pos: row.get(3)?,
        meaning_en: row.get(4)?,
        meaning_zh: row.get(5)?,
        example_en: row.get(6)?,
        example_zh: row.get(7)?,
        syllables: row.get(8)?,
        word_roots: row.get(9)?,
        mnemonics: row.get(10)?,
        created_at: row.get(11)?,
    })
}

/// Content store bound to one connection or transaction.
pub struct ContentStore<'c> {
    conn: &'c Connection,
}

impl<'c> ContentStore<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    // ==================== Word Operations ====================

    /// Create a new word
    pub fn create_word(&self, new_word: NewWord, now: DateTime<Utc>) -> Result<Word> {
        let text = new_word.text.trim().to_string();
        if text.is_empty() {
            return Err(EngineError::Validation("Word text is required".to_string()));
        }

        let word = Word {
            id: Uuid::new_v4(),
            text,
            phonetic: normalize(new_word.phonetic),
            pos: normalize(new_word.pos),
            meaning_en: normalize(new_word.meaning_en),
            meaning_zh: normalize(new_word.meaning_zh),
            example_en: normalize(new_word.example_en),
            example_zh: normalize(new_word.example_zh),
            syllables: normalize(new_word.syllables),
            word_roots: normalize(new_word.word_roots),
            mnemonics: normalize(new_word.mnemonics),
            created_at: now,
        };

        self.conn.execute(
            &format!(
                "INSERT INTO words ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
                WORD_COLUMNS
            ),
            params![
                word.id,
                word.text,
                word.phonetic,
                word.pos,
                word.meaning_en,
                word.meaning_zh,
                word.example_en,
                word.example_zh,
                word.syllables,
                word.word_roots,
                word.mnemonics,
                word.created_at,
            ],
        )?;

        log::info!("Created word '{}' ({})", word.text, word.id);
        Ok(word)
    }

    /// Get a specific word
    pub fn get_word(&self, id: Uuid) -> Result<Option<Word>> {
        let word = self
            .conn
            .query_row(
                &format!("SELECT {} FROM words WHERE id = ?1", WORD_COLUMNS),
                params![id],
                word_from_row,
            )
            .optional()?;
        Ok(word)
    }

    /// Find a word by its headword (case-insensitive, oldest match wins)
    pub fn find_word_by_text(&self, text: &str) -> Result<Option<Word>> {
        let word = self
            .conn
            .query_row(
                &format!(
                    "SELECT {} FROM words WHERE text = ?1 COLLATE NOCASE \
                     ORDER BY created_at ASC, rowid ASC LIMIT 1",
                    WORD_COLUMNS
                ),
                params![text.trim()],
                word_from_row,
            )
            .optional()?;
        Ok(word)
    }

    /// List up to `limit` words
    pub fn list_words(&self, limit: usize, order: WordOrder) -> Result<Vec<Word>> {
        let direction = match order {
            WordOrder::NewestFirst => "DESC",
            WordOrder::OldestFirst => "ASC",
        };
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM words ORDER BY created_at {dir}, rowid {dir} LIMIT ?1",
            WORD_COLUMNS,
            dir = direction
        ))?;
        let words = stmt
            .query_map(params![limit as i64], word_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(words)
    }

    // ==================== Word-set Operations ====================

    /// Create a word-set with its words in the given order
    pub fn create_word_set(
        &self,
        new_set: NewWordSet,
        created_by: Uuid,
        now: DateTime<Utc>,
    ) -> Result<WordSet> {
        let name = new_set.name.trim().to_string();
        if name.is_empty() {
            return Err(EngineError::Validation(
                "Word-set name is required".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for word_id in &new_set.word_ids {
            if !seen.insert(*word_id) {
                return Err(EngineError::Validation(format!(
                    "Word {} appears twice in the set",
                    word_id
                )));
            }
            if self.get_word(*word_id)?.is_none() {
                return Err(EngineError::NotFound(format!("Word {}", word_id)));
            }
        }

        let word_set = WordSet {
            id: Uuid::new_v4(),
            name,
            description: normalize(new_set.description),
            story_en: normalize(new_set.story_en),
            story_zh: normalize(new_set.story_zh),
            created_by,
            word_ids: new_set.word_ids,
            created_at: now,
        };

        self.conn.execute(
            "INSERT INTO word_sets (id, name, description, story_en, story_zh, created_by, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                word_set.id,
                word_set.name,
                word_set.description,
                word_set.story_en,
                word_set.story_zh,
                word_set.created_by,
                word_set.created_at,
            ],
        )?;

        let mut stmt = self.conn.prepare(
            "INSERT INTO word_set_words (word_set_id, word_id, order_index) VALUES (?1, ?2, ?3)",
        )?;
        for (index, word_id) in word_set.word_ids.iter().enumerate() {
            stmt.execute(params![word_set.id, word_id, index as i64])?;
        }

        log::info!(
            "Created word-set '{}' with {} words",
            word_set.name,
            word_set.word_ids.len()
        );
        Ok(word_set)
    }

    /// Get a specific word-set
    pub fn get_word_set(&self, id: Uuid) -> Result<Option<WordSet>> {
        let word_set = self
            .conn
            .query_row(
                "SELECT id, name, description, story_en, story_zh, created_by, created_at \
                 FROM word_sets WHERE id = ?1",
                params![id],
                word_set_from_row,
            )
            .optional()?;

        match word_set {
            Some(mut set) => {
                set.word_ids = self.word_ids_in_set(set.id)?;
                Ok(Some(set))
            }
            None => Ok(None),
        }
    }

    /// List all word-sets, newest first
    pub fn list_word_sets(&self) -> Result<Vec<WordSet>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, description, story_en, story_zh, created_by, created_at \
             FROM word_sets ORDER BY created_at DESC, rowid DESC",
        )?;
        let mut sets = stmt
            .query_map([], word_set_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        for set in &mut sets {
            set.word_ids = self.word_ids_in_set(set.id)?;
        }
        Ok(sets)
    }

    /// The words of a set, in set order
    pub fn words_in_set(&self, word_set_id: Uuid) -> Result<Vec<Word>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM words w JOIN word_set_words ws ON ws.word_id = w.id \
             WHERE ws.word_set_id = ?1 ORDER BY ws.order_index ASC",
            prefixed_word_columns("w")
        ))?;
        let words = stmt
            .query_map(params![word_set_id], word_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(words)
    }

    fn word_ids_in_set(&self, word_set_id: Uuid) -> Result<Vec<Uuid>> {
        let mut stmt = self.conn.prepare(
            "SELECT word_id FROM word_set_words WHERE word_set_id = ?1 ORDER BY order_index ASC",
        )?;
        let ids = stmt
            .query_map(params![word_set_id], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<Uuid>>>()?;
        Ok(ids)
    }
}

fn word_set_from_row(row: &Row) -> rusqlite::Result<WordSet> {
    Ok(WordSet {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        story_en: row.get(3)?,
        story_zh: row.get(4)?,
        created_by: row.get(5)?,
        word_ids: Vec::new(),
        created_at: row.get(6)?,
    })
}

fn prefixed_word_columns(alias: &str) -> String {
    WORD_COLUMNS
        .split(',')
        .map(|col| format!("{}.{}", alias, col.trim()))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::open_temp;
    use crate::users::UserDirectory;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_create_and_get_word() {
        let (db, _temp) = open_temp();
        let conn = db.connect().unwrap();
        let store = ContentStore::new(&conn);

        let mut new_word = NewWord::new("  resilient ");
        new_word.phonetic = Some("/rɪˈzɪliənt/".to_string());
        new_word.pos = Some("  ".to_string());
        new_word.meaning_zh = Some("有韧性的".to_string());

        let created = store.create_word(new_word, t0()).unwrap();
        assert_eq!(created.text, "resilient");
        assert_eq!(created.pos, None);

        let fetched = store.get_word(created.id).unwrap().unwrap();
        assert_eq!(fetched, created);
        assert!(store.get_word(Uuid::new_v4()).unwrap().is_none());
    }

    #[test]
    fn test_blank_word_rejected() {
        let (db, _temp) = open_temp();
        let conn = db.connect().unwrap();
        let store = ContentStore::new(&conn);

        let err = store.create_word(NewWord::new("   "), t0()).unwrap_err();
        assert!(err.is_validation());
        assert!(store.list_words(10, WordOrder::NewestFirst).unwrap().is_empty());
    }

    #[test]
    fn test_list_words_order_and_limit() {
        let (db, _temp) = open_temp();
        let conn = db.connect().unwrap();
        let store = ContentStore::new(&conn);

        for (i, text) in ["apple", "brave", "curious"].iter().enumerate() {
            store
                .create_word(NewWord::new(*text), t0() + Duration::minutes(i as i64))
                .unwrap();
        }

        let newest: Vec<_> = store
            .list_words(2, WordOrder::NewestFirst)
            .unwrap()
            .into_iter()
            .map(|w| w.text)
            .collect();
        assert_eq!(newest, vec!["curious", "brave"]);

        let oldest: Vec<_> = store
            .list_words(10, WordOrder::OldestFirst)
            .unwrap()
            .into_iter()
            .map(|w| w.text)
            .collect();
        assert_eq!(oldest, vec!["apple", "brave", "curious"]);
    }

    #[test]
    fn test_find_word_by_text_ignores_case() {
        let (db, _temp) = open_temp();
        let conn = db.connect().unwrap();
        let store = ContentStore::new(&conn);

        let word = store.create_word(NewWord::new("Harbor"), t0()).unwrap();
        let found = store.find_word_by_text("harbor").unwrap().unwrap();
        assert_eq!(found.id, word.id);
        assert!(store.find_word_by_text("harbour").unwrap().is_none());
    }

    #[test]
    fn test_word_set_keeps_word_order() {
        let (db, _temp) = open_temp();
        let conn = db.connect().unwrap();
        let store = ContentStore::new(&conn);
        let teacher = UserDirectory::new(&conn).resolve_default_teacher(t0()).unwrap();

        let a = store.create_word(NewWord::new("alpha"), t0()).unwrap();
        let b = store.create_word(NewWord::new("beta"), t0()).unwrap();
        let c = store.create_word(NewWord::new("gamma"), t0()).unwrap();

        let set = store
            .create_word_set(
                NewWordSet {
                    name: "Unit 1 - Health Words".to_string(),
                    story_en: Some("Once upon a time".to_string()),
                    word_ids: vec![c.id, a.id, b.id],
                    ..NewWordSet::default()
                },
                teacher.id,
                t0(),
            )
            .unwrap();

        let fetched = store.get_word_set(set.id).unwrap().unwrap();
        assert_eq!(fetched.word_ids, vec![c.id, a.id, b.id]);
        assert_eq!(fetched.created_by, teacher.id);

        let texts: Vec<_> = store
            .words_in_set(set.id)
            .unwrap()
            .into_iter()
            .map(|w| w.text)
            .collect();
        assert_eq!(texts, vec!["gamma", "alpha", "beta"]);

        let all = store.list_word_sets().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].word_ids.len(), 3);
    }

    #[test]
    fn test_word_set_rejects_unknown_and_duplicate_words() {
        let (db, _temp) = open_temp();
        let conn = db.connect().unwrap();
        let store = ContentStore::new(&conn);
        let teacher = UserDirectory::new(&conn).resolve_default_teacher(t0()).unwrap();
        let word = store.create_word(NewWord::new("delta"), t0()).unwrap();

        let missing = store
            .create_word_set(
                NewWordSet {
                    name: "Set".to_string(),
                    word_ids: vec![Uuid::new_v4()],
                    ..NewWordSet::default()
                },
                teacher.id,
                t0(),
            )
            .unwrap_err();
        assert!(missing.is_not_found());

        let duplicate = store
            .create_word_set(
                NewWordSet {
                    name: "Set".to_string(),
                    word_ids: vec![word.id, word.id],
                    ..NewWordSet::default()
                },
                teacher.id,
                t0(),
            )
            .unwrap_err();
        assert!(duplicate.is_validation());
        assert!(store.list_word_sets().unwrap().is_empty());
    }
}
