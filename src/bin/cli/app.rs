use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use uuid::Uuid;

use lexigrow_lib::auth::TeacherGate;
use lexigrow_lib::config::LexiGrowConfig;
use lexigrow_lib::content::{Word, WordSet};
use lexigrow_lib::users::User;
use lexigrow_lib::LearningEngine;

/// Shared application state for CLI commands
pub struct App {
    pub config: LexiGrowConfig,
    pub engine: LearningEngine,
}

impl App {
    /// Load config and open the database in the given (or default) data directory
    pub fn new(data_dir: Option<PathBuf>) -> Result<Self> {
        let config = LexiGrowConfig::load(data_dir).context("Failed to load configuration")?;
        log::debug!("Using config {:?}", config);

        let engine = LearningEngine::open(&config).with_context(|| {
            format!("Failed to open database at {:?}", config.database_path())
        })?;

        Ok(Self { config, engine })
    }

    /// Fail unless the supplied password opens the teacher gate
    pub fn require_teacher(&self, password: Option<&str>) -> Result<()> {
        let gate = TeacherGate::from_config(&self.config);
        let attempt = password.context("This command requires --teacher-password")?;
        let session = gate.login(attempt, Utc::now())?;
        log::debug!("Teacher session valid until {}", session.expires_at);
        Ok(())
    }

    /// Resolve a student by id or name, or fall back to the shared student
    pub fn resolve_student(&self, query: Option<&str>) -> Result<User> {
        let Some(query) = query else {
            return Ok(self.engine.resolve_current_student()?);
        };

        if let Ok(id) = Uuid::parse_str(query) {
            return self
                .engine
                .get_student(id)?
                .with_context(|| format!("No student with id {}", id));
        }

        let students = self.engine.list_students()?;
        let query_lower = query.to_lowercase();
        let matches: Vec<&User> = students
            .iter()
            .filter(|s| s.name.to_lowercase() == query_lower)
            .collect();

        match matches.len() {
            0 => bail!("No student named '{}'", query),
            1 => Ok(matches[0].clone()),
            _ => bail!(
                "Ambiguous student name '{}'. Use an id instead:\n{}",
                query,
                matches
                    .iter()
                    .map(|s| format!("  - {} ({})", s.name, s.id))
                    .collect::<Vec<_>>()
                    .join("\n")
            ),
        }
    }

    /// Find a word by id or headword
    pub fn find_word(&self, query: &str) -> Result<Word> {
        if let Ok(id) = Uuid::parse_str(query) {
            return self
                .engine
                .get_word(id)?
                .with_context(|| format!("No word with id {}", id));
        }
        self.engine
            .find_word_by_text(query)?
            .with_context(|| format!("No word '{}' in the word bank", query))
    }

    /// Find a word-set by id or name (case-insensitive prefix match)
    pub fn find_word_set(&self, query: &str) -> Result<WordSet> {
        if let Ok(id) = Uuid::parse_str(query) {
            return self
                .engine
                .get_word_set(id)?
                .with_context(|| format!("No word-set with id {}", id));
        }

        let sets = self.engine.list_word_sets()?;
        let query_lower = query.to_lowercase();

        // Exact match first
        if let Some(set) = sets.iter().find(|s| s.name.to_lowercase() == query_lower) {
            return Ok(set.clone());
        }

        let matches: Vec<&WordSet> = sets
            .iter()
            .filter(|s| s.name.to_lowercase().starts_with(&query_lower))
            .collect();

        match matches.len() {
            0 => bail!("No word-set matching '{}'", query),
            1 => Ok(matches[0].clone()),
            _ => bail!(
                "Ambiguous word-set name '{}'. Matches:\n{}",
                query,
                matches
                    .iter()
                    .map(|s| format!("  - {}", s.name))
                    .collect::<Vec<_>>()
                    .join("\n")
            ),
        }
    }
}
