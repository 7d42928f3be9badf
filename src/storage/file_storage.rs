//! Key-value blob storage
//!
//! Each key is one pretty-printed JSON file under the data directory:
//! ```text
//! {data-dir}/
//! ├── flashy-storage.json                       # decks and quizzes
//! └── flashy-global-quiz-history-storage.json   # quiz answer history
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use super::models::{Persisted, StudyState};
use crate::quizzes::QuizHistory;

/// Key for decks and quizzes
pub const STATE_KEY: &str = "flashy-storage";
/// Key for the global quiz history
pub const HISTORY_KEY: &str = "flashy-global-quiz-history-storage";

/// Layout version written into every blob
const STORAGE_VERSION: u32 = 0;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Deck not found: {0}")]
    DeckNotFound(Uuid),

    #[error("Card not found: {0}")]
    CardNotFound(Uuid),

    #[error("Quiz not found: {0}")]
    QuizNotFound(Uuid),

    #[error("Question not found: {0}")]
    QuestionNotFound(Uuid),

    #[error("A flashcard with the term \"{0}\" already exists in this deck")]
    DuplicateTerm(String),

    #[error("Invalid question: {0}")]
    InvalidQuestion(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}

pub type Result<T> = std::result::Result<T, StorageError>;

pub struct FileStorage {
    base_path: PathBuf,
}

impl FileStorage {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Initialize storage directories
    pub fn init(&self) -> Result<()> {
        fs::create_dir_all(&self.base_path)?;
        Ok(())
    }

    fn blob_path(&self, key: &str) -> PathBuf {
        self.base_path.join(format!("{}.json", key))
    }

    /// Read a value, or its default if nothing has been stored under `key`
    pub fn get_item<T: DeserializeOwned + Default>(&self, key: &str) -> Result<T> {
        let path = self.blob_path(key);
        if !path.exists() {
            return Ok(T::default());
        }

        let content = fs::read_to_string(&path)?;
        let blob: Persisted<T> = serde_json::from_str(&content)?;
        if blob.version != STORAGE_VERSION {
            log::warn!(
                "Stored {} has version {}, expected {}",
                key,
                blob.version,
                STORAGE_VERSION
            );
        }
        Ok(blob.state)
    }

    /// Write a value, replacing anything stored under `key`
    pub fn set_item<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        self.init()?;
        let blob = Persisted {
            state: value,
            version: STORAGE_VERSION,
        };
        let path = self.blob_path(key);
        // Replace atomically
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string_pretty(&blob)?)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    pub fn remove_item(&self, key: &str) -> Result<()> {
        let path = self.blob_path(key);
        if path.exists() {
            fs::remove_file(&path)?;
        }
        Ok(())
    }

    pub fn load_state(&self) -> Result<StudyState> {
        self.get_item(STATE_KEY)
    }

    pub fn save_state(&self, state: &StudyState) -> Result<()> {
        self.set_item(STATE_KEY, state)
    }

    pub fn load_history(&self) -> Result<QuizHistory> {
        self.get_item(HISTORY_KEY)
    }

    pub fn save_history(&self, history: &QuizHistory) -> Result<()> {
        self.set_item(HISTORY_KEY, history)
    }
}
