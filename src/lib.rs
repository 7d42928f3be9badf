//! Flashcard and quiz study store with fixed-interval review scheduling

pub mod clock;
pub mod config;
pub mod flashcards;
pub mod quizzes;
pub mod storage;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{Config, ConfigError};
pub use flashcards::{schedule_review, Grade, ReviewResult};
pub use storage::{FileStorage, StorageError, StudyStore};
