mod file_storage;
mod models;
pub mod study_store;

pub use file_storage::{FileStorage, Result, StorageError, HISTORY_KEY, STATE_KEY};
pub use models::*;
pub use study_store::StudyStore;
