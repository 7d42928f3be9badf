use serde::{Deserialize, Serialize};

use crate::flashcards::Deck;
use crate::quizzes::Quiz;

/// Everything the study store owns, as persisted
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyState {
    #[serde(default)]
    pub decks: Vec<Deck>,
    #[serde(default)]
    pub quizzes: Vec<Quiz>,
}

/// Envelope written around each stored value
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Persisted<T> {
    pub state: T,
    #[serde(default)]
    pub version: u32,
}
