//! Data models for the flashcard system

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Ease factor given to a card that has never been graded
pub const DEFAULT_EASE_FACTOR: f64 = 2.5;

/// Minimum ease factor allowed
pub const MIN_EASE_FACTOR: f64 = 1.3;

/// A named collection of flashcards
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deck {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub flashcards: Vec<Flashcard>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Deck {
    pub fn new(name: String, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            flashcards: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn find_card(&self, card_id: Uuid) -> Option<&Flashcard> {
        self.flashcards.iter().find(|c| c.id == card_id)
    }

    pub(crate) fn find_card_mut(&mut self, card_id: Uuid) -> Option<&mut Flashcard> {
        self.flashcards.iter_mut().find(|c| c.id == card_id)
    }

    /// Whether a card with this term (trimmed, case-insensitive) already exists
    pub fn has_term(&self, term: &str) -> bool {
        let needle = term.trim().to_lowercase();
        self.flashcards
            .iter()
            .any(|c| c.term.trim().to_lowercase() == needle)
    }
}

/// A flashcard with a term (front) and definition (back)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flashcard {
    pub id: Uuid,
    pub term: String,
    pub definition: String,
    /// When feedback was last given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_reviewed: Option<DateTime<Utc>>,
    /// When the card becomes due; unset means due now
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_review: Option<DateTime<Utc>>,
    /// Older records may not carry one; the scheduler applies the default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ease_factor: Option<f64>,
    /// Days until the next review, possibly fractional
    #[serde(default)]
    pub interval: f64,
}

impl Flashcard {
    /// A fresh card, due immediately
    pub fn new(term: String, definition: String, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            term,
            definition,
            last_reviewed: None,
            next_review: Some(now),
            ease_factor: Some(DEFAULT_EASE_FACTOR),
            interval: 0.0,
        }
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        match self.next_review {
            Some(next) => next <= now,
            None => true,
        }
    }

    pub fn effective_ease_factor(&self) -> f64 {
        self.ease_factor.unwrap_or(DEFAULT_EASE_FACTOR)
    }
}

/// Input for creating a flashcard
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFlashcard {
    pub term: String,
    pub definition: String,
}

/// Text edits to a flashcard. Scheduling fields are not editable here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlashcardUpdate {
    pub term: Option<String>,
    pub definition: Option<String>,
}

/// Deck edits
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckUpdate {
    pub name: Option<String>,
}

/// Learner feedback on how hard a card was to recall
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Grade {
    Easy,
    Medium,
    Hard,
}

impl Grade {
    pub const ALL: [Grade; 3] = [Grade::Hard, Grade::Medium, Grade::Easy];

    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::Easy => "easy",
            Grade::Medium => "medium",
            Grade::Hard => "hard",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown grade: {0} (expected easy, medium or hard)")]
pub struct ParseGradeError(pub String);

impl FromStr for Grade {
    type Err = ParseGradeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Grade::Easy),
            "medium" => Ok(Grade::Medium),
            "hard" => Ok(Grade::Hard),
            other => Err(ParseGradeError(other.to_string())),
        }
    }
}

/// Review summary for a deck
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckStats {
    pub total_cards: usize,
    pub due_cards: usize,
    pub never_reviewed: usize,
    pub average_ease_factor: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn jan_first() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_new_card_is_due_immediately() {
        let now = jan_first();
        let card = Flashcard::new("hola".into(), "hello".into(), now);
        assert_eq!(card.next_review, Some(now));
        assert_eq!(card.ease_factor, Some(DEFAULT_EASE_FACTOR));
        assert_eq!(card.interval, 0.0);
        assert!(card.last_reviewed.is_none());
        assert!(card.is_due(now));
    }

    #[test]
    fn test_is_due() {
        let now = jan_first();
        let mut card = Flashcard::new("a".into(), "b".into(), now);

        card.next_review = Some(now + Duration::hours(1));
        assert!(!card.is_due(now));
        assert!(card.is_due(now + Duration::hours(1)));

        card.next_review = None;
        assert!(card.is_due(now));
    }

    #[test]
    fn test_has_term_ignores_case_and_whitespace() {
        let mut deck = Deck::new("Spanish".into(), jan_first());
        deck.flashcards
            .push(Flashcard::new("Gato".into(), "cat".into(), jan_first()));

        assert!(deck.has_term("gato"));
        assert!(deck.has_term("  GATO "));
        assert!(!deck.has_term("perro"));
    }

    #[test]
    fn test_grade_parse() {
        assert_eq!("easy".parse::<Grade>().unwrap(), Grade::Easy);
        assert_eq!(" Hard".parse::<Grade>().unwrap(), Grade::Hard);
        assert_eq!("MEDIUM".parse::<Grade>().unwrap(), Grade::Medium);
        assert!("again".parse::<Grade>().is_err());
    }

    #[test]
    fn test_flashcard_json_shape() {
        let card = Flashcard::new("term".into(), "def".into(), jan_first());
        let json = serde_json::to_value(&card).unwrap();
        assert_eq!(json["easeFactor"], 2.5);
        assert!(json.get("lastReviewed").is_none());
        assert!(json.get("nextReview").is_some());

        // Records written without scheduling fields still load
        let legacy = r#"{"id":"6f1c1a3e-7c59-4a39-9d8e-2f4d0b7f2a11","term":"x","definition":"y"}"#;
        let card: Flashcard = serde_json::from_str(legacy).unwrap();
        assert!(card.ease_factor.is_none());
        assert_eq!(card.effective_ease_factor(), DEFAULT_EASE_FACTOR);
        assert!(card.is_due(jan_first()));
    }
}
