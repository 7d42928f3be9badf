use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use uuid::Uuid;

use flashy_lib::flashcards::{Deck, Flashcard};
use flashy_lib::quizzes::{Quiz, QuizQuestion};
use flashy_lib::{Config, FileStorage, StudyStore, SystemClock};

/// Shared application state for CLI commands
pub struct App {
    pub store: StudyStore,
}

impl App {
    /// Open the store in `data_dir`, or the default data directory
    pub fn new(data_dir: Option<PathBuf>) -> Result<Self> {
        let data_dir = match data_dir {
            Some(dir) => dir,
            None => Config::default_data_dir().context("Failed to get data directory")?,
        };

        let config = Config::load(&data_dir).context("Failed to load config.toml")?;
        let storage = FileStorage::new(data_dir.clone());
        let store = StudyStore::open(storage, SystemClock, config)
            .with_context(|| format!("Failed to open study data in {}", data_dir.display()))?;

        Ok(Self { store })
    }

    pub fn save(&self) -> Result<()> {
        self.store.save().context("Failed to save study data")
    }

    pub fn find_deck(&self, query: &str) -> Result<Deck> {
        resolve(self.store.list_decks(), query, "deck", |d| d.id, |d| d.name.as_str()).cloned()
    }

    pub fn find_card(&self, deck: &Deck, query: &str) -> Result<Flashcard> {
        resolve(&deck.flashcards, query, "card", |c| c.id, |c| c.term.as_str()).cloned()
    }

    pub fn find_quiz(&self, query: &str) -> Result<Quiz> {
        resolve(self.store.list_quizzes(), query, "quiz", |q| q.id, |q| q.name.as_str()).cloned()
    }

    pub fn find_question(&self, quiz: &Quiz, query: &str) -> Result<QuizQuestion> {
        resolve(&quiz.questions, query, "question", |q| q.id, |q| q.question_text.as_str()).cloned()
    }
}

/// Find an item by id, exact name, or unique case-insensitive name prefix
fn resolve<'a, T>(
    items: &'a [T],
    query: &str,
    kind: &str,
    id_of: impl Fn(&T) -> Uuid,
    name_of: impl Fn(&T) -> &str,
) -> Result<&'a T> {
    if let Ok(id) = Uuid::parse_str(query) {
        if let Some(item) = items.iter().find(|i| id_of(i) == id) {
            return Ok(item);
        }
    }

    let query_lower = query.trim().to_lowercase();
    if query_lower.is_empty() {
        bail!("Empty {} name", kind);
    }

    // Exact match first
    if let Some(item) = items.iter().find(|i| name_of(i).trim().to_lowercase() == query_lower) {
        return Ok(item);
    }

    // Prefix match
    let matches: Vec<&T> = items
        .iter()
        .filter(|i| name_of(i).to_lowercase().starts_with(&query_lower))
        .collect();

    let list = |found: &[&T]| {
        found
            .iter()
            .map(|i| format!("  - {}", name_of(i)))
            .collect::<Vec<_>>()
            .join("\n")
    };

    match matches.len() {
        0 => {
            let all: Vec<&T> = items.iter().collect();
            bail!("No {} matching '{}'. Available:\n{}", kind, query, list(&all))
        }
        1 => Ok(matches[0]),
        _ => bail!("Ambiguous {} '{}'. Matches:\n{}", kind, query, list(&matches)),
    }
}
