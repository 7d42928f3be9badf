//! The study store: decks, flashcards, quizzes and quiz history
//!
//! `StudyStore` is an explicit state container. Callers hold it (or a
//! reference to it) and every mutation goes through `&mut self`. Time comes
//! from the injected [`Clock`], so the scheduler sees a deterministic `now`.
//! Changes stay in memory until [`StudyStore::save`] is called.

use rand::Rng;
use uuid::Uuid;

use super::file_storage::{FileStorage, Result, StorageError};
use super::models::StudyState;
use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::flashcards::algorithm::schedule_review;
use crate::flashcards::*;
use crate::quizzes::grading::{apply_question_update, build_question, grade_answer};
use crate::quizzes::session::session_order;
use crate::quizzes::*;

pub struct StudyStore<C: Clock = SystemClock> {
    state: StudyState,
    history: QuizHistory,
    config: Config,
    clock: C,
    storage: Option<FileStorage>,
}

impl<C: Clock> StudyStore<C> {
    /// A store that is never written to disk
    pub fn in_memory(clock: C, config: Config) -> Self {
        Self {
            state: StudyState::default(),
            history: QuizHistory::default(),
            config,
            clock,
            storage: None,
        }
    }

    /// Load decks, quizzes and history from `storage`
    pub fn open(storage: FileStorage, clock: C, config: Config) -> Result<Self> {
        storage.init()?;
        let state = storage.load_state()?;
        let history = storage.load_history()?;
        log::info!(
            "Opened study store at {:?} ({} decks, {} quizzes)",
            storage.base_path(),
            state.decks.len(),
            state.quizzes.len()
        );

        Ok(Self {
            state,
            history,
            config,
            clock,
            storage: Some(storage),
        })
    }

    /// Persist the current state. A no-op for in-memory stores.
    pub fn save(&self) -> Result<()> {
        if let Some(storage) = &self.storage {
            storage.save_state(&self.state)?;
            storage.save_history(&self.history)?;
            log::debug!("Saved study store to {:?}", storage.base_path());
        }
        Ok(())
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn state(&self) -> &StudyState {
        &self.state
    }

    // ==================== Deck Operations ====================

    pub fn list_decks(&self) -> &[Deck] {
        &self.state.decks
    }

    pub fn get_deck(&self, deck_id: Uuid) -> Result<&Deck> {
        self.state
            .decks
            .iter()
            .find(|d| d.id == deck_id)
            .ok_or(StorageError::DeckNotFound(deck_id))
    }

    fn deck_mut(&mut self, deck_id: Uuid) -> Result<&mut Deck> {
        self.state
            .decks
            .iter_mut()
            .find(|d| d.id == deck_id)
            .ok_or(StorageError::DeckNotFound(deck_id))
    }

    pub fn add_deck(&mut self, name: &str) -> Deck {
        let deck = Deck::new(name.to_string(), self.clock.now());
        self.state.decks.push(deck.clone());
        log::info!("Created deck {} ({})", deck.name, deck.id);
        deck
    }

    pub fn update_deck(&mut self, deck_id: Uuid, update: DeckUpdate) -> Result<Deck> {
        let now = self.clock.now();
        let deck = self.deck_mut(deck_id)?;
        if let Some(name) = update.name {
            deck.name = name;
        }
        deck.updated_at = now;
        Ok(deck.clone())
    }

    /// Delete a deck and all its cards
    pub fn remove_deck(&mut self, deck_id: Uuid) -> Result<Deck> {
        let pos = self
            .state
            .decks
            .iter()
            .position(|d| d.id == deck_id)
            .ok_or(StorageError::DeckNotFound(deck_id))?;
        let deck = self.state.decks.remove(pos);
        log::info!("Deleted deck {} with {} cards", deck.id, deck.flashcards.len());
        Ok(deck)
    }

    // ==================== Card Operations ====================

    pub fn get_flashcard(&self, deck_id: Uuid, card_id: Uuid) -> Result<&Flashcard> {
        self.get_deck(deck_id)?
            .find_card(card_id)
            .ok_or(StorageError::CardNotFound(card_id))
    }

    /// Add a card, due immediately. A term already present in the deck
    /// (ignoring case and surrounding whitespace) is rejected.
    pub fn add_flashcard(&mut self, deck_id: Uuid, input: NewFlashcard) -> Result<Flashcard> {
        let now = self.clock.now();
        let deck = self.deck_mut(deck_id)?;

        if deck.has_term(&input.term) {
            log::warn!("Rejected duplicate term {:?} in deck {}", input.term, deck_id);
            return Err(StorageError::DuplicateTerm(input.term.trim().to_string()));
        }

        let card = Flashcard::new(input.term, input.definition, now);
        deck.flashcards.push(card.clone());
        deck.updated_at = now;
        Ok(card)
    }

    /// Edit a card's text. Scheduling fields are left alone.
    pub fn update_flashcard(
        &mut self,
        deck_id: Uuid,
        card_id: Uuid,
        update: FlashcardUpdate,
    ) -> Result<Flashcard> {
        let now = self.clock.now();
        let deck = self.deck_mut(deck_id)?;
        let card = deck
            .find_card_mut(card_id)
            .ok_or(StorageError::CardNotFound(card_id))?;

        if let Some(term) = update.term {
            card.term = term;
        }
        if let Some(definition) = update.definition {
            card.definition = definition;
        }
        let updated = card.clone();
        deck.updated_at = now;
        Ok(updated)
    }

    pub fn remove_flashcard(&mut self, deck_id: Uuid, card_id: Uuid) -> Result<Flashcard> {
        let now = self.clock.now();
        let deck = self.deck_mut(deck_id)?;
        let pos = deck
            .flashcards
            .iter()
            .position(|c| c.id == card_id)
            .ok_or(StorageError::CardNotFound(card_id))?;
        let card = deck.flashcards.remove(pos);
        deck.updated_at = now;
        Ok(card)
    }

    /// Grade a card and reschedule it
    pub fn give_flashcard_feedback(
        &mut self,
        deck_id: Uuid,
        card_id: Uuid,
        grade: Grade,
    ) -> Result<Flashcard> {
        let now = self.clock.now();
        let deck = self.deck_mut(deck_id)?;
        let card = deck
            .find_card_mut(card_id)
            .ok_or(StorageError::CardNotFound(card_id))?;

        let result = schedule_review(card.ease_factor, grade, now);
        log::debug!(
            "Card {} graded {}: ease {:.2} -> {:.2}, next review {}",
            card_id,
            grade,
            card.effective_ease_factor(),
            result.ease_factor,
            result.next_review
        );

        card.last_reviewed = Some(result.last_reviewed);
        card.next_review = Some(result.next_review);
        card.ease_factor = Some(result.ease_factor);
        card.interval = result.interval;
        let updated = card.clone();
        deck.updated_at = now;
        Ok(updated)
    }

    /// Cards due now, soonest `next_review` first
    pub fn due_flashcards(&self, deck_id: Uuid) -> Result<Vec<Flashcard>> {
        let now = self.clock.now();
        let mut due: Vec<Flashcard> = self
            .get_deck(deck_id)?
            .flashcards
            .iter()
            .filter(|c| c.is_due(now))
            .cloned()
            .collect();
        due.sort_by_key(|c| c.next_review);
        Ok(due)
    }

    pub fn deck_stats(&self, deck_id: Uuid) -> Result<DeckStats> {
        let now = self.clock.now();
        let deck = self.get_deck(deck_id)?;

        let mut stats = DeckStats {
            total_cards: deck.flashcards.len(),
            ..Default::default()
        };
        for card in &deck.flashcards {
            if card.is_due(now) {
                stats.due_cards += 1;
            }
            if card.last_reviewed.is_none() {
                stats.never_reviewed += 1;
            }
        }
        if !deck.flashcards.is_empty() {
            let sum: f64 = deck.flashcards.iter().map(|c| c.effective_ease_factor()).sum();
            stats.average_ease_factor = Some(sum / deck.flashcards.len() as f64);
        }

        Ok(stats)
    }

    // ==================== Quiz Operations ====================

    pub fn list_quizzes(&self) -> &[Quiz] {
        &self.state.quizzes
    }

    pub fn get_quiz(&self, quiz_id: Uuid) -> Result<&Quiz> {
        self.state
            .quizzes
            .iter()
            .find(|q| q.id == quiz_id)
            .ok_or(StorageError::QuizNotFound(quiz_id))
    }

    fn quiz_mut(&mut self, quiz_id: Uuid) -> Result<&mut Quiz> {
        self.state
            .quizzes
            .iter_mut()
            .find(|q| q.id == quiz_id)
            .ok_or(StorageError::QuizNotFound(quiz_id))
    }

    /// Create a quiz. `timer_duration` falls back to the configured default.
    pub fn add_quiz(&mut self, name: &str, timer_enabled: bool, timer_duration: Option<u32>) -> Quiz {
        let duration = timer_duration.unwrap_or(self.config.default_timer_duration);
        let quiz = Quiz::new(name.to_string(), timer_enabled, duration, self.clock.now());
        self.state.quizzes.push(quiz.clone());
        log::info!("Created quiz {} ({})", quiz.name, quiz.id);
        quiz
    }

    pub fn update_quiz(&mut self, quiz_id: Uuid, update: QuizUpdate) -> Result<Quiz> {
        let now = self.clock.now();
        let quiz = self.quiz_mut(quiz_id)?;
        if let Some(name) = update.name {
            quiz.name = name;
        }
        if let Some(enabled) = update.timer_enabled {
            quiz.timer_enabled = enabled;
        }
        if let Some(duration) = update.timer_duration {
            quiz.timer_duration = duration;
        }
        quiz.updated_at = now;
        Ok(quiz.clone())
    }

    pub fn remove_quiz(&mut self, quiz_id: Uuid) -> Result<Quiz> {
        let pos = self
            .state
            .quizzes
            .iter()
            .position(|q| q.id == quiz_id)
            .ok_or(StorageError::QuizNotFound(quiz_id))?;
        let quiz = self.state.quizzes.remove(pos);
        log::info!("Deleted quiz {} with {} questions", quiz.id, quiz.questions.len());
        Ok(quiz)
    }

    // ==================== Question Operations ====================

    pub fn get_quiz_question(&self, quiz_id: Uuid, question_id: Uuid) -> Result<&QuizQuestion> {
        self.get_quiz(quiz_id)?
            .find_question(question_id)
            .ok_or(StorageError::QuestionNotFound(question_id))
    }

    pub fn add_quiz_question(&mut self, quiz_id: Uuid, input: NewQuizQuestion) -> Result<QuizQuestion> {
        let now = self.clock.now();
        let quiz = self.quiz_mut(quiz_id)?;
        let question = build_question(input)?;
        quiz.questions.push(question.clone());
        quiz.updated_at = now;
        Ok(question)
    }

    pub fn update_quiz_question(
        &mut self,
        quiz_id: Uuid,
        question_id: Uuid,
        update: QuizQuestionUpdate,
    ) -> Result<QuizQuestion> {
        let now = self.clock.now();
        let quiz = self.quiz_mut(quiz_id)?;
        let question = quiz
            .find_question_mut(question_id)
            .ok_or(StorageError::QuestionNotFound(question_id))?;
        apply_question_update(question, update)?;
        let updated = question.clone();
        quiz.updated_at = now;
        Ok(updated)
    }

    pub fn remove_quiz_question(&mut self, quiz_id: Uuid, question_id: Uuid) -> Result<QuizQuestion> {
        let now = self.clock.now();
        let quiz = self.quiz_mut(quiz_id)?;
        let pos = quiz
            .questions
            .iter()
            .position(|q| q.id == question_id)
            .ok_or(StorageError::QuestionNotFound(question_id))?;
        let question = quiz.questions.remove(pos);
        quiz.updated_at = now;
        Ok(question)
    }

    /// Check an answer, bump the question's counters and record it in history
    pub fn answer_quiz_question(
        &mut self,
        quiz_id: Uuid,
        question_id: Uuid,
        answer: &QuizAnswer,
    ) -> Result<AnswerOutcome> {
        let now = self.clock.now();
        let (outcome, entry) = {
            let quiz = self.quiz_mut(quiz_id)?;
            let question = quiz
                .find_question_mut(question_id)
                .ok_or(StorageError::QuestionNotFound(question_id))?;

            let outcome = grade_answer(question, answer)?;
            if outcome.is_correct {
                question.correct_count += 1;
            } else {
                question.incorrect_count += 1;
            }

            let entry = QuizHistoryEntry {
                quiz_id,
                question_id,
                question_text: question.question_text.clone(),
                selected_option: outcome.selected_option.clone(),
                correct_option: outcome.correct_option.clone(),
                is_correct: outcome.is_correct,
                is_multiple_choice: question.is_multiple_choice,
                options: question.options.clone(),
                timestamp: now,
            };
            quiz.updated_at = now;
            (outcome, entry)
        };

        self.history.record(entry, self.config.history_limit);
        Ok(outcome)
    }

    /// Questions in study order, most-missed first
    pub fn quiz_session<R: Rng + ?Sized>(&self, quiz_id: Uuid, rng: &mut R) -> Result<Vec<QuizQuestion>> {
        let quiz = self.get_quiz(quiz_id)?;
        Ok(session_order(&quiz.questions, rng))
    }

    // ==================== History ====================

    pub fn history(&self) -> &QuizHistory {
        &self.history
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}
