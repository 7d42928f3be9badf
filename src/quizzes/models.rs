//! Data models for quizzes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default time allowed per question, in seconds
pub const DEFAULT_TIMER_DURATION: u32 = 300;

pub const MIN_OPTIONS: usize = 2;
pub const MAX_OPTIONS: usize = 4;

/// A named set of questions
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub questions: Vec<QuizQuestion>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub timer_enabled: bool,
    /// Seconds allowed per question when the timer is enabled
    #[serde(default = "default_timer_duration")]
    pub timer_duration: u32,
}

fn default_timer_duration() -> u32 {
    DEFAULT_TIMER_DURATION
}

impl Quiz {
    pub fn new(name: String, timer_enabled: bool, timer_duration: u32, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            questions: Vec::new(),
            created_at: now,
            updated_at: now,
            timer_enabled,
            timer_duration,
        }
    }

    pub fn find_question(&self, question_id: Uuid) -> Option<&QuizQuestion> {
        self.questions.iter().find(|q| q.id == question_id)
    }

    pub(crate) fn find_question_mut(&mut self, question_id: Uuid) -> Option<&mut QuizQuestion> {
        self.questions.iter_mut().find(|q| q.id == question_id)
    }
}

/// One selectable answer of a multiple-choice question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestionOption {
    pub id: Uuid,
    pub text: String,
}

impl QuizQuestionOption {
    pub fn new(text: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            text,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub id: Uuid,
    pub question_text: String,
    #[serde(default)]
    pub is_multiple_choice: bool,
    #[serde(default)]
    pub options: Vec<QuizQuestionOption>,
    /// Expected answer. For multiple choice, the text of the correct option.
    pub correct_answer: String,
    #[serde(default)]
    pub correct_count: u32,
    #[serde(default)]
    pub incorrect_count: u32,
}

impl QuizQuestion {
    pub fn correct_option(&self) -> Option<&QuizQuestionOption> {
        self.options.iter().find(|o| o.text == self.correct_answer)
    }
}

/// Input for a new question
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NewQuizQuestion {
    /// Answered by typing text
    FreeText {
        question_text: String,
        correct_answer: String,
    },
    /// Answered by picking one of 2-4 options
    MultipleChoice {
        question_text: String,
        options: Vec<String>,
        correct_index: usize,
    },
}

/// Edits to an existing question
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestionUpdate {
    pub question_text: Option<String>,
    /// Switch between multiple choice and free text. Free-text questions
    /// drop their options.
    pub is_multiple_choice: Option<bool>,
    pub correct_answer: Option<String>,
    /// Replaces all options, keeping the id at each existing position.
    /// `correct_answer` must name one of them.
    pub options: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizUpdate {
    pub name: Option<String>,
    pub timer_enabled: Option<bool>,
    pub timer_duration: Option<u32>,
}

/// A learner's response to a question
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizAnswer {
    Text(String),
    Option(Uuid),
    /// The question timer ran out
    TimedOut,
}

/// Result of answering a question
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerOutcome {
    pub question_id: Uuid,
    pub is_correct: bool,
    pub selected_option: String,
    pub correct_option: String,
}

/// One answered question, kept in the global history
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizHistoryEntry {
    pub quiz_id: Uuid,
    pub question_id: Uuid,
    pub question_text: String,
    pub selected_option: String,
    pub correct_option: String,
    #[serde(default)]
    pub is_correct: bool,
    pub is_multiple_choice: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<QuizQuestionOption>,
    pub timestamp: DateTime<Utc>,
}
