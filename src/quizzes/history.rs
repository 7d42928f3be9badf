//! Global answer history across all quizzes, newest first

use serde::{Deserialize, Serialize};

use super::models::QuizHistoryEntry;

/// Number of entries kept unless configured otherwise
pub const DEFAULT_HISTORY_LIMIT: usize = 20;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizHistory {
    #[serde(default)]
    pub history: Vec<QuizHistoryEntry>,
}

impl QuizHistory {
    /// Record an answer, dropping the oldest entries past `limit`
    pub fn record(&mut self, entry: QuizHistoryEntry, limit: usize) {
        self.history.insert(0, entry);
        self.history.truncate(limit);
    }

    pub fn entries(&self) -> &[QuizHistoryEntry] {
        &self.history
    }

    pub fn for_quiz(&self, quiz_id: uuid::Uuid) -> impl Iterator<Item = &QuizHistoryEntry> {
        self.history.iter().filter(move |e| e.quiz_id == quiz_id)
    }

    pub fn clear(&mut self) {
        self.history.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use uuid::Uuid;

    fn entry(quiz_id: Uuid, n: i64) -> QuizHistoryEntry {
        QuizHistoryEntry {
            quiz_id,
            question_id: Uuid::new_v4(),
            question_text: format!("Question {}", n),
            selected_option: "a".into(),
            correct_option: "b".into(),
            is_correct: false,
            is_multiple_choice: false,
            options: Vec::new(),
            timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::minutes(n),
        }
    }

    #[test]
    fn test_newest_first_and_capped() {
        let quiz = Uuid::new_v4();
        let mut history = QuizHistory::default();
        for n in 0..25 {
            history.record(entry(quiz, n), DEFAULT_HISTORY_LIMIT);
        }

        assert_eq!(history.entries().len(), DEFAULT_HISTORY_LIMIT);
        assert_eq!(history.entries()[0].question_text, "Question 24");
        assert_eq!(history.entries()[19].question_text, "Question 5");
    }

    #[test]
    fn test_for_quiz() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let mut history = QuizHistory::default();
        history.record(entry(a, 0), 10);
        history.record(entry(b, 1), 10);
        history.record(entry(a, 2), 10);

        assert_eq!(history.for_quiz(a).count(), 2);
        assert_eq!(history.for_quiz(b).count(), 1);

        history.clear();
        assert!(history.entries().is_empty());
    }
}
