//! Quizzes: questions, answer checking, session ordering and history

pub mod grading;
pub mod history;
pub mod models;
pub mod session;

pub use history::QuizHistory;
pub use models::*;
