//! Flashcard decks and review scheduling
//!
//! This module provides:
//! - Deck and flashcard models
//! - The fixed-interval review scheduler
//! - Due-card selection helpers

pub mod algorithm;
pub mod models;

pub use algorithm::{format_interval, schedule_review, ReviewResult};
pub use models::*;
