//! Question ordering for a study session

use std::cmp::Reverse;

use rand::seq::SliceRandom;
use rand::Rng;

use super::models::QuizQuestion;

/// Order questions so the most-missed come first.
///
/// Sorted by incorrect count (descending), then correct count (ascending).
/// Questions that tie on both are shuffled.
pub fn session_order<R: Rng + ?Sized>(questions: &[QuizQuestion], rng: &mut R) -> Vec<QuizQuestion> {
    let mut ordered = questions.to_vec();
    ordered.shuffle(rng);
    // Stable sort keeps the shuffled order within ties
    ordered.sort_by_key(|q| (Reverse(q.incorrect_count), q.correct_count));
    ordered
}
