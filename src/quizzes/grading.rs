//! Question validation and answer checking

use super::models::*;
use crate::storage::{Result, StorageError};

const TIMEOUT_LABEL: &str = "Timeout";

fn invalid(msg: impl Into<String>) -> StorageError {
    StorageError::InvalidQuestion(msg.into())
}

fn validate_options(options: &[String]) -> Result<()> {
    if options.len() < MIN_OPTIONS {
        return Err(invalid(format!(
            "Multiple choice questions must have at least {} options",
            MIN_OPTIONS
        )));
    }
    if options.len() > MAX_OPTIONS {
        return Err(invalid(format!(
            "Multiple choice questions can have at most {} options",
            MAX_OPTIONS
        )));
    }
    if options.iter().any(|o| o.trim().is_empty()) {
        return Err(invalid("Option text cannot be empty"));
    }
    Ok(())
}

/// Validate a new question and give it ids and zeroed counters
pub fn build_question(input: NewQuizQuestion) -> Result<QuizQuestion> {
    match input {
        NewQuizQuestion::FreeText {
            question_text,
            correct_answer,
        } => {
            if question_text.trim().is_empty() {
                return Err(invalid("Question text cannot be empty"));
            }
            if correct_answer.trim().is_empty() {
                return Err(invalid("Correct answer cannot be empty"));
            }
            Ok(QuizQuestion {
                id: uuid::Uuid::new_v4(),
                question_text,
                is_multiple_choice: false,
                options: Vec::new(),
                correct_answer,
                correct_count: 0,
                incorrect_count: 0,
            })
        }
        NewQuizQuestion::MultipleChoice {
            question_text,
            options,
            correct_index,
        } => {
            if question_text.trim().is_empty() {
                return Err(invalid("Question text cannot be empty"));
            }
            validate_options(&options)?;
            let correct_answer = options
                .get(correct_index)
                .cloned()
                .ok_or_else(|| invalid("Please select a correct answer"))?;

            Ok(QuizQuestion {
                id: uuid::Uuid::new_v4(),
                question_text,
                is_multiple_choice: true,
                options: options.into_iter().map(QuizQuestionOption::new).collect(),
                correct_answer,
                correct_count: 0,
                incorrect_count: 0,
            })
        }
    }
}

/// Apply edits, keeping the question valid. Counters are untouched.
pub fn apply_question_update(question: &mut QuizQuestion, update: QuizQuestionUpdate) -> Result<()> {
    let mut next = question.clone();

    if let Some(text) = update.question_text {
        if text.trim().is_empty() {
            return Err(invalid("Question text cannot be empty"));
        }
        next.question_text = text;
    }
    if let Some(multiple_choice) = update.is_multiple_choice {
        next.is_multiple_choice = multiple_choice;
        if !multiple_choice {
            next.options.clear();
        }
    }
    if let Some(options) = update.options {
        if !next.is_multiple_choice {
            return Err(invalid("Free-text questions have no options"));
        }
        validate_options(&options)?;
        next.options = options
            .into_iter()
            .enumerate()
            .map(|(i, text)| match next.options.get(i) {
                Some(existing) => QuizQuestionOption { id: existing.id, text },
                None => QuizQuestionOption::new(text),
            })
            .collect();
    }
    if let Some(answer) = update.correct_answer {
        next.correct_answer = answer;
    }

    if next.correct_answer.trim().is_empty() {
        return Err(invalid("Correct answer cannot be empty"));
    }
    if next.is_multiple_choice && next.correct_option().is_none() {
        return Err(invalid("Correct answer must match one of the options"));
    }

    *question = next;
    Ok(())
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Check an answer against a question
pub fn grade_answer(question: &QuizQuestion, answer: &QuizAnswer) -> Result<AnswerOutcome> {
    let (selected_option, is_correct) = match answer {
        QuizAnswer::TimedOut => (TIMEOUT_LABEL.to_string(), false),
        QuizAnswer::Option(option_id) => {
            if !question.is_multiple_choice {
                return Err(StorageError::InvalidOperation(
                    "Free-text questions cannot be answered with an option".to_string(),
                ));
            }
            let option = question
                .options
                .iter()
                .find(|o| o.id == *option_id)
                .ok_or_else(|| StorageError::NotFound(format!("Option {}", option_id)))?;
            (option.text.clone(), option.text == question.correct_answer)
        }
        QuizAnswer::Text(text) => {
            let is_correct = normalize(text) == normalize(&question.correct_answer);
            (text.clone(), is_correct)
        }
    };

    Ok(AnswerOutcome {
        question_id: question.id,
        is_correct,
        selected_option,
        correct_option: question.correct_answer.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capitals() -> QuizQuestion {
        build_question(NewQuizQuestion::MultipleChoice {
            question_text: "Capital of France?".into(),
            options: vec!["Lyon".into(), "Paris".into(), "Nice".into()],
            correct_index: 1,
        })
        .unwrap()
    }

    #[test]
    fn test_build_multiple_choice() {
        let q = capitals();
        assert!(q.is_multiple_choice);
        assert_eq!(q.options.len(), 3);
        assert_eq!(q.correct_answer, "Paris");
        assert_eq!(q.correct_option().unwrap().text, "Paris");
        assert_eq!(q.correct_count, 0);
        assert_eq!(q.incorrect_count, 0);
    }

    #[test]
    fn test_build_rejects_bad_option_counts() {
        let one = NewQuizQuestion::MultipleChoice {
            question_text: "?".into(),
            options: vec!["a".into()],
            correct_index: 0,
        };
        assert!(matches!(build_question(one), Err(StorageError::InvalidQuestion(_))));

        let five = NewQuizQuestion::MultipleChoice {
            question_text: "?".into(),
            options: (0..5).map(|i| i.to_string()).collect(),
            correct_index: 0,
        };
        assert!(build_question(five).is_err());

        let out_of_range = NewQuizQuestion::MultipleChoice {
            question_text: "?".into(),
            options: vec!["a".into(), "b".into()],
            correct_index: 2,
        };
        assert!(build_question(out_of_range).is_err());
    }

    #[test]
    fn test_build_free_text_requires_answer() {
        let q = NewQuizQuestion::FreeText {
            question_text: "2 + 2".into(),
            correct_answer: "   ".into(),
        };
        assert!(build_question(q).is_err());
    }

    #[test]
    fn test_grade_free_text_is_lenient() {
        let q = build_question(NewQuizQuestion::FreeText {
            question_text: "Chemical symbol for gold".into(),
            correct_answer: "Au".into(),
        })
        .unwrap();

        let outcome = grade_answer(&q, &QuizAnswer::Text("  au ".into())).unwrap();
        assert!(outcome.is_correct);
        assert_eq!(outcome.correct_option, "Au");

        let outcome = grade_answer(&q, &QuizAnswer::Text("Ag".into())).unwrap();
        assert!(!outcome.is_correct);
    }

    #[test]
    fn test_grade_option() {
        let q = capitals();
        let paris = q.options[1].id;
        let lyon = q.options[0].id;

        assert!(grade_answer(&q, &QuizAnswer::Option(paris)).unwrap().is_correct);

        let wrong = grade_answer(&q, &QuizAnswer::Option(lyon)).unwrap();
        assert!(!wrong.is_correct);
        assert_eq!(wrong.selected_option, "Lyon");

        assert!(grade_answer(&q, &QuizAnswer::Option(uuid::Uuid::new_v4())).is_err());
    }

    #[test]
    fn test_grade_timeout() {
        let outcome = grade_answer(&capitals(), &QuizAnswer::TimedOut).unwrap();
        assert!(!outcome.is_correct);
        assert_eq!(outcome.selected_option, "Timeout");
    }

    #[test]
    fn test_update_keeps_correct_answer_valid() {
        let mut q = capitals();
        let update = QuizQuestionUpdate {
            options: Some(vec!["Berlin".into(), "Madrid".into()]),
            ..Default::default()
        };
        // "Paris" is no longer an option
        assert!(apply_question_update(&mut q, update).is_err());
        assert_eq!(q.options.len(), 3);

        let update = QuizQuestionUpdate {
            options: Some(vec!["Berlin".into(), "Madrid".into()]),
            correct_answer: Some("Madrid".into()),
            ..Default::default()
        };
        apply_question_update(&mut q, update).unwrap();
        assert_eq!(q.correct_option().unwrap().text, "Madrid");
    }

    #[test]
    fn test_update_keeps_option_ids_by_position() {
        let mut q = capitals();
        let ids: Vec<_> = q.options.iter().map(|o| o.id).collect();

        let update = QuizQuestionUpdate {
            options: Some(vec!["Lyon".into(), "Paris".into(), "Marseille".into(), "Lille".into()]),
            ..Default::default()
        };
        apply_question_update(&mut q, update).unwrap();

        assert_eq!(q.options.len(), 4);
        assert_eq!(q.options[0].id, ids[0]);
        assert_eq!(q.options[1].id, ids[1]);
        assert_eq!(q.options[2].id, ids[2]);
        assert_eq!(q.options[2].text, "Marseille");
        assert!(!ids.contains(&q.options[3].id));
    }

    #[test]
    fn test_switch_free_text_to_multiple_choice() {
        let mut q = build_question(NewQuizQuestion::FreeText {
            question_text: "Largest planet".into(),
            correct_answer: "Jupiter".into(),
        })
        .unwrap();

        // Options alone are refused while the question is free text
        let options_only = QuizQuestionUpdate {
            options: Some(vec!["Mars".into(), "Jupiter".into()]),
            ..Default::default()
        };
        assert!(apply_question_update(&mut q, options_only).is_err());

        let update = QuizQuestionUpdate {
            is_multiple_choice: Some(true),
            options: Some(vec!["Mars".into(), "Jupiter".into()]),
            ..Default::default()
        };
        apply_question_update(&mut q, update).unwrap();
        assert!(q.is_multiple_choice);
        assert_eq!(q.correct_option().unwrap().text, "Jupiter");

        let jupiter = q.options[1].id;
        assert!(grade_answer(&q, &QuizAnswer::Option(jupiter)).unwrap().is_correct);
    }

    #[test]
    fn test_switch_multiple_choice_to_free_text() {
        let mut q = capitals();
        let update = QuizQuestionUpdate {
            is_multiple_choice: Some(false),
            ..Default::default()
        };
        apply_question_update(&mut q, update).unwrap();

        assert!(!q.is_multiple_choice);
        assert!(q.options.is_empty());
        assert_eq!(q.correct_answer, "Paris");
        assert!(grade_answer(&q, &QuizAnswer::Text("paris".into())).unwrap().is_correct);
    }

    #[test]
    fn test_switch_to_multiple_choice_needs_options() {
        let mut q = build_question(NewQuizQuestion::FreeText {
            question_text: "2 + 2".into(),
            correct_answer: "4".into(),
        })
        .unwrap();
        let update = QuizQuestionUpdate {
            is_multiple_choice: Some(true),
            ..Default::default()
        };
        assert!(apply_question_update(&mut q, update).is_err());
        assert!(!q.is_multiple_choice);
    }
}
