use anyhow::{bail, Context, Result};
use rand::thread_rng;

use flashy_lib::quizzes::{NewQuizQuestion, QuizAnswer, QuizQuestion, QuizQuestionUpdate, QuizUpdate};

use crate::app::App;
use crate::render::terminal::{paint, truncate, Color};
use crate::OutputFormat;

pub fn run_add(
    app: &mut App,
    name: &str,
    timer: bool,
    duration: Option<u32>,
    format: &OutputFormat,
) -> Result<()> {
    let quiz = app.store.add_quiz(name, timer, duration);
    app.save()?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&quiz)?),
        OutputFormat::Plain => {
            println!("Created quiz \"{}\"", quiz.name);
            if quiz.timer_enabled {
                println!("  Timer: {}s per question", quiz.timer_duration);
            }
            println!("  ID: {}", quiz.id);
        }
    }
    Ok(())
}

pub fn run_list(app: &App, format: &OutputFormat) -> Result<()> {
    let quizzes = app.store.list_quizzes();

    match format {
        OutputFormat::Json => {
            let output: Vec<serde_json::Value> = quizzes
                .iter()
                .map(|quiz| {
                    serde_json::json!({
                        "id": quiz.id.to_string(),
                        "name": quiz.name,
                        "questionCount": quiz.questions.len(),
                        "timerEnabled": quiz.timer_enabled,
                        "timerDuration": quiz.timer_duration,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            if quizzes.is_empty() {
                println!("No quizzes. Create one with `flashy-cli quiz add <name>`.");
                return Ok(());
            }
            for quiz in quizzes {
                let timer = if quiz.timer_enabled {
                    format!(" [timer {}s]", quiz.timer_duration)
                } else {
                    String::new()
                };
                println!("{} ({} questions){}", quiz.name, quiz.questions.len(), timer);
            }
        }
    }
    Ok(())
}

pub fn run_edit(
    app: &mut App,
    query: &str,
    name: Option<String>,
    timer_enabled: Option<bool>,
    timer_duration: Option<u32>,
    format: &OutputFormat,
) -> Result<()> {
    if name.is_none() && timer_enabled.is_none() && timer_duration.is_none() {
        bail!("Nothing to change. Pass --name, --timer/--no-timer or --duration.");
    }

    let quiz = app.find_quiz(query)?;
    let updated = app.store.update_quiz(
        quiz.id,
        QuizUpdate {
            name,
            timer_enabled,
            timer_duration,
        },
    )?;
    app.save()?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&updated)?),
        OutputFormat::Plain => {
            println!("Updated quiz \"{}\"", updated.name);
            if updated.timer_enabled {
                println!("  Timer: {}s per question", updated.timer_duration);
            } else {
                println!("  Timer: off");
            }
        }
    }
    Ok(())
}

pub fn run_remove(app: &mut App, query: &str, format: &OutputFormat) -> Result<()> {
    let quiz = app.find_quiz(query)?;
    let removed = app.store.remove_quiz(quiz.id)?;
    app.save()?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&removed)?),
        OutputFormat::Plain => println!("Deleted quiz \"{}\"", removed.name),
    }
    Ok(())
}

pub fn run_add_question(
    app: &mut App,
    quiz_query: &str,
    text: String,
    answer: Option<String>,
    options: Vec<String>,
    correct: Option<usize>,
    format: &OutputFormat,
) -> Result<()> {
    let quiz = app.find_quiz(quiz_query)?;

    let input = if options.is_empty() {
        let correct_answer = answer.context("Free-text questions need --answer")?;
        NewQuizQuestion::FreeText {
            question_text: text,
            correct_answer,
        }
    } else {
        let number = correct.context("Multiple choice questions need --correct <n>")?;
        if number == 0 {
            bail!("--correct is 1-based");
        }
        NewQuizQuestion::MultipleChoice {
            question_text: text,
            options,
            correct_index: number - 1,
        }
    };

    let question = app.store.add_quiz_question(quiz.id, input)?;
    app.save()?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&question)?),
        OutputFormat::Plain => {
            println!("Added question to {}: {}", quiz.name, question.question_text);
            println!("  ID: {}", question.id);
        }
    }
    Ok(())
}

pub fn run_list_questions(app: &App, quiz_query: &str, format: &OutputFormat) -> Result<()> {
    let quiz = app.find_quiz(quiz_query)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&quiz.questions)?),
        OutputFormat::Plain => {
            if quiz.questions.is_empty() {
                println!("No questions in {}.", quiz.name);
                return Ok(());
            }
            for question in &quiz.questions {
                println!(
                    "{}  (+{} / -{})",
                    truncate(&question.question_text, 60),
                    question.correct_count,
                    question.incorrect_count
                );
                for (i, option) in question.options.iter().enumerate() {
                    let marker = if option.text == question.correct_answer { "*" } else { " " };
                    println!("   {}{}. {}", marker, i + 1, option.text);
                }
            }
        }
    }
    Ok(())
}

/// Flags given to `question edit`
#[derive(Debug, Default)]
pub struct QuestionEdit {
    pub text: Option<String>,
    pub free_text: bool,
    pub multiple_choice: bool,
    pub answer: Option<String>,
    pub options: Vec<String>,
    pub correct: Option<usize>,
}

/// Turn edit flags into a store update. `--correct` numbers the new
/// options if any were given, otherwise the question's current ones.
fn question_update(question: &QuizQuestion, edit: QuestionEdit) -> Result<QuizQuestionUpdate> {
    let is_multiple_choice = if edit.free_text {
        Some(false)
    } else if edit.multiple_choice {
        Some(true)
    } else {
        None
    };
    let options = if edit.options.is_empty() {
        None
    } else {
        Some(edit.options)
    };

    let correct_answer = match edit.correct {
        Some(0) => bail!("--correct is 1-based"),
        Some(n) => {
            let text = match &options {
                Some(options) => options.get(n - 1).cloned(),
                None => question.options.get(n - 1).map(|o| o.text.clone()),
            };
            Some(text.with_context(|| format!("There is no option {}", n))?)
        }
        None => edit.answer,
    };

    if edit.text.is_none() && is_multiple_choice.is_none() && options.is_none() && correct_answer.is_none() {
        bail!("Nothing to change. Pass --text, --answer, --option or --correct.");
    }

    Ok(QuizQuestionUpdate {
        question_text: edit.text,
        is_multiple_choice,
        correct_answer,
        options,
    })
}

pub fn run_edit_question(
    app: &mut App,
    quiz_query: &str,
    question_query: &str,
    edit: QuestionEdit,
    format: &OutputFormat,
) -> Result<()> {
    let quiz = app.find_quiz(quiz_query)?;
    let question = app.find_question(&quiz, question_query)?;
    let update = question_update(&question, edit)?;
    let updated = app.store.update_quiz_question(quiz.id, question.id, update)?;
    app.save()?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&updated)?),
        OutputFormat::Plain => {
            println!("Updated question: {}", updated.question_text);
            if updated.is_multiple_choice {
                for (i, option) in updated.options.iter().enumerate() {
                    let marker = if option.text == updated.correct_answer { "*" } else { " " };
                    println!("   {}{}. {}", marker, i + 1, option.text);
                }
            } else {
                println!("  Answer: {}", updated.correct_answer);
            }
        }
    }
    Ok(())
}

pub fn run_remove_question(
    app: &mut App,
    quiz_query: &str,
    question_query: &str,
    format: &OutputFormat,
) -> Result<()> {
    let quiz = app.find_quiz(quiz_query)?;
    let question = app.find_question(&quiz, question_query)?;
    let removed = app.store.remove_quiz_question(quiz.id, question.id)?;
    app.save()?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&removed)?),
        OutputFormat::Plain => println!("Deleted question: {}", removed.question_text),
    }
    Ok(())
}

pub fn run_answer(
    app: &mut App,
    quiz_query: &str,
    question_query: &str,
    answer: &str,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let quiz = app.find_quiz(quiz_query)?;
    let question = app.find_question(&quiz, question_query)?;

    // Multiple choice accepts the option number as well as its text
    let answer = match answer.trim().parse::<usize>() {
        Ok(n) if question.is_multiple_choice && n >= 1 && n <= question.options.len() => {
            QuizAnswer::Option(question.options[n - 1].id)
        }
        _ => QuizAnswer::Text(answer.to_string()),
    };

    let outcome = app.store.answer_quiz_question(quiz.id, question.id, &answer)?;
    app.save()?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&outcome)?),
        OutputFormat::Plain => {
            if outcome.is_correct {
                println!("{}", paint("Correct!", Color::GREEN, use_color));
            } else {
                println!("{}", paint("Incorrect.", Color::RED, use_color));
                println!("  Your answer:    {}", outcome.selected_option);
                println!("  Correct answer: {}", outcome.correct_option);
            }
        }
    }
    Ok(())
}

pub fn run_session(app: &App, quiz_query: &str, format: &OutputFormat) -> Result<()> {
    let quiz = app.find_quiz(quiz_query)?;
    let order = app.store.quiz_session(quiz.id, &mut thread_rng())?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&order)?),
        OutputFormat::Plain => {
            if order.is_empty() {
                println!("{} has no questions yet.", quiz.name);
                return Ok(());
            }
            if quiz.timer_enabled {
                println!("{} ({}s per question)", quiz.name, quiz.timer_duration);
            } else {
                println!("{}", quiz.name);
            }
            for (i, question) in order.iter().enumerate() {
                println!("{:>3}. {}", i + 1, question.question_text);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flashy_lib::quizzes::grading::build_question;

    fn capitals() -> QuizQuestion {
        build_question(NewQuizQuestion::MultipleChoice {
            question_text: "Capital of Italy?".into(),
            options: vec!["Milan".into(), "Rome".into()],
            correct_index: 1,
        })
        .unwrap()
    }

    #[test]
    fn test_correct_numbers_current_options() {
        let edit = QuestionEdit {
            correct: Some(1),
            ..Default::default()
        };
        let update = question_update(&capitals(), edit).unwrap();
        assert_eq!(update.correct_answer.as_deref(), Some("Milan"));
        assert!(update.options.is_none());
    }

    #[test]
    fn test_correct_numbers_new_options() {
        let edit = QuestionEdit {
            options: vec!["Naples".into(), "Turin".into(), "Rome".into()],
            correct: Some(3),
            ..Default::default()
        };
        let update = question_update(&capitals(), edit).unwrap();
        assert_eq!(update.correct_answer.as_deref(), Some("Rome"));
        assert_eq!(update.options.map(|o| o.len()), Some(3));
    }

    #[test]
    fn test_free_text_flag() {
        let edit = QuestionEdit {
            free_text: true,
            ..Default::default()
        };
        let update = question_update(&capitals(), edit).unwrap();
        assert_eq!(update.is_multiple_choice, Some(false));
    }

    #[test]
    fn test_bad_correct_number() {
        let zero = QuestionEdit {
            correct: Some(0),
            ..Default::default()
        };
        assert!(question_update(&capitals(), zero).is_err());

        let too_big = QuestionEdit {
            correct: Some(3),
            ..Default::default()
        };
        assert!(question_update(&capitals(), too_big).is_err());
    }

    #[test]
    fn test_empty_edit_rejected() {
        assert!(question_update(&capitals(), QuestionEdit::default()).is_err());
    }
}
