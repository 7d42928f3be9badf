mod app;
mod commands;
mod render;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use flashy_lib::Grade;

#[derive(Parser)]
#[command(name = "flashy-cli", about = "Flashcard and quiz study CLI", version)]
struct Cli {
    /// Data directory (default: platform data dir/flashy)
    #[arg(long, global = true, env = "FLASHY_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Manage decks
    #[command(subcommand)]
    Deck(DeckCommand),

    /// Manage flashcards in a deck
    #[command(subcommand)]
    Card(CardCommand),

    /// List cards due for review
    Due {
        /// Deck name (case-insensitive prefix match) or id
        deck: String,
    },

    /// Grade a card and schedule its next review
    Review {
        /// Deck name or id
        deck: String,
        /// Card term (case-insensitive prefix match) or id
        card: String,
        /// How hard the card was to recall
        #[arg(value_name = "easy|medium|hard")]
        grade: Grade,
    },

    /// Show review statistics for a deck
    Stats {
        /// Deck name or id
        deck: String,
    },

    /// Manage quizzes
    #[command(subcommand)]
    Quiz(QuizCommand),

    /// Manage quiz questions
    #[command(subcommand)]
    Question(QuestionCommand),

    /// Answer a quiz question
    Answer {
        /// Quiz name or id
        quiz: String,
        /// Question text (case-insensitive prefix match) or id
        question: String,
        /// Answer text, or option number for multiple choice
        answer: String,
    },

    /// Show questions in study order, most-missed first
    Session {
        /// Quiz name or id
        quiz: String,
    },

    /// Show recent quiz answers
    History {
        /// Only answers from this quiz (name or id)
        #[arg(long, conflicts_with = "clear")]
        quiz: Option<String>,
        /// Clear the history instead
        #[arg(long)]
        clear: bool,
    },
}

#[derive(Subcommand)]
enum DeckCommand {
    /// Create a deck
    Add { name: String },
    /// List decks
    List,
    /// Rename a deck
    Rename { deck: String, name: String },
    /// Delete a deck and its cards
    Rm { deck: String },
}

#[derive(Subcommand)]
enum CardCommand {
    /// Add a card to a deck
    Add {
        deck: String,
        term: String,
        definition: String,
    },
    /// List cards in a deck
    List { deck: String },
    /// Edit a card's term or definition
    Edit {
        deck: String,
        card: String,
        #[arg(long)]
        term: Option<String>,
        #[arg(long)]
        definition: Option<String>,
    },
    /// Delete a card
    Rm { deck: String, card: String },
}

#[derive(Subcommand)]
enum QuizCommand {
    /// Create a quiz
    Add {
        name: String,
        /// Enable the per-question timer
        #[arg(long)]
        timer: bool,
        /// Seconds per question
        #[arg(long)]
        duration: Option<u32>,
    },
    /// List quizzes
    List,
    /// Rename a quiz or change its timer
    Edit {
        quiz: String,
        #[arg(long)]
        name: Option<String>,
        /// Turn the per-question timer on
        #[arg(long, conflicts_with = "no_timer")]
        timer: bool,
        /// Turn the per-question timer off
        #[arg(long)]
        no_timer: bool,
        /// Seconds per question
        #[arg(long)]
        duration: Option<u32>,
    },
    /// Delete a quiz
    Rm { quiz: String },
}

#[derive(Subcommand)]
enum QuestionCommand {
    /// Add a question. Pass --option 2-4 times for multiple choice.
    Add {
        quiz: String,
        text: String,
        /// Correct answer for a free-text question
        #[arg(long, conflicts_with = "option")]
        answer: Option<String>,
        /// A multiple-choice option (repeatable)
        #[arg(long)]
        option: Vec<String>,
        /// 1-based number of the correct option
        #[arg(long, requires = "option")]
        correct: Option<usize>,
    },
    /// List questions in a quiz
    List { quiz: String },
    /// Edit a question's text, answer or options
    Edit {
        quiz: String,
        question: String,
        /// New question text
        #[arg(long)]
        text: Option<String>,
        /// Make it a free-text question, dropping its options
        #[arg(long, conflicts_with_all = ["multiple_choice", "option", "correct"])]
        free_text: bool,
        /// Make it a multiple-choice question
        #[arg(long)]
        multiple_choice: bool,
        /// New correct answer text
        #[arg(long, conflicts_with = "correct")]
        answer: Option<String>,
        /// Replacement option (repeatable)
        #[arg(long)]
        option: Vec<String>,
        /// 1-based number of the correct option
        #[arg(long)]
        correct: Option<usize>,
    },
    /// Delete a question
    Rm { quiz: String, question: String },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let use_color = !cli.no_color && atty_check();
    let mut app = app::App::new(cli.data_dir)?;

    match cli.command {
        Command::Deck(subcmd) => match subcmd {
            DeckCommand::Add { name } => commands::deck::run_add(&mut app, &name, &cli.format)?,
            DeckCommand::List => commands::deck::run_list(&app, &cli.format, use_color)?,
            DeckCommand::Rename { deck, name } => {
                commands::deck::run_rename(&mut app, &deck, &name, &cli.format)?
            }
            DeckCommand::Rm { deck } => commands::deck::run_remove(&mut app, &deck, &cli.format)?,
        },
        Command::Card(subcmd) => match subcmd {
            CardCommand::Add { deck, term, definition } => {
                commands::card::run_add(&mut app, &deck, term, definition, &cli.format)?
            }
            CardCommand::List { deck } => commands::card::run_list(&app, &deck, &cli.format, use_color)?,
            CardCommand::Edit { deck, card, term, definition } => {
                commands::card::run_edit(&mut app, &deck, &card, term, definition, &cli.format)?
            }
            CardCommand::Rm { deck, card } => commands::card::run_remove(&mut app, &deck, &card, &cli.format)?,
        },
        Command::Due { deck } => commands::review::run_due(&app, &deck, &cli.format, use_color)?,
        Command::Review { deck, card, grade } => {
            commands::review::run_review(&mut app, &deck, &card, grade, &cli.format, use_color)?
        }
        Command::Stats { deck } => commands::review::run_stats(&app, &deck, &cli.format)?,
        Command::Quiz(subcmd) => match subcmd {
            QuizCommand::Add { name, timer, duration } => {
                commands::quiz::run_add(&mut app, &name, timer, duration, &cli.format)?
            }
            QuizCommand::List => commands::quiz::run_list(&app, &cli.format)?,
            QuizCommand::Edit { quiz, name, timer, no_timer, duration } => {
                let timer_enabled = match (timer, no_timer) {
                    (true, _) => Some(true),
                    (_, true) => Some(false),
                    _ => None,
                };
                commands::quiz::run_edit(&mut app, &quiz, name, timer_enabled, duration, &cli.format)?
            }
            QuizCommand::Rm { quiz } => commands::quiz::run_remove(&mut app, &quiz, &cli.format)?,
        },
        Command::Question(subcmd) => match subcmd {
            QuestionCommand::Add { quiz, text, answer, option, correct } => {
                commands::quiz::run_add_question(&mut app, &quiz, text, answer, option, correct, &cli.format)?
            }
            QuestionCommand::List { quiz } => commands::quiz::run_list_questions(&app, &quiz, &cli.format)?,
            QuestionCommand::Edit {
                quiz,
                question,
                text,
                free_text,
                multiple_choice,
                answer,
                option,
                correct,
            } => {
                let edit = commands::quiz::QuestionEdit {
                    text,
                    free_text,
                    multiple_choice,
                    answer,
                    options: option,
                    correct,
                };
                commands::quiz::run_edit_question(&mut app, &quiz, &question, edit, &cli.format)?
            }
            QuestionCommand::Rm { quiz, question } => {
                commands::quiz::run_remove_question(&mut app, &quiz, &question, &cli.format)?
            }
        },
        Command::Answer { quiz, question, answer } => {
            commands::quiz::run_answer(&mut app, &quiz, &question, &answer, &cli.format, use_color)?
        }
        Command::Session { quiz } => commands::quiz::run_session(&app, &quiz, &cli.format)?,
        Command::History { quiz, clear } => {
            commands::history::run(&mut app, quiz.as_deref(), clear, &cli.format)?
        }
    }

    Ok(())
}

/// Check if stdout is a terminal (for color support)
fn atty_check() -> bool {
    unsafe { libc_isatty(1) != 0 }
}

extern "C" {
    #[link_name = "isatty"]
    fn libc_isatty(fd: i32) -> i32;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_review_grade_parses_case_insensitively() {
        let cli = Cli::try_parse_from(["flashy-cli", "review", "Spanish", "perro", "EASY"]).unwrap();
        match cli.command {
            Command::Review { grade, .. } => assert_eq!(grade, Grade::Easy),
            _ => panic!("expected review"),
        }
    }

    #[test]
    fn test_review_rejects_unknown_grade() {
        let result = Cli::try_parse_from(["flashy-cli", "review", "Spanish", "perro", "again"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_quiz_edit_timer_flags_conflict() {
        let result = Cli::try_parse_from(["flashy-cli", "quiz", "edit", "Math", "--timer", "--no-timer"]);
        assert!(result.is_err());

        let cli = Cli::try_parse_from(["flashy-cli", "quiz", "edit", "Math", "--no-timer"]).unwrap();
        match cli.command {
            Command::Quiz(QuizCommand::Edit { timer, no_timer, .. }) => {
                assert!(!timer);
                assert!(no_timer);
            }
            _ => panic!("expected quiz edit"),
        }
    }

    #[test]
    fn test_question_edit_free_text_conflicts_with_options() {
        let result = Cli::try_parse_from([
            "flashy-cli", "question", "edit", "Math", "7 x 8", "--free-text", "--option", "56",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_history_quiz_filter() {
        let cli = Cli::try_parse_from(["flashy-cli", "history", "--quiz", "Math"]).unwrap();
        match cli.command {
            Command::History { quiz, clear } => {
                assert_eq!(quiz.as_deref(), Some("Math"));
                assert!(!clear);
            }
            _ => panic!("expected history"),
        }
    }
}
