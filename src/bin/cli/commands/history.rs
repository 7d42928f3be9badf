use anyhow::Result;

use flashy_lib::quizzes::QuizHistoryEntry;

use crate::app::App;
use crate::render::terminal::truncate;
use crate::OutputFormat;

pub fn run(app: &mut App, quiz_query: Option<&str>, clear: bool, format: &OutputFormat) -> Result<()> {
    if clear {
        app.store.clear_history();
        app.save()?;
        if let OutputFormat::Plain = format {
            println!("Quiz history cleared.");
        }
        return Ok(());
    }

    let entries: Vec<&QuizHistoryEntry> = match quiz_query {
        Some(query) => {
            let quiz = app.find_quiz(query)?;
            app.store.history().for_quiz(quiz.id).collect()
        }
        None => app.store.history().entries().iter().collect(),
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&entries)?),
        OutputFormat::Plain => {
            if entries.is_empty() {
                println!("No quiz answers yet.");
                return Ok(());
            }
            for entry in entries {
                let mark = if entry.is_correct { "✓" } else { "✗" };
                println!(
                    "{} {}  {}",
                    mark,
                    entry.timestamp.format("%Y-%m-%d %H:%M"),
                    truncate(&entry.question_text, 50)
                );
                if !entry.is_correct {
                    println!("    answered {:?}, expected {:?}", entry.selected_option, entry.correct_option);
                }
            }
        }
    }
    Ok(())
}
