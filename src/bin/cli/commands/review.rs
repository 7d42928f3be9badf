use anyhow::Result;

use flashy_lib::flashcards::algorithm::preview_intervals;
use flashy_lib::flashcards::format_interval;
use flashy_lib::{Clock, Grade};

use crate::app::App;
use crate::render::terminal::{grade_color, paint, truncate, Color};
use crate::OutputFormat;

pub fn run_due(app: &App, deck_query: &str, format: &OutputFormat, use_color: bool) -> Result<()> {
    let deck = app.find_deck(deck_query)?;
    let due = app.store.due_flashcards(deck.id)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&due)?),
        OutputFormat::Plain => {
            if due.is_empty() {
                println!("No cards due in {}.", deck.name);
                return Ok(());
            }

            println!("{} cards due in {}:", due.len(), deck.name);
            for card in &due {
                println!("  {}  {}", paint(&truncate(&card.term, 40), Color::BOLD, use_color), card.id);
            }

            let hint: Vec<String> = preview_intervals()
                .iter()
                .map(|(grade, days)| format!("{} {}", grade, format_interval(*days)))
                .collect();
            println!();
            println!("Grade with `flashy-cli review <deck> <card> <grade>` ({})", hint.join(", "));
        }
    }
    Ok(())
}

pub fn run_review(
    app: &mut App,
    deck_query: &str,
    card_query: &str,
    grade: Grade,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let deck = app.find_deck(deck_query)?;
    let card = app.find_card(&deck, card_query)?;
    let graded = app.store.give_flashcard_feedback(deck.id, card.id, grade)?;
    app.save()?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&graded)?),
        OutputFormat::Plain => {
            println!(
                "\"{}\" marked {}",
                graded.term,
                paint(grade.as_str(), grade_color(grade), use_color)
            );
            println!("  Definition:  {}", graded.definition);
            println!("  Ease factor: {:.2}", graded.effective_ease_factor());
            if let Some(next) = graded.next_review {
                println!(
                    "  Next review: {} (in {})",
                    next.format("%Y-%m-%d %H:%M UTC"),
                    format_interval(graded.interval)
                );
            }
        }
    }
    Ok(())
}

pub fn run_stats(app: &App, deck_query: &str, format: &OutputFormat) -> Result<()> {
    let deck = app.find_deck(deck_query)?;
    let stats = app.store.deck_stats(deck.id)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
        OutputFormat::Plain => {
            println!("{}", deck.name);
            println!("  Cards:          {}", stats.total_cards);
            println!("  Due now:        {}", stats.due_cards);
            println!("  Never reviewed: {}", stats.never_reviewed);
            match stats.average_ease_factor {
                Some(ease) => println!("  Average ease:   {:.2}", ease),
                None => println!("  Average ease:   -"),
            }
            println!("  Checked at:     {}", app.store.clock().now().format("%Y-%m-%d %H:%M UTC"));
        }
    }
    Ok(())
}
