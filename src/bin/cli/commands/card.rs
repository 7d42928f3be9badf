use anyhow::{bail, Result};

use flashy_lib::flashcards::{FlashcardUpdate, NewFlashcard};
use flashy_lib::Clock;

use crate::app::App;
use crate::render::terminal::{due_label, truncate};
use crate::OutputFormat;

pub fn run_add(
    app: &mut App,
    deck_query: &str,
    term: String,
    definition: String,
    format: &OutputFormat,
) -> Result<()> {
    let deck = app.find_deck(deck_query)?;
    let card = app
        .store
        .add_flashcard(deck.id, NewFlashcard { term, definition })?;
    app.save()?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&card)?),
        OutputFormat::Plain => {
            println!("Added \"{}\" to {}", card.term, deck.name);
            println!("  ID: {}", card.id);
        }
    }
    Ok(())
}

pub fn run_list(app: &App, deck_query: &str, format: &OutputFormat, use_color: bool) -> Result<()> {
    let deck = app.find_deck(deck_query)?;
    let now = app.store.clock().now();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&deck.flashcards)?),
        OutputFormat::Plain => {
            if deck.flashcards.is_empty() {
                println!("No cards in {}.", deck.name);
                return Ok(());
            }

            let term_width = deck
                .flashcards
                .iter()
                .map(|c| c.term.chars().count())
                .max()
                .unwrap_or(4)
                .clamp(4, 30);

            for card in &deck.flashcards {
                println!(
                    "{:<tw$}  {:<40}  {}",
                    truncate(&card.term, term_width),
                    truncate(&card.definition, 40),
                    due_label(card, now, use_color),
                    tw = term_width
                );
            }
        }
    }
    Ok(())
}

pub fn run_edit(
    app: &mut App,
    deck_query: &str,
    card_query: &str,
    term: Option<String>,
    definition: Option<String>,
    format: &OutputFormat,
) -> Result<()> {
    if term.is_none() && definition.is_none() {
        bail!("Nothing to change. Pass --term and/or --definition.");
    }

    let deck = app.find_deck(deck_query)?;
    let card = app.find_card(&deck, card_query)?;
    let updated = app
        .store
        .update_flashcard(deck.id, card.id, FlashcardUpdate { term, definition })?;
    app.save()?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&updated)?),
        OutputFormat::Plain => println!("Updated \"{}\": {}", updated.term, updated.definition),
    }
    Ok(())
}

pub fn run_remove(app: &mut App, deck_query: &str, card_query: &str, format: &OutputFormat) -> Result<()> {
    let deck = app.find_deck(deck_query)?;
    let card = app.find_card(&deck, card_query)?;
    let removed = app.store.remove_flashcard(deck.id, card.id)?;
    app.save()?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&removed)?),
        OutputFormat::Plain => println!("Deleted \"{}\" from {}", removed.term, deck.name),
    }
    Ok(())
}
