use anyhow::Result;

use flashy_lib::flashcards::DeckUpdate;
use flashy_lib::Clock;

use crate::app::App;
use crate::render::terminal::{paint, truncate, Color};
use crate::OutputFormat;

pub fn run_add(app: &mut App, name: &str, format: &OutputFormat) -> Result<()> {
    let deck = app.store.add_deck(name);
    app.save()?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&deck)?),
        OutputFormat::Plain => {
            println!("Created deck \"{}\"", deck.name);
            println!("  ID: {}", deck.id);
        }
    }
    Ok(())
}

pub fn run_list(app: &App, format: &OutputFormat, use_color: bool) -> Result<()> {
    let decks = app.store.list_decks();
    let now = app.store.clock().now();

    match format {
        OutputFormat::Json => {
            let output: Vec<serde_json::Value> = decks
                .iter()
                .map(|deck| {
                    serde_json::json!({
                        "id": deck.id.to_string(),
                        "name": deck.name,
                        "cardCount": deck.flashcards.len(),
                        "dueCount": deck.flashcards.iter().filter(|c| c.is_due(now)).count(),
                        "updatedAt": deck.updated_at.to_rfc3339(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            if decks.is_empty() {
                println!("No decks. Create one with `flashy-cli deck add <name>`.");
                return Ok(());
            }

            let name_width = decks.iter().map(|d| d.name.len()).max().unwrap_or(4).clamp(4, 40);
            println!("{:<nw$} {:>5} {:>5}", "Deck", "Cards", "Due", nw = name_width);
            for deck in decks {
                let due = deck.flashcards.iter().filter(|c| c.is_due(now)).count();
                let due_text = format!("{:>5}", due);
                println!(
                    "{:<nw$} {:>5} {}",
                    truncate(&deck.name, name_width),
                    deck.flashcards.len(),
                    if due > 0 { paint(&due_text, Color::BOLD, use_color) } else { due_text },
                    nw = name_width
                );
            }
        }
    }
    Ok(())
}

pub fn run_rename(app: &mut App, query: &str, name: &str, format: &OutputFormat) -> Result<()> {
    let deck = app.find_deck(query)?;
    let updated = app.store.update_deck(
        deck.id,
        DeckUpdate {
            name: Some(name.to_string()),
        },
    )?;
    app.save()?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&updated)?),
        OutputFormat::Plain => println!("Renamed \"{}\" to \"{}\"", deck.name, updated.name),
    }
    Ok(())
}

pub fn run_remove(app: &mut App, query: &str, format: &OutputFormat) -> Result<()> {
    let deck = app.find_deck(query)?;
    let removed = app.store.remove_deck(deck.id)?;
    app.save()?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "id": removed.id.to_string(),
                "name": removed.name,
                "removedCards": removed.flashcards.len(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => println!(
            "Deleted deck \"{}\" ({} cards)",
            removed.name,
            removed.flashcards.len()
        ),
    }
    Ok(())
}
