use chrono::{DateTime, Utc};

use flashy_lib::flashcards::{format_interval, Flashcard, Grade};

/// ANSI color codes
pub struct Color;

impl Color {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
}

/// Wrap `text` in `color` when colors are enabled
pub fn paint(text: &str, color: &str, use_color: bool) -> String {
    if use_color {
        format!("{}{}{}", color, text, Color::RESET)
    } else {
        text.to_string()
    }
}

pub fn grade_color(grade: Grade) -> &'static str {
    match grade {
        Grade::Hard => Color::RED,
        Grade::Medium => Color::YELLOW,
        Grade::Easy => Color::GREEN,
    }
}

/// "due now" or "due in 2d"
pub fn due_label(card: &Flashcard, now: DateTime<Utc>, use_color: bool) -> String {
    match card.next_review {
        Some(next) if next > now => {
            let days = (next - now).num_milliseconds() as f64 / 86_400_000.0;
            paint(&format!("due in {}", format_interval(days)), Color::DIM, use_color)
        }
        _ => paint("due now", Color::BOLD, use_color),
    }
}

/// Truncate to `width` characters, adding an ellipsis
pub fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let cut: String = text.chars().take(width.saturating_sub(1)).collect();
    format!("{}…", cut)
}
