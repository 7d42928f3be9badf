//! Review scheduling
//!
//! A simplified member of the SM-2 family. Each grade maps to a fixed
//! interval and an ease factor adjustment:
//!
//! | Grade  | Interval | Ease delta |
//! |--------|----------|------------|
//! | hard   | 0.5 days | -0.20      |
//! | medium | 2 days   | 0          |
//! | easy   | 4 days   | +0.15      |
//!
//! Unlike SM-2 the interval does not grow with the ease factor or with
//! the number of past reviews. The ease factor is tracked (and floored at
//! 1.3) but only records how hard the learner finds the card.

use chrono::{DateTime, Duration, Utc};

use super::models::{Grade, DEFAULT_EASE_FACTOR, MIN_EASE_FACTOR};

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Result of grading a card
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewResult {
    pub last_reviewed: DateTime<Utc>,
    pub next_review: DateTime<Utc>,
    pub ease_factor: f64,
    /// Days until the next review
    pub interval: f64,
}

impl Grade {
    /// Days until the next review after this grade
    pub fn interval_days(&self) -> f64 {
        match self {
            Grade::Hard => 0.5,
            Grade::Medium => 2.0,
            Grade::Easy => 4.0,
        }
    }

    pub fn ease_delta(&self) -> f64 {
        match self {
            Grade::Hard => -0.20,
            Grade::Medium => 0.0,
            Grade::Easy => 0.15,
        }
    }
}

/// Compute the next review for a card given the learner's grade
///
/// # Arguments
/// * `current_ease_factor` - The card's ease factor, `None` if never set
/// * `grade` - Learner feedback
/// * `now` - Time of the review
pub fn schedule_review(
    current_ease_factor: Option<f64>,
    grade: Grade,
    now: DateTime<Utc>,
) -> ReviewResult {
    let current = current_ease_factor.unwrap_or(DEFAULT_EASE_FACTOR);
    let ease_factor = (current + grade.ease_delta()).max(MIN_EASE_FACTOR);
    let interval = grade.interval_days();

    ReviewResult {
        last_reviewed: now,
        next_review: now + days_to_duration(interval),
        ease_factor,
        interval,
    }
}

/// Convert fractional days to a duration, to the millisecond
pub fn days_to_duration(days: f64) -> Duration {
    Duration::milliseconds((days * MILLIS_PER_DAY).round() as i64)
}

/// The interval each grade would produce, hardest first.
/// Used to label the feedback buttons.
pub fn preview_intervals() -> [(Grade, f64); 3] {
    Grade::ALL.map(|g| (g, g.interval_days()))
}

/// Format an interval in days to a human-readable string
pub fn format_interval(days: f64) -> String {
    if days <= 0.0 {
        return "now".to_string();
    }
    if days < 1.0 {
        let hours = (days * 24.0).round().max(1.0) as i64;
        return format!("{}h", hours);
    }

    let whole = days.floor() as i64;
    if whole < 7 {
        format!("{}d", whole)
    } else if whole < 30 {
        format!("{}w", whole / 7)
    } else if whole < 365 {
        format!("{}mo", whole / 30)
    } else {
        format!("{}y", whole / 365)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn jan_first() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {}, got {}",
            expected,
            actual
        );
    }

    #[test]
    fn test_hard_from_default() {
        let result = schedule_review(Some(2.5), Grade::Hard, jan_first());

        assert_close(result.ease_factor, 2.3);
        assert_eq!(result.interval, 0.5);
        assert_eq!(result.last_reviewed, jan_first());
        assert_eq!(
            result.next_review,
            Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_hard_clamps_to_minimum() {
        let result = schedule_review(Some(1.4), Grade::Hard, jan_first());
        assert_eq!(result.ease_factor, MIN_EASE_FACTOR);
    }

    #[test]
    fn test_repeated_hard_never_below_minimum() {
        let mut ease = Some(2.5);
        for _ in 0..20 {
            let result = schedule_review(ease, Grade::Hard, jan_first());
            assert!(result.ease_factor >= MIN_EASE_FACTOR);
            ease = Some(result.ease_factor);
        }
        assert_eq!(ease, Some(MIN_EASE_FACTOR));
    }

    #[test]
    fn test_easy() {
        let now = jan_first();
        let result = schedule_review(Some(2.5), Grade::Easy, now);

        assert_close(result.ease_factor, 2.65);
        assert_eq!(result.interval, 4.0);
        assert_eq!(result.next_review, now + Duration::days(4));
    }

    #[test]
    fn test_medium_keeps_ease() {
        for ease in [1.3, 1.75, 2.5, 3.1] {
            let result = schedule_review(Some(ease), Grade::Medium, jan_first());
            assert_eq!(result.ease_factor, ease);
            assert_eq!(result.interval, 2.0);
        }
    }

    #[test]
    fn test_missing_ease_defaults() {
        let result = schedule_review(None, Grade::Medium, jan_first());
        assert_eq!(result.ease_factor, DEFAULT_EASE_FACTOR);
        assert_eq!(result.interval, 2.0);
    }

    #[test]
    fn test_interval_does_not_grow() {
        // Fixed-interval policy: a long streak of easy grades keeps a 4 day gap
        let mut ease = None;
        let mut now = jan_first();
        for _ in 0..5 {
            let result = schedule_review(ease, Grade::Easy, now);
            assert_eq!(result.interval, 4.0);
            ease = Some(result.ease_factor);
            now = result.next_review;
        }
        assert_close(ease.unwrap(), 2.5 + 5.0 * 0.15);
    }

    #[test]
    fn test_next_review_is_last_reviewed_plus_interval() {
        let now = Utc.with_ymd_and_hms(2024, 3, 9, 17, 45, 12).unwrap();
        let expected = [
            (Grade::Hard, Duration::hours(12)),
            (Grade::Medium, Duration::days(2)),
            (Grade::Easy, Duration::days(4)),
        ];
        for (grade, gap) in expected {
            let result = schedule_review(Some(2.0), grade, now);
            assert_eq!(result.last_reviewed, now);
            assert_eq!(result.next_review, now + gap);
        }
        assert_eq!(
            schedule_review(None, Grade::Medium, now).next_review,
            Utc.with_ymd_and_hms(2024, 3, 11, 17, 45, 12).unwrap()
        );
    }

    #[test]
    fn test_preview_intervals() {
        assert_eq!(
            preview_intervals(),
            [(Grade::Hard, 0.5), (Grade::Medium, 2.0), (Grade::Easy, 4.0)]
        );
    }

    #[test]
    fn test_format_interval() {
        assert_eq!(format_interval(0.0), "now");
        assert_eq!(format_interval(0.5), "12h");
        assert_eq!(format_interval(1.0), "1d");
        assert_eq!(format_interval(2.0), "2d");
        assert_eq!(format_interval(7.0), "1w");
        assert_eq!(format_interval(14.0), "2w");
        assert_eq!(format_interval(30.0), "1mo");
        assert_eq!(format_interval(90.0), "3mo");
        assert_eq!(format_interval(365.0), "1y");
        assert_eq!(format_interval(730.0), "2y");
    }
}
