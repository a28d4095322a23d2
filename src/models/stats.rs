//! Review statistics aggregated from progress records.
use super::ProgressMap;
use crate::clock::DAY_MS;
use serde::Serialize;

/// Ease factor a record must exceed to count as mastered.
pub const MASTERED_EASE_FACTOR: f64 = 2.5;
/// Interval (days) a record must reach to count as mastered.
pub const MASTERED_INTERVAL_DAYS: u32 = 21;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSummary {
    /// Reviewed at least once.
    pub learned: usize,
    /// Derived from scheduling, unrelated to the user's `mastered` flag.
    pub mastered: usize,
    pub due_soon: usize,
    pub overdue: usize,
    pub total_reviews: u64,
    /// Share of reviews rated 3 or higher, 0 when nothing was reviewed.
    pub accuracy: f64,
}

pub fn compute_stats(progress: &ProgressMap, now: i64) -> StatsSummary {
    let one_day_from_now = now + DAY_MS;
    let mut stats = StatsSummary::default();
    let mut total_correct: u64 = 0;
    let mut total_incorrect: u64 = 0;

    for p in progress.values() {
        let overdue = p.next_review_due < now;

        if p.repetitions > 0 {
            stats.learned += 1;
        }
        if p.ease_factor > MASTERED_EASE_FACTOR && p.interval >= MASTERED_INTERVAL_DAYS {
            stats.mastered += 1;
        }
        if overdue {
            stats.overdue += 1;
        } else if p.next_review_due < one_day_from_now {
            stats.due_soon += 1;
        }

        total_correct += p.correct as u64;
        total_incorrect += p.incorrect as u64;
    }

    stats.total_reviews = total_correct + total_incorrect;
    stats.accuracy = if stats.total_reviews > 0 {
        total_correct as f64 / stats.total_reviews as f64
    } else {
        0.0
    };
    stats
}
