//! Per-sentence spaced repetition state.
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Progress records keyed by sentence id.
pub type ProgressMap = HashMap<String, ProgressRecord>;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    pub id: String,
    /// Time of the most recent review (ms).
    pub last_practiced: i64,
    /// The sentence is eligible for review from this instant on (ms).
    pub next_review_due: i64,
    /// Never below [`MIN_EASE_FACTOR`](crate::models::sm2::MIN_EASE_FACTOR).
    pub ease_factor: f64,
    /// Days between reviews.
    pub interval: u32,
    /// Reviews performed, successful or not.
    pub repetitions: u32,
    pub correct: u32,
    pub incorrect: u32,
}

impl ProgressRecord {
    pub fn is_due(&self, now: i64) -> bool {
        self.next_review_due <= now
    }

    pub fn total_reviews(&self) -> u32 {
        self.correct + self.incorrect
    }
}
