//! SM-2 (SuperMemo 2) derived spaced repetition scheduling.
//!
//! - Each sentence has an ease factor (EF) that adjusts after every review
//! - Quality grades 0-2: interval resets to 1 day
//! - Quality grades 3-5: interval grows 1 day → 6 days → previous interval × EF
//! - EF never falls below 1.3
//! - `repetitions` counts every review, so a failed review also advances the
//!   1 → 6 day bootstrap. A first success after a failure is scheduled 6 days out.

use super::{ProgressMap, ProgressRecord, Quality};
use crate::clock::DAY_MS;
use crate::error::SchedulerError;

pub const INITIAL_EASE_FACTOR: f64 = 2.5;
pub const MIN_EASE_FACTOR: f64 = 1.3;

/// Fresh record for a sentence that has never been reviewed. Due immediately.
pub fn initialize(id: &str, now: i64) -> ProgressRecord {
    ProgressRecord {
        id: id.to_string(),
        last_practiced: now,
        next_review_due: now,
        ease_factor: INITIAL_EASE_FACTOR,
        interval: 0,
        repetitions: 0,
        correct: 0,
        incorrect: 0,
    }
}

/// Ease factor after a review of the given quality, floored at 1.3.
pub fn next_ease_factor(ease_factor: f64, quality: Quality) -> f64 {
    let miss = (Quality::MAX - quality.value()) as f64;
    (ease_factor + (0.1 - miss * (0.08 + miss * 0.02))).max(MIN_EASE_FACTOR)
}

/// Calculates the record that results from reviewing `progress` at `now`.
pub fn record_review(progress: &ProgressRecord, quality: Quality, now: i64) -> ProgressRecord {
    let mut next = progress.clone();
    next.last_practiced = now;

    if quality.is_successful() {
        next.correct += 1;
    } else {
        next.incorrect += 1;
    }

    next.ease_factor = next_ease_factor(progress.ease_factor, quality);

    // `repetitions` here is the count before this review
    next.interval = if !quality.is_successful() {
        1
    } else {
        match progress.repetitions {
            0 => 1,
            1 => 6,
            _ => (progress.interval as f64 * next.ease_factor).round() as u32,
        }
    };

    next.repetitions += 1;
    next.next_review_due = now + next.interval as i64 * DAY_MS;
    next
}

/// Looks up `id` and reviews it. A missing record is a caller bug, so this fails
/// instead of inventing defaults.
pub fn review_item(
    progress: &ProgressMap,
    id: &str,
    quality: Quality,
    now: i64,
) -> Result<ProgressRecord, SchedulerError> {
    let record = progress
        .get(id)
        .ok_or_else(|| SchedulerError::MissingProgress(id.to_string()))?;
    Ok(record_review(record, quality, now))
}

/// Checks a record coming from outside the scheduler, e.g. a snapshot file.
/// `key` is the id the record was stored under.
pub fn validate_record(key: &str, record: &ProgressRecord) -> Result<(), SchedulerError> {
    let invalid = |reason: String| SchedulerError::InvalidProgress {
        id: key.to_string(),
        reason,
    };
    if record.id != key {
        return Err(invalid(format!("stored under a different id '{}'", record.id)));
    }
    if record.ease_factor.is_nan() || record.ease_factor < MIN_EASE_FACTOR {
        return Err(invalid(format!(
            "ease factor {} is below {MIN_EASE_FACTOR}",
            record.ease_factor
        )));
    }
    if record.correct.checked_add(record.incorrect) != Some(record.repetitions) {
        return Err(invalid(format!(
            "correct {} + incorrect {} does not equal repetitions {}",
            record.correct, record.incorrect, record.repetitions
        )));
    }
    Ok(())
}
