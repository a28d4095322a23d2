//! Picking what to review next: due filtering and priority ordering.
use super::{ProgressMap, Sentence};
use std::cmp::Ordering;

/// Sentences without a progress record, or whose next review time has arrived.
pub fn due_items<'a, I>(items: I, progress: &ProgressMap, now: i64) -> Vec<&'a Sentence>
where
    I: IntoIterator<Item = &'a Sentence>,
{
    items
        .into_iter()
        .filter(|s| progress.get(&s.id).is_none_or(|p| p.is_due(now)))
        .collect()
}

/// Orders sentences for presentation: never-reviewed first, then the earliest
/// `next_review_due`, then the lowest ease factor. Stable.
pub fn sort_by_priority<'a, I>(items: I, progress: &ProgressMap) -> Vec<&'a Sentence>
where
    I: IntoIterator<Item = &'a Sentence>,
{
    let mut sorted: Vec<&Sentence> = items.into_iter().collect();
    sorted.sort_by(|a, b| compare_priority(a, b, progress));
    sorted
}

fn compare_priority(a: &Sentence, b: &Sentence, progress: &ProgressMap) -> Ordering {
    match (progress.get(&a.id), progress.get(&b.id)) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(pa), Some(pb)) => pa
            .next_review_due
            .cmp(&pb.next_review_due)
            .then_with(|| pa.ease_factor.total_cmp(&pb.ease_factor)),
    }
}

/// Due sentences in priority order.
pub fn review_queue<'a, I>(items: I, progress: &ProgressMap, now: i64) -> Vec<&'a Sentence>
where
    I: IntoIterator<Item = &'a Sentence>,
{
    sort_by_priority(due_items(items, progress, now), progress)
}
