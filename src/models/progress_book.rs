//! In-memory owner of every progress record.
//!
//! All mutation goes through `&mut self`, so whoever holds the book is the single
//! writer for its records. Callers persist the records these methods return.
use super::queue::{due_items, review_queue};
use super::stats::{StatsSummary, compute_stats};
use super::{ProgressMap, ProgressRecord, Quality, Sentence, sm2};
use tracing::debug;

#[derive(Clone, Debug, Default)]
pub struct ProgressBook {
    records: ProgressMap,
}

impl ProgressBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&ProgressRecord> {
        self.records.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn as_map(&self) -> &ProgressMap {
        &self.records
    }

    pub fn into_map(self) -> ProgressMap {
        self.records
    }

    pub fn insert(&mut self, record: ProgressRecord) {
        self.records.insert(record.id.clone(), record);
    }

    /// Drops the record of a removed sentence.
    pub fn remove(&mut self, id: &str) -> Option<ProgressRecord> {
        self.records.remove(id)
    }

    /// Creates a record for `id` unless one exists. Returns the record either way.
    pub fn ensure_initialized(&mut self, id: &str, now: i64) -> &ProgressRecord {
        self.records
            .entry(id.to_string())
            .or_insert_with(|| sm2::initialize(id, now))
    }

    /// The record reviewing `id` would produce, without storing it. A sentence
    /// with no record is reviewed from a fresh one.
    pub fn next_record(&self, id: &str, quality: Quality, now: i64) -> ProgressRecord {
        match self.records.get(id) {
            Some(current) => sm2::record_review(current, quality, now),
            None => sm2::record_review(&sm2::initialize(id, now), quality, now),
        }
    }

    /// Reviews `id`, creating its record first if this is its first review.
    pub fn record_review(&mut self, id: &str, quality: Quality, now: i64) -> ProgressRecord {
        let updated = self.next_record(id, quality, now);
        debug!(
            sentence_id = id,
            quality = quality.value(),
            interval = updated.interval,
            ease_factor = updated.ease_factor,
            "recorded review"
        );
        self.insert(updated.clone());
        updated
    }

    pub fn due<'a>(&self, sentences: &'a [Sentence], now: i64) -> Vec<&'a Sentence> {
        due_items(sentences, &self.records, now)
    }

    pub fn queue<'a>(&self, sentences: &'a [Sentence], now: i64) -> Vec<&'a Sentence> {
        review_queue(sentences, &self.records, now)
    }

    pub fn stats(&self, now: i64) -> StatsSummary {
        compute_stats(&self.records, now)
    }
}

impl From<ProgressMap> for ProgressBook {
    fn from(records: ProgressMap) -> Self {
        Self { records }
    }
}

impl FromIterator<ProgressRecord> for ProgressBook {
    fn from_iter<T: IntoIterator<Item = ProgressRecord>>(iter: T) -> Self {
        Self {
            records: iter.into_iter().map(|p| (p.id.clone(), p)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::DAY_MS;

    fn q(v: i64) -> Quality {
        Quality::new(v).unwrap()
    }

    #[test]
    fn first_review_creates_record() {
        let mut book = ProgressBook::new();
        assert!(!book.contains("x"));
        let record = book.record_review("x", q(5), 0);
        assert_eq!(record.repetitions, 1);
        assert_eq!(record.next_review_due, DAY_MS);
        assert_eq!(book.get("x"), Some(&record));
    }

    #[test]
    fn ensure_initialized_keeps_existing() {
        let mut book = ProgressBook::new();
        book.record_review("x", q(4), 0);
        let existing = book.ensure_initialized("x", 500).clone();
        assert_eq!(existing.repetitions, 1);
        assert_eq!(book.len(), 1);
    }

    #[test]
    fn remove_drops_record() {
        let mut book = ProgressBook::new();
        book.ensure_initialized("x", 0);
        assert!(book.remove("x").is_some());
        assert!(book.is_empty());
        assert!(book.remove("x").is_none());
    }

    #[test]
    fn repeated_reviews_accumulate() {
        let mut book = ProgressBook::new();
        let qualities = [5, 2, 4, 0, 3];
        for (day, v) in qualities.iter().enumerate() {
            book.record_review("x", q(*v), day as i64 * DAY_MS);
        }
        let p = book.get("x").unwrap();
        assert_eq!(p.repetitions, 5);
        assert_eq!(p.correct, 3);
        assert_eq!(p.incorrect, 2);
    }

    #[test]
    fn from_iterator_keys_by_id() {
        let book: ProgressBook = vec![sm2::initialize("a", 0), sm2::initialize("b", 0)]
            .into_iter()
            .collect();
        assert!(book.contains("a"));
        assert!(book.contains("b"));
    }

    #[test]
    fn next_record_leaves_book_untouched() {
        let mut book = ProgressBook::new();
        let preview = book.next_record("x", q(5), 0);
        assert!(book.is_empty());
        assert_eq!(preview, book.record_review("x", q(5), 0));
    }
}
