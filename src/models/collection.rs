//! Everything a user has: their sentences and the progress on each.
use super::{ProgressBook, ProgressMap, Sentence, sm2};
use crate::error::SchedulerError;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    pub sentences: Vec<Sentence>,
    #[serde(default)]
    pub progress: ProgressMap,
}

impl Collection {
    pub fn new(sentences: Vec<Sentence>, book: ProgressBook) -> Self {
        Self {
            sentences,
            progress: book.into_map(),
        }
    }

    pub fn find(&self, id: &str) -> Option<&Sentence> {
        self.sentences.iter().find(|s| s.id == id)
    }

    /// Rejects the first progress record that breaks a scheduling invariant.
    pub fn validate(&self) -> Result<(), SchedulerError> {
        self.progress
            .iter()
            .try_for_each(|(key, record)| sm2::validate_record(key, record))
    }
}

/// Counts of what merging a [`Collection`] into a store wrote.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MergeSummary {
    pub sentences_added: usize,
    pub sentences_skipped: usize,
    pub progress_saved: usize,
    /// Records older than the stored one, or for a sentence the store does not have.
    pub progress_skipped: usize,
}
