//! Boundary to wherever sentences and progress records are persisted.
use crate::error::StoreResult;
use crate::models::{Collection, MergeSummary, NewSentence, ProgressBook, ProgressRecord, Sentence};

pub trait ItemStore {
    /// All sentences, newest first.
    fn load_sentences(&self) -> StoreResult<Vec<Sentence>>;

    fn load_progress(&self) -> StoreResult<ProgressBook>;

    fn add_sentence(&mut self, payload: NewSentence, now: i64) -> StoreResult<Sentence>;

    fn bulk_add_sentences(
        &mut self,
        payloads: Vec<NewSentence>,
        now: i64,
    ) -> StoreResult<Vec<Sentence>>;

    /// Inserts a sentence as-is, keeping its id. Returns false if the id already exists.
    fn insert_sentence(&mut self, sentence: &Sentence) -> StoreResult<bool>;

    /// Removes the sentence and its progress record.
    fn remove_sentence(&mut self, id: &str) -> StoreResult<()>;

    fn set_favorite(&mut self, id: &str, favorite: bool, now: i64) -> StoreResult<()>;

    fn set_mastered(&mut self, id: &str, mastered: bool, now: i64) -> StoreResult<()>;

    fn save_progress(&mut self, record: &ProgressRecord) -> StoreResult<()>;

    /// Adds the snapshot's sentences with unknown ids and saves its progress records,
    /// all or nothing. A record is only written for a sentence the store has, and
    /// never over a stored record with more repetitions.
    fn merge_collection(&mut self, collection: &Collection) -> StoreResult<MergeSummary>;
}
