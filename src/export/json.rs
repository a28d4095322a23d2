//! JSON snapshots of a whole collection: every sentence plus its progress record.

use crate::error::StoreResult;
use crate::models::{Collection, MergeSummary, NewSentence};
use crate::store::ItemStore;
use std::fs;
use std::path::Path;
use tracing::info;

/// Writes the collection as pretty-printed JSON.
pub fn export_json_to_path(collection: &Collection, path: &Path) -> StoreResult<()> {
    let json_string = serde_json::to_string_pretty(collection)?;
    fs::write(path, json_string)?;
    info!(
        path = %path.display(),
        sentences = collection.sentences.len(),
        "exported collection"
    );
    Ok(())
}

/// Reads a collection snapshot, rejecting progress records that break scheduling
/// invariants.
pub fn import_json(path: &Path) -> StoreResult<Collection> {
    let contents = fs::read_to_string(path)?;
    let collection: Collection = serde_json::from_str(&contents)?;
    collection.validate()?;
    Ok(collection)
}

/// Reads a plain list of sentences to add, e.g. `[{"arabic": .., "english": ..}]`.
pub fn import_new_sentences(path: &Path) -> StoreResult<Vec<NewSentence>> {
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

/// Validates the snapshot, then merges it into the store in one step.
pub fn merge_into_store<S: ItemStore + ?Sized>(
    collection: &Collection,
    store: &mut S,
) -> StoreResult<MergeSummary> {
    collection.validate()?;
    let summary = store.merge_collection(collection)?;
    info!(
        added = summary.sentences_added,
        skipped = summary.sentences_skipped,
        progress = summary.progress_saved,
        progress_skipped = summary.progress_skipped,
        "merged collection snapshot"
    );
    Ok(summary)
}
