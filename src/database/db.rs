//! SQLite persistence for sentences and their progress records.
//!
//! Handles schema creation, sentence CRUD, progress records and the simulated
//! calendar date used to try out review spacing without waiting.

use crate::clock::DAY_MS;
use crate::error::{StoreError, StoreResult};
use crate::models::{Collection, MergeSummary, NewSentence, ProgressBook, ProgressRecord, Sentence};
use crate::store::ItemStore;
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};

const SCHEMA: &str = "
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS sentences (
        id TEXT PRIMARY KEY,
        arabic TEXT NOT NULL,
        spoken_arabic TEXT NOT NULL DEFAULT '',
        english TEXT NOT NULL,
        created_at INTEGER NOT NULL,
        updated_at INTEGER NOT NULL,
        favorite INTEGER NOT NULL DEFAULT 0,
        mastered INTEGER NOT NULL DEFAULT 0
    );

    CREATE TABLE IF NOT EXISTS progress (
        sentence_id TEXT PRIMARY KEY,
        last_practiced INTEGER NOT NULL,
        next_review_due INTEGER NOT NULL,
        ease_factor REAL NOT NULL DEFAULT 2.5,
        interval_days INTEGER NOT NULL DEFAULT 0,
        repetitions INTEGER NOT NULL DEFAULT 0,
        correct INTEGER NOT NULL DEFAULT 0,
        incorrect INTEGER NOT NULL DEFAULT 0,
        FOREIGN KEY (sentence_id) REFERENCES sentences(id) ON DELETE CASCADE
    );

    CREATE TABLE IF NOT EXISTS app_state (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );
";

const CURRENT_DATE_KEY: &str = "current_date";

/// Creates the tables and seeds the simulated date with `now` if it is unset.
pub fn init_schema(conn: &Connection, now: i64) -> StoreResult<()> {
    conn.execute_batch(SCHEMA)?;
    conn.execute(
        "INSERT OR IGNORE INTO app_state (key, value) VALUES (?1, ?2)",
        params![CURRENT_DATE_KEY, now.to_string()],
    )?;
    Ok(())
}

/// Opens (or creates) the database file at `path`.
pub fn init_database(path: &Path, now: i64) -> StoreResult<Connection> {
    let conn = Connection::open(path)?;
    init_schema(&conn, now)?;
    info!(path = %path.display(), "opened sentence database");
    Ok(conn)
}

/// Simulated "today" in milliseconds.
pub fn get_current_date(conn: &Connection) -> StoreResult<i64> {
    let value: String = conn.query_row(
        "SELECT value FROM app_state WHERE key = ?1",
        params![CURRENT_DATE_KEY],
        |row| row.get(0),
    )?;
    value.parse::<i64>().map_err(|_| StoreError::CorruptState {
        key: CURRENT_DATE_KEY,
        value,
    })
}

/// Moves the simulated date 24 hours forward and returns the new date.
pub fn advance_day(conn: &Connection) -> StoreResult<i64> {
    let next_day = get_current_date(conn)? + DAY_MS;
    conn.execute(
        "UPDATE app_state SET value = ?1 WHERE key = ?2",
        params![next_day.to_string(), CURRENT_DATE_KEY],
    )?;
    debug!(current_date = next_day, "advanced simulated date");
    Ok(next_day)
}

fn sentence_from_row(row: &Row<'_>) -> rusqlite::Result<Sentence> {
    Ok(Sentence {
        id: row.get(0)?,
        arabic: row.get(1)?,
        spoken_arabic: row.get(2)?,
        english: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
        favorite: row.get(6)?,
        mastered: row.get(7)?,
    })
}

fn progress_from_row(row: &Row<'_>) -> rusqlite::Result<ProgressRecord> {
    Ok(ProgressRecord {
        id: row.get(0)?,
        last_practiced: row.get(1)?,
        next_review_due: row.get(2)?,
        ease_factor: row.get(3)?,
        interval: row.get(4)?,
        repetitions: row.get(5)?,
        correct: row.get(6)?,
        incorrect: row.get(7)?,
    })
}

/// Inserts a sentence keeping its id. Returns false if the id is taken.
pub fn insert_sentence(sentence: &Sentence, conn: &Connection) -> StoreResult<bool> {
    let inserted = conn.execute(
        "INSERT OR IGNORE INTO sentences
            (id, arabic, spoken_arabic, english, created_at, updated_at, favorite, mastered)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            sentence.id,
            sentence.arabic,
            sentence.spoken_arabic,
            sentence.english,
            sentence.created_at,
            sentence.updated_at,
            sentence.favorite,
            sentence.mastered
        ],
    )?;
    Ok(inserted == 1)
}

/// Adds a new sentence. No progress record is created until its first review.
pub fn add_sentence(payload: NewSentence, now: i64, conn: &Connection) -> StoreResult<Sentence> {
    let sentence = Sentence::new(payload, now);
    insert_sentence(&sentence, conn)?;
    debug!(sentence_id = %sentence.id, "added sentence");
    Ok(sentence)
}

/// Adds several sentences in one transaction.
pub fn bulk_add_sentences(
    payloads: Vec<NewSentence>,
    now: i64,
    conn: &mut Connection,
) -> StoreResult<Vec<Sentence>> {
    let tx = conn.transaction()?;
    let mut added = Vec::with_capacity(payloads.len());
    for payload in payloads {
        let sentence = Sentence::new(payload, now);
        insert_sentence(&sentence, &tx)?;
        added.push(sentence);
    }
    tx.commit()?;
    info!(count = added.len(), "bulk added sentences");
    Ok(added)
}

/// All sentences, newest first.
pub fn get_sentences(conn: &Connection) -> StoreResult<Vec<Sentence>> {
    let mut stmt = conn.prepare(
        "SELECT id, arabic, spoken_arabic, english, created_at, updated_at, favorite, mastered
         FROM sentences
         ORDER BY created_at DESC, rowid DESC",
    )?;
    let sentences = stmt
        .query_map([], sentence_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(sentences)
}

pub fn get_sentence(id: &str, conn: &Connection) -> StoreResult<Option<Sentence>> {
    let sentence = conn
        .query_row(
            "SELECT id, arabic, spoken_arabic, english, created_at, updated_at, favorite, mastered
             FROM sentences WHERE id = ?1",
            params![id],
            sentence_from_row,
        )
        .optional()?;
    Ok(sentence)
}

/// Deletes a sentence together with its progress record.
pub fn remove_sentence(id: &str, conn: &mut Connection) -> StoreResult<()> {
    let tx = conn.transaction()?;
    tx.execute("DELETE FROM progress WHERE sentence_id = ?1", params![id])?;
    let removed = tx.execute("DELETE FROM sentences WHERE id = ?1", params![id])?;
    if removed == 0 {
        return Err(StoreError::sentence_not_found(id));
    }
    tx.commit()?;
    debug!(sentence_id = id, "removed sentence");
    Ok(())
}

fn set_flag(column: &str, id: &str, value: bool, now: i64, conn: &Connection) -> StoreResult<()> {
    // column is one of two literals below, never user input
    let sql = format!("UPDATE sentences SET {column} = ?1, updated_at = ?2 WHERE id = ?3");
    let updated = conn.execute(&sql, params![value, now, id])?;
    if updated == 0 {
        return Err(StoreError::sentence_not_found(id));
    }
    debug!(sentence_id = id, column, value, "updated flag");
    Ok(())
}

pub fn set_favorite(id: &str, favorite: bool, now: i64, conn: &Connection) -> StoreResult<()> {
    set_flag("favorite", id, favorite, now, conn)
}

pub fn set_mastered(id: &str, mastered: bool, now: i64, conn: &Connection) -> StoreResult<()> {
    set_flag("mastered", id, mastered, now, conn)
}

/// Inserts or replaces the progress record of a sentence.
pub fn save_progress(record: &ProgressRecord, conn: &Connection) -> StoreResult<()> {
    conn.execute(
        "INSERT INTO progress
            (sentence_id, last_practiced, next_review_due, ease_factor, interval_days,
             repetitions, correct, incorrect)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
         ON CONFLICT(sentence_id) DO UPDATE SET
            last_practiced = excluded.last_practiced,
            next_review_due = excluded.next_review_due,
            ease_factor = excluded.ease_factor,
            interval_days = excluded.interval_days,
            repetitions = excluded.repetitions,
            correct = excluded.correct,
            incorrect = excluded.incorrect",
        params![
            record.id,
            record.last_practiced,
            record.next_review_due,
            record.ease_factor,
            record.interval,
            record.repetitions,
            record.correct,
            record.incorrect
        ],
    )?;
    debug!(sentence_id = %record.id, next_review_due = record.next_review_due, "saved progress");
    Ok(())
}

pub fn get_progress(conn: &Connection) -> StoreResult<ProgressBook> {
    let mut stmt = conn.prepare(
        "SELECT sentence_id, last_practiced, next_review_due, ease_factor, interval_days,
                repetitions, correct, incorrect
         FROM progress",
    )?;
    let records = stmt
        .query_map([], progress_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(records.into_iter().collect())
}

fn stored_repetitions(id: &str, conn: &Connection) -> StoreResult<Option<u32>> {
    let repetitions = conn
        .query_row(
            "SELECT repetitions FROM progress WHERE sentence_id = ?1",
            params![id],
            |row| row.get(0),
        )
        .optional()?;
    Ok(repetitions)
}

/// Merges a snapshot in one transaction. Sentences with known ids are left alone;
/// a progress record is skipped when its sentence is missing or when the stored
/// record has more repetitions.
pub fn merge_collection(collection: &Collection, conn: &mut Connection) -> StoreResult<MergeSummary> {
    let tx = conn.transaction()?;
    let mut summary = MergeSummary::default();

    for sentence in &collection.sentences {
        if insert_sentence(sentence, &tx)? {
            summary.sentences_added += 1;
        } else {
            summary.sentences_skipped += 1;
        }
    }

    let known: HashSet<String> = {
        let mut stmt = tx.prepare("SELECT id FROM sentences")?;
        let ids = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<HashSet<String>>>()?;
        ids
    };

    for record in collection.progress.values() {
        if !known.contains(&record.id) {
            summary.progress_skipped += 1;
            continue;
        }
        match stored_repetitions(&record.id, &tx)? {
            Some(stored) if stored > record.repetitions => {
                debug!(
                    sentence_id = %record.id,
                    stored,
                    incoming = record.repetitions,
                    "kept newer stored progress"
                );
                summary.progress_skipped += 1;
            }
            _ => {
                save_progress(record, &tx)?;
                summary.progress_saved += 1;
            }
        }
    }

    tx.commit()?;
    Ok(summary)
}

/// [`ItemStore`] backed by a SQLite connection.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(path: &Path, now: i64) -> StoreResult<Self> {
        Ok(Self {
            conn: init_database(path, now)?,
        })
    }

    pub fn open_in_memory(now: i64) -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        init_schema(&conn, now)?;
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn current_date(&self) -> StoreResult<i64> {
        get_current_date(&self.conn)
    }

    pub fn advance_day(&self) -> StoreResult<i64> {
        advance_day(&self.conn)
    }

    pub fn get_sentence(&self, id: &str) -> StoreResult<Option<Sentence>> {
        get_sentence(id, &self.conn)
    }
}

impl ItemStore for SqliteStore {
    fn load_sentences(&self) -> StoreResult<Vec<Sentence>> {
        get_sentences(&self.conn)
    }

    fn load_progress(&self) -> StoreResult<ProgressBook> {
        get_progress(&self.conn)
    }

    fn add_sentence(&mut self, payload: NewSentence, now: i64) -> StoreResult<Sentence> {
        add_sentence(payload, now, &self.conn)
    }

    fn bulk_add_sentences(
        &mut self,
        payloads: Vec<NewSentence>,
        now: i64,
    ) -> StoreResult<Vec<Sentence>> {
        bulk_add_sentences(payloads, now, &mut self.conn)
    }

    fn insert_sentence(&mut self, sentence: &Sentence) -> StoreResult<bool> {
        insert_sentence(sentence, &self.conn)
    }

    fn remove_sentence(&mut self, id: &str) -> StoreResult<()> {
        remove_sentence(id, &mut self.conn)
    }

    fn set_favorite(&mut self, id: &str, favorite: bool, now: i64) -> StoreResult<()> {
        set_favorite(id, favorite, now, &self.conn)
    }

    fn set_mastered(&mut self, id: &str, mastered: bool, now: i64) -> StoreResult<()> {
        set_mastered(id, mastered, now, &self.conn)
    }

    fn save_progress(&mut self, record: &ProgressRecord) -> StoreResult<()> {
        save_progress(record, &self.conn)
    }

    fn merge_collection(&mut self, collection: &Collection) -> StoreResult<MergeSummary> {
        merge_collection(collection, &mut self.conn)
    }
}
