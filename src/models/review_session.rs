//! Review session over the sentences that are due.
//! Sentences graded below 3 come back in the next round until every one passes.

use super::{ProgressBook, ProgressRecord, Quality, Sentence};
use crate::clock::Clock;
use crate::error::StoreResult;
use crate::store::ItemStore;
use tracing::info;

#[derive(Clone, Debug)]
struct SessionCard {
    sentence: Sentence,
    passed: bool,
}

pub struct ReviewSession {
    cards: Vec<SessionCard>,
    current_round: Vec<usize>,
    current_index: usize,
    pub show_answer: bool,
    round_number: usize,
}

impl ReviewSession {
    /// Builds a session from the due sentences in priority order.
    pub fn new_from_due(sentences: &[Sentence], book: &ProgressBook, now: i64) -> Self {
        let cards: Vec<SessionCard> = book
            .queue(sentences, now)
            .into_iter()
            .map(|s| SessionCard {
                sentence: s.clone(),
                passed: false,
            })
            .collect();
        let current_round = (0..cards.len()).collect();

        Self {
            cards,
            current_round,
            current_index: 0,
            show_answer: false,
            round_number: 1,
        }
    }

    pub fn current(&self) -> Option<&Sentence> {
        self.current_round
            .get(self.current_index)
            .and_then(|&idx| self.cards.get(idx))
            .map(|card| &card.sentence)
    }

    pub fn toggle_answer(&mut self) {
        self.show_answer = !self.show_answer;
    }

    /// Moves to the next sentence, starting a new round at the end of this one.
    pub fn next(&mut self) {
        if self.current_index + 1 < self.current_round.len() {
            self.current_index += 1;
            self.show_answer = false;
        } else {
            self.start_next_round();
        }
    }

    fn start_next_round(&mut self) {
        let failed: Vec<usize> = self
            .current_round
            .iter()
            .copied()
            .filter(|&idx| self.cards.get(idx).is_some_and(|card| !card.passed))
            .collect();

        if failed.is_empty() {
            self.current_round.clear();
            self.current_index = 0;
            return;
        }

        self.current_round = failed;
        self.current_index = 0;
        self.show_answer = false;
        self.round_number += 1;
        info!(
            round = self.round_number,
            remaining = self.current_round.len(),
            "starting review round"
        );
    }

    /// Records the grade for the current sentence and persists the updated record.
    pub fn grade_current<S, C>(
        &mut self,
        quality: Quality,
        book: &mut ProgressBook,
        store: &mut S,
        clock: &C,
    ) -> StoreResult<Option<ProgressRecord>>
    where
        S: ItemStore + ?Sized,
        C: Clock + ?Sized,
    {
        let Some(&idx) = self.current_round.get(self.current_index) else {
            return Ok(None);
        };
        let Some(card) = self.cards.get_mut(idx) else {
            return Ok(None);
        };

        let record = book.next_record(&card.sentence.id, quality, clock.now_ms());
        store.save_progress(&record)?;
        book.insert(record.clone());
        card.passed = quality.is_successful();
        Ok(Some(record))
    }

    pub fn passed_count(&self) -> usize {
        self.current_round
            .iter()
            .filter(|&&idx| self.cards.get(idx).is_some_and(|card| card.passed))
            .count()
    }

    pub fn total_count(&self) -> usize {
        self.current_round.len()
    }

    pub fn remaining_count(&self) -> usize {
        self.total_count() - self.passed_count()
    }

    pub fn round_number(&self) -> usize {
        self.round_number
    }

    pub fn is_completed(&self) -> bool {
        self.current_round.is_empty() || self.passed_count() == self.total_count()
    }

    pub fn phase_message(&self) -> String {
        if self.round_number == 1 {
            format!("Round {}: {} sentences", self.round_number, self.total_count())
        } else {
            format!(
                "Round {} (retry): {} sentences",
                self.round_number,
                self.total_count()
            )
        }
    }
}
