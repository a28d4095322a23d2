//! A sentence is the unit of study: Arabic text, its spoken form and an English translation.
//! `favorite` and `mastered` are set by the user and never touched by the scheduler.
use chrono::{NaiveDate, TimeZone};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sentence {
    pub id: String,
    pub arabic: String,
    pub spoken_arabic: String,
    pub english: String,
    pub created_at: i64,
    pub updated_at: i64,
    #[serde(default)]
    pub favorite: bool,
    #[serde(default)]
    pub mastered: bool,
}

/// Payload for adding a sentence.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSentence {
    pub arabic: String,
    #[serde(default)]
    pub spoken_arabic: String,
    pub english: String,
}

impl Sentence {
    pub fn new(payload: NewSentence, now: i64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            arabic: payload.arabic,
            spoken_arabic: payload.spoken_arabic,
            english: payload.english,
            created_at: now,
            updated_at: now,
            favorite: false,
            mastered: false,
        }
    }
}

/// Counts based on the manual `mastered` flag.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CollectionStats {
    pub total: usize,
    pub mastered: usize,
    /// Rounded to the nearest whole percent.
    pub percentage: u32,
}

pub fn collection_stats(sentences: &[Sentence]) -> CollectionStats {
    let total = sentences.len();
    let mastered = sentences.iter().filter(|s| s.mastered).count();
    let percentage = if total > 0 {
        (mastered as f64 / total as f64 * 100.0).round() as u32
    } else {
        0
    };
    CollectionStats {
        total,
        mastered,
        percentage,
    }
}

/// Which user flag a sentence must carry to be listed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MasteryFilter {
    #[default]
    All,
    Mastered,
    Unmastered,
    Favorite,
}

impl MasteryFilter {
    pub fn matches(self, sentence: &Sentence) -> bool {
        match self {
            MasteryFilter::All => true,
            MasteryFilter::Mastered => sentence.mastered,
            MasteryFilter::Unmastered => !sentence.mastered,
            MasteryFilter::Favorite => sentence.favorite,
        }
    }
}

impl FromStr for MasteryFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(MasteryFilter::All),
            "mastered" => Ok(MasteryFilter::Mastered),
            "unmastered" => Ok(MasteryFilter::Unmastered),
            "favorite" | "favorites" => Ok(MasteryFilter::Favorite),
            other => Err(format!(
                "unknown filter '{other}', expected all, mastered, unmastered or favorite"
            )),
        }
    }
}

/// First and last millisecond of `date` in `tz`, both inclusive.
pub fn day_bounds<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> Option<(i64, i64)> {
    let start = tz
        .from_local_datetime(&date.and_hms_opt(0, 0, 0)?)
        .earliest()?;
    let end = tz
        .from_local_datetime(&date.and_hms_milli_opt(23, 59, 59, 999)?)
        .latest()?;
    Some((start.timestamp_millis(), end.timestamp_millis()))
}

/// Narrows a sentence list the way the review and quiz lists do.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SentenceFilter {
    pub mastery: MasteryFilter,
    /// Inclusive `created_at` range, usually from [`day_bounds`].
    pub created_between: Option<(i64, i64)>,
    /// Arabic is matched as written; English and the spoken form ignore case.
    pub search: Option<String>,
}

impl SentenceFilter {
    pub fn with_mastery(mut self, mastery: MasteryFilter) -> Self {
        self.mastery = mastery;
        self
    }

    pub fn created_on<Tz: TimeZone>(mut self, date: NaiveDate, tz: &Tz) -> Self {
        self.created_between = day_bounds(date, tz);
        self
    }

    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        let term = term.into();
        self.search = (!term.is_empty()).then_some(term);
        self
    }

    pub fn matches(&self, sentence: &Sentence) -> bool {
        if !self.mastery.matches(sentence) {
            return false;
        }
        if let Some((start, end)) = self.created_between {
            if sentence.created_at < start || sentence.created_at > end {
                return false;
            }
        }
        match &self.search {
            Some(term) => {
                let lowered = term.to_lowercase();
                sentence.arabic.contains(term.as_str())
                    || sentence.english.to_lowercase().contains(&lowered)
                    || sentence.spoken_arabic.to_lowercase().contains(&lowered)
            }
            None => true,
        }
    }

    pub fn apply<'a>(&self, sentences: &'a [Sentence]) -> Vec<&'a Sentence> {
        sentences.iter().filter(|s| self.matches(s)).collect()
    }
}

pub fn random_sentence<'a, R: Rng + ?Sized>(
    sentences: &'a [Sentence],
    rng: &mut R,
) -> Option<&'a Sentence> {
    sentences.choose(rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn sentence(english: &str) -> Sentence {
        Sentence::new(
            NewSentence {
                arabic: "مرحبا".to_string(),
                spoken_arabic: "marhaba".to_string(),
                english: english.to_string(),
            },
            1_000,
        )
    }

    #[test]
    fn new_sentence_starts_unflagged() {
        let s = sentence("hello");
        assert!(!s.favorite);
        assert!(!s.mastered);
        assert_eq!(s.created_at, 1_000);
        assert_eq!(s.updated_at, 1_000);
        assert!(Uuid::parse_str(&s.id).is_ok());
    }

    #[test]
    fn ids_are_unique() {
        assert_ne!(sentence("a").id, sentence("a").id);
    }

    #[test]
    fn collection_stats_counts_manual_flag() {
        let mut list = vec![sentence("a"), sentence("b"), sentence("c")];
        list[0].mastered = true;
        let stats = collection_stats(&list);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.mastered, 1);
        assert_eq!(stats.percentage, 33);
    }

    #[test]
    fn collection_stats_empty() {
        assert_eq!(collection_stats(&[]), CollectionStats::default());
    }

    #[test]
    fn random_sentence_handles_empty_and_picks_member() {
        let mut rng = StdRng::seed_from_u64(7);
        assert!(random_sentence(&[], &mut rng).is_none());
        let list = vec![sentence("a"), sentence("b")];
        let pick = random_sentence(&list, &mut rng).unwrap();
        assert!(list.iter().any(|s| s.id == pick.id));
    }

    #[test]
    fn json_uses_camel_case() {
        let s = sentence("hi");
        let json = serde_json::to_string(&s).unwrap();
        assert!(json.contains("\"spokenArabic\""));
        assert!(json.contains("\"createdAt\""));
    }

    fn flagged(english: &str, favorite: bool, mastered: bool) -> Sentence {
        let mut s = sentence(english);
        s.favorite = favorite;
        s.mastered = mastered;
        s
    }

    fn englishes(list: &[&Sentence]) -> Vec<String> {
        list.iter().map(|s| s.english.clone()).collect()
    }

    #[test]
    fn mastery_filter_branches() {
        let list = vec![
            flagged("plain", false, false),
            flagged("fav", true, false),
            flagged("known", false, true),
        ];
        let by = |m| englishes(&SentenceFilter::default().with_mastery(m).apply(&list));

        assert_eq!(by(MasteryFilter::All), vec!["plain", "fav", "known"]);
        assert_eq!(by(MasteryFilter::Mastered), vec!["known"]);
        assert_eq!(by(MasteryFilter::Unmastered), vec!["plain", "fav"]);
        assert_eq!(by(MasteryFilter::Favorite), vec!["fav"]);
    }

    #[test]
    fn mastery_filter_parses() {
        assert_eq!("Mastered".parse::<MasteryFilter>(), Ok(MasteryFilter::Mastered));
        assert_eq!("favorite".parse::<MasteryFilter>(), Ok(MasteryFilter::Favorite));
        assert!("done".parse::<MasteryFilter>().is_err());
    }

    #[test]
    fn day_bounds_cover_the_whole_day() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let (start, end) = day_bounds(date, &chrono::Utc).unwrap();
        assert_eq!(start, 1_710_028_800_000);
        assert_eq!(end, start + 86_400_000 - 1);
    }

    #[test]
    fn created_on_includes_both_edges() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let (start, end) = day_bounds(date, &chrono::Utc).unwrap();
        let mut list = vec![sentence("before"), sentence("first"), sentence("last"), sentence("after")];
        list[0].created_at = start - 1;
        list[1].created_at = start;
        list[2].created_at = end;
        list[3].created_at = end + 1;

        let filter = SentenceFilter::default().created_on(date, &chrono::Utc);
        assert_eq!(englishes(&filter.apply(&list)), vec!["first", "last"]);
    }

    #[test]
    fn search_matches_each_field() {
        let mut list = vec![sentence("Good Morning"), sentence("thanks")];
        list[1].arabic = "شكرا".to_string();
        list[1].spoken_arabic = "Shukran".to_string();

        let find = |term: &str| englishes(&SentenceFilter::default().with_search(term).apply(&list));
        assert_eq!(find("good morning"), vec!["Good Morning"]);
        assert_eq!(find("SHUKRAN"), vec!["thanks"]);
        assert_eq!(find("شكر"), vec!["thanks"]);
        assert!(find("nothing").is_empty());
        assert_eq!(find("").len(), 2);
    }

    #[test]
    fn filters_combine() {
        let mut list = vec![flagged("cat", true, false), flagged("car", false, false)];
        list[1].created_at = 5_000;
        let filter = SentenceFilter {
            mastery: MasteryFilter::Unmastered,
            created_between: Some((0, 2_000)),
            search: Some("ca".to_string()),
        };
        assert_eq!(englishes(&filter.apply(&list)), vec!["cat"]);
    }
}
