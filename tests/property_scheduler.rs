use proptest::prelude::*;

use sentences_app::clock::DAY_MS;
use sentences_app::models::queue::{due_items, sort_by_priority};
use sentences_app::models::sm2::{MIN_EASE_FACTOR, initialize, record_review};
use sentences_app::models::stats::compute_stats;
use sentences_app::models::{ProgressMap, Quality, Sentence};

fn quality() -> impl Strategy<Value = Quality> {
    (0_i64..=5).prop_map(|v| Quality::new(v).unwrap())
}

fn sentence(id: usize) -> Sentence {
    Sentence {
        id: format!("s{id}"),
        arabic: String::new(),
        spoken_arabic: String::new(),
        english: String::new(),
        created_at: 0,
        updated_at: 0,
        favorite: false,
        mastered: false,
    }
}

proptest! {
    #[test]
    fn pt_ease_floor_and_counters(qualities in prop::collection::vec(quality(), 1..60)) {
        let mut record = initialize("x", 0);
        for (n, q) in qualities.iter().enumerate() {
            let before = record.repetitions;
            let now = n as i64 * DAY_MS;
            record = record_review(&record, *q, now);

            prop_assert!(record.ease_factor >= MIN_EASE_FACTOR);
            prop_assert_eq!(record.repetitions, before + 1);
            prop_assert_eq!(record.correct + record.incorrect, record.repetitions);
            prop_assert_eq!(record.next_review_due, now + record.interval as i64 * DAY_MS);
            prop_assert!(record.interval >= 1);
            if !q.is_successful() {
                prop_assert_eq!(record.interval, 1);
            }
        }
        prop_assert_eq!(record.repetitions as usize, qualities.len());
    }

    #[test]
    fn pt_due_filter_matches_definition(
        dues in prop::collection::vec(prop::option::of(-1_000_i64..1_000), 0..40),
        now in -1_000_i64..1_000,
    ) {
        let items: Vec<Sentence> = (0..dues.len()).map(sentence).collect();
        let mut progress = ProgressMap::new();
        for (i, due) in dues.iter().enumerate() {
            if let Some(due) = due {
                let mut p = initialize(&items[i].id, 0);
                p.next_review_due = *due;
                progress.insert(items[i].id.clone(), p);
            }
        }

        let due: Vec<&str> = due_items(&items, &progress, now)
            .into_iter()
            .map(|s| s.id.as_str())
            .collect();
        let expected: Vec<&str> = items
            .iter()
            .zip(&dues)
            .filter(|(_, d)| d.is_none_or(|due| due <= now))
            .map(|(s, _)| s.id.as_str())
            .collect();
        prop_assert_eq!(due, expected);
    }

    #[test]
    fn pt_priority_order_is_sorted(
        entries in prop::collection::vec(prop::option::of((0_i64..50, 13_u32..30)), 0..40),
    ) {
        let items: Vec<Sentence> = (0..entries.len()).map(sentence).collect();
        let mut progress = ProgressMap::new();
        for (i, entry) in entries.iter().enumerate() {
            if let Some((due, ease_tenths)) = entry {
                let mut p = initialize(&items[i].id, 0);
                p.next_review_due = *due;
                p.ease_factor = *ease_tenths as f64 / 10.0;
                progress.insert(items[i].id.clone(), p);
            }
        }

        let sorted = sort_by_priority(&items, &progress);
        prop_assert_eq!(sorted.len(), items.len());
        for pair in sorted.windows(2) {
            match (progress.get(&pair[0].id), progress.get(&pair[1].id)) {
                (Some(_), None) => prop_assert!(false, "reviewed item sorted before new item"),
                (Some(a), Some(b)) => {
                    prop_assert!(a.next_review_due <= b.next_review_due);
                    if a.next_review_due == b.next_review_due {
                        prop_assert!(a.ease_factor <= b.ease_factor);
                    }
                }
                _ => {}
            }
        }
    }

    #[test]
    fn pt_stats_accuracy_bounded(qualities in prop::collection::vec(quality(), 0..30)) {
        let mut progress = ProgressMap::new();
        let mut record = initialize("x", 0);
        for q in &qualities {
            record = record_review(&record, *q, 0);
        }
        progress.insert("x".to_string(), record);

        let stats = compute_stats(&progress, 0);
        prop_assert_eq!(stats.total_reviews as usize, qualities.len());
        prop_assert!((0.0..=1.0).contains(&stats.accuracy));
    }
}
