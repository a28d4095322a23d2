pub mod collection;
pub mod progress;
pub mod progress_book;
pub mod quality;
pub mod queue;
pub mod review_session;
pub mod sentence;
pub mod sm2;
pub mod stats;

pub use collection::{Collection, MergeSummary};
pub use progress::{ProgressMap, ProgressRecord};
pub use progress_book::ProgressBook;
pub use quality::Quality;
pub use review_session::ReviewSession;
pub use sentence::{CollectionStats, NewSentence, Sentence};
pub use stats::StatsSummary;
