pub mod clock;
pub mod config;
pub mod database;
pub mod error;
pub mod export;
pub mod logging;
pub mod models;
pub mod store;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{SchedulerError, StoreError};
pub use models::{
    Collection, NewSentence, ProgressBook, ProgressMap, ProgressRecord, Quality, ReviewSession,
    Sentence, StatsSummary,
};
pub use store::ItemStore;
