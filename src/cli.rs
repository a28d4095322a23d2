//! Command line front end: manage sentences, review what is due, show progress.

use anyhow::{Context, Result, bail};
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use sentences_app::clock::{Clock, FixedClock, SystemClock, format_timestamp};
use sentences_app::config::Config;
use sentences_app::database::db::SqliteStore;
use sentences_app::export::json::{
    export_json_to_path, import_json, import_new_sentences, merge_into_store,
};
use sentences_app::models::sentence::{
    MasteryFilter, SentenceFilter, collection_stats, random_sentence,
};
use sentences_app::models::{
    Collection, NewSentence, ProgressBook, Quality, ReviewSession, Sentence,
};
use sentences_app::store::ItemStore;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "sentences", version, about = "Spaced repetition for Arabic sentences")]
pub struct Cli {
    /// Database file (overrides SENTENCES_DB)
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Use the simulated calendar date stored in the database
    #[arg(long, global = true)]
    pub simulated: bool,

    /// Log level (overrides SENTENCES_LOG; RUST_LOG wins over both)
    #[arg(long, global = true, value_name = "LEVEL")]
    pub log: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add one sentence
    Add(AddArgs),
    /// Add every sentence from a JSON list of {arabic, spokenArabic, english}
    BulkAdd { file: PathBuf },
    /// Merge a collection snapshot into the database
    Import { file: PathBuf },
    /// Write the whole collection to a JSON snapshot
    Export { file: PathBuf },
    /// Remove a sentence and its progress
    Remove { id: String },
    /// Mark or unmark a sentence as favorite
    Favorite(FlagArgs),
    /// Mark or unmark a sentence as mastered
    Master(FlagArgs),
    /// List sentences
    List(FilterArgs),
    /// List the sentences due for review, in review order
    Due(FilterArgs),
    /// Record one review
    Review {
        id: String,
        /// 0 (forgot) to 5 (perfect)
        quality: Quality,
    },
    /// Review everything that is due, interactively
    Session,
    /// Show review statistics
    Stats,
    /// Show a random sentence
    Random,
    /// Move the simulated date one day forward
    AdvanceDay,
}

#[derive(Args, Debug)]
pub struct AddArgs {
    #[arg(long)]
    pub arabic: String,
    #[arg(long)]
    pub english: String,
    #[arg(long, default_value = "")]
    pub spoken: String,
}

#[derive(Args, Debug)]
pub struct FilterArgs {
    /// all, mastered, unmastered or favorite
    #[arg(long, default_value = "all")]
    pub filter: MasteryFilter,
    /// Only sentences added on this day (YYYY-MM-DD, local time)
    #[arg(long, value_name = "DATE")]
    pub date: Option<NaiveDate>,
    /// Text to look for in the Arabic, English or spoken form
    #[arg(long)]
    pub search: Option<String>,
}

impl FilterArgs {
    pub fn to_filter(&self) -> SentenceFilter {
        let mut filter = SentenceFilter::default().with_mastery(self.filter);
        if let Some(date) = self.date {
            filter = filter.created_on(date, &Local);
        }
        if let Some(term) = &self.search {
            filter = filter.with_search(term.as_str());
        }
        filter
    }
}

#[derive(Args, Debug)]
pub struct FlagArgs {
    pub id: String,
    /// Clear the flag instead of setting it
    #[arg(long)]
    pub off: bool,
}

impl Cli {
    /// Command line flags take precedence over the environment.
    pub fn apply_to(&self, mut config: Config) -> Config {
        if let Some(db) = &self.db {
            config.db_path = db.clone();
        }
        if let Some(level) = &self.log {
            config.log_level = level.clone();
        }
        config.simulated_clock |= self.simulated;
        config
    }
}

pub fn run(command: Command, config: &Config) -> Result<()> {
    let mut store = SqliteStore::open(&config.db_path, SystemClock.now_ms())
        .with_context(|| format!("opening database {}", config.db_path.display()))?;
    let clock: Box<dyn Clock> = if config.simulated_clock {
        Box::new(FixedClock(store.current_date()?))
    } else {
        Box::new(SystemClock)
    };
    let now = clock.now_ms();

    match command {
        Command::Add(args) => {
            let sentence = store.add_sentence(
                NewSentence {
                    arabic: args.arabic,
                    spoken_arabic: args.spoken,
                    english: args.english,
                },
                now,
            )?;
            println!("Added {}", sentence.id);
        }
        Command::BulkAdd { file } => {
            let payloads = import_new_sentences(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let added = store.bulk_add_sentences(payloads, now)?;
            println!("Added {} sentences", added.len());
        }
        Command::Import { file } => {
            let collection =
                import_json(&file).with_context(|| format!("reading {}", file.display()))?;
            let summary = merge_into_store(&collection, &mut store)?;
            println!(
                "Imported {} sentences ({} already present), {} progress records ({} kept as stored)",
                summary.sentences_added,
                summary.sentences_skipped,
                summary.progress_saved,
                summary.progress_skipped
            );
        }
        Command::Export { file } => {
            let collection = Collection::new(store.load_sentences()?, store.load_progress()?);
            export_json_to_path(&collection, &file)
                .with_context(|| format!("writing {}", file.display()))?;
            println!(
                "Exported {} sentences to {}",
                collection.sentences.len(),
                file.display()
            );
        }
        Command::Remove { id } => {
            store.remove_sentence(&id)?;
            println!("Removed {id}");
        }
        Command::Favorite(args) => store.set_favorite(&args.id, !args.off, now)?,
        Command::Master(args) => store.set_mastered(&args.id, !args.off, now)?,
        Command::List(args) => {
            let sentences = store.load_sentences()?;
            for sentence in args.to_filter().apply(&sentences) {
                print_sentence(sentence);
            }
        }
        Command::Due(args) => {
            let sentences = store.load_sentences()?;
            let book = store.load_progress()?;
            let filter = args.to_filter();
            for sentence in book.queue(&sentences, now) {
                if !filter.matches(sentence) {
                    continue;
                }
                let due = book
                    .get(&sentence.id)
                    .map(|p| format_timestamp(p.next_review_due))
                    .unwrap_or_else(|| "new".to_string());
                println!("[{due}] {}  {}", sentence.id, sentence.arabic);
            }
        }
        Command::Review { id, quality } => {
            if store.get_sentence(&id)?.is_none() {
                bail!("no sentence with id {id}");
            }
            let book = store.load_progress()?;
            let record = book.next_record(&id, quality, now);
            store.save_progress(&record)?;
            println!(
                "Next review {} (interval {} days, ease {:.2})",
                format_timestamp(record.next_review_due),
                record.interval,
                record.ease_factor
            );
        }
        Command::Session => {
            let sentences = store.load_sentences()?;
            let mut book = store.load_progress()?;
            run_session(&sentences, &mut book, &mut store, clock.as_ref())?;
        }
        Command::Stats => {
            let sentences = store.load_sentences()?;
            let book = store.load_progress()?;
            let stats = book.stats(now);
            let manual = collection_stats(&sentences);
            println!("Sentences:      {}", manual.total);
            println!(
                "Marked mastered: {} ({}%)",
                manual.mastered, manual.percentage
            );
            println!("Learned:        {}", stats.learned);
            println!("Mastered (SRS): {}", stats.mastered);
            println!("Due soon:       {}", stats.due_soon);
            println!("Overdue:        {}", stats.overdue);
            println!("Reviews:        {}", stats.total_reviews);
            println!("Accuracy:       {:.0}%", stats.accuracy * 100.0);
        }
        Command::Random => {
            let sentences = store.load_sentences()?;
            match random_sentence(&sentences, &mut rand::thread_rng()) {
                Some(sentence) => print_sentence(sentence),
                None => println!("No sentences yet"),
            }
        }
        Command::AdvanceDay => {
            let date = store.advance_day()?;
            println!("Simulated date is now {}", format_timestamp(date));
        }
    }
    Ok(())
}

fn print_sentence(sentence: &Sentence) {
    let mut flags = String::new();
    if sentence.favorite {
        flags.push('*');
    }
    if sentence.mastered {
        flags.push('M');
    }
    println!(
        "{} [{flags}] {} | {} | {}",
        sentence.id, sentence.arabic, sentence.spoken_arabic, sentence.english
    );
}

fn run_session(
    sentences: &[Sentence],
    book: &mut ProgressBook,
    store: &mut SqliteStore,
    clock: &dyn Clock,
) -> Result<()> {
    let mut session = ReviewSession::new_from_due(sentences, book, clock.now_ms());
    if session.is_completed() {
        println!("Nothing is due. Come back later!");
        return Ok(());
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut round = 0;

    while let Some(sentence) = session.current().cloned() {
        if session.round_number() != round {
            round = session.round_number();
            println!("\n{}", session.phase_message());
        }
        println!("\n{}", sentence.arabic);
        if !sentence.spoken_arabic.is_empty() {
            println!("({})", sentence.spoken_arabic);
        }
        prompt("Press Enter to show the answer, q to quit: ")?;
        match lines.next().transpose()? {
            Some(line) if line.trim() == "q" => break,
            Some(_) => {}
            None => break,
        }
        session.toggle_answer();
        println!("{}", sentence.english);

        let quality = loop {
            prompt("How well did you recall it? 0-5: ")?;
            let Some(line) = lines.next().transpose()? else {
                return Ok(());
            };
            match line.parse::<Quality>() {
                Ok(q) => break q,
                Err(err) => println!("{err}"),
            }
        };
        session.grade_current(quality, book, store, clock)?;
        println!("{} of {} passed", session.passed_count(), session.total_count());
        session.next();
    }

    if session.is_completed() {
        println!("\nSession complete!");
    }
    Ok(())
}

fn prompt(text: &str) -> io::Result<()> {
    print!("{text}");
    io::stdout().flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_accepts_filter_options() {
        let cli = Cli::try_parse_from([
            "sentences",
            "list",
            "--filter",
            "unmastered",
            "--date",
            "2024-03-10",
            "--search",
            "shukran",
        ])
        .unwrap();
        let Command::List(args) = cli.command else {
            panic!("expected list");
        };
        let filter = args.to_filter();
        assert_eq!(filter.mastery, MasteryFilter::Unmastered);
        assert!(filter.created_between.is_some());
        assert_eq!(filter.search.as_deref(), Some("shukran"));
    }

    #[test]
    fn list_defaults_to_everything() {
        let cli = Cli::try_parse_from(["sentences", "list"]).unwrap();
        let Command::List(args) = cli.command else {
            panic!("expected list");
        };
        assert_eq!(args.to_filter(), SentenceFilter::default());
    }

    #[test]
    fn unknown_filter_is_rejected() {
        assert!(Cli::try_parse_from(["sentences", "due", "--filter", "done"]).is_err());
    }
}
