// src/main.rs

use chrono::{DateTime, Utc};
use clap::{ArgGroup, Parser, Subcommand};
use log::info;
use review_engine::constants::DEFAULT_DB_PATH;
use review_engine::{
    database, gaps, interval, pedagogy, repository, selectors, AnswerRecord, Error, Item, ItemId,
    Mode, Result, ReviewOutcome, SchedulerConfig, SelectionContext,
};
use rusqlite::Connection;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(version, about = "Struggle-aware spaced repetition scheduler", long_about = None)]
struct Cli {
    /// Path to the SQLite item store.
    #[arg(long, global = true, default_value = DEFAULT_DB_PATH)]
    db: PathBuf,

    /// Optional TOML file overriding scheduler coefficients.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Import a JSON array of items into the store.
    Import { file: PathBuf },
    /// Rank stored items for a mode (repeat, study or discover).
    Queue {
        mode: String,
        /// Item ids Discover must skip.
        #[arg(long = "exclude")]
        exclude: Vec<String>,
        /// Topics the user is currently working on.
        #[arg(long = "topic")]
        topics: Vec<String>,
        /// Only print the first N items.
        #[arg(long)]
        limit: Option<usize>,
        /// Print the new and recent queues separately (study mode only).
        #[arg(long)]
        split: bool,
    },
    /// Show whether an item is due and what its next interval would be.
    Preview { id: String },
    /// Record a review outcome and persist the updated item.
    #[command(group(ArgGroup::new("outcome").required(true).args(["remembered", "forgot"])))]
    Review {
        id: String,
        #[arg(long)]
        remembered: bool,
        #[arg(long)]
        forgot: bool,
        /// Seconds spent on the attempt.
        #[arg(long, default_value_t = 0.0)]
        time_spent: f64,
    },
    /// Report weak topics, from a JSON performance map or the review log.
    Gaps {
        #[arg(long)]
        from: Option<PathBuf>,
    },
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn open_store(path: &Path) -> Result<Connection> {
    info!("Database path: {:?}", path);
    let conn = Connection::open(path)?;
    database::init_db(&conn)?;
    Ok(conn)
}

fn find_item(conn: &Connection, id: &str) -> Result<Item> {
    repository::get_item(conn, id)?.ok_or_else(|| Error::ItemNotFound(id.to_string()))
}

fn run(cli: Cli, now: DateTime<Utc>) -> Result<()> {
    let config = match &cli.config {
        Some(path) => SchedulerConfig::load(path)?,
        None => SchedulerConfig::default(),
    };
    let conn = open_store(&cli.db)?;

    match cli.command {
        Command::Import { file } => {
            let raw = fs::read_to_string(&file)?;
            let count = database::import_items(&conn, &raw)?;
            println!("Imported {count} items.");
        }
        Command::Queue {
            mode,
            exclude,
            topics,
            limit,
            split,
        } => {
            let items = repository::load_items(&conn)?;
            let limit = limit.unwrap_or(usize::MAX);
            if split {
                if mode.parse::<Mode>()? != Mode::Study {
                    return Err(Error::InvalidArgument(format!(
                        "--split only applies to study mode, not {mode}"
                    )));
                }
                let mut queues =
                    selectors::select_study(&items, config.modes.study_review_threshold);
                queues.new_items.truncate(limit);
                queues.recent_items.truncate(limit);
                return print_json(&queues);
            }
            let context = SelectionContext::new(exclude, topics);
            let queue = pedagogy::questions_by_mode(&mode, &items, &context, now, &config)?;
            let shown: Vec<&Item> = queue.into_iter().take(limit).collect();
            print_json(&shown)?;
        }
        Command::Preview { id } => {
            let item = find_item(&conn, &id)?;
            print_json(&interval::calculate_next_review(&item, now, &config.interval))?;
        }
        Command::Review {
            id,
            remembered,
            forgot: _,
            time_spent,
        } => {
            let item = find_item(&conn, &id)?;
            let outcome = if remembered {
                ReviewOutcome::remembered()
            } else {
                ReviewOutcome::forgot()
            }
            .with_time_spent(time_spent);
            outcome.validate()?;

            let updated =
                interval::update_question_after_review(&item, outcome, now, &config.interval);
            let tx = conn.unchecked_transaction()?;
            repository::save_item(&tx, &updated)?;
            repository::log_review(&tx, &updated.id, outcome, now)?;
            tx.commit()?;
            info!(
                "[Review] Item {} has {} logged reviews",
                updated.id,
                repository::get_review_log_count(&conn, &updated.id)?
            );
            print_json(&updated)?;
        }
        Command::Gaps { from } => {
            let performance: HashMap<ItemId, AnswerRecord> = match from {
                Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
                None => repository::latest_answers(&conn)?,
            };
            print_json(&gaps::analyze_knowledge_gaps(&performance, &config.gaps))?;
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match run(cli, Utc::now()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
