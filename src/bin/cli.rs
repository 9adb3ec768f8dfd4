//! booktrack CLI
//!
//! Thin shell over `booktrack::pipeline`: lists books for a command, or
//! applies the command to the book given with `--id`.

use std::path::PathBuf;

use booktrack::{
    error::{AppError, Result},
    models::{
        Config, DraftOverrides, FinishInput, Format, ProgressInput, Rating, StartInput, Transition,
    },
    pipeline::{self, Candidate},
    services::OpenLibraryClient,
    storage::{DryRunStore, NotionStore, RecordStore},
};
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};

/// booktrack - reading tracker for a Notion book database
#[derive(Parser, Debug)]
#[command(
    name = "booktrack",
    version,
    about = "Track reading progress in a Notion book database"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, global = true, default_value = "booktrack.toml")]
    config: PathBuf,

    /// Compute writes but do not send them
    #[arg(long, global = true)]
    dry_run: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

/// Progress as entered in the start/update forms.
#[derive(Args, Debug)]
struct ProgressArgs {
    /// Current page (print books)
    #[arg(long)]
    page: Option<String>,

    /// Hours left to listen (audiobooks)
    #[arg(long)]
    hours_left: Option<String>,

    /// Minutes left to listen, on top of --hours-left (audiobooks)
    #[arg(long)]
    minutes_left: Option<String>,
}

impl From<ProgressArgs> for ProgressInput {
    fn from(args: ProgressArgs) -> Self {
        ProgressInput {
            page: args.page,
            hours_left: args.hours_left,
            minutes_left: args.minutes_left,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start a book (lists unstarted books without --id)
    Start {
        /// Page id of the book to start
        #[arg(long)]
        id: Option<String>,

        /// Start date (default: today)
        #[arg(long)]
        date: Option<NaiveDate>,

        #[command(flatten)]
        progress: ProgressArgs,
    },

    /// Update reading progress (lists books in progress without --id)
    Update {
        /// Page id of the book to update
        #[arg(long)]
        id: Option<String>,

        #[command(flatten)]
        progress: ProgressArgs,
    },

    /// Finish a book (lists books in progress without --id)
    Finish {
        /// Page id of the book to finish
        #[arg(long)]
        id: Option<String>,

        /// Finish date (default: today)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Rating, 1 to 5 stars
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
        stars: Option<u8>,
    },

    /// Add a new book by ISBN
    New {
        /// ISBN-10 or ISBN-13, dashes allowed
        #[arg(long)]
        isbn: String,

        #[arg(long, value_enum)]
        format: Format,

        /// Show the looked-up values and stop
        #[arg(long)]
        preview: bool,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        subtitle: Option<String>,

        /// Comma-separated author names
        #[arg(long)]
        authors: Option<String>,

        /// Comma-separated publisher names
        #[arg(long)]
        publishers: Option<String>,

        #[arg(long)]
        page_total: Option<String>,

        /// Audiobook length, hours part
        #[arg(long)]
        hours: Option<String>,

        /// Audiobook length, minutes part
        #[arg(long)]
        minutes: Option<String>,

        #[arg(long)]
        fiction: bool,
    },

    /// Validate the configuration
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool, level: &str) {
    let level = if verbose { "debug" } else { level };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Build the store for this invocation, wrapped for dry run if enabled.
fn open_store(config: &Config) -> Result<Box<dyn RecordStore>> {
    config.validate()?;
    let notion = NotionStore::new(&config.notion)?;
    if config.dry_run {
        log::info!("Dry run enabled: no data will be written");
        Ok(Box::new(DryRunStore::new(notion)))
    } else {
        Ok(Box::new(notion))
    }
}

fn print_candidates(candidates: &[Candidate], transition: Transition) {
    if candidates.is_empty() {
        log::info!("No books to {transition}");
        return;
    }
    for c in candidates {
        if c.subtitle.is_empty() {
            println!("{}  {}", c.id, c.title);
        } else {
            println!("{}  {}  ({})", c.id, c.title, c.subtitle);
        }
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let loaded = Config::load(&cli.config);
    let level = match &loaded {
        Ok(config) => config.logging.level.clone(),
        Err(_) => "info".to_string(),
    };
    init_logging(cli.verbose, &level);

    if loaded.is_ok() {
        log::debug!("Loaded configuration from {}", cli.config.display());
    }
    let mut config = Config::or_default(loaded, &cli.config);
    config.apply_env();
    if cli.dry_run {
        config.dry_run = true;
    }

    match cli.command {
        Command::Start { id, date, progress } => {
            let store = open_store(&config)?;
            match id {
                None => {
                    let candidates =
                        pipeline::list_candidates(store.as_ref(), Transition::Start).await?;
                    print_candidates(&candidates, Transition::Start);
                }
                Some(id) => {
                    let input = StartInput {
                        date: date.unwrap_or_else(today),
                        progress: progress.into(),
                    };
                    pipeline::run_start(store.as_ref(), &id, input).await?;
                }
            }
        }

        Command::Update { id, progress } => {
            let store = open_store(&config)?;
            match id {
                None => {
                    let candidates =
                        pipeline::list_candidates(store.as_ref(), Transition::UpdateProgress)
                            .await?;
                    print_candidates(&candidates, Transition::UpdateProgress);
                }
                Some(id) => {
                    pipeline::run_update(store.as_ref(), &id, progress.into()).await?;
                }
            }
        }

        Command::Finish { id, date, stars } => {
            let store = open_store(&config)?;
            match id {
                None => {
                    let candidates =
                        pipeline::list_candidates(store.as_ref(), Transition::Finish).await?;
                    print_candidates(&candidates, Transition::Finish);
                }
                Some(id) => {
                    let stars = stars.ok_or_else(|| {
                        AppError::validation("--stars is required to finish a book")
                    })?;
                    let input = FinishInput {
                        date: date.unwrap_or_else(today),
                        stars: Rating::new(stars)?,
                    };
                    pipeline::run_finish(store.as_ref(), &id, input).await?;
                }
            }
        }

        Command::New {
            isbn,
            format,
            preview,
            title,
            subtitle,
            authors,
            publishers,
            page_total,
            hours,
            minutes,
            fiction,
        } => {
            let lookup = OpenLibraryClient::new(&config.lookup)?;
            let concurrency = config.lookup.max_concurrent;

            if preview {
                let draft = pipeline::prepare_draft(&lookup, &isbn, format, concurrency).await?;
                println!("{}", serde_json::to_string_pretty(&draft)?);
                return Ok(());
            }

            let overrides = DraftOverrides {
                isbn: None,
                title,
                subtitle,
                authors,
                publishers,
                page_total,
                hours,
                minutes,
                fiction,
            };
            let store = open_store(&config)?;
            let created =
                pipeline::run_new(store.as_ref(), &lookup, &isbn, format, overrides, concurrency)
                    .await?;
            log::info!("Added ISBN {}", created.isbn);
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK");
        }
    }

    log::debug!("Done!");

    Ok(())
}
