use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use availsync_core::{
    calendar::{MonthCursor, WEEKDAY_HEADERS},
    clock::SystemClock,
    recurrence::{weekly_recurrences, MAX_RECURRENCE_WEEKS},
    time::{local_today, parse_timezone, quarter_hour_options},
};
use availsync_editor::{
    actions::{run_dates, run_weekly},
    DateEditor, EditorConfig, Rejection, WeeklyEditor,
};
use chrono::{Datelike, NaiveDate, Utc};
use clap::{builder::RangedU64ValueParser, Parser, Subcommand};
use color_eyre::eyre::{eyre, Result, WrapErr};
use dotenv::dotenv;
use serde::{de::DeserializeOwned, Serialize};
use tracing::{info, warn};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "availsync", about = "Availability scheduling: weekly slots and specific dates", version)]
struct Cli {
    /// IANA timezone times are entered in (overrides AVAILSYNC_TIMEZONE)
    #[arg(long, global = true)]
    timezone: Option<String>,

    /// Fail instead of skipping when the editor rejects an action
    #[arg(long, global = true)]
    strict: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Replay weekly-editor actions (JSON list) and print the saved payload
    Weekly {
        /// Actions file; read from stdin when omitted
        #[arg(long)]
        script: Option<PathBuf>,
    },

    /// Replay date-editor actions (JSON list) and print the saved payload
    Dates {
        /// Actions file; read from stdin when omitted
        #[arg(long)]
        script: Option<PathBuf>,
    },

    /// List the quarter-hour start options still open on a date
    Options {
        /// Date (YYYY-MM-DD); defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// List the weekly recurrences generated from a date
    Recur {
        /// Base date (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,

        /// Number of weeks to generate, at most 104 (overrides AVAILSYNC_RECURRENCE_WEEKS)
        #[arg(long, value_parser = RangedU64ValueParser::<usize>::new().range(0..=MAX_RECURRENCE_WEEKS as u64))]
        count: Option<usize>,
    },

    /// Print a month calendar
    Calendar {
        /// Month (YYYY-MM); defaults to the current month
        #[arg(long)]
        month: Option<String>,
    },
}

fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    let cli = Cli::parse();

    // Load configuration
    let mut config = EditorConfig::from_env()?;
    if let Some(name) = &cli.timezone {
        config.timezone = parse_timezone(name).wrap_err("Invalid --timezone value")?;
    }

    // Initialize logging; stdout is reserved for results
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Command::Weekly { script } => {
            let actions = read_script(script.as_deref())?;
            let mut editor = WeeklyEditor::new(config.timezone, SystemClock)?
                .with_recurrence_type(config.recurrence_type);

            let rejected = run_weekly(&mut editor, &actions);
            check_rejections(&rejected, cli.strict)?;
            print_json(&editor.save())?;
        }
        Command::Dates { script } => {
            let actions = read_script(script.as_deref())?;
            let mut editor = DateEditor::new(config.timezone, SystemClock)
                .with_recurrence_weeks(config.recurrence_weeks);
            info!(timezone = editor.timezone(), "all times shown in local zone");

            let rejected = run_dates(&mut editor, &actions);
            check_rejections(&rejected, cli.strict)?;
            print_json(&editor.save()?)?;
        }
        Command::Options { date } => {
            let now = Utc::now();
            let date = date.unwrap_or_else(|| local_today(&config.timezone, now));
            for option in quarter_hour_options(&config.timezone, date, now) {
                println!("{option}");
            }
        }
        Command::Recur { date, count } => {
            let count = count.unwrap_or(config.recurrence_weeks);
            for date in weekly_recurrences(date, count) {
                println!("{date}");
            }
        }
        Command::Calendar { month } => {
            let cursor = match month {
                Some(month) => MonthCursor::parse(&month)?,
                None => MonthCursor::containing(local_today(&config.timezone, Utc::now())),
            };
            print_calendar(cursor)?;
        }
    }

    Ok(())
}

fn read_script<T: DeserializeOwned>(path: Option<&Path>) -> Result<Vec<T>> {
    let raw = match path {
        Some(path) => fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read script {}", path.display()))?,
        None => {
            let mut raw = String::new();
            io::stdin()
                .read_to_string(&mut raw)
                .wrap_err("Failed to read script from stdin")?;
            raw
        }
    };

    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(&raw).wrap_err("Script must be a JSON list of actions")
}

fn check_rejections<A>(rejected: &[Rejection<A>], strict: bool) -> Result<()> {
    match rejected.first() {
        Some(first) if strict => Err(eyre!(
            "{} action(s) rejected; first at position {}: {}",
            rejected.len(),
            first.index,
            first.error
        )),
        Some(_) => {
            warn!(count = rejected.len(), "some actions were skipped");
            Ok(())
        }
        None => Ok(()),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_calendar(cursor: MonthCursor) -> Result<()> {
    println!("{}", cursor.title());
    println!("{}", WEEKDAY_HEADERS.join(" "));

    let cells: Vec<String> = cursor
        .grid()?
        .into_iter()
        .map(|cell| match cell {
            Some(date) => format!("{:>2}", date.day()),
            None => "  ".to_string(),
        })
        .collect();

    for week in cells.chunks(7) {
        println!("{}", week.join(" ").trim_end());
    }
    Ok(())
}
