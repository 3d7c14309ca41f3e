//! `reconcile` CLI — run the calendar reconciliation engine from the command line.
//!
//! Events cross the boundary as JSON, read from stdin or a file and written to
//! stdout or a file. `--now` pins the reference instant so runs are
//! reproducible; it defaults to the wall clock.
//!
//! ## Usage
//!
//! ```sh
//! # Collapse duplicates reported by several providers
//! reconcile dedupe -i events.json
//!
//! # Expand recurring definitions into a window
//! reconcile expand --from 2026-08-03 --to 2026-08-16 -i events.json
//!
//! # Suggest a slot for a 45-minute task (offset in minutes, UTC - offset = local)
//! reconcile suggest --duration 45 --offset 0 --now 2026-08-03T08:00:00Z -i events.json
//!
//! # Detect and fix overlaps between movable and immovable events
//! reconcile resolve --offset 0 -i events.json
//!
//! # Build the merged agenda from named provider streams
//! reconcile agenda --from 2026-08-03 --to 2026-08-09 -i streams.json
//! ```

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use std::io::{self, Read};

use reconcile_engine::{
    build_agenda, dedupe_events, default_slot, expand_events, parse_datetime, resolve_overlaps,
    suggest_slot, CalendarEvent, EventStream, Interval, SchedulerConfig,
};

#[derive(Parser)]
#[command(
    name = "reconcile",
    version,
    about = "Calendar reconciliation and scheduling engine"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Collapse near-identical events from multiple providers
    Dedupe {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Expand recurring definitions into concrete occurrences
    Expand {
        /// Window start: YYYY-MM-DD or an ISO 8601 datetime
        #[arg(long)]
        from: String,
        /// Window end (inclusive): YYYY-MM-DD or an ISO 8601 datetime
        #[arg(long)]
        to: String,
        #[arg(short, long)]
        input: Option<String>,
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Suggest the earliest open slot for a new task
    Suggest {
        /// Requested duration in minutes (default 60)
        #[arg(long)]
        duration: Option<i64>,
        /// Signed minutes subtracted from UTC to obtain local time
        #[arg(long, default_value_t = 0)]
        offset: i64,
        /// Reference instant, RFC 3339 (defaults to the wall clock)
        #[arg(long)]
        now: Option<String>,
        #[arg(short, long)]
        input: Option<String>,
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Detect overlaps and relocate movable events into open slots
    Resolve {
        /// Signed minutes subtracted from UTC to obtain local time
        #[arg(long, default_value_t = 0)]
        offset: i64,
        /// Reference instant, RFC 3339 (defaults to the wall clock)
        #[arg(long)]
        now: Option<String>,
        #[arg(short, long)]
        input: Option<String>,
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Merge named provider streams into one agenda view
    Agenda {
        /// Window start: YYYY-MM-DD or an ISO 8601 datetime
        #[arg(long)]
        from: String,
        /// Window end (inclusive): YYYY-MM-DD or an ISO 8601 datetime
        #[arg(long)]
        to: String,
        #[arg(short, long)]
        input: Option<String>,
        #[arg(short, long)]
        output: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = SchedulerConfig::default();

    match cli.command {
        Commands::Dedupe { input, output } => {
            let events = read_events(input.as_deref())?;
            let canonical = dedupe_events(&events, &config);
            write_json(output.as_deref(), &canonical)?;
        }
        Commands::Expand {
            from,
            to,
            input,
            output,
        } => {
            let (window_start, window_end) = parse_window(&from, &to)?;
            let events = read_events(input.as_deref())?;
            let expanded = expand_events(&events, window_start, window_end);
            write_json(output.as_deref(), &expanded)?;
        }
        Commands::Suggest {
            duration,
            offset,
            now,
            input,
            output,
        } => {
            let now = parse_now(now.as_deref())?;
            // Unreadable calendar data degrades to the default slot instead
            // of failing the request.
            let slot = match read_events(input.as_deref()) {
                Ok(events) => {
                    let busy: Vec<Interval> = events.iter().map(Interval::from_event).collect();
                    suggest_slot(&busy, &[], duration, offset, now, &config)
                }
                Err(_) => default_slot(duration, offset, now, &config),
            };
            write_json(output.as_deref(), &slot)?;
        }
        Commands::Resolve {
            offset,
            now,
            input,
            output,
        } => {
            let now = parse_now(now.as_deref())?;
            let events = read_events(input.as_deref())?;
            let report = resolve_overlaps(&events, offset, now, &config);
            for id in &report.unresolved {
                eprintln!("warning: no open slot found for event '{}'", id);
            }
            write_json(output.as_deref(), &report)?;
        }
        Commands::Agenda {
            from,
            to,
            input,
            output,
        } => {
            let (window_start, window_end) = parse_window(&from, &to)?;
            let raw = read_input(input.as_deref())?;
            let streams: Vec<EventStream> =
                serde_json::from_str(&raw).context("Failed to parse stream list")?;
            let view = build_agenda(&streams, window_start, window_end, &config);
            write_json(output.as_deref(), &view)?;
        }
    }

    Ok(())
}

fn read_events(path: Option<&str>) -> Result<Vec<CalendarEvent>> {
    let raw = read_input(path)?;
    serde_json::from_str(&raw).context("Failed to parse event list")
}

fn parse_now(raw: Option<&str>) -> Result<DateTime<Utc>> {
    match raw {
        Some(raw) => {
            parse_datetime(raw).with_context(|| format!("Failed to parse --now value: {}", raw))
        }
        None => Ok(Utc::now()),
    }
}

/// Accepts bare dates or full datetimes. A bare `--from` date means the start
/// of that day; a bare `--to` date means its end, keeping the window inclusive.
fn parse_window(from: &str, to: &str) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    let start = parse_boundary(from, "T00:00:00")?;
    let end = parse_boundary(to, "T23:59:59")?;
    anyhow::ensure!(start <= end, "--from must not be after --to");
    Ok((start, end))
}

fn parse_boundary(raw: &str, day_suffix: &str) -> Result<DateTime<Utc>> {
    let candidate = if raw.len() == 10 {
        format!("{}{}", raw, day_suffix)
    } else {
        raw.to_string()
    };
    parse_datetime(&candidate).with_context(|| format!("Failed to parse window boundary: {}", raw))
}

fn write_json<T: serde::Serialize>(path: Option<&str>, value: &T) -> Result<()> {
    let pretty = serde_json::to_string_pretty(value)?;
    write_output(path, &pretty)
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
