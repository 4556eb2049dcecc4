use chrono::{DateTime, Local, SecondsFormat, Utc};
use clap::{Args, Subcommand};
use serde::Serialize;

use etckit::date::{self, DateInput, Floor};

use super::{CmdResult, GlobalArgs};

#[derive(Args)]
pub struct DateArgs {
    /// Render and floor dates in UTC instead of local time
    #[arg(long, global = true)]
    utc: bool,

    #[command(subcommand)]
    command: DateCommand,
}

#[derive(Subcommand)]
enum DateCommand {
    /// Truncate a date to the start of its year, month, day, hour or minute
    Floor {
        /// year, month, day, hour or minute (anything else keeps the date)
        granularity: Option<String>,
        /// Date text or millisecond timestamp (defaults to now)
        #[arg(allow_negative_numbers = true)]
        value: Option<String>,
    },
    /// Convert a date to a millisecond timestamp
    Time {
        /// Date text or millisecond timestamp
        #[arg(allow_negative_numbers = true)]
        value: String,
    },
    /// Coerce a value to a date; empty or 0 means now
    Ensure {
        /// Date text or millisecond timestamp
        #[arg(allow_negative_numbers = true)]
        value: Option<String>,
    },
}

#[derive(Debug, Serialize)]
pub struct DateOutput {
    command: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    granularity: Option<Floor>,
    date: String,
    timestamp: i64,
}

pub fn run(args: DateArgs, global: &GlobalArgs) -> CmdResult<DateOutput> {
    let utc = args.utc || global.defaults.dates.utc;

    match args.command {
        DateCommand::Floor { granularity, value } => {
            let floor = Floor::from_selector(granularity.as_deref());
            let input = value.as_deref().map(DateInput::from_arg);
            let output = if utc {
                render("date.floor", date::floor_date_or_now_in(floor, input, &Utc)?)
            } else {
                render("date.floor", date::floor_date_or_now(floor, input)?)
            };
            Ok((
                DateOutput {
                    granularity: Some(floor),
                    ..output
                },
                0,
            ))
        }
        DateCommand::Time { value } => {
            let timestamp = date::ensure_time(DateInput::from_arg(&value))?;
            let parsed = date::from_millis(timestamp)?;
            Ok((render_local("date.time", parsed, utc), 0))
        }
        DateCommand::Ensure { value } => {
            let parsed = date::ensure_date(value.as_deref().map(DateInput::from_arg))?;
            Ok((render_local("date.ensure", parsed, utc), 0))
        }
    }
}

fn render_local(command: &str, date: DateTime<Local>, utc: bool) -> DateOutput {
    if utc {
        render(command, date.with_timezone(&Utc))
    } else {
        render(command, date)
    }
}

fn render<Tz: chrono::TimeZone>(command: &str, date: DateTime<Tz>) -> DateOutput
where
    Tz::Offset: std::fmt::Display,
{
    DateOutput {
        command: command.to_string(),
        granularity: None,
        date: date.to_rfc3339_opts(SecondsFormat::Millis, true),
        timestamp: date.timestamp_millis(),
    }
}
