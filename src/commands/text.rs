use clap::{Args, Subcommand};
use serde::Serialize;

use etckit::parser;

use super::{CmdResult, GlobalArgs};

#[derive(Args)]
pub struct TextArgs {
    #[command(subcommand)]
    command: TextCommand,
}

#[derive(Subcommand)]
enum TextCommand {
    /// Split text into words on runs of whitespace
    Unwhite {
        /// Text to split
        text: String,
    },
    /// Shorten text at a word boundary and append an ellipsis
    Truncate {
        /// Text to shorten
        text: String,
        /// Maximum prefix length in characters (defaults to config)
        #[arg(long, short)]
        length: Option<usize>,
        /// Suffix appended to shortened text (defaults to config)
        #[arg(long)]
        ellipsis: Option<String>,
        /// Fail instead of hard-cutting when no word boundary fits
        #[arg(long)]
        strict: bool,
    },
    /// Print the English ordinal suffix for a number
    Ordinal {
        /// Number to suffix (fractions are truncated)
        #[arg(allow_negative_numbers = true)]
        number: f64,
    },
}

#[derive(Debug, Serialize)]
pub struct TextOutput {
    command: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    words: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    truncated: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    suffix: Option<String>,
}

impl TextOutput {
    fn new(command: &str) -> Self {
        Self {
            command: command.to_string(),
            words: None,
            result: None,
            truncated: None,
            suffix: None,
        }
    }
}

pub fn run(args: TextArgs, global: &GlobalArgs) -> CmdResult<TextOutput> {
    match args.command {
        TextCommand::Unwhite { text } => Ok((
            TextOutput {
                words: Some(parser::unwhite_owned(&text)),
                ..TextOutput::new("text.unwhite")
            },
            0,
        )),
        TextCommand::Truncate {
            text,
            length,
            ellipsis,
            strict,
        } => truncate(&text, length, ellipsis, strict, global),
        TextCommand::Ordinal { number } => {
            let whole = if number.is_finite() { number.trunc() as i64 } else { 0 };
            Ok((
                TextOutput {
                    result: Some(parser::with_ordinal(whole)),
                    suffix: Some(parser::ordinal_f64(number).to_string()),
                    ..TextOutput::new("text.ordinal")
                },
                0,
            ))
        }
    }
}

fn truncate(
    text: &str,
    length: Option<usize>,
    ellipsis: Option<String>,
    strict: bool,
    global: &GlobalArgs,
) -> CmdResult<TextOutput> {
    let length = length.unwrap_or(global.defaults.text.truncate_length);
    let ellipsis = ellipsis.unwrap_or_else(|| global.defaults.text.ellipsis.clone());

    let result = if strict {
        parser::try_truncate(text, length, &ellipsis)?
    } else {
        parser::truncate_with(text, length, &ellipsis)
    };

    Ok((
        TextOutput {
            truncated: Some(result != text),
            result: Some(result),
            ..TextOutput::new("text.truncate")
        },
        0,
    ))
}
