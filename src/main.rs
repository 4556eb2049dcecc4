use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{config, date, deep, rehash, text, GlobalArgs};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "etckit")]
#[command(version = VERSION)]
#[command(about = "Small helpers for text, nested JSON, dates and re-indexing")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Whitespace splitting, truncation and ordinals
    Text(text::TextArgs),
    /// Read, write and namespace nested JSON by path
    Deep(deep::DeepArgs),
    /// Date coercion and flooring
    Date(date::DateArgs),
    /// Re-index a JSON object by a nested property
    Rehash(rehash::RehashArgs),
    /// Manage global etckit configuration
    Config(config::ConfigArgs),
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    let global = GlobalArgs::load();

    let (json_result, exit_code) = commands::run_json(cli.command, &global);

    if let Err(err) = output::print_json_result(json_result) {
        eprintln!("etckit: {}", err);
        return std::process::ExitCode::from(exit_code_to_u8(1));
    }

    std::process::ExitCode::from(exit_code_to_u8(exit_code))
}

fn exit_code_to_u8(code: i32) -> u8 {
    if code <= 0 {
        0
    } else if code >= 255 {
        255
    } else {
        code as u8
    }
}
