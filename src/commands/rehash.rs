use clap::Args;
use serde::Serialize;

use etckit::utils::validation;
use etckit::{json, rehash, RehashOptions, Rehashed};

use super::{CmdResult, GlobalArgs};

#[derive(Args)]
pub struct RehashArgs {
    /// JSON object to re-index (inline, @file, or - for stdin)
    json: String,

    /// Dotted/bracketed path of the property to key by
    property: String,

    /// Also keep every value under its original key
    #[arg(long)]
    maintain_source_key: bool,

    /// Start from the source entries instead of an empty object
    #[arg(long)]
    modify_source: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RehashOutput {
    command: String,
    property: String,
    source_entries: usize,
    grouped_keys: usize,
    result: Rehashed,
}

pub fn run(args: RehashArgs, global: &GlobalArgs) -> CmdResult<RehashOutput> {
    let property = validation::require_non_empty(
        &args.property,
        "property",
        "Property path cannot be empty",
    )?;
    let source = json::parse_json_object_spec(&args.json, "rehash source")?;
    let source_entries = source.len();

    let options = RehashOptions {
        maintain_source_key: args.maintain_source_key
            || global.defaults.rehash.maintain_source_key,
        modify_source: args.modify_source || global.defaults.rehash.modify_source,
    };

    let result = rehash(source, property, options);
    let grouped_keys = result.values().filter(|slot| slot.len() > 1).count();

    if grouped_keys > 0 {
        etckit::log_status!("rehash", "{} keys matched more than one value", grouped_keys);
    }

    Ok((
        RehashOutput {
            command: "rehash".to_string(),
            property: property.to_string(),
            source_entries,
            grouped_keys,
            result,
        },
        0,
    ))
}
