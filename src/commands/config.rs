use clap::{Args, Subcommand};
use serde::Serialize;
use serde_json::Value;

use etckit::defaults::{self, Defaults, EtckitConfig};
use etckit::json;

use super::{CmdResult, GlobalArgs};

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Display configuration (merged defaults + file)
    Show {
        /// Show only built-in defaults (ignore etckit.json)
        #[arg(long)]
        builtin: bool,
    },
    /// Set a configuration value at a JSON pointer path
    Set {
        /// JSON pointer path (e.g., /defaults/text/ellipsis)
        pointer: String,
        /// Value to set (JSON, or a plain string)
        value: String,
    },
    /// Remove a configuration value at a JSON pointer path
    Remove {
        /// JSON pointer path (e.g., /defaults/dates/utc)
        pointer: String,
    },
    /// Reset configuration to built-in defaults (deletes etckit.json)
    Reset,
    /// Show the path to etckit.json
    Path,
}

#[derive(Debug, Serialize)]
pub struct ConfigOutput {
    command: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    config: Option<EtckitConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    defaults: Option<Defaults>,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    exists: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pointer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    deleted: Option<bool>,
}

impl ConfigOutput {
    fn new(command: &str) -> Self {
        Self {
            command: command.to_string(),
            config: None,
            defaults: None,
            path: None,
            exists: None,
            pointer: None,
            value: None,
            deleted: None,
        }
    }
}

pub fn run(args: ConfigArgs, _global: &GlobalArgs) -> CmdResult<ConfigOutput> {
    match args.command {
        ConfigCommand::Show { builtin } => show(builtin),
        ConfigCommand::Set { pointer, value } => set(&pointer, &value),
        ConfigCommand::Remove { pointer } => remove(&pointer),
        ConfigCommand::Reset => reset(),
        ConfigCommand::Path => path(),
    }
}

fn show(builtin: bool) -> CmdResult<ConfigOutput> {
    let output = if builtin {
        ConfigOutput {
            defaults: Some(defaults::builtin_defaults()),
            ..ConfigOutput::new("config.show")
        }
    } else {
        ConfigOutput {
            config: Some(defaults::load_config()),
            ..ConfigOutput::new("config.show")
        }
    };
    Ok((output, 0))
}

fn set(pointer: &str, raw_value: &str) -> CmdResult<ConfigOutput> {
    let value = json::parse_value_arg(raw_value);
    let config = update_config(|config_json| {
        json::set_json_pointer(config_json, pointer, value.clone())
    })?;

    Ok((
        ConfigOutput {
            config: Some(config),
            pointer: Some(pointer.to_string()),
            value: Some(value),
            ..ConfigOutput::new("config.set")
        },
        0,
    ))
}

fn remove(pointer: &str) -> CmdResult<ConfigOutput> {
    let config = update_config(|config_json| json::remove_json_pointer(config_json, pointer))?;

    Ok((
        ConfigOutput {
            config: Some(config),
            pointer: Some(pointer.to_string()),
            ..ConfigOutput::new("config.remove")
        },
        0,
    ))
}

/// Apply `edit` to the JSON form of the current config, validate it by
/// deserializing, then save.
fn update_config<F>(edit: F) -> etckit::Result<EtckitConfig>
where
    F: FnOnce(&mut Value) -> etckit::Result<()>,
{
    let current = defaults::load_config();
    let mut config_json = serde_json::to_value(&current).map_err(|e| {
        etckit::Error::internal_json(e.to_string(), Some("serialize config".to_string()))
    })?;

    edit(&mut config_json)?;

    let config: EtckitConfig = serde_json::from_value(config_json).map_err(|e| {
        etckit::Error::validation_invalid_json(e, Some("deserialize config".to_string()), None)
    })?;

    defaults::save_config(&config)?;
    Ok(config)
}

fn reset() -> CmdResult<ConfigOutput> {
    let deleted = defaults::reset_config()?;

    Ok((
        ConfigOutput {
            defaults: Some(defaults::builtin_defaults()),
            path: Some(defaults::config_path()?),
            deleted: Some(deleted),
            ..ConfigOutput::new("config.reset")
        },
        0,
    ))
}

fn path() -> CmdResult<ConfigOutput> {
    Ok((
        ConfigOutput {
            path: Some(defaults::config_path()?),
            exists: Some(defaults::config_exists()),
            ..ConfigOutput::new("config.path")
        },
        0,
    ))
}
