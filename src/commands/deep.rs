use clap::{Args, Subcommand};
use serde::Serialize;
use serde_json::{Map, Value};

use etckit::utils::validation;
use etckit::{deep, ensure_array, json};

use super::{CmdResult, GlobalArgs};

#[derive(Args)]
pub struct DeepArgs {
    #[command(subcommand)]
    command: DeepCommand,
}

#[derive(Subcommand)]
enum DeepCommand {
    /// Read a nested value by path (e.g. a.b[0].c)
    Get {
        /// JSON document (inline, @file, or - for stdin)
        json: String,
        /// Dotted/bracketed path
        path: String,
        /// Always return an array (missing values become [])
        #[arg(long)]
        array: bool,
    },
    /// Write a nested value by path, creating intermediate objects
    Set {
        /// JSON document (inline, @file, or - for stdin)
        json: String,
        /// Dotted/bracketed path
        path: String,
        /// Value to store (JSON, or a plain string)
        value: String,
    },
    /// Create dot-separated namespaces inside a JSON object
    Namespace {
        /// Namespaces to create (e.g. app.models app.views)
        #[arg(required = true)]
        namespaces: Vec<String>,
        /// Document to extend (defaults to {})
        #[arg(long, value_name = "JSON")]
        json: Option<String>,
    },
    /// Show how a path splits into segments
    Parse {
        /// Dotted/bracketed path
        path: String,
    },
}

#[derive(Debug, Serialize)]
pub struct DeepOutput {
    command: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    segments: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    found: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    document: Option<Value>,
}

impl DeepOutput {
    fn new(command: &str) -> Self {
        Self {
            command: command.to_string(),
            path: None,
            segments: None,
            found: None,
            value: None,
            document: None,
        }
    }
}

pub fn run(args: DeepArgs, _global: &GlobalArgs) -> CmdResult<DeepOutput> {
    match args.command {
        DeepCommand::Get { json, path, array } => get(&json, &path, array),
        DeepCommand::Set { json, path, value } => set(&json, &path, &value),
        DeepCommand::Namespace { namespaces, json } => create_namespaces(&namespaces, json),
        DeepCommand::Parse { path } => {
            let parsed = deep::DeepPath::parse(&path);
            Ok((
                DeepOutput {
                    path: Some(parsed.to_string()),
                    segments: Some(parsed.segments().to_vec()),
                    ..DeepOutput::new("deep.parse")
                },
                0,
            ))
        }
    }
}

fn get(spec: &str, path: &str, array: bool) -> CmdResult<DeepOutput> {
    let document = json::parse_json_spec(spec, "deep get document")?;
    let found = deep::deep_get(&document, path).cloned();

    let value = if array {
        Some(Value::Array(ensure_array(found.clone())))
    } else {
        found.clone()
    };

    Ok((
        DeepOutput {
            path: Some(path.to_string()),
            found: Some(found.is_some()),
            value: Some(value.unwrap_or(Value::Null)),
            ..DeepOutput::new("deep.get")
        },
        0,
    ))
}

fn set(spec: &str, path: &str, raw_value: &str) -> CmdResult<DeepOutput> {
    let mut document = json::parse_json_spec(spec, "deep set document")?;
    let value = json::parse_value_arg(raw_value);

    deep::deep_set(&mut document, path, value.clone())?;

    Ok((
        DeepOutput {
            path: Some(path.to_string()),
            value: Some(value),
            document: Some(document),
            ..DeepOutput::new("deep.set")
        },
        0,
    ))
}

fn create_namespaces(namespaces: &[String], spec: Option<String>) -> CmdResult<DeepOutput> {
    let mut document = match spec {
        Some(spec) => Value::Object(json::parse_json_object_spec(&spec, "deep namespace document")?),
        None => Value::Object(Map::new()),
    };

    for ns in namespaces {
        let ns = validation::require_non_empty(ns, "namespace", "Namespace cannot be empty")?;
        etckit::namespace(&mut document, ns);
    }

    Ok((
        DeepOutput {
            document: Some(document),
            ..DeepOutput::new("deep.namespace")
        },
        0,
    ))
}
