use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::paths;
use crate::utils::{io, parser};

/// Root configuration structure for etckit.json
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct EtckitConfig {
    #[serde(default)]
    pub defaults: Defaults,
}

/// All configurable defaults that can be overridden via etckit.json
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Defaults {
    #[serde(default)]
    pub text: TextConfig,

    #[serde(default)]
    pub rehash: RehashConfig,

    #[serde(default)]
    pub dates: DatesConfig,
}

/// Configuration for truncation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TextConfig {
    #[serde(default = "default_ellipsis")]
    pub ellipsis: String,

    #[serde(default = "default_truncate_length")]
    pub truncate_length: usize,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            ellipsis: default_ellipsis(),
            truncate_length: default_truncate_length(),
        }
    }
}

/// Default flags for rehash when the CLI flags are absent
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct RehashConfig {
    #[serde(default)]
    pub maintain_source_key: bool,

    #[serde(default)]
    pub modify_source: bool,
}

/// How dates are rendered in command output
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct DatesConfig {
    #[serde(default)]
    pub utc: bool,
}

fn default_ellipsis() -> String {
    parser::ELLIPSIS.to_string()
}

fn default_truncate_length() -> usize {
    80
}

// =============================================================================
// Loading functions
// =============================================================================

/// Load defaults, merging file config with built-in defaults.
pub fn load_defaults() -> Defaults {
    load_config().defaults
}

/// Load the full etckit.json config, falling back to defaults on any error.
///
/// A missing file is silent; an unreadable or invalid one is reported on
/// stderr before falling back.
pub fn load_config() -> EtckitConfig {
    let path = match paths::etckit_json() {
        Ok(path) => path,
        Err(_) => return EtckitConfig::default(),
    };

    if !path.exists() {
        return EtckitConfig::default();
    }

    load_config_from(&path).unwrap_or_else(|err| {
        crate::log_status!("config", "Ignoring {}: {}", path.display(), err.details);
        EtckitConfig::default()
    })
}

/// Load config from an explicit file.
pub fn load_config_from(path: &Path) -> crate::Result<EtckitConfig> {
    let content = io::read_file(path, &format!("read {}", path.display()))?;

    serde_json::from_str(&content).map_err(|e| {
        crate::Error::validation_invalid_json(e, Some("parse etckit.json".to_string()), None)
    })
}

/// Save config to etckit.json file (creates if missing).
pub fn save_config(config: &EtckitConfig) -> crate::Result<()> {
    save_config_to(&paths::etckit_json()?, config)
}

pub fn save_config_to(path: &Path, config: &EtckitConfig) -> crate::Result<()> {
    let content = serde_json::to_string_pretty(config).map_err(|e| {
        crate::Error::internal_json(e.to_string(), Some("serialize etckit.json".to_string()))
    })?;

    io::write_file_atomic(path, &content, &format!("write {}", path.display()))
}

/// Delete etckit.json file (reset to defaults)
pub fn reset_config() -> crate::Result<bool> {
    let path = paths::etckit_json()?;

    if path.exists() {
        std::fs::remove_file(&path).map_err(|e| {
            crate::Error::internal_io(e.to_string(), Some(format!("delete {}", path.display())))
        })?;
        Ok(true)
    } else {
        Ok(false)
    }
}

/// Check if etckit.json file exists
pub fn config_exists() -> bool {
    paths::etckit_json()
        .map(|p| p.exists())
        .unwrap_or(false)
}

/// Get the path to etckit.json (for display purposes)
pub fn config_path() -> crate::Result<String> {
    Ok(paths::etckit_json()?.display().to_string())
}

/// Get built-in defaults (ignoring any file config)
pub fn builtin_defaults() -> Defaults {
    Defaults::default()
}
