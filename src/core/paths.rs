use crate::error::{Error, Result};
use std::env;
use std::path::PathBuf;

/// Base etckit config directory (~/.config/etckit/ on Unix, %APPDATA%\etckit on Windows)
pub fn etckit() -> Result<PathBuf> {
    #[cfg(windows)]
    {
        let appdata = env::var("APPDATA").map_err(|_| {
            Error::internal_unexpected(
                "APPDATA environment variable not set on Windows".to_string(),
            )
        })?;
        Ok(PathBuf::from(appdata).join("etckit"))
    }

    #[cfg(not(windows))]
    {
        let home = env::var("HOME").map_err(|_| {
            Error::internal_unexpected(
                "HOME environment variable not set on Unix-like system".to_string(),
            )
        })?;
        Ok(PathBuf::from(home).join(".config").join("etckit"))
    }
}

/// Global etckit.json config file path
pub fn etckit_json() -> Result<PathBuf> {
    Ok(etckit()?.join("etckit.json"))
}
