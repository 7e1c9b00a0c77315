use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::path::PathBuf;

/// Maximum length of the URL field, in characters.
pub const URL_CHAR_LIMIT: usize = 128;

/// Maximum number of header pairs the form accepts.
pub const MAX_HEADERS: usize = 64;

/// Text inserted by Tab in the body.
pub const BODY_INDENT: &str = "  ";

/// Process-level settings, read from the environment once at start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// `DEBUG=1`: show the current focus id and log at debug level.
    pub debug: bool,
    /// EnvFilter directive for the log file.
    pub log_filter: String,
    /// Explicit log file location (`REQTUI_LOG_FILE`).
    pub log_file: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let debug = lookup("DEBUG").as_deref() == Some("1");

        let log_filter = lookup("REQTUI_LOG")
            .filter(|f| !f.trim().is_empty())
            .unwrap_or_else(|| if debug { "debug" } else { "info" }.to_string());

        let log_file = lookup("REQTUI_LOG_FILE")
            .filter(|p| !p.is_empty())
            .map(PathBuf::from);

        Self {
            debug,
            log_filter,
            log_file,
        }
    }

    /// Where the log file goes: the override, or the XDG data directory.
    pub fn log_path(&self) -> Result<PathBuf> {
        match &self.log_file {
            Some(path) => Ok(path.clone()),
            None => default_log_path(),
        }
    }
}

/// `~/.local/share/reqtui/reqtui.log` (XDG-compliant).
pub fn default_log_path() -> Result<PathBuf> {
    let dirs =
        ProjectDirs::from("", "", "reqtui").context("Could not determine data directory")?;
    let data_dir = dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
    Ok(data_dir.join("reqtui.log"))
}
