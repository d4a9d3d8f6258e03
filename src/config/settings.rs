// ABOUTME: Run settings loaded from an optional TOML file
// ABOUTME: Names the client program, input files, and output artifacts

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Settings file picked up from the working directory when `--config` is not given
pub const DEFAULT_SETTINGS_FILE: &str = "db2-table-copier.toml";

/// Settings for a run
///
/// Every key is optional in the TOML file; missing keys keep the defaults,
/// which match the file names the tool has always used.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Command line processor to invoke
    pub client: String,
    pub databases_file: PathBuf,
    pub tables_file: PathBuf,
    /// Captured output of count/max queries
    pub scratch_file: PathBuf,
    /// Transfer list written for remote targets
    pub load_list_file: PathBuf,
    /// Load script written for remote targets
    pub load_script_file: PathBuf,
    /// SQL predicate restricting the rows counted, probed, and exported
    pub row_filter: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            client: "db2".to_string(),
            databases_file: PathBuf::from("db2Databases.input"),
            tables_file: PathBuf::from("db2Tables.input"),
            scratch_file: PathBuf::from("db2out.txt"),
            load_list_file: PathBuf::from("db2LoadList.txt"),
            load_script_file: PathBuf::from("db2LoadCommands.sql"),
            row_filter: None,
        }
    }
}

impl Settings {
    /// Parse settings from TOML text
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("Invalid settings file")
    }

    /// Row filter with blank values treated as absent
    pub fn row_filter(&self) -> Option<&str> {
        self.row_filter
            .as_deref()
            .map(str::trim)
            .filter(|f| !f.is_empty())
    }
}

/// Load settings from `path`, or from [`DEFAULT_SETTINGS_FILE`] if it exists
///
/// An explicit path must exist; the default file is optional and falls back
/// to [`Settings::default`].
///
/// # Examples
///
/// ```no_run
/// # use anyhow::Result;
/// # use db2_table_copier::config::load_settings;
/// # fn example() -> Result<()> {
/// let settings = load_settings(Some("copy-prod.toml".as_ref()))?;
/// println!("client: {}", settings.client);
/// # Ok(())
/// # }
/// ```
pub fn load_settings(path: Option<&Path>) -> Result<Settings> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => {
            let default = PathBuf::from(DEFAULT_SETTINGS_FILE);
            if !default.exists() {
                tracing::debug!("No {} found, using default settings", DEFAULT_SETTINGS_FILE);
                return Ok(Settings::default());
            }
            default
        }
    };

    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read settings file {}", path.display()))?;
    let settings = Settings::from_toml(&text)
        .with_context(|| format!("Failed to parse settings file {}", path.display()))?;

    tracing::debug!("Loaded settings from {}: {:?}", path.display(), settings);
    Ok(settings)
}
