//! Configuration loading.
//!
//! Resolution order:
//! 1. Explicit path (command-line flag)
//! 2. `MIERNIK_CONFIG` environment variable
//! 3. `~/.miernik/config.toml`
//! 4. Built-in defaults

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{BudgetError, Result};

pub const CONFIG_ENV_VAR: &str = "MIERNIK_CONFIG";
const CONFIG_DIR_NAME: &str = ".miernik";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Header text for each semantic column of the input sheet.
///
/// Matching against the sheet header is trimmed and case-insensitive.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ColumnMap {
    pub date: String,
    pub program_type: String,
    pub program_name: String,
    pub action_name: String,
    pub people: String,
    pub actions: String,
    pub main_category: String,
    pub sub_category: String,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            date: "data".to_string(),
            program_type: "typ_programu".to_string(),
            program_name: "nazwa_programu".to_string(),
            action_name: "dzialanie".to_string(),
            people: "liczba_osob".to_string(),
            actions: "liczba_dzialan".to_string(),
            main_category: "kategoria_glowna".to_string(),
            sub_category: "podkategoria".to_string(),
        }
    }
}

/// What the monthly fold does with a row whose date cannot be parsed.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DatePolicy {
    /// Drop the row and keep going.
    Lenient,
    /// Abort the aggregation, like a shape violation does.
    Strict,
}

impl Default for DatePolicy {
    fn default() -> Self {
        DatePolicy::Lenient
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub columns: ColumnMap,
    pub date_policy: DatePolicy,
    pub export_dir: Option<PathBuf>,
}

impl Config {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| BudgetError::Config(e.to_string()))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            BudgetError::Config(format!("Nie można odczytać {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Explicit and env-var paths must exist; the default location is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            debug!(path = %path.display(), "loading config from flag");
            return Self::from_file(path);
        }

        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            debug!(path = %path, "loading config from {}", CONFIG_ENV_VAR);
            return Self::from_file(Path::new(&path));
        }

        match default_config_path() {
            Some(path) if path.exists() => {
                debug!(path = %path.display(), "loading config from home directory");
                Self::from_file(&path)
            }
            _ => Ok(Self::default()),
        }
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}
