//! Options for the variable store and the command line tool.

use std::fs;
use std::path::{Path, PathBuf};

use log::LevelFilter;
use serde::Deserialize;

use crate::error::{CssVarResult, IoContext, JsonContext};
use crate::variables::ROOT_SELECTOR;

/// Options loaded from a JSON file. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CssVarOptions {
    /// Default selector of a new store
    pub selector: String,
    /// Maximum log level, as accepted by `log::LevelFilter`
    pub log_level: String,
    /// Log file, `None` uses the platform local data directory
    pub log_file: Option<PathBuf>,
}

impl Default for CssVarOptions {
    fn default() -> Self {
        Self {
            selector: ROOT_SELECTOR.to_string(),
            log_level: "info".to_string(),
            log_file: None,
        }
    }
}

impl CssVarOptions {
    /// Load options from a JSON file
    pub fn load(path: &Path) -> CssVarResult<Self> {
        let content = fs::read_to_string(path)
            .with_io_context(&format!("Failed to read options file {}", path.display()))?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> CssVarResult<Self> {
        serde_json::from_str(content).with_json_context("Failed to parse options")
    }

    /// Level filter for the logger, falls back to `Info` for unknown names
    pub fn level_filter(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or(LevelFilter::Info)
    }
}
