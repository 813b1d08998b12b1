//! JSON configuration: library metadata, links and highlighter keywords.

use crate::model::LibraryMetadata;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub github_url: Option<String>,
    pub library_url: Option<String>,
    pub support_email: Option<String>,
    pub author: Option<String>,
    pub maintainer: Option<String>,
    pub license: Option<String>,
    pub robot_framework: Option<String>,
    pub python: Option<String>,
    /// Replaces the default application keywords when present
    pub custom_keywords: Option<Vec<String>>,
}

impl Config {
    /// Load configuration from `path`. A missing or malformed file is logged
    /// and yields the defaults.
    pub fn load(path: &Path) -> Config {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "config file not readable, using defaults");
                return Config::default();
            }
        };
        match Config::from_json(&text) {
            Ok(config) => {
                debug!(path = %path.display(), "config loaded");
                config
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "invalid config JSON, using defaults");
                Config::default()
            }
        }
    }

    pub fn from_json(text: &str) -> Result<Config, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Metadata block for the library; empty strings count as absent.
    pub fn metadata(&self) -> LibraryMetadata {
        let field = |v: &Option<String>| {
            v.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        LibraryMetadata {
            author: field(&self.author),
            maintainer: field(&self.maintainer),
            license: field(&self.license),
            robot_framework: field(&self.robot_framework),
            python: field(&self.python),
            github_url: field(&self.github_url),
            library_url: field(&self.library_url),
            support_email: field(&self.support_email),
        }
    }

    pub fn custom_keywords(&self) -> Option<&[String]> {
        self.custom_keywords.as_deref()
    }
}
