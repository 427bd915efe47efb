//! Configuration management

use crate::content::{CategoryTable, ContentError};
use crate::game::GameConfig;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub game: GameConfig,
    pub content: ContentConfig,
}

/// Network settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to listen on
    pub listen: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0:3001".to_string(),
        }
    }
}

/// Word content settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Category table in TOML or JSON; the built-in table is used when unset
    pub words_file: Option<PathBuf>,
}

impl Config {
    /// Load config from `path`, or from the default location.
    ///
    /// A missing file at the default location yields the defaults; a missing
    /// file that was asked for explicitly is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (config_path, explicit) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (Self::config_path(), false),
        };

        if !config_path.exists() {
            if explicit {
                anyhow::bail!("Config file {:?} does not exist", config_path);
            }
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {:?}", config_path))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {:?}", config_path))?;
        Ok(config)
    }

    /// Get the config file path
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("imposter")
            .join("config.toml")
    }

    /// Build the category table this config points at
    pub fn word_table(&self) -> Result<CategoryTable, ContentError> {
        match &self.content.words_file {
            Some(path) => CategoryTable::load(path),
            None => Ok(CategoryTable::builtin()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.listen, "0.0.0.0:3001");
        assert_eq!(config.game.round_limit, 5);
        assert_eq!(config.game.reveal_delay_ms, 5000);
        assert_eq!(config.game.innocent_award, 20);
        assert_eq!(config.game.imposter_award, 50);
        assert!(config.content.words_file.is_none());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[game]\nround_limit = 3\n\n[server]\nlisten = \"127.0.0.1:4000\"").unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.game.round_limit, 3);
        assert_eq!(config.game.imposter_award, 50);
        assert_eq!(config.server.listen, "127.0.0.1:4000");
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load(Some(&dir.path().join("nope.toml"))).is_err());
    }

    #[test]
    fn test_word_table_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let words = dir.path().join("words.toml");
        std::fs::write(&words, "[categories]\ntools = [\"hammer\"]\n").unwrap();

        let config = Config {
            content: ContentConfig {
                words_file: Some(words),
            },
            ..Config::default()
        };
        let table = config.word_table().unwrap();
        assert_eq!(table.categories()[0].name, "tools");
    }
}
