//! Configuration for the menu service

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// SQLite database file (default: /data/menu.db)
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,

    /// Address to bind the HTTP server on
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Config {
    /// Load config from an optional TOML file, then apply environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Config::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Read a TOML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Apply `DATABASE_PATH`, `MENU_HOST` and `MENU_PORT` from `lookup`
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("DATABASE_PATH") {
            self.database_path = PathBuf::from(path);
        }
        if let Some(host) = lookup("MENU_HOST") {
            self.host = host;
        }
        if let Some(port) = lookup("MENU_PORT") {
            self.port = port
                .parse()
                .map_err(|_| Error::Config(format!("MENU_PORT is not a valid port: {}", port)))?;
        }
        Ok(())
    }

    /// Socket address the server binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// Default value functions

fn default_database_path() -> PathBuf {
    PathBuf::from("/data/menu.db")
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}
