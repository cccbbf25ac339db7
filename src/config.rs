use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "GRADEBOOK_CONFIG";
pub const DB_ENV: &str = "GRADEBOOK_DB";
pub const DEFAULT_DB_FILE: &str = "student_management.db";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    pub db_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_FILE),
        }
    }
}

impl Config {
    /// Defaults, then the JSON file named by `GRADEBOOK_CONFIG`, then
    /// `GRADEBOOK_DB`.
    pub fn load() -> anyhow::Result<Config> {
        let mut cfg = match std::env::var_os(CONFIG_ENV) {
            Some(p) => Config::from_file(Path::new(&p))?,
            None => Config::default(),
        };
        if let Some(db) = std::env::var_os(DB_ENV) {
            if !db.is_empty() {
                cfg.db_path = PathBuf::from(db);
            }
        }
        Ok(cfg)
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Config> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.to_string_lossy()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("invalid config {}", path.to_string_lossy()))
    }
}
