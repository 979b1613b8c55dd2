// src/config.rs
//
// Runtime configuration
//
// Defaults are overridden by environment variables:
// - POKEDEX_DATA_DIR   directory holding the JSON documents
// - POKEDEX_BACKEND    `json` (default) or `sqlite`
// - POKEDEX_DATABASE   SQLite file, default `<data_dir>/pokedex.db`

use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{AppError, AppResult};

pub const ENV_DATA_DIR: &str = "POKEDEX_DATA_DIR";
pub const ENV_BACKEND: &str = "POKEDEX_BACKEND";
pub const ENV_DATABASE: &str = "POKEDEX_DATABASE";

const DATABASE_FILE: &str = "pokedex.db";

/// Which repository implementation the application is wired with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    #[default]
    Json,
    Sqlite,
}

impl FromStr for Backend {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Backend::Json),
            "sqlite" => Ok(Backend::Sqlite),
            other => Err(AppError::Config(format!(
                "Unknown backend '{}', expected json or sqlite",
                other
            ))),
        }
    }
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Backend::Json => write!(f, "json"),
            Backend::Sqlite => write!(f, "sqlite"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub backend: Backend,
    /// Explicit SQLite path; `None` means `<data_dir>/pokedex.db`
    pub database_path: Option<PathBuf>,
}

impl AppConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            backend: Backend::default(),
            database_path: None,
        }
    }

    /// Platform data directory, e.g. `~/.local/share/pokedex`
    pub fn default_data_dir() -> AppResult<PathBuf> {
        let base = dirs::data_dir()
            .ok_or_else(|| AppError::Config("Could not determine app data directory".to_string()))?;
        Ok(base.join("pokedex"))
    }

    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; empty values count as unset
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let data_dir = match get(ENV_DATA_DIR) {
            Some(dir) => PathBuf::from(dir),
            None => Self::default_data_dir()?,
        };

        let mut config = Self::new(data_dir);
        if let Some(backend) = get(ENV_BACKEND) {
            config.backend = backend.parse()?;
        }
        config.database_path = get(ENV_DATABASE).map(PathBuf::from);

        Ok(config)
    }

    pub fn with_backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }

    pub fn with_database_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.database_path = Some(path.into());
        self
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn database_path(&self) -> PathBuf {
        self.database_path
            .clone()
            .unwrap_or_else(|| self.data_dir.join(DATABASE_FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_env_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            (ENV_DATA_DIR, "/tmp/pokedex-data"),
            (ENV_BACKEND, "SQLite"),
        ]))
        .unwrap();

        assert_eq!(config.data_dir(), Path::new("/tmp/pokedex-data"));
        assert_eq!(config.backend, Backend::Sqlite);
        assert_eq!(
            config.database_path(),
            PathBuf::from("/tmp/pokedex-data/pokedex.db")
        );
    }

    #[test]
    fn test_explicit_database_path() {
        let config = AppConfig::from_lookup(lookup(&[
            (ENV_DATA_DIR, "/data"),
            (ENV_DATABASE, "/elsewhere/p.db"),
        ]))
        .unwrap();
        assert_eq!(config.backend, Backend::Json);
        assert_eq!(config.database_path(), PathBuf::from("/elsewhere/p.db"));
    }

    #[test]
    fn test_unknown_backend_is_config_error() {
        let result = AppConfig::from_lookup(lookup(&[
            (ENV_DATA_DIR, "/data"),
            (ENV_BACKEND, "mysql"),
        ]));
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_builder() {
        let config = AppConfig::new("/d")
            .with_backend(Backend::Sqlite)
            .with_database_path("/d/x.db");
        assert_eq!(config.backend, Backend::Sqlite);
        assert_eq!(config.database_path(), PathBuf::from("/d/x.db"));
    }
}
