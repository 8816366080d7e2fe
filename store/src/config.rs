//! Configuration for the Valorant store.
//!
//! Resolution order:
//! 1. `VALORANT_CONFIG` environment variable naming a TOML file
//! 2. `valorant.toml` in the working directory, if present
//! 3. Built-in defaults (file backend under `./data`)
//!
//! After the file is read, `VALORANT_BACKEND`, `VALORANT_DATA_DIR` and
//! `VALORANT_DATABASE_URL` override individual values.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{RepoResult, RepositoryError};

pub const CONFIG_ENV: &str = "VALORANT_CONFIG";
pub const BACKEND_ENV: &str = "VALORANT_BACKEND";
pub const DATA_DIR_ENV: &str = "VALORANT_DATA_DIR";
pub const DATABASE_URL_ENV: &str = "VALORANT_DATABASE_URL";

const DEFAULT_CONFIG_FILE: &str = "valorant.toml";
const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_DATABASE: &str = "data/valorant.db";

/// Which repository family to construct.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    File,
    Sql,
    Orm,
}

impl FromStr for Backend {
    type Err = RepositoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(Backend::File),
            "sql" => Ok(Backend::Sql),
            "orm" => Ok(Backend::Orm),
            other => Err(RepositoryError::Config(format!(
                "unknown backend '{other}' (expected file, sql or orm)"
            ))),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Backend::File => "file",
            Backend::Sql => "sql",
            Backend::Orm => "orm",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub data_dir: PathBuf,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
        }
    }
}

/// Connection parameters for the relational backends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub protocol: String,
    pub host: String,
    pub database: String,
    pub user: String,
    pub password: String,
    /// Full connection URL; takes precedence over the individual fields.
    pub url: Option<String>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            protocol: "sqlite".to_string(),
            host: String::new(),
            database: DEFAULT_DATABASE.to_string(),
            user: String::new(),
            password: String::new(),
            url: None,
        }
    }
}

impl DatabaseConfig {
    pub fn connection_url(&self) -> String {
        if let Some(url) = &self.url {
            return url.clone();
        }
        if self.protocol == "sqlite" {
            format!("sqlite:{}", self.database)
        } else {
            format!(
                "{}://{}:{}@{}/{}",
                self.protocol, self.user, self.password, self.host, self.database
            )
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub backend: Backend,
    pub file: FileConfig,
    pub database: DatabaseConfig,
}

impl AppConfig {
    /// Resolve the configuration from the process environment.
    pub fn load() -> RepoResult<Self> {
        let explicit = std::env::var(CONFIG_ENV).ok().map(PathBuf::from);
        Self::load_from(explicit.as_deref(), |key| std::env::var(key).ok())
    }

    /// Resolve the configuration from an optional explicit path, falling
    /// back to `valorant.toml` and then to defaults, and apply overrides
    /// from `lookup`.
    pub fn load_from<F>(path: Option<&Path>, lookup: F) -> RepoResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match path {
            Some(path) => Self::from_path(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_path(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };
        config.apply_overrides(lookup)?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> RepoResult<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        tracing::info!(path = %path.display(), backend = %config.backend, "Loaded configuration");
        Ok(config)
    }

    pub fn from_toml_str(text: &str) -> RepoResult<Self> {
        toml::from_str(text).map_err(|e| RepositoryError::Config(e.to_string()))
    }

    pub fn apply_overrides<F>(&mut self, lookup: F) -> RepoResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(backend) = lookup(BACKEND_ENV) {
            self.backend = backend.parse()?;
        }
        if let Some(dir) = lookup(DATA_DIR_ENV) {
            self.file.data_dir = PathBuf::from(dir);
        }
        if let Some(url) = lookup(DATABASE_URL_ENV) {
            self.database.url = Some(url);
        }
        Ok(())
    }
}
