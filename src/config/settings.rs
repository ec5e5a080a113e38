use anyhow::{bail, Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const MAX_WINDOW_DAYS: u32 = 3660;
const MAX_GRID_DAYS: u32 = 366;

fn default_window_days() -> u32 {
    30
}
fn default_grid_days() -> u32 {
    7
}
fn default_user_id() -> String {
    "local".to_string()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Sqlite,
    File,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    /// Overrides the data directory (file backend) or database file (sqlite)
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsConfig {
    /// Window for the per-habit rate shown in listings. The aggregate rate
    /// is always over 30 days.
    #[serde(default = "default_window_days")]
    pub completion_window_days: u32,
    #[serde(default = "default_grid_days")]
    pub grid_days: u32,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            completion_window_days: default_window_days(),
            grid_days: default_grid_days(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserConfig {
    #[serde(default = "default_user_id")]
    pub user_id: String,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            user_id: default_user_id(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub stats: StatsConfig,
    #[serde(default)]
    pub user: UserConfig,
}

impl AppConfig {
    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("", "", "habitual")
            .context("Could not determine project directories")
    }

    pub fn config_path() -> Result<PathBuf> {
        let dirs = Self::project_dirs()?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn data_dir() -> Result<PathBuf> {
        let dirs = Self::project_dirs()?;
        Ok(dirs.data_dir().to_path_buf())
    }

    pub fn db_path(&self) -> Result<PathBuf> {
        match &self.storage.path {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::data_dir()?.join("habitual.db")),
        }
    }

    pub fn files_dir(&self) -> Result<PathBuf> {
        match &self.storage.path {
            Some(path) => Ok(path.clone()),
            None => Self::data_dir(),
        }
    }

    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let content =
            std::fs::read_to_string(&path).with_context(|| format!("Reading {:?}", path))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Parsing config.toml")?;
        let stats = &config.stats;
        if !(1..=MAX_WINDOW_DAYS).contains(&stats.completion_window_days) {
            bail!(
                "stats.completion_window_days must be between 1 and {}, got {}",
                MAX_WINDOW_DAYS,
                stats.completion_window_days
            );
        }
        if !(1..=MAX_GRID_DAYS).contains(&stats.grid_days) {
            bail!(
                "stats.grid_days must be between 1 and {}, got {}",
                MAX_GRID_DAYS,
                stats.grid_days
            );
        }
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self).context("Serializing config")?;
        std::fs::write(&path, content).with_context(|| format!("Writing {:?}", path))?;
        Ok(())
    }

    pub fn ensure_data_dir() -> Result<PathBuf> {
        let dir = Self::data_dir()?;
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }
}
