use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "CSH_DASHBOARD_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "dashboard.json";

// ---------------------------------------------------------------------------
// Dashboard configuration (JSON)
// ---------------------------------------------------------------------------

/// A staff account allowed to open the dashboard.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct UserEntry {
    pub username: String,
    pub password: String,
    /// Display name shown once logged in.
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DashboardConfig {
    /// Member table loaded at startup.
    pub dataset_path: Option<PathBuf>,
    pub users: Vec<UserEntry>,
    pub window_title: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            dataset_path: None,
            users: Vec::new(),
            window_title: "CSH Stats".to_string(),
        }
    }
}

impl DashboardConfig {
    /// Path from [`CONFIG_ENV`], falling back to [`DEFAULT_CONFIG_PATH`].
    pub fn default_path() -> PathBuf {
        std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let mut config = Self::from_json(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;

        // A relative dataset path is relative to the config file.
        if let (Some(dataset), Some(dir)) = (&config.dataset_path, path.parent()) {
            if dataset.is_relative() {
                config.dataset_path = Some(dir.join(dataset));
            }
        }
        if config.users.is_empty() {
            log::warn!("{} defines no users; nobody will be able to log in", path.display());
        }
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let config = DashboardConfig::from_json("{}").unwrap();
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.window_title, "CSH Stats");
    }

    #[test]
    fn users_and_dataset_parse() {
        let config = DashboardConfig::from_json(
            r#"{
                "dataset_path": "data/members.csv",
                "users": [{"username": "ana@example.org", "password": "pw", "name": "Ana"}]
            }"#,
        )
        .unwrap();
        assert_eq!(config.users.len(), 1);
        assert_eq!(config.users[0].name, "Ana");
        assert_eq!(config.dataset_path, Some(PathBuf::from("data/members.csv")));
    }

    #[test]
    fn dataset_path_is_resolved_next_to_the_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dashboard.json");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, r#"{{"dataset_path": "members.csv"}}"#).unwrap();

        let config = DashboardConfig::load(&path).unwrap();
        assert_eq!(config.dataset_path, Some(dir.path().join("members.csv")));
    }

    #[test]
    fn unreadable_config_is_an_error() {
        let err = DashboardConfig::load(Path::new("/nonexistent/dashboard.json")).unwrap_err();
        assert!(format!("{err:#}").contains("reading config"));
        assert!(DashboardConfig::from_json("{\"users\": 3}").is_err());
    }
}
