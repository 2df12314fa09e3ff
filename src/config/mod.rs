use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::errors::{GotoPageError, GotoPageResult};
use crate::selector::{PageProps, DEFAULT_RECONCILE_DELAY, FIRST_PAGE};

/// Application configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Number of pages the owner exposes
    pub total_pages: i64,

    /// Page the owner starts on
    pub selected_page: i64,

    /// Delay before a blurred field is checked against the owner
    pub reconcile_delay_ms: u64,

    /// How long the simulated owner takes to accept a page
    pub owner_latency_ms: u64,

    /// Interval between tick events in the TUI
    pub tick_rate_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            total_pages: 10,
            selected_page: FIRST_PAGE,
            reconcile_delay_ms: DEFAULT_RECONCILE_DELAY.as_millis() as u64,
            owner_latency_ms: 50,
            tick_rate_ms: 50,
        }
    }
}

impl Config {
    /// Initialize configuration from defaults, an optional file and the environment
    pub async fn init(explicit_path: Option<&Path>) -> GotoPageResult<Self> {
        debug!("Initializing configuration");

        let mut config = match explicit_path {
            Some(path) => Self::load_from_path(path).await?,
            None => Self::load_from_file().await?.unwrap_or_default(),
        };

        config.load_from_env();

        Ok(config)
    }

    /// Candidate configuration files, highest priority first
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from("./.goto-page.json"),
            PathBuf::from("./goto-page.json"),
        ];

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("goto-page").join("goto-page.json"));
        }

        paths
    }

    /// Load the first configuration file found in [`Config::search_paths`]
    pub async fn load_from_file() -> GotoPageResult<Option<Self>> {
        for path in Self::search_paths() {
            if path.exists() {
                return Self::load_from_path(&path).await.map(Some);
            }
        }

        Ok(None)
    }

    pub async fn load_from_path(path: &Path) -> GotoPageResult<Self> {
        debug!("Loading configuration from: {}", path.display());
        let content = tokio::fs::read_to_string(path).await?;
        let config: Self = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Override fields from `GOTO_PAGE_*` environment variables
    pub fn load_from_env(&mut self) {
        if let Some(total) = env_number("GOTO_PAGE_TOTAL_PAGES") {
            self.total_pages = total;
        }

        if let Some(page) = env_number("GOTO_PAGE_SELECTED_PAGE") {
            self.selected_page = page;
        }

        if let Some(delay) = env_number("GOTO_PAGE_RECONCILE_DELAY_MS") {
            self.reconcile_delay_ms = delay;
        }

        if let Some(latency) = env_number("GOTO_PAGE_OWNER_LATENCY_MS") {
            self.owner_latency_ms = latency;
        }

        if let Some(rate) = env_number("GOTO_PAGE_TICK_RATE_MS") {
            self.tick_rate_ms = rate;
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> GotoPageResult<()> {
        if self.total_pages < FIRST_PAGE {
            return Err(GotoPageError::ConfigError(
                "total_pages must be at least 1".to_string(),
            ));
        }

        if !(FIRST_PAGE..=self.total_pages).contains(&self.selected_page) {
            return Err(GotoPageError::ConfigError(format!(
                "selected_page must be between 1 and {}",
                self.total_pages
            )));
        }

        if self.tick_rate_ms == 0 {
            return Err(GotoPageError::ConfigError(
                "tick_rate_ms must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    pub fn props(&self) -> PageProps {
        PageProps::new(self.selected_page, self.total_pages)
    }

    pub fn reconcile_delay(&self) -> Duration {
        Duration::from_millis(self.reconcile_delay_ms)
    }

    pub fn owner_latency(&self) -> Duration {
        Duration::from_millis(self.owner_latency_ms)
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms)
    }
}

fn env_number<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            debug!("Ignoring unparsable {}={}", key, raw);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_values() {
        let config = Config::default();

        assert_eq!(config.total_pages, 10);
        assert_eq!(config.selected_page, 1);
        assert_eq!(config.reconcile_delay(), Duration::from_millis(150));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        config.total_pages = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.selected_page = 11;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.tick_rate_ms = 0;
        assert!(config.validate().is_err());
    }

    #[tokio::test]
    async fn test_load_from_path() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("goto-page.json");
        tokio::fs::write(&path, r#"{ "total_pages": 42, "owner_latency_ms": 400 }"#)
            .await
            .unwrap();

        let config = Config::load_from_path(&path).await.unwrap();
        assert_eq!(config.total_pages, 42);
        assert_eq!(config.owner_latency(), Duration::from_millis(400));
        // Missing fields fall back to defaults.
        assert_eq!(config.selected_page, 1);
        assert_eq!(config.reconcile_delay_ms, 150);
    }

    #[tokio::test]
    async fn test_load_from_path_rejects_bad_json() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("goto-page.json");
        tokio::fs::write(&path, "{ not json").await.unwrap();

        let err = Config::load_from_path(&path).await.unwrap_err();
        assert!(matches!(err, GotoPageError::JsonError(_)));
    }

    #[test]
    fn test_props() {
        let config = Config {
            selected_page: 3,
            total_pages: 7,
            ..Config::default()
        };
        assert_eq!(config.props(), PageProps::new(3, 7));
    }
}
