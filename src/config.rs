use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub nobelnet: NobelnetConfig,
    #[serde(default)]
    pub import: ImportConfig,
    #[serde(default)]
    pub query: QueryConfig,
}

/// Paths and logging
#[derive(Debug, Clone, Deserialize)]
pub struct NobelnetConfig {
    /// Raw award/laureate CSV export consumed by the extract stage.
    pub source_csv: PathBuf,
    /// Directory where extract writes per-label node CSVs and Relations.csv,
    /// and where import reads them from.
    pub staging_dir: PathBuf,
    pub db_path: PathBuf,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Import (store upload) configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ImportConfig {
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
        }
    }
}

/// Query-side tuning
#[derive(Debug, Clone, Deserialize)]
pub struct QueryConfig {
    /// Upper bound on BFS dequeues per shortest-path query. 0 means unbounded.
    #[serde(default)]
    pub max_steps: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self { max_steps: 0 }
    }
}

fn default_batch_size() -> usize {
    1000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from file
    ///
    /// Loads environment variables from .env file (if present) before loading config.
    /// Looks for config file in this order:
    /// 1. Path specified in NOBELNET_CONFIG environment variable
    /// 2. ./config.toml in current directory
    pub fn load() -> Result<Self> {
        // Load .env file if it exists (ignore errors - file is optional)
        let _ = dotenv::dotenv();

        let config_path = std::env::var("NOBELNET_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config.toml"));

        let config_str = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let config: Config = toml::from_str(&config_str)
            .context("Failed to parse config.toml")?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    ///
    /// Source/staging paths are checked by the stage that reads them, so a
    /// query-only deployment does not need the raw export on disk.
    fn validate(&self) -> Result<()> {
        if self.import.batch_size == 0 {
            anyhow::bail!("import.batch_size must be greater than 0");
        }

        if self.nobelnet.source_csv.as_os_str().is_empty() {
            anyhow::bail!("nobelnet.source_csv must not be empty");
        }

        if self.nobelnet.db_path.as_os_str().is_empty() {
            anyhow::bail!("nobelnet.db_path must not be empty");
        }

        Ok(())
    }

    /// Get graph store path
    pub fn db_path(&self) -> &Path {
        &self.nobelnet.db_path
    }

    /// Get the staging directory (extract output, import input)
    pub fn staging_dir(&self) -> &Path {
        &self.nobelnet.staging_dir
    }

    /// BFS step budget as the Option the path resolver takes (0 becomes None)
    pub fn step_budget(&self) -> Option<usize> {
        if self.query.max_steps == 0 {
            None
        } else {
            Some(self.query.max_steps)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Serialize config tests that mutate process-wide env so they don't race.
    static CONFIG_TEST_LOCK: Mutex<()> = Mutex::new(());

    fn create_test_config() -> String {
        r#"
[nobelnet]
source_csv = "./data/allNobel.csv"
staging_dir = "./data/staging"
db_path = "./test.db"
log_level = "debug"

[import]
batch_size = 500

[query]
max_steps = 200000
"#
        .to_string()
    }

    fn with_config_env(config_path: &std::path::Path, f: impl FnOnce()) {
        let original = std::env::var("NOBELNET_CONFIG").ok();
        std::env::set_var("NOBELNET_CONFIG", config_path.to_str().unwrap());
        f();
        std::env::remove_var("NOBELNET_CONFIG");
        if let Some(val) = original {
            std::env::set_var("NOBELNET_CONFIG", val);
        }
    }

    #[test]
    fn test_config_load_success() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, create_test_config()).unwrap();
        with_config_env(&config_path, || {
            let config = Config::load();
            assert!(config.is_ok(), "Config::load() failed: {:?}", config.err());
            let config = config.unwrap();
            assert_eq!(config.nobelnet.log_level, "debug");
            assert_eq!(config.import.batch_size, 500);
            assert_eq!(config.step_budget(), Some(200000));
        });
    }

    #[test]
    fn test_config_defaults() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        fs::write(
            &config_path,
            r#"
[nobelnet]
source_csv = "./data/allNobel.csv"
staging_dir = "./data/staging"
db_path = "./nobelnet.db"
"#,
        )
        .unwrap();
        with_config_env(&config_path, || {
            let config = Config::load().unwrap();
            assert_eq!(config.nobelnet.log_level, "info");
            assert_eq!(config.import.batch_size, 1000);
            // max_steps defaults to 0, i.e. unbounded
            assert_eq!(config.step_budget(), None);
        });
    }

    #[test]
    fn test_config_rejects_zero_batch_size() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        fs::write(
            &config_path,
            r#"
[nobelnet]
source_csv = "./data/allNobel.csv"
staging_dir = "./data/staging"
db_path = "./nobelnet.db"

[import]
batch_size = 0
"#,
        )
        .unwrap();
        with_config_env(&config_path, || {
            let config = Config::load();
            assert!(config.is_err());
            assert!(config
                .unwrap_err()
                .to_string()
                .contains("batch_size"));
        });
    }

    #[test]
    fn test_config_invalid_path() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let original = std::env::var("NOBELNET_CONFIG").ok();
        std::env::set_var("NOBELNET_CONFIG", "nonexistent.toml");
        let config = Config::load();
        assert!(config.is_err());
        std::env::remove_var("NOBELNET_CONFIG");
        if let Some(v) = original {
            std::env::set_var("NOBELNET_CONFIG", v);
        }
    }
}
