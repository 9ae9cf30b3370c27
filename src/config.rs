use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SynapseConfig {
    pub logging: LoggingConfig,
    pub storage: StorageConfig,
    pub graph: GraphConfig,
    pub reinforcement: ReinforcementConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub db_path: String,
}

/// Resource bounds for graph algorithms and the write path.
///
/// The original system had no bounds at all on path enumeration or hub scans;
/// both are worst-case combinatorial, so every limit here is explicit and
/// surfaced as `ResourceExhausted` when hit rather than silently truncating.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GraphConfig {
    /// Maximum number of complete paths a single find_paths call may return.
    pub max_paths: usize,
    /// Maximum number of node expansions across a single find_paths call.
    pub max_visited_nodes: usize,
    /// Maximum number of hub nodes a single find_clusters call may analyze.
    pub max_hubs: usize,
    /// How many times a mutating operation retries a busy database before
    /// surfacing `ConflictRetryExhausted`.
    pub write_retry_budget: u32,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ReinforcementConfig {
    /// Co-occurrence window in seconds — two experiences in the same context
    /// closer together than this are considered to have co-occurred.
    pub window_seconds: i64,
    /// Floor on the per-pair strength increase when reinforcing.
    pub min_increase: i64,
}

impl Default for SynapseConfig {
    fn default() -> Self {
        Self {
            logging: LoggingConfig::default(),
            storage: StorageConfig::default(),
            graph: GraphConfig::default(),
            reinforcement: ReinforcementConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        let db_path = default_synapse_dir()
            .join("graph.db")
            .to_string_lossy()
            .into_owned();
        Self { db_path }
    }
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            max_paths: 256,
            max_visited_nodes: 10_000,
            max_hubs: 5_000,
            write_retry_budget: 5,
        }
    }
}

impl Default for ReinforcementConfig {
    fn default() -> Self {
        Self {
            window_seconds: 600,
            min_increase: 1,
        }
    }
}

/// Returns `~/.synapse/`
pub fn default_synapse_dir() -> PathBuf {
    dirs::home_dir()
        .expect("home directory must exist")
        .join(".synapse")
}

/// Returns the default config file path: `~/.synapse/config.toml`
pub fn default_config_path() -> PathBuf {
    default_synapse_dir().join("config.toml")
}

impl SynapseConfig {
    /// Load config from TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            info!("no config file at {}, using defaults", path.display());
            SynapseConfig::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides (SYNAPSE_DB, SYNAPSE_LOG_LEVEL).
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("SYNAPSE_DB") {
            self.storage.db_path = val;
        }
        if let Ok(val) = std::env::var("SYNAPSE_LOG_LEVEL") {
            self.logging.level = val;
        }
    }

    /// Resolve the database path, expanding `~` if needed.
    pub fn resolved_db_path(&self) -> PathBuf {
        expand_tilde(&self.storage.db_path)
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        dirs::home_dir()
            .expect("home directory must exist")
            .join(rest)
    } else {
        PathBuf::from(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = SynapseConfig::default();
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.graph.max_paths, 256);
        assert_eq!(config.graph.write_retry_budget, 5);
        assert_eq!(config.reinforcement.window_seconds, 600);
        assert!(config.storage.db_path.ends_with("graph.db"));
    }

    #[test]
    fn parse_toml_config() {
        let toml_str = r#"
[logging]
level = "debug"

[storage]
db_path = "/tmp/test.db"

[graph]
max_paths = 64

[reinforcement]
window_seconds = 120
"#;
        let config: SynapseConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.storage.db_path, "/tmp/test.db");
        assert_eq!(config.graph.max_paths, 64);
        assert_eq!(config.reinforcement.window_seconds, 120);
        // defaults still apply for unset fields
        assert_eq!(config.graph.max_visited_nodes, 10_000);
        assert_eq!(config.reinforcement.min_increase, 1);
    }

    #[test]
    fn env_overrides_apply() {
        let mut config = SynapseConfig::default();
        std::env::set_var("SYNAPSE_DB", "/tmp/override.db");
        std::env::set_var("SYNAPSE_LOG_LEVEL", "trace");

        config.apply_env_overrides();

        assert_eq!(config.storage.db_path, "/tmp/override.db");
        assert_eq!(config.logging.level, "trace");

        // Clean up
        std::env::remove_var("SYNAPSE_DB");
        std::env::remove_var("SYNAPSE_LOG_LEVEL");
    }
}
