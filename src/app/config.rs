//! TOML configuration file parsing and loading
//!
//! ```toml
//! [queue]
//! namespace = "shop"
//! default_ttl = 3600   # seconds
//! block = true
//! timeout = 0          # seconds, 0 waits forever
//!
//! [store]
//! backend = "redis"    # or "memory" (process-local, for smoke tests)
//! url = "redis://127.0.0.1:6379/"
//!
//! [log]
//! level = "info"
//! format = "text"      # text, ext or json
//! file = "/var/log/rpsq.log"
//! ```
//!
//! Every section and field is optional. Without an explicit path the file is
//! looked up at `<config dir>/rpsqueue/rpsqueue.toml`.

use crate::core::logging::LogFormat;
use crate::core::validation::{validate_log_level, validate_ttl_seconds};
use crate::queue::{
    validate_identifier, ConsumeOptions, QueueCoordinator, QueueError, QueueResult,
    DEFAULT_TTL_SECONDS,
};
use crate::store::{KeyValueStore, MemoryStore, RedisStore};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379/";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub queue: QueueSection,
    pub store: StoreSection,
    pub log: LogSection,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct QueueSection {
    pub namespace: Option<String>,
    pub default_ttl: u64,
    pub block: bool,
    pub timeout: u64,
}

impl Default for QueueSection {
    fn default() -> Self {
        Self {
            namespace: None,
            default_ttl: DEFAULT_TTL_SECONDS,
            block: true,
            timeout: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Redis,
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreSection {
    pub backend: StoreBackend,
    pub url: String,
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Redis,
            url: DEFAULT_REDIS_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogSection {
    pub level: Option<String>,
    pub format: Option<String>,
    pub file: Option<String>,
}

/// Default configuration file location, if the platform has a config dir
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("rpsqueue").join("rpsqueue.toml"))
}

fn config_error(message: impl Into<String>) -> QueueError {
    QueueError::Config {
        message: message.into(),
    }
}

impl Config {
    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(contents: &str) -> QueueResult<Self> {
        let config: Self = toml::from_str(contents).map_err(|e| config_error(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path`, or from the default location when `path` is `None`
    ///
    /// An explicit path must exist. A missing default file yields the
    /// built-in defaults.
    pub fn load(path: Option<&Path>) -> QueueResult<Self> {
        let path = match path {
            Some(path) => {
                if !path.exists() {
                    return Err(config_error(format!(
                        "The specified configuration file does not exist: {}",
                        path.display()
                    )));
                }
                path.to_path_buf()
            }
            None => match default_config_path() {
                Some(path) if path.exists() => path,
                _ => return Ok(Self::default()),
            },
        };

        let contents = std::fs::read_to_string(&path).map_err(|e| {
            config_error(format!(
                "Error reading configuration file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&contents).map_err(|e| match e {
            QueueError::Config { message } => {
                config_error(format!("Error in configuration file {}: {}", path.display(), message))
            }
            other => other,
        })
    }

    /// Check field values that the TOML schema alone cannot express
    pub fn validate(&self) -> QueueResult<()> {
        if let Some(namespace) = &self.queue.namespace {
            validate_identifier("namespace", namespace)?;
        }
        validate_ttl_seconds(self.queue.default_ttl).map_err(config_error)?;
        if let Some(level) = &self.log.level {
            validate_log_level(level).map_err(config_error)?;
        }
        if let Some(format) = &self.log.format {
            if LogFormat::parse(format).is_none() {
                return Err(config_error(format!(
                    "'{}' is not a valid log format (text, ext, json)",
                    format
                )));
            }
        }
        Ok(())
    }

    pub fn namespace(&self) -> QueueResult<&str> {
        self.queue
            .namespace
            .as_deref()
            .ok_or_else(|| {
                config_error("A namespace is required (--namespace or [queue] namespace)")
            })
    }

    pub fn log_format(&self) -> LogFormat {
        self.log
            .format
            .as_deref()
            .and_then(LogFormat::parse)
            .unwrap_or_default()
    }

    pub fn consume_options(&self) -> ConsumeOptions {
        ConsumeOptions {
            block: self.queue.block,
            timeout: Duration::from_secs(self.queue.timeout),
        }
    }

    /// Connect to the configured backend
    pub fn connect_store(&self) -> QueueResult<Arc<dyn KeyValueStore>> {
        match self.store.backend {
            StoreBackend::Redis => {
                log::debug!("Connecting to redis at {}", self.store.url);
                Ok(Arc::new(RedisStore::connect(&self.store.url)?))
            }
            StoreBackend::Memory => {
                log::warn!(
                    "Using the process-local memory store; messages do not outlive this process"
                );
                Ok(Arc::new(MemoryStore::new()))
            }
        }
    }

    /// Coordinator for the configured namespace over `store`
    pub fn coordinator(&self, store: Arc<dyn KeyValueStore>) -> QueueResult<QueueCoordinator> {
        QueueCoordinator::new(self.namespace()?, store)?.with_default_ttl(self.queue.default_ttl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.queue.default_ttl, 3600);
        assert_eq!(config.store.backend, StoreBackend::Redis);
        assert_eq!(config.store.url, DEFAULT_REDIS_URL);
        assert_eq!(config.consume_options(), ConsumeOptions::forever());
        assert_eq!(config.log_format(), LogFormat::Text);
        assert!(config.namespace().is_err());
    }

    #[test]
    fn test_full_config_parses() {
        let config = Config::from_toml_str(
            r#"
            [queue]
            namespace = "shop"
            default_ttl = 60
            block = false
            timeout = 5

            [store]
            backend = "memory"
            url = "redis://cache:6380/"

            [log]
            level = "debug"
            format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.namespace().unwrap(), "shop");
        assert_eq!(config.queue.default_ttl, 60);
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert_eq!(config.log_format(), LogFormat::Json);
        assert_eq!(
            config.consume_options(),
            ConsumeOptions {
                block: false,
                timeout: Duration::from_secs(5),
            }
        );
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let bad_namespace = Config::from_toml_str("[queue]\nnamespace = \"a.b\"\n");
        assert!(matches!(
            bad_namespace,
            Err(QueueError::InvalidIdentifier { .. })
        ));

        let zero_ttl = Config::from_toml_str("[queue]\ndefault_ttl = 0\n");
        assert!(matches!(zero_ttl, Err(QueueError::Config { .. })));

        let bad_level = Config::from_toml_str("[log]\nlevel = \"loud\"\n");
        assert!(matches!(bad_level, Err(QueueError::Config { .. })));

        let bad_format = Config::from_toml_str("[log]\nformat = \"xml\"\n");
        assert!(matches!(bad_format, Err(QueueError::Config { .. })));

        let unknown_key = Config::from_toml_str("[queue]\nnamepsace = \"typo\"\n");
        assert!(matches!(unknown_key, Err(QueueError::Config { .. })));

        let bad_backend = Config::from_toml_str("[store]\nbackend = \"etcd\"\n");
        assert!(matches!(bad_backend, Err(QueueError::Config { .. })));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[queue]\nnamespace = \"from-file\"").unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.namespace().unwrap(), "from-file");
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");

        let error = Config::load(Some(&missing)).unwrap_err();
        assert!(error.to_string().contains("does not exist"));
    }

    #[test]
    fn test_load_reports_file_in_parse_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[queue\nnamespace = ").unwrap();

        let error = Config::load(Some(file.path())).unwrap_err();
        assert!(error.to_string().contains("Error in configuration file"));
    }

    #[test]
    fn test_memory_backend_builds_working_coordinator() {
        let config = Config::from_toml_str(
            "[queue]\nnamespace = \"n\"\ndefault_ttl = 120\n[store]\nbackend = \"memory\"\n",
        )
        .unwrap();

        let store = config.connect_store().unwrap();
        let coordinator = config.coordinator(store).unwrap();
        assert_eq!(coordinator.default_ttl_seconds(), 120);

        let session = coordinator.subscribe("orders", "c1").unwrap();
        coordinator.publish_with_default_ttl("orders", "hi").unwrap();
        assert_eq!(session.try_consume().unwrap().as_deref(), Some("hi"));
    }
}
