//! Fatal configuration errors raised before any assets are classified.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that stop an offline cache setup from being constructed.
#[derive(Debug, Error)]
pub enum ConfigError {
  /// Failed to read the configuration file from disk.
  #[error("failed to read {}", path.display())]
  Io {
    /// Path that caused the error.
    path: PathBuf,
    /// Source I/O error.
    source: std::io::Error,
  },
  /// Failed to parse a JSON configuration file.
  #[error("failed to parse {}", path.display())]
  Json {
    /// Path that caused the error.
    path: PathBuf,
    /// Source parse error.
    source: serde_json::Error,
  },
  /// Failed to parse a YAML configuration file.
  #[error("failed to parse {}", path.display())]
  Yaml {
    /// Path that caused the error.
    path: PathBuf,
    /// Source parse error.
    source: serde_yaml::Error,
  },
  /// The reserved entry prefix was configured as an empty string, which would let the
  /// injected entry modules into the caches.
  #[error("entryPrefix must not be empty")]
  EmptyEntryPrefix,
  /// Every cache tool was disabled, leaving nothing to consume the classification.
  #[error("at least one cache tool (serviceWorker or appCache) must be enabled")]
  NoCacheTools,
}
