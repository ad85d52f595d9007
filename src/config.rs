//! Offline cache configuration loaded from `offline.config.json` or `offline.config.yaml`.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};

use crate::asset_paths::{DEFAULT_ENTRY_PREFIX, RewriteRules};
use crate::error::ConfigError;
use crate::selection::CacheSelection;

/// Configuration file names probed by [`OfflineOptions::discover`], in order.
pub const CONFIG_FILE_CANDIDATES: [&str; 3] = [
  "offline.config.json",
  "offline.config.yaml",
  "offline.config.yml",
];

/// Options controlling how build output is classified and rewritten.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OfflineOptions {
  /// Bucket assignment, either `"all"` or per-bucket selector lists.
  #[serde(deserialize_with = "null_as_default")]
  pub caches: CacheSelection,
  /// Public URL prefix. A trailing slash is appended when missing.
  #[serde(deserialize_with = "null_as_default")]
  pub scope: String,
  /// Rewrite rules. Files can only express the literal map form.
  #[serde(deserialize_with = "deserialize_rewrites")]
  pub rewrites: RewriteRules,
  /// Prefix of the entry modules injected by the build, which are never cached.
  #[serde(deserialize_with = "deserialize_entry_prefix")]
  pub entry_prefix: String,
  /// Service worker settings. `null` or `false` disables the tool.
  pub service_worker: Option<ToolSetting<ServiceWorkerOptions>>,
  /// AppCache settings. `null` or `false` disables the tool.
  pub app_cache: Option<ToolSetting<AppCacheOptions>>,
}

impl Default for OfflineOptions {
  fn default() -> Self {
    Self {
      caches: CacheSelection::All,
      scope: "/".into(),
      rewrites: RewriteRules::default(),
      entry_prefix: DEFAULT_ENTRY_PREFIX.into(),
      service_worker: Some(ToolSetting::Options(ServiceWorkerOptions::default())),
      app_cache: Some(ToolSetting::Options(AppCacheOptions::default())),
    }
  }
}

impl OfflineOptions {
  /// Look for a configuration file in `dir`, falling back to defaults when none exists.
  ///
  /// Files that exist but cannot be read or parsed are reported instead of being ignored.
  pub fn discover(dir: &Path) -> Result<Self, ConfigError> {
    match Self::locate(dir) {
      Some(path) => Self::from_path(&path),
      None => {
        tracing::debug!(dir = %dir.display(), "no offline config found, using defaults");
        Ok(Self::default())
      }
    }
  }

  /// First configuration file candidate present in `dir`.
  pub fn locate(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_CANDIDATES
      .iter()
      .map(|name| dir.join(name))
      .find(|candidate| candidate.is_file())
  }

  /// Read options from a specific file. `.yaml`/`.yml` files are parsed as YAML, anything
  /// else as JSON.
  pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
      path: path.to_path_buf(),
      source,
    })?;

    let is_yaml = path
      .extension()
      .and_then(|ext| ext.to_str())
      .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

    let options = if is_yaml {
      serde_yaml::from_str(&content).map_err(|source| ConfigError::Yaml {
        path: path.to_path_buf(),
        source,
      })?
    } else {
      serde_json::from_str(&content).map_err(|source| ConfigError::Json {
        path: path.to_path_buf(),
        source,
      })?
    };

    tracing::debug!(path = %path.display(), "loaded offline config");
    Ok(options)
  }

  /// Replace the bucket selection.
  pub fn with_caches(mut self, caches: CacheSelection) -> Self {
    self.caches = caches;
    self
  }

  /// Replace the scope.
  pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
    self.scope = scope.into();
    self
  }

  /// Replace the rewrite rules, e.g. with [`RewriteRules::function`].
  pub fn with_rewrites(mut self, rewrites: RewriteRules) -> Self {
    self.rewrites = rewrites;
    self
  }

  /// Replace the reserved entry prefix.
  pub fn with_entry_prefix(mut self, entry_prefix: impl Into<String>) -> Self {
    self.entry_prefix = entry_prefix.into();
    self
  }

  /// Enable or disable the service worker tool.
  pub fn with_service_worker(mut self, setting: Option<ToolSetting<ServiceWorkerOptions>>) -> Self {
    self.service_worker = setting;
    self
  }

  /// Enable or disable the AppCache tool.
  pub fn with_app_cache(mut self, setting: Option<ToolSetting<AppCacheOptions>>) -> Self {
    self.app_cache = setting;
    self
  }

  /// Tools that remain enabled after applying the toggles.
  pub fn enabled_tools(&self) -> CacheTools {
    CacheTools {
      service_worker: ToolSetting::resolve(self.service_worker.as_ref()),
      app_cache: ToolSetting::resolve(self.app_cache.as_ref()),
    }
  }
}

/// Per-tool configuration: a boolean toggle or the tool's own settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ToolSetting<T> {
  /// `true` enables the tool with default settings, `false` disables it.
  Toggle(bool),
  /// Enabled with explicit settings; omitted fields keep their defaults.
  Options(T),
}

impl<T: Clone + Default> ToolSetting<T> {
  fn resolve(setting: Option<&Self>) -> Option<T> {
    match setting? {
      Self::Toggle(false) => None,
      Self::Toggle(true) => Some(T::default()),
      Self::Options(options) => Some(options.clone()),
    }
  }
}

/// Settings forwarded to the service worker manifest generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ServiceWorkerOptions {
  /// File name of the generated worker script.
  pub output: String,
  /// Optional custom worker entry module.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub entry: Option<String>,
}

impl Default for ServiceWorkerOptions {
  fn default() -> Self {
    Self {
      output: "sw.js".into(),
      entry: None,
    }
  }
}

/// Settings forwarded to the AppCache manifest generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppCacheOptions {
  /// `NETWORK` section of the manifest.
  #[serde(rename = "NETWORK", alias = "network")]
  pub network: String,
  /// Output directory for the manifest and its iframe loader.
  pub directory: String,
}

impl Default for AppCacheOptions {
  fn default() -> Self {
    Self {
      network: "*".into(),
      directory: "appcache/".into(),
    }
  }
}

/// Enabled cache tools with their effective settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheTools {
  /// Service worker settings when enabled.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub service_worker: Option<ServiceWorkerOptions>,
  /// AppCache settings when enabled.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub app_cache: Option<AppCacheOptions>,
}

impl CacheTools {
  /// Returns `true` when no tool is enabled.
  pub fn is_empty(&self) -> bool {
    self.service_worker.is_none() && self.app_cache.is_none()
  }

  /// Names of the enabled tools, in configuration order.
  pub fn names(&self) -> Vec<&'static str> {
    let mut names = Vec::new();
    if self.service_worker.is_some() {
      names.push("serviceWorker");
    }
    if self.app_cache.is_some() {
      names.push("appCache");
    }
    names
  }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
  D: Deserializer<'de>,
  T: Deserialize<'de> + Default,
{
  Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn deserialize_entry_prefix<'de, D>(deserializer: D) -> Result<String, D::Error>
where
  D: Deserializer<'de>,
{
  let prefix = Option::<String>::deserialize(deserializer)?;
  Ok(prefix.unwrap_or_else(|| DEFAULT_ENTRY_PREFIX.to_string()))
}

fn deserialize_rewrites<'de, D>(deserializer: D) -> Result<RewriteRules, D::Error>
where
  D: Deserializer<'de>,
{
  let table = Option::<BTreeMap<String, Option<String>>>::deserialize(deserializer)?;
  Ok(table.map(RewriteRules::Map).unwrap_or_default())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::selection::{BucketName, Selector};
  use tempfile::tempdir;

  #[test]
  fn defaults_match_documented_values() {
    let options = OfflineOptions::default();

    assert_eq!(options.caches, CacheSelection::All);
    assert_eq!(options.scope, "/");
    assert_eq!(options.entry_prefix, DEFAULT_ENTRY_PREFIX);
    assert!(matches!(options.rewrites, RewriteRules::Function(_)));
    assert_eq!(options.enabled_tools().names(), vec!["serviceWorker", "appCache"]);
  }

  #[test]
  fn parses_json_configuration() {
    let options: OfflineOptions = serde_json::from_str(
      r#"{
        "scope": "/app",
        "caches": { "main": ["index.html"], "optional": [] },
        "rewrites": { "index.html": "/", "stats.json": null },
        "serviceWorker": { "output": "worker.js" },
        "appCache": false
      }"#,
    )
    .expect("configuration should parse");

    assert_eq!(options.scope, "/app");
    let CacheSelection::Buckets(selectors) = &options.caches else {
      panic!("expected bucket selectors");
    };
    assert_eq!(
      selectors.get(BucketName::Main),
      Some(&[Selector::asset("index.html")][..])
    );
    assert_eq!(selectors.get(BucketName::Additional), None);

    let RewriteRules::Map(table) = &options.rewrites else {
      panic!("expected rewrite map");
    };
    assert_eq!(table.get("index.html"), Some(&Some("/".to_string())));
    assert_eq!(table.get("stats.json"), Some(&None));

    let tools = options.enabled_tools();
    assert_eq!(
      tools.service_worker.map(|sw| sw.output),
      Some("worker.js".to_string())
    );
    assert!(tools.app_cache.is_none());
  }

  #[test]
  fn null_values_fall_back_to_defaults_or_disable_tools() {
    let options: OfflineOptions = serde_json::from_str(
      r#"{ "caches": null, "rewrites": null, "serviceWorker": null, "appCache": true }"#,
    )
    .expect("configuration should parse");

    assert_eq!(options.caches, CacheSelection::All);
    assert!(matches!(options.rewrites, RewriteRules::Function(_)));

    let tools = options.enabled_tools();
    assert!(tools.service_worker.is_none());
    assert_eq!(tools.app_cache, Some(AppCacheOptions::default()));
  }

  #[test]
  fn entry_prefix_defaults_when_missing_or_null() {
    let missing: OfflineOptions = serde_json::from_str("{}").expect("empty config should parse");
    let null: OfflineOptions =
      serde_json::from_str(r#"{ "entryPrefix": null }"#).expect("null prefix should parse");

    assert_eq!(missing.entry_prefix, DEFAULT_ENTRY_PREFIX);
    assert_eq!(null.entry_prefix, DEFAULT_ENTRY_PREFIX);
  }

  #[test]
  fn reads_custom_entry_prefix_from_file() {
    let temp = tempdir().expect("failed to create temp dir");
    let path = temp.path().join("offline.config.json");
    fs::write(&path, r#"{ "entryPrefix": "__sw_" }"#).expect("failed to write config");

    let options = OfflineOptions::from_path(&path).expect("config should load");

    assert_eq!(options.entry_prefix, "__sw_");
  }

  #[test]
  fn empty_entry_prefix_parses_but_is_kept_verbatim() {
    let options: OfflineOptions =
      serde_json::from_str(r#"{ "entryPrefix": "" }"#).expect("empty prefix should parse");

    assert_eq!(options.entry_prefix, "");
  }

  #[test]
  fn rejects_misspelled_bucket_names() {
    let err = serde_json::from_str::<OfflineOptions>(
      r#"{ "caches": { "mian": ["a.js"], "optional": [] } }"#,
    )
    .expect_err("unknown bucket should fail");

    assert!(err.is_data());
  }

  #[test]
  fn from_path_reads_yaml_files() {
    let temp = tempdir().expect("failed to create temp dir");
    let path = temp.path().join("offline.config.yaml");
    fs::write(
      &path,
      "scope: /docs/\ncaches:\n  main: [':rest:']\nappCache:\n  NETWORK: none\n",
    )
    .expect("failed to write config");

    let options = OfflineOptions::from_path(&path).expect("yaml config should load");

    assert_eq!(options.scope, "/docs/");
    let CacheSelection::Buckets(selectors) = &options.caches else {
      panic!("expected bucket selectors");
    };
    assert_eq!(selectors.get(BucketName::Main), Some(&[Selector::Rest][..]));
    assert_eq!(
      options.enabled_tools().app_cache.map(|appcache| appcache.network),
      Some("none".to_string())
    );
  }

  #[test]
  fn discover_returns_defaults_without_config_file() {
    let temp = tempdir().expect("failed to create temp dir");

    let options = OfflineOptions::discover(temp.path()).expect("missing config is not an error");

    assert_eq!(options.caches, CacheSelection::All);
  }

  #[test]
  fn discover_prefers_json_over_yaml() {
    let temp = tempdir().expect("failed to create temp dir");
    fs::write(temp.path().join("offline.config.json"), r#"{"scope": "/json/"}"#)
      .expect("failed to write json config");
    fs::write(temp.path().join("offline.config.yaml"), "scope: /yaml/\n")
      .expect("failed to write yaml config");

    let options = OfflineOptions::discover(temp.path()).expect("config should load");

    assert_eq!(options.scope, "/json/");
  }

  #[test]
  fn discover_reports_parse_errors() {
    let temp = tempdir().expect("failed to create temp dir");
    fs::write(temp.path().join("offline.config.json"), "{ not json")
      .expect("failed to write config");

    let err = OfflineOptions::discover(temp.path()).expect_err("invalid config should fail");

    assert!(matches!(err, ConfigError::Json { .. }));
  }
}
