//! Offline cache engine combining bucket classification with path rewriting.

use crate::asset_paths::{RewriteRules, Scope};
use crate::config::{CacheTools, OfflineOptions};
use crate::error::ConfigError;
use crate::models::{CacheManifest, RuntimeConfig};
use crate::selection::{CacheSelection, partition_assets};
use crate::warnings::{TracingWarnings, WarningSink};

/// Classifies build output into cache buckets and rewrites it into public paths.
///
/// Construction validates the options once. The builder is immutable afterwards and can
/// be shared between threads; every classification works on its own asset pool.
#[derive(Debug, Clone)]
pub struct OfflineBuilder {
  selection: CacheSelection,
  rewrites: RewriteRules,
  scope: Scope,
  entry_prefix: String,
  tools: CacheTools,
}

impl OfflineBuilder {
  /// Validate the options and prepare the engine.
  pub fn new(options: OfflineOptions) -> Result<Self, ConfigError> {
    let tools = options.enabled_tools();
    if tools.is_empty() {
      return Err(ConfigError::NoCacheTools);
    }
    if options.entry_prefix.is_empty() {
      return Err(ConfigError::EmptyEntryPrefix);
    }

    let OfflineOptions {
      caches,
      scope,
      rewrites,
      entry_prefix,
      ..
    } = options;

    let builder = Self {
      selection: caches,
      rewrites,
      scope: Scope::new(scope),
      entry_prefix,
      tools,
    };

    tracing::debug!(
      scope = %builder.scope,
      tools = ?builder.tools.names(),
      "offline cache builder ready"
    );

    Ok(builder)
  }

  /// Normalised scope all paths are qualified with.
  pub fn scope(&self) -> &Scope {
    &self.scope
  }

  /// Enabled cache tools.
  pub fn tools(&self) -> &CacheTools {
    &self.tools
  }

  /// Rewritten relative path of an asset, or `None` when it must not be cached.
  pub fn resolve(&self, asset: &str) -> Option<String> {
    self.rewrites.resolve(asset, &self.entry_prefix)
  }

  /// Rewrite, filter and scope-qualify assets, preserving their order.
  pub fn normalize<S: AsRef<str>>(&self, assets: &[S]) -> Vec<String> {
    assets
      .iter()
      .filter_map(|asset| self.resolve(asset.as_ref()))
      .map(|rewritten| self.scope.qualify(&rewritten))
      .collect()
  }

  /// Distribute `assets` over the cache buckets and normalise each bucket.
  ///
  /// Missing literal selectors are reported to `warnings`; classification never fails.
  pub fn classify<W>(&self, assets: &[String], warnings: &mut W) -> CacheManifest
  where
    W: WarningSink + ?Sized,
  {
    let buckets = partition_assets(assets, &self.selection, warnings)
      .into_iter()
      .map(|(bucket, raw)| (bucket, self.normalize(raw.as_slice())))
      .collect();

    CacheManifest::new(buckets)
  }

  /// [`Self::classify`] with warnings forwarded to `tracing`.
  pub fn classify_logged(&self, assets: &[String]) -> CacheManifest {
    self.classify(assets, &mut TracingWarnings)
  }

  /// Settings for the runtime loader of the enabled tools.
  pub fn runtime_config(&self) -> RuntimeConfig {
    RuntimeConfig {
      scope: self.scope.to_string(),
      has_additional_cache: self.selection.has_additional(),
      tools: self.tools.clone(),
    }
  }
}
