//! Data structures handed to the manifest generators after classification.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::CacheTools;
use crate::selection::BucketName;

/// Public, scope-qualified asset paths per cache bucket.
///
/// Buckets skipped through an empty selector list are absent; buckets whose selectors matched
/// nothing are present and empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CacheManifest {
  buckets: BTreeMap<BucketName, Vec<String>>,
}

impl CacheManifest {
  /// Wrap already normalised buckets.
  pub fn new(buckets: BTreeMap<BucketName, Vec<String>>) -> Self {
    Self { buckets }
  }

  /// Paths of a single bucket, or `None` when the bucket was skipped.
  pub fn bucket(&self, name: BucketName) -> Option<&[String]> {
    self.buckets.get(&name).map(Vec::as_slice)
  }

  /// Whether the bucket appears in the manifest at all.
  pub fn contains_bucket(&self, name: BucketName) -> bool {
    self.buckets.contains_key(&name)
  }

  /// Buckets in processing order.
  pub fn iter(&self) -> impl Iterator<Item = (BucketName, &[String])> {
    self
      .buckets
      .iter()
      .map(|(name, paths)| (*name, paths.as_slice()))
  }
}

/// Settings consumed by the runtime loader that installs the offline caches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeConfig {
  /// Normalised scope every cached path lives under.
  pub scope: String,
  /// Whether an `additional` bucket needs to be fetched after `main`.
  pub has_additional_cache: bool,
  /// Enabled tools and their settings.
  #[serde(flatten)]
  pub tools: CacheTools,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn serialises_buckets_by_name_in_processing_order() {
    let mut buckets = BTreeMap::new();
    buckets.insert(BucketName::Optional, vec!["/c.js".to_string()]);
    buckets.insert(BucketName::Main, vec!["/".to_string(), "/a.js".to_string()]);
    let manifest = CacheManifest::new(buckets);

    let json = serde_json::to_string(&manifest).expect("manifest should serialise");

    assert_eq!(json, r#"{"main":["/","/a.js"],"optional":["/c.js"]}"#);
    assert!(!manifest.contains_bucket(BucketName::Additional));
    assert_eq!(
      manifest.iter().map(|(name, _)| name).collect::<Vec<_>>(),
      vec![BucketName::Main, BucketName::Optional]
    );
  }

  #[test]
  fn serialises_runtime_config_with_enabled_tools_only() {
    let config = RuntimeConfig {
      scope: "/app/".into(),
      has_additional_cache: true,
      tools: CacheTools {
        service_worker: Some(Default::default()),
        app_cache: None,
      },
    };

    let value = serde_json::to_value(&config).expect("runtime config should serialise");

    assert_eq!(value["scope"], "/app/");
    assert_eq!(value["hasAdditionalCache"], true);
    assert_eq!(value["serviceWorker"]["output"], "sw.js");
    assert!(value.get("appCache").is_none());
  }
}
