//! Cache bucket configuration and the partitioning pass that assigns assets to buckets.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::warnings::{ClassifyWarning, WarningSink};

/// Marker selecting every asset not claimed by an earlier selector.
pub const REST_SELECTOR: &str = ":rest:";

/// Sentinel placing every asset in the `main` bucket.
pub const ALL_SENTINEL: &str = "all";

/// Named cache tier. The declaration order is the processing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BucketName {
  /// Assets cached when the offline runtime installs.
  Main,
  /// Assets cached after the main bucket succeeded.
  Additional,
  /// Assets cached only once they are requested.
  Optional,
}

impl BucketName {
  /// Every bucket in processing order.
  pub const ALL: [BucketName; 3] = [Self::Main, Self::Additional, Self::Optional];

  /// Name used in configuration files and manifests.
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Main => "main",
      Self::Additional => "additional",
      Self::Optional => "optional",
    }
  }
}

impl fmt::Display for BucketName {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Single entry of a bucket selector list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Selector {
  /// Every asset still in the pool when the selector is reached.
  Rest,
  /// One exact asset path.
  Asset(String),
}

impl Selector {
  /// Literal selector for the given asset path.
  pub fn asset(path: impl Into<String>) -> Self {
    Self::Asset(path.into())
  }
}

impl From<String> for Selector {
  fn from(value: String) -> Self {
    if value == REST_SELECTOR {
      Self::Rest
    } else {
      Self::Asset(value)
    }
  }
}

impl From<&str> for Selector {
  fn from(value: &str) -> Self {
    Self::from(value.to_string())
  }
}

impl From<Selector> for String {
  fn from(selector: Selector) -> Self {
    match selector {
      Selector::Rest => REST_SELECTOR.to_string(),
      Selector::Asset(path) => path,
    }
  }
}

/// Selector lists per bucket. A missing list behaves like `[":rest:"]`, an empty list drops
/// the bucket entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BucketSelectors {
  /// Selectors for the `main` bucket.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub main: Option<Vec<Selector>>,
  /// Selectors for the `additional` bucket.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub additional: Option<Vec<Selector>>,
  /// Selectors for the `optional` bucket.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub optional: Option<Vec<Selector>>,
}

impl BucketSelectors {
  /// Configured selectors for a bucket, if any were given.
  pub fn get(&self, bucket: BucketName) -> Option<&[Selector]> {
    match bucket {
      BucketName::Main => self.main.as_deref(),
      BucketName::Additional => self.additional.as_deref(),
      BucketName::Optional => self.optional.as_deref(),
    }
  }

  /// Replace the selectors of one bucket.
  pub fn set<I, S>(&mut self, bucket: BucketName, selectors: I) -> &mut Self
  where
    I: IntoIterator<Item = S>,
    S: Into<Selector>,
  {
    let list = Some(selectors.into_iter().map(Into::into).collect());
    match bucket {
      BucketName::Main => self.main = list,
      BucketName::Additional => self.additional = list,
      BucketName::Optional => self.optional = list,
    }
    self
  }
}

/// How emitted assets are distributed over the cache buckets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawCacheSelection", into = "RawCacheSelection")]
pub enum CacheSelection {
  /// Every asset goes to `main`.
  #[default]
  All,
  /// Explicit selector lists per bucket.
  Buckets(BucketSelectors),
}

impl CacheSelection {
  /// Whether the `additional` bucket has at least one selector configured.
  pub fn has_additional(&self) -> bool {
    match self {
      Self::All => false,
      Self::Buckets(selectors) => selectors
        .get(BucketName::Additional)
        .is_some_and(|list| !list.is_empty()),
    }
  }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawCacheSelection {
  Sentinel(String),
  Buckets(BucketSelectors),
}

impl TryFrom<RawCacheSelection> for CacheSelection {
  type Error = String;

  fn try_from(raw: RawCacheSelection) -> Result<Self, Self::Error> {
    match raw {
      RawCacheSelection::Sentinel(value) if value == ALL_SENTINEL => Ok(Self::All),
      RawCacheSelection::Sentinel(value) => Err(format!(
        "unknown caches value `{value}`, expected \"{ALL_SENTINEL}\" or a map of bucket lists"
      )),
      RawCacheSelection::Buckets(selectors) => Ok(Self::Buckets(selectors)),
    }
  }
}

impl From<CacheSelection> for RawCacheSelection {
  fn from(selection: CacheSelection) -> Self {
    match selection {
      CacheSelection::All => Self::Sentinel(ALL_SENTINEL.to_string()),
      CacheSelection::Buckets(selectors) => Self::Buckets(selectors),
    }
  }
}

/// Raw asset paths per bucket, before rewriting.
pub type RawBuckets = BTreeMap<BucketName, Vec<String>>;

/// Assets not yet claimed by any bucket. Owned by a single partitioning pass.
///
/// Slots keep the input order; `positions` indexes the live slots of each path so literal
/// lookups do not scan the pool.
#[derive(Debug)]
struct AssetPool {
  slots: Vec<Option<String>>,
  positions: HashMap<String, VecDeque<usize>>,
  live: usize,
}

impl AssetPool {
  fn new(assets: &[String]) -> Self {
    let mut positions: HashMap<String, VecDeque<usize>> = HashMap::with_capacity(assets.len());
    for (index, asset) in assets.iter().enumerate() {
      positions.entry(asset.clone()).or_default().push_back(index);
    }

    Self {
      slots: assets.iter().cloned().map(Some).collect(),
      positions,
      live: assets.len(),
    }
  }

  /// Remove the first remaining occurrence of `asset`.
  fn take(&mut self, asset: &str) -> Option<String> {
    let queue = self.positions.get_mut(asset)?;
    let index = queue.pop_front()?;
    if queue.is_empty() {
      self.positions.remove(asset);
    }

    self.live -= 1;
    self.slots[index].take()
  }

  /// Remove every remaining asset, in input order.
  fn drain(&mut self) -> Vec<String> {
    if self.live == 0 {
      return Vec::new();
    }

    self.live = 0;
    self.positions.clear();
    self.slots.iter_mut().filter_map(Option::take).collect()
  }
}

/// Assign every asset to at most one bucket, honouring selector order.
///
/// Buckets are visited in [`BucketName::ALL`] order. An asset claimed by an earlier bucket
/// is never visible to a later one, including through `:rest:`. Literal selectors that no
/// longer match the pool are reported to `warnings` and skipped.
pub fn partition_assets<W>(
  assets: &[String],
  selection: &CacheSelection,
  warnings: &mut W,
) -> RawBuckets
where
  W: WarningSink + ?Sized,
{
  let selectors = match selection {
    CacheSelection::All => {
      let mut result = RawBuckets::new();
      result.insert(BucketName::Main, assets.to_vec());
      return result;
    }
    CacheSelection::Buckets(selectors) => selectors,
  };

  let rest = [Selector::Rest];
  let mut pool = AssetPool::new(assets);
  let mut result = RawBuckets::new();

  for bucket in BucketName::ALL {
    let list = selectors.get(bucket).unwrap_or(&rest);
    if list.is_empty() {
      tracing::debug!(bucket = %bucket, "skipping bucket with empty selector list");
      continue;
    }

    let mut bucket_assets = Vec::new();
    let mut rest_taken = false;
    for selector in list {
      match selector {
        Selector::Rest => {
          if rest_taken {
            tracing::debug!(bucket = %bucket, "repeated {REST_SELECTOR} selector has no effect");
          }
          rest_taken = true;
          bucket_assets.extend(pool.drain());
        }
        Selector::Asset(asset) => match pool.take(asset) {
          Some(found) => bucket_assets.push(found),
          None => warnings.report(ClassifyWarning::MissingAsset {
            bucket,
            asset: asset.clone(),
          }),
        },
      }
    }

    tracing::debug!(bucket = %bucket, assets = bucket_assets.len(), "bucket assigned");
    result.insert(bucket, bucket_assets);
  }

  result
}
