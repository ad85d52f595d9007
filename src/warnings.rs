//! Non-fatal diagnostics raised while classifying assets.

use std::fmt;

use crate::selection::BucketName;

/// Warning produced during classification. Classification always continues afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifyWarning {
  /// A literal selector named an asset that is not (or no longer) in the remaining pool.
  MissingAsset {
    /// Bucket whose selector list requested the asset.
    bucket: BucketName,
    /// The requested asset path.
    asset: String,
  },
}

impl fmt::Display for ClassifyWarning {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::MissingAsset { bucket, asset } => write!(
        f,
        "cache asset [{asset}] requested by `{bucket}` is not found in output assets"
      ),
    }
  }
}

/// Receiver for classification warnings.
pub trait WarningSink {
  /// Record a single warning.
  fn report(&mut self, warning: ClassifyWarning);
}

/// Collects warnings so callers can inspect them after classification.
impl WarningSink for Vec<ClassifyWarning> {
  fn report(&mut self, warning: ClassifyWarning) {
    self.push(warning);
  }
}

/// Forwards warnings to the `tracing` subscriber at `WARN` level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingWarnings;

impl WarningSink for TracingWarnings {
  fn report(&mut self, warning: ClassifyWarning) {
    match &warning {
      ClassifyWarning::MissingAsset { bucket, asset } => {
        tracing::warn!(bucket = %bucket, asset = %asset, "{warning}");
      }
    }
  }
}
