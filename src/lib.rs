#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod asset_paths;
pub mod builder;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod selection;
pub mod warnings;

pub use asset_paths::{RewriteRules, Scope};
pub use builder::OfflineBuilder;
pub use config::{OfflineOptions, ToolSetting};
pub use error::ConfigError;
pub use models::{CacheManifest, RuntimeConfig};
pub use selection::{BucketName, BucketSelectors, CacheSelection, Selector, partition_assets};
pub use warnings::{ClassifyWarning, TracingWarnings, WarningSink};
