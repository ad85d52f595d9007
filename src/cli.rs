//! Command line front-end printing classification results as JSON.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use crate::builder::OfflineBuilder;
use crate::config::OfflineOptions;

/// Sort build output into offline cache buckets.
#[derive(Debug, Parser)]
#[command(name = "offline-buckets", version, about, long_about = None)]
pub struct Cli {
  /// Increase log verbosity (repeatable). `RUST_LOG` overrides it.
  #[arg(short, long, action = clap::ArgAction::Count, global = true)]
  pub verbose: u8,

  #[command(subcommand)]
  command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
  /// Classify an asset list and print the bucket manifest.
  Classify {
    #[command(flatten)]
    shared: SharedArgs,
    /// File listing one asset per line, or a JSON array when it ends in `.json`.
    /// Read from stdin when omitted.
    #[arg(long)]
    assets: Option<PathBuf>,
  },
  /// Print the runtime loader settings derived from the configuration.
  Runtime {
    #[command(flatten)]
    shared: SharedArgs,
  },
}

#[derive(Debug, Args)]
struct SharedArgs {
  /// Configuration file. Discovered in the current directory when omitted.
  #[arg(short, long)]
  config: Option<PathBuf>,
  /// Pretty-print the JSON output.
  #[arg(long)]
  pretty: bool,
}

impl Cli {
  /// Parse the process arguments.
  pub fn from_args() -> Self {
    Self::parse()
  }

  /// Execute the selected subcommand, writing JSON to stdout.
  pub fn run(self) -> Result<()> {
    let output = match self.command {
      Command::Classify { shared, assets } => {
        let builder = load_builder(shared.config.as_deref())?;
        let assets = read_asset_list(assets.as_deref())?;
        tracing::info!(assets = assets.len(), "classifying assets");
        render(&builder.classify_logged(&assets), shared.pretty)?
      }
      Command::Runtime { shared } => {
        let builder = load_builder(shared.config.as_deref())?;
        render(&builder.runtime_config(), shared.pretty)?
      }
    };

    println!("{output}");
    Ok(())
  }
}

fn load_builder(config: Option<&Path>) -> Result<OfflineBuilder> {
  let options = match config {
    Some(path) => OfflineOptions::from_path(path)?,
    None => {
      let cwd = std::env::current_dir().context("failed to resolve current directory")?;
      OfflineOptions::discover(&cwd)?
    }
  };

  OfflineBuilder::new(options).context("invalid offline configuration")
}

fn read_asset_list(path: Option<&Path>) -> Result<Vec<String>> {
  let (content, is_json) = match path {
    Some(path) => {
      let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
      let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
      (content, is_json)
    }
    None => {
      let mut content = String::new();
      io::stdin()
        .read_to_string(&mut content)
        .context("failed to read asset list from stdin")?;
      let is_json = content.trim_start().starts_with('[');
      (content, is_json)
    }
  };

  parse_asset_list(&content, is_json)
}

/// Parse an asset list, either a JSON string array or one path per line.
///
/// Blank lines are skipped; duplicate entries keep their first occurrence so the host
/// contract of a duplicate-free list holds.
pub fn parse_asset_list(content: &str, is_json: bool) -> Result<Vec<String>> {
  let raw: Vec<String> = if is_json {
    serde_json::from_str(content).context("failed to parse asset list JSON")?
  } else {
    content
      .lines()
      .map(str::trim)
      .filter(|line| !line.is_empty())
      .map(str::to_string)
      .collect()
  };

  let mut seen = std::collections::BTreeSet::new();
  Ok(raw
    .into_iter()
    .filter(|asset| seen.insert(asset.clone()))
    .collect())
}

fn render<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
  let rendered = if pretty {
    serde_json::to_string_pretty(value)
  } else {
    serde_json::to_string(value)
  };
  rendered.context("failed to serialise output")
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::tempdir;

  #[test]
  fn parses_line_separated_asset_lists() {
    let assets = parse_asset_list("index.html\n\n  main.js \nmain.js\n", false)
      .expect("line list should parse");

    assert_eq!(assets, vec!["index.html".to_string(), "main.js".to_string()]);
  }

  #[test]
  fn parses_json_asset_lists() {
    let assets = parse_asset_list(r#"["a.js", "b.css"]"#, true).expect("json list should parse");

    assert_eq!(assets, vec!["a.js".to_string(), "b.css".to_string()]);
  }

  #[test]
  fn rejects_malformed_json_lists() {
    assert!(parse_asset_list("[1, 2", true).is_err());
  }

  #[test]
  fn reads_json_lists_by_extension() {
    let temp = tempdir().expect("failed to create temp dir");
    let path = temp.path().join("assets.json");
    fs::write(&path, r#"["index.html"]"#).expect("failed to write asset list");

    let assets = read_asset_list(Some(&path)).expect("asset list should load");

    assert_eq!(assets, vec!["index.html".to_string()]);
  }

  #[test]
  fn loads_builder_from_explicit_config() {
    let temp = tempdir().expect("failed to create temp dir");
    let path = temp.path().join("custom.json");
    fs::write(&path, r#"{"scope": "/pwa", "appCache": false}"#).expect("failed to write config");

    let builder = load_builder(Some(&path)).expect("builder should load");

    assert_eq!(builder.scope().as_str(), "/pwa/");
    assert!(builder.tools().app_cache.is_none());
  }

  #[test]
  fn reports_configs_without_tools() {
    let temp = tempdir().expect("failed to create temp dir");
    let path = temp.path().join("offline.config.json");
    fs::write(&path, r#"{"serviceWorker": false, "appCache": null}"#)
      .expect("failed to write config");

    let err = load_builder(Some(&path)).expect_err("config without tools should fail");

    assert!(format!("{err:#}").contains("at least one cache tool"));
  }

  #[test]
  fn parses_classify_arguments() {
    let cli = Cli::try_parse_from([
      "offline-buckets",
      "-vv",
      "classify",
      "--config",
      "offline.config.json",
      "--assets",
      "assets.txt",
      "--pretty",
    ])
    .expect("arguments should parse");

    assert_eq!(cli.verbose, 2);
    let Command::Classify { shared, assets } = cli.command else {
      panic!("expected classify command");
    };
    assert_eq!(shared.config, Some(PathBuf::from("offline.config.json")));
    assert_eq!(assets, Some(PathBuf::from("assets.txt")));
    assert!(shared.pretty);
  }
}
