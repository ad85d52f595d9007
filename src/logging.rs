//! Logging init for the command line tool: human readable events on stderr.

use anyhow::{Result, anyhow};
use tracing_subscriber::EnvFilter;

/// Default filter per `-v` count when `RUST_LOG` is not set.
fn default_directive(verbosity: u8) -> &'static str {
  match verbosity {
    0 => "warn",
    1 => "info,offline_cache_buckets=debug",
    _ => "debug,offline_cache_buckets=trace",
  }
}

/// Initialise structured logging to stderr so stdout stays reserved for JSON output.
///
/// `RUST_LOG` takes precedence over the verbosity flag.
pub fn init_logging(verbosity: u8) -> Result<()> {
  let env_filter = EnvFilter::try_from_default_env()
    .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

  tracing_subscriber::fmt()
    .with_env_filter(env_filter)
    .with_writer(std::io::stderr)
    .with_target(false)
    .try_init()
    .map_err(|err| anyhow!("failed to initialise logging: {err}"))?;

  tracing::debug!(verbosity, "logging initialised");
  Ok(())
}
