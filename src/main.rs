use offline_cache_buckets::cli::Cli;
use offline_cache_buckets::logging;

fn main() {
  let cli = Cli::from_args();

  if let Err(err) = logging::init_logging(cli.verbose) {
    eprintln!("offline-buckets warning: {err:#}");
  }

  if let Err(err) = cli.run() {
    eprintln!("offline-buckets error: {err:#}");
    std::process::exit(1);
  }
}
