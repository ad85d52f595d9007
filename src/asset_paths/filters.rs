/// Prefix reserved for the modules the build injects into its own output.
pub const DEFAULT_ENTRY_PREFIX: &str = "__offline_";

/// Determine whether an asset belongs to the reserved entry namespace.
///
/// Injected entry modules bootstrap the offline runtime itself, so they never end up in a
/// cache manifest regardless of the configured rewrite rules. An empty prefix reserves
/// nothing.
pub fn is_entry_asset(asset: &str, entry_prefix: &str) -> bool {
    !entry_prefix.is_empty() && asset.starts_with(entry_prefix)
}
