//! Helpers for turning raw build output paths into public offline cache URLs.
//!
//! The responsibilities are split so that entry filtering, rewrite resolution and scope
//! qualification can be tested independently. [`crate::OfflineBuilder`] composes them
//! into the normalisation pass applied to every cache bucket.

mod filters;
mod rewrite;
mod scope;

pub use filters::{DEFAULT_ENTRY_PREFIX, is_entry_asset};
pub use rewrite::{RewriteFn, RewriteRules, rewrite_index_html};
pub use scope::Scope;
