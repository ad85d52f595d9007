use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use regex::Regex;

use super::filters::is_entry_asset;

/// Signature of a rewrite function: `None` (or an empty string) excludes the asset.
pub type RewriteFn = dyn Fn(&str) -> Option<String> + Send + Sync;

/// User supplied rules mapping raw asset paths onto the paths listed in cache manifests.
///
/// The form is picked once when the options are assembled so that resolving an asset never
/// has to inspect the configuration again.
#[derive(Clone)]
pub enum RewriteRules {
    /// Arbitrary rewrite function applied to every asset.
    Function(Arc<RewriteFn>),
    /// Literal lookup table. Unmapped assets pass through unchanged, a `None` or empty value
    /// excludes the asset.
    Map(BTreeMap<String, Option<String>>),
}

impl RewriteRules {
    /// Wrap a closure into the function form.
    pub fn function<F>(rewrite: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        Self::Function(Arc::new(rewrite))
    }

    /// Build the literal form from `(asset, public path)` pairs.
    pub fn map<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::Map(
            entries
                .into_iter()
                .map(|(asset, target)| (asset.into(), Some(target.into())))
                .collect(),
        )
    }

    /// Resolve an asset into its rewritten relative path.
    ///
    /// Assets in the reserved entry namespace are excluded before the rules run. `None`
    /// signals that the asset must not appear in any manifest.
    pub fn resolve(&self, asset: &str, entry_prefix: &str) -> Option<String> {
        if is_entry_asset(asset, entry_prefix) {
            return None;
        }

        let rewritten = match self {
            Self::Function(rewrite) => rewrite(asset),
            Self::Map(table) => match table.get(asset) {
                Some(target) => target.clone(),
                None => Some(asset.to_string()),
            },
        };

        rewritten.filter(|value| !value.is_empty())
    }
}

impl Default for RewriteRules {
    fn default() -> Self {
        Self::function(rewrite_index_html)
    }
}

impl fmt::Debug for RewriteRules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Function(_) => f.write_str("RewriteRules::Function(..)"),
            Self::Map(table) => f.debug_tuple("RewriteRules::Map").field(table).finish(),
        }
    }
}

impl<K, V> FromIterator<(K, V)> for RewriteRules
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::map(iter)
    }
}

fn index_html_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?s)^(.*?)index\.html?$").expect("invalid index regex"))
}

/// Default rewrite collapsing `index.html` documents onto their directory URL.
///
/// `docs/index.html` becomes `docs/` and a top-level `index.html` becomes `/`, which the
/// normalisation pass turns into the bare scope. Every other asset is kept as is.
pub fn rewrite_index_html(asset: &str) -> Option<String> {
    let rewritten = match index_html_pattern().captures(asset) {
        Some(caps) => match caps.get(1).map(|dir| dir.as_str()) {
            Some(dir) if !dir.is_empty() => dir.to_string(),
            _ => "/".to_string(),
        },
        None => asset.to_string(),
    };

    Some(rewritten)
}
