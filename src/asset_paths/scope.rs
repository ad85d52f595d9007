use std::fmt;

use serde::Serialize;

/// URL prefix under which every cached asset is addressed.
///
/// The stored value always ends with a forward slash so qualified paths never need an
/// extra separator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Scope(String);

impl Scope {
    /// Normalise a configured scope, appending the trailing slash when missing.
    pub fn new(raw: impl Into<String>) -> Self {
        let mut value = raw.into().replace('\\', "/");
        if !value.ends_with('/') {
            value.push('/');
        }
        Self(value)
    }

    /// Borrow the normalised prefix.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Qualify a rewritten asset path. A rewritten value of `/` addresses the scope itself.
    pub fn qualify(&self, rewritten: &str) -> String {
        if rewritten == "/" {
            self.0.clone()
        } else {
            format!("{}{}", self.0, rewritten)
        }
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::new("/")
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
