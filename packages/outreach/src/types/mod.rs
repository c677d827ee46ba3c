//! Domain data types: leads, audits, client scoping.

pub mod audit;
pub mod lead;
pub mod profile;

use thiserror::Error;

/// A status string that doesn't match any closed-enum variant.
///
/// Rows carrying one are data errors: skipped with a warning, never fatal.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unrecognized status: {0:?}")]
pub struct ParseStatusError(pub String);

/// Opaque tenant identifier partitioning all durable state.
///
/// Every ledger operation is implicitly scoped to one client key; there are
/// no cross-client reads.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClientKey(String);

impl ClientKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Filesystem-safe form used in store file names.
    ///
    /// Anything outside `[A-Za-z0-9_-]` is replaced with `_` so a hostile
    /// key cannot escape the data directory.
    pub fn file_slug(&self) -> String {
        self.0
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect()
    }
}

impl std::fmt::Display for ClientKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ClientKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_slug_sanitizes_path_separators() {
        let key = ClientKey::new("../etc/passwd");
        assert_eq!(key.file_slug(), "___etc_passwd");
    }

    #[test]
    fn file_slug_keeps_plain_keys() {
        assert_eq!(ClientKey::new("acme-dental_01").file_slug(), "acme-dental_01");
    }
}
