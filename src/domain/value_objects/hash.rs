//! Content Hash Value Object
//!
//! A hex SHA-256 digest of a file's content. Used for drift detection
//! between the lockfile and the files on disk.

use std::fmt;

use sha2::{Digest, Sha256};

/// Content hash value object
///
/// Stores the bare lowercase hex digest, which is what the lockfile records.
/// A legacy `sha256:` prefix is accepted on input and stripped.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentHash(String);

impl ContentHash {
    /// Optional prefix accepted on input
    pub const PREFIX: &'static str = "sha256:";

    /// Create a ContentHash from a hex string (with or without prefix)
    pub fn new(raw_hash: &str) -> Self {
        let hex = raw_hash.strip_prefix(Self::PREFIX).unwrap_or(raw_hash);
        Self(hex.to_ascii_lowercase())
    }

    /// Compute SHA-256 of raw bytes
    pub fn from_bytes(content: &[u8]) -> Self {
        let digest = Sha256::digest(content);
        Self(format!("{:x}", digest))
    }

    /// Get the hex digest
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check if this hash matches a raw string (with or without prefix, any case)
    pub fn matches_str(&self, s: &str) -> bool {
        let other = s.strip_prefix(Self::PREFIX).unwrap_or(s);
        self.0.eq_ignore_ascii_case(other)
    }

    /// True if the string looks like a full SHA-256 hex digest
    pub fn is_valid_hex(s: &str) -> bool {
        let hex = s.strip_prefix(Self::PREFIX).unwrap_or(s);
        hex.len() == 64 && hex.chars().all(|c| c.is_ascii_hexdigit())
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ContentHash {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl AsRef<str> for ContentHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
