//! Commit Mode Value Object
//!
//! Whether a repository-scoped bundle's files are meant to be committed
//! to version control or kept local to the working copy.

use serde::{Deserialize, Serialize};

/// Commit mode of a lockfile bundle entry
///
/// - `Commit`: installed files are committed and shared (default)
/// - `LocalOnly`: installed files are excluded from version control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum CommitMode {
    #[default]
    Commit,
    LocalOnly,
}

impl CommitMode {
    /// Accepted wire values
    pub const VALUES: [&'static str; 2] = ["commit", "local-only"];

    pub fn as_str(&self) -> &'static str {
        match self {
            CommitMode::Commit => "commit",
            CommitMode::LocalOnly => "local-only",
        }
    }
}

impl std::fmt::Display for CommitMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CommitMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "commit" => Ok(CommitMode::Commit),
            "local-only" => Ok(CommitMode::LocalOnly),
            other => Err(format!(
                "invalid commit mode '{}': expected one of {:?}",
                other,
                Self::VALUES
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_commit() {
        assert_eq!(CommitMode::default(), CommitMode::Commit);
    }

    #[test]
    fn serde_uses_kebab_case() {
        let json = serde_json::to_string(&CommitMode::LocalOnly).unwrap();
        assert_eq!(json, r#""local-only""#);
        let parsed: CommitMode = serde_json::from_str(r#""commit""#).unwrap();
        assert_eq!(parsed, CommitMode::Commit);
    }

    #[test]
    fn from_str_rejects_unknown() {
        assert_eq!("local-only".parse::<CommitMode>(), Ok(CommitMode::LocalOnly));
        let err = "shared".parse::<CommitMode>().unwrap_err();
        assert!(err.contains("shared"));
    }
}
