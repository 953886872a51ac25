//! Source Type Value Object
//!
//! The kind of registry source a bundle was published through. Release-based
//! sources (GitHub, GitLab) publish one listing per version, so their listings
//! are consolidated by identity.

use serde::{Deserialize, Serialize};

/// Type of bundle source
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceType {
    Github,
    Gitlab,
    Http,
    AwesomeCopilot,
    Local,
    /// Any source type not known to this crate, kept verbatim
    #[serde(untagged)]
    Other(String),
}

impl SourceType {
    pub fn as_str(&self) -> &str {
        match self {
            SourceType::Github => "github",
            SourceType::Gitlab => "gitlab",
            SourceType::Http => "http",
            SourceType::AwesomeCopilot => "awesome-copilot",
            SourceType::Local => "local",
            SourceType::Other(s) => s,
        }
    }

    /// Parse a wire value; unknown values become `Other`
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "github" => SourceType::Github,
            "gitlab" => SourceType::Gitlab,
            "http" | "https" => SourceType::Http,
            "awesome-copilot" | "awesome" => SourceType::AwesomeCopilot,
            "local" => SourceType::Local,
            _ => SourceType::Other(s.to_string()),
        }
    }

    /// Guess the source type from a source id by substring match
    ///
    /// Only used when no explicit mapping is available.
    pub fn infer_from_source_id(source_id: &str) -> Option<Self> {
        let id = source_id.to_lowercase();
        if id.contains("github") {
            Some(SourceType::Github)
        } else if id.contains("gitlab") {
            Some(SourceType::Gitlab)
        } else if id.contains("awesome") {
            Some(SourceType::AwesomeCopilot)
        } else if id.contains("http") {
            Some(SourceType::Http)
        } else if id.contains("local") {
            Some(SourceType::Local)
        } else {
            None
        }
    }

    /// Whether listings from this source carry one version per listing id
    pub fn is_release_based(&self) -> bool {
        matches!(self, SourceType::Github | SourceType::Gitlab)
    }
}

impl std::fmt::Display for SourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
