//! Built-in structural validator for the lockfile JSON format
//!
//! Checks the document shape that the lockfile schema describes without
//! pulling in a general JSON-schema engine. Hard violations are errors;
//! suspicious-but-readable values (non-semver versions, short checksums,
//! dangling references) are warnings.
//!
//! Hosts that need full schema validation implement `SchemaValidator` over
//! their own engine and hand it to `JsonLockfileRepository::with_parts` or
//! `LockfileRepositoryRegistry::with_parts`.

use chrono::DateTime;
use serde_json::{Map, Value};

use crate::domain::entities::FileEntry;
use crate::domain::ports::{SchemaValidator, ValidationReport};
use crate::domain::services::parse_version;
use crate::domain::value_objects::{CommitMode, ContentHash};

/// Lockfile format versions this validator understands
pub const SUPPORTED_SCHEMA_VERSIONS: &[&str] = &["1.0.0"];

#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinSchemaValidator;

impl BuiltinSchemaValidator {
    pub fn new() -> Self {
        Self
    }
}

impl SchemaValidator for BuiltinSchemaValidator {
    fn validate(&self, document: &Value, schema_ref: &str) -> ValidationReport {
        tracing::debug!(schema = schema_ref, "validating lockfile structure");
        let mut findings = Findings::default();

        let Some(root) = document.as_object() else {
            findings.error("lockfile must be a JSON object");
            return findings.into_report();
        };

        findings.require_str(root, "$schema", "");
        findings.require_timestamp(root, "generatedAt", "");
        findings.require_str(root, "generatedBy", "");
        if let Some(version) = findings.require_str(root, "version", "") {
            if !SUPPORTED_SCHEMA_VERSIONS.contains(&version) {
                findings.error(format!(
                    "unsupported lockfile version '{}' (supported: {})",
                    version,
                    SUPPORTED_SCHEMA_VERSIONS.join(", ")
                ));
            }
        }

        let sources = findings.require_object(root, "sources", "");
        if let Some(sources) = sources {
            for (id, source) in sources {
                check_source(&mut findings, id, source);
            }
        }

        let bundles = findings.require_object(root, "bundles", "");
        if let Some(bundles) = bundles {
            for (id, bundle) in bundles {
                check_bundle(&mut findings, id, bundle, sources);
            }
        }

        if let Some(hubs) = findings.optional_object(root, "hubs", "") {
            for (id, hub) in hubs {
                let at = format!("hubs.{}", id);
                if let Some(hub) = findings.expect_object(hub, &at) {
                    findings.require_str(hub, "name", &at);
                    findings.require_str(hub, "url", &at);
                }
            }
        }

        if let Some(profiles) = findings.optional_object(root, "profiles", "") {
            for (id, profile) in profiles {
                check_profile(&mut findings, id, profile, bundles);
            }
        }

        findings.into_report()
    }
}

fn check_source(findings: &mut Findings, id: &str, source: &Value) {
    let at = format!("sources.{}", id);
    let Some(source) = findings.expect_object(source, &at) else {
        return;
    };
    findings.require_str(source, "type", &at);
    findings.require_str(source, "url", &at);
    if let Some(branch) = source.get("branch") {
        if !branch.is_string() {
            findings.error(format!("{}.branch must be a string", at));
        }
    }
}

fn check_bundle(
    findings: &mut Findings,
    id: &str,
    bundle: &Value,
    sources: Option<&Map<String, Value>>,
) {
    let at = format!("bundles.{}", id);
    let Some(bundle) = findings.expect_object(bundle, &at) else {
        return;
    };

    if let Some(version) = findings.require_str(bundle, "version", &at) {
        if parse_version(version).is_none() {
            findings.warn(format!("{}.version '{}' is not a semantic version", at, version));
        }
    }
    if let Some(source_id) = findings.require_str(bundle, "sourceId", &at) {
        if sources.is_some_and(|s| !s.contains_key(source_id)) {
            findings.warn(format!("{} references unknown source '{}'", at, source_id));
        }
    }
    findings.require_str(bundle, "sourceType", &at);
    findings.require_timestamp(bundle, "installedAt", &at);

    if let Some(mode) = findings.require_str(bundle, "commitMode", &at) {
        if mode.parse::<CommitMode>().is_err() {
            findings.error(format!(
                "{}.commitMode must be one of {}, got '{}'",
                at,
                CommitMode::VALUES.join(", "),
                mode
            ));
        }
    }

    match bundle.get("checksum") {
        None => {}
        Some(Value::String(sum)) => findings.check_checksum(sum, &format!("{}.checksum", at)),
        Some(_) => findings.error(format!("{}.checksum must be a string", at)),
    }

    let Some(files) = bundle.get("files") else {
        findings.error(format!("{}.files is required", at));
        return;
    };
    let Some(files) = files.as_array() else {
        findings.error(format!("{}.files must be an array", at));
        return;
    };
    for (index, file) in files.iter().enumerate() {
        let file_at = format!("{}.files[{}]", at, index);
        let Some(file) = findings.expect_object(file, &file_at) else {
            continue;
        };
        if let Some(path) = findings.require_str(file, "path", &file_at) {
            if !FileEntry::new(path, "").is_contained() {
                findings.error(format!(
                    "{}.path must stay inside the repository root, got '{}'",
                    file_at, path
                ));
            }
        }
        if let Some(sum) = findings.require_str(file, "checksum", &file_at) {
            findings.check_checksum(sum, &format!("{}.checksum", file_at));
        }
    }
}

fn check_profile(
    findings: &mut Findings,
    id: &str,
    profile: &Value,
    bundles: Option<&Map<String, Value>>,
) {
    let at = format!("profiles.{}", id);
    let Some(profile) = findings.expect_object(profile, &at) else {
        return;
    };
    findings.require_str(profile, "name", &at);
    match profile.get("bundleIds") {
        Some(Value::Array(ids)) => {
            for bundle_id in ids {
                match bundle_id.as_str() {
                    Some(bundle_id) if bundles.is_some_and(|b| !b.contains_key(bundle_id)) => {
                        findings.warn(format!("{} lists unknown bundle '{}'", at, bundle_id))
                    }
                    Some(_) => {}
                    None => findings.error(format!("{}.bundleIds must contain strings", at)),
                }
            }
        }
        Some(_) => findings.error(format!("{}.bundleIds must be an array", at)),
        None => findings.error(format!("{}.bundleIds is required", at)),
    }
}

#[derive(Default)]
struct Findings {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl Findings {
    fn error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    fn into_report(self) -> ValidationReport {
        ValidationReport::from_findings(self.errors, self.warnings)
    }

    fn field_name(at: &str, key: &str) -> String {
        if at.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", at, key)
        }
    }

    fn require_str<'v>(&mut self, object: &'v Map<String, Value>, key: &str, at: &str) -> Option<&'v str> {
        match object.get(key) {
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s.as_str()),
            Some(Value::String(_)) => {
                self.error(format!("{} must not be empty", Self::field_name(at, key)));
                None
            }
            Some(_) => {
                self.error(format!("{} must be a string", Self::field_name(at, key)));
                None
            }
            None => {
                self.error(format!("{} is required", Self::field_name(at, key)));
                None
            }
        }
    }

    fn require_timestamp(&mut self, object: &Map<String, Value>, key: &str, at: &str) {
        if let Some(value) = self.require_str(object, key, at) {
            if DateTime::parse_from_rfc3339(value).is_err() {
                self.error(format!(
                    "{} must be an ISO-8601 timestamp, got '{}'",
                    Self::field_name(at, key),
                    value
                ));
            }
        }
    }

    fn require_object<'v>(
        &mut self,
        object: &'v Map<String, Value>,
        key: &str,
        at: &str,
    ) -> Option<&'v Map<String, Value>> {
        if object.contains_key(key) {
            self.optional_object(object, key, at)
        } else {
            self.error(format!("{} is required", Self::field_name(at, key)));
            None
        }
    }

    fn optional_object<'v>(
        &mut self,
        object: &'v Map<String, Value>,
        key: &str,
        at: &str,
    ) -> Option<&'v Map<String, Value>> {
        let value = object.get(key)?;
        self.expect_object(value, &Self::field_name(at, key))
    }

    fn expect_object<'v>(&mut self, value: &'v Value, at: &str) -> Option<&'v Map<String, Value>> {
        let object = value.as_object();
        if object.is_none() {
            self.error(format!("{} must be an object", at));
        }
        object
    }

    fn check_checksum(&mut self, sum: &str, at: &str) {
        if !ContentHash::is_valid_hex(sum) {
            self.warn(format!("{} is not a SHA-256 hex digest", at));
        }
    }
}
