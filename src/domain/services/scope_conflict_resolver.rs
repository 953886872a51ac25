//! Scope Conflict Resolver Domain Service
//!
//! Keeps every bundle installed in at most one scope and drives the
//! uninstall-then-install migration between scopes.

use std::fmt::Display;
use std::sync::Arc;

use serde::Serialize;

use crate::domain::entities::InstalledBundle;
use crate::domain::ports::{BundleStore, StoreResult};
use crate::domain::value_objects::Scope;

/// A bundle requested at one scope is already installed at another
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeConflict {
    pub bundle_id: String,
    pub existing_scope: Scope,
    pub target_scope: Scope,
    pub existing_version: String,
    pub installed_bundle: InstalledBundle,
}

/// Phase in which a migration stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MigrationPhase {
    /// Nothing installed at the source scope; nothing changed
    Verify,
    /// Removal from the source scope failed; bundle still at source
    Uninstall,
    /// Install at the target scope failed; bundle now at neither scope
    Install,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationFailure {
    pub phase: MigrationPhase,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationResult {
    pub success: bool,
    pub bundle_id: String,
    pub from_scope: Scope,
    pub to_scope: Scope,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<MigrationFailure>,
}

impl MigrationResult {
    fn succeeded(bundle_id: &str, from: Scope, to: Scope) -> Self {
        Self {
            success: true,
            bundle_id: bundle_id.to_string(),
            from_scope: from,
            to_scope: to,
            error: None,
        }
    }

    fn failed(bundle_id: &str, from: Scope, to: Scope, phase: MigrationPhase, message: String) -> Self {
        Self {
            success: false,
            bundle_id: bundle_id.to_string(),
            from_scope: from,
            to_scope: to,
            error: Some(MigrationFailure { phase, message }),
        }
    }

    /// Phase that failed, if any
    pub fn failed_phase(&self) -> Option<MigrationPhase> {
        self.error.as_ref().map(|e| e.phase)
    }
}

pub struct ScopeConflictResolver {
    store: Arc<dyn BundleStore>,
}

impl ScopeConflictResolver {
    pub fn new(store: Arc<dyn BundleStore>) -> Self {
        Self { store }
    }

    /// First other scope (in fixed order) already holding `bundle_id`
    ///
    /// Installing where the bundle already lives is never a conflict.
    pub fn check_conflict(
        &self,
        bundle_id: &str,
        target_scope: Scope,
    ) -> StoreResult<Option<ScopeConflict>> {
        for scope in target_scope.others() {
            if let Some(installed) = self.store.installed(bundle_id, scope)? {
                return Ok(Some(ScopeConflict {
                    bundle_id: bundle_id.to_string(),
                    existing_scope: scope,
                    target_scope,
                    existing_version: installed.version.clone(),
                    installed_bundle: installed,
                }));
            }
        }
        Ok(None)
    }

    /// Every scope currently holding `bundle_id`
    pub fn get_conflicting_scopes(&self, bundle_id: &str) -> StoreResult<Vec<Scope>> {
        let mut scopes = Vec::new();
        for scope in Scope::ALL {
            if self.store.installed(bundle_id, scope)?.is_some() {
                scopes.push(scope);
            }
        }
        Ok(scopes)
    }

    /// Move a bundle from one scope to another
    ///
    /// Runs verify, uninstall, install in order and stops at the first
    /// failure. An install failure leaves the bundle at neither scope; no
    /// rollback is attempted and recovery belongs to the caller.
    pub fn migrate_bundle<U, I, EU, EI>(
        &self,
        bundle_id: &str,
        from_scope: Scope,
        to_scope: Scope,
        uninstall: U,
        install: I,
    ) -> MigrationResult
    where
        U: FnOnce() -> Result<(), EU>,
        I: FnOnce() -> Result<(), EI>,
        EU: Display,
        EI: Display,
    {
        let fail = |phase, message: String| {
            tracing::warn!(bundle_id, %from_scope, %to_scope, ?phase, %message, "migration failed");
            MigrationResult::failed(bundle_id, from_scope, to_scope, phase, message)
        };

        match self.store.installed(bundle_id, from_scope) {
            Ok(Some(_)) => {}
            Ok(None) => {
                return fail(
                    MigrationPhase::Verify,
                    format!("bundle '{}' is not installed at source scope {}", bundle_id, from_scope),
                )
            }
            Err(e) => return fail(MigrationPhase::Verify, e.to_string()),
        }

        if let Err(e) = uninstall() {
            return fail(
                MigrationPhase::Uninstall,
                format!("failed to uninstall from {} scope: {}", from_scope, e),
            );
        }

        if let Err(e) = install() {
            return fail(
                MigrationPhase::Install,
                format!(
                    "failed to install at {} scope: {} (bundle was already removed from {} scope)",
                    to_scope, e, from_scope
                ),
            );
        }

        tracing::debug!(bundle_id, %from_scope, %to_scope, "bundle migrated");
        MigrationResult::succeeded(bundle_id, from_scope, to_scope)
    }
}
