//! Property tests for the one-scope-per-bundle invariant.

use std::sync::Arc;

use proptest::prelude::*;
use tempfile::TempDir;

use bundlelock::presentation::{create_lifecycle_coordinator, create_repository_registry};
use bundlelock::{
    Bundle, Config, InstallRequest, MemoryBundleStore, MigrateRequest, Scope,
};

use crate::common::{ScriptedInstaller, SOURCE_URL};

#[derive(Debug, Clone)]
enum Op {
    Install { scope: Scope, migrate: bool, fail: bool },
    Migrate { from: Scope, to: Scope, fail: bool },
    Uninstall { scope: Scope },
}

fn scope() -> impl Strategy<Value = Scope> {
    prop_oneof![Just(Scope::User), Just(Scope::Workspace), Just(Scope::Repository)]
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (scope(), any::<bool>(), any::<bool>())
            .prop_map(|(scope, migrate, fail)| Op::Install { scope, migrate, fail }),
        (scope(), scope(), any::<bool>()).prop_map(|(from, to, fail)| Op::Migrate { from, to, fail }),
        scope().prop_map(|scope| Op::Uninstall { scope }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 48,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Whatever the sequence of installs, migrations (failed or
    /// not) and uninstalls, a bundle is never installed at two scopes.
    #[test]
    fn property_bundle_lives_in_at_most_one_scope(ops in proptest::collection::vec(op(), 1..12)) {
        let repo = TempDir::new().unwrap();
        let home = TempDir::new().unwrap();
        let installer = Arc::new(ScriptedInstaller::new(repo.path(), home.path()));
        let registry = create_repository_registry(&Config::default());
        let coordinator = create_lifecycle_coordinator(
            &registry,
            repo.path(),
            &Config::default(),
            installer.clone(),
            Arc::new(MemoryBundleStore::new()),
        )
        .unwrap();
        let listing = Bundle::new("prompts-v1.0.0", "1.0.0", "acme-github");

        for op in ops {
            match op {
                Op::Install { scope, migrate, fail } => {
                    installer.set_failing(fail);
                    let request = InstallRequest::new(listing.clone(), scope, SOURCE_URL)
                        .allow_migration(migrate);
                    let _ = coordinator.install(&request);
                }
                Op::Migrate { from, to, fail } => {
                    installer.set_failing(fail);
                    let _ = coordinator.migrate(&MigrateRequest {
                        bundle_id: "prompts".to_string(),
                        from_scope: from,
                        to_scope: to,
                        source_url: SOURCE_URL.to_string(),
                        branch: None,
                    });
                }
                Op::Uninstall { scope } => {
                    installer.set_failing(false);
                    let _ = coordinator.uninstall("prompts", scope);
                }
            }

            let scopes = coordinator.resolver().get_conflicting_scopes("prompts").unwrap();
            prop_assert!(scopes.len() <= 1, "installed at {:?}", scopes);
        }
    }
}
