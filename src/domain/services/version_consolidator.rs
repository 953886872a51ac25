//! Version Consolidator Domain Service
//!
//! Folds listings that are different releases of the same bundle into one
//! canonical entry, and caches every known version per identity in a
//! bounded LRU cache.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::domain::entities::{Bundle, BundleVersion, ConsolidatedBundle};
use crate::domain::value_objects::{BundleIdentity, SourceType};

use super::lru_cache::{CacheConfigError, LruCache};
use super::version_order::{sort_latest_first, OrderingStrategy};

/// Default number of identities kept in the version cache
pub const DEFAULT_CACHE_SIZE: usize = 100;

/// Explicit source id → source type mapping supplied by the host
pub trait SourceTypeResolver: Send + Sync {
    fn source_type(&self, source_id: &str) -> Option<SourceType>;
}

impl<F> SourceTypeResolver for F
where
    F: Fn(&str) -> Option<SourceType> + Send + Sync,
{
    fn source_type(&self, source_id: &str) -> Option<SourceType> {
        self(source_id)
    }
}

pub struct VersionConsolidator {
    cache: Mutex<LruCache<BundleIdentity, Vec<BundleVersion>>>,
    resolver: Option<Box<dyn SourceTypeResolver>>,
}

impl VersionConsolidator {
    /// Create a consolidator caching at most `max_cache_size` identities
    pub fn new(max_cache_size: usize) -> Result<Self, CacheConfigError> {
        Ok(Self {
            cache: Mutex::new(LruCache::new(max_cache_size)?),
            resolver: None,
        })
    }

    /// Use an explicit source type mapping instead of guessing from ids
    pub fn with_source_types(mut self, resolver: impl SourceTypeResolver + 'static) -> Self {
        self.resolver = Some(Box::new(resolver));
        self
    }

    /// Identity of a listing
    ///
    /// Source type precedence: the listing's own field, then the resolver,
    /// then a substring guess on the source id.
    pub fn identity_of(&self, bundle: &Bundle) -> BundleIdentity {
        let source_type = self.source_type_of(bundle);
        BundleIdentity::extract(&bundle.id, &bundle.source_id, source_type.as_ref())
    }

    /// Source type of a listing, by the same precedence as `identity_of`
    pub fn source_type_of(&self, bundle: &Bundle) -> Option<SourceType> {
        if let Some(explicit) = &bundle.source_type {
            return Some(explicit.clone());
        }
        if let Some(resolver) = &self.resolver {
            return resolver.source_type(&bundle.source_id);
        }
        let guessed = SourceType::infer_from_source_id(&bundle.source_id);
        tracing::debug!(
            source_id = %bundle.source_id,
            guessed = ?guessed,
            "no source type mapping, inferring from source id"
        );
        guessed
    }

    /// Group listings by identity and pick the latest of each group
    ///
    /// Output preserves the order in which identities first appear.
    pub fn consolidate_bundles(&self, bundles: &[Bundle]) -> Vec<ConsolidatedBundle> {
        let mut order: Vec<BundleIdentity> = Vec::new();
        let mut groups: HashMap<BundleIdentity, Vec<Bundle>> = HashMap::new();

        for bundle in bundles {
            let identity = self.identity_of(bundle);
            let group = groups.entry(identity.clone()).or_default();
            if group.is_empty() {
                order.push(identity);
            }
            group.push(bundle.clone());
        }

        let mut consolidated = Vec::with_capacity(order.len());
        for identity in order {
            let Some(mut group) = groups.remove(&identity) else {
                continue;
            };

            let is_consolidated = group.len() > 1;
            if is_consolidated {
                let strategy = sort_latest_first(&mut group);
                match strategy {
                    OrderingStrategy::SemanticVersion => {}
                    OrderingStrategy::LastUpdated => tracing::warn!(
                        identity = %identity,
                        "versions are not all semantic versions, ordered by last update"
                    ),
                    OrderingStrategy::InputOrder => tracing::warn!(
                        identity = %identity,
                        "versions could not be compared, keeping listing order"
                    ),
                }
            }

            let versions: Vec<BundleVersion> = group.iter().map(BundleVersion::from).collect();
            self.cache_versions(identity.clone(), versions.clone());

            let canonical = group.swap_remove(0);
            consolidated.push(ConsolidatedBundle {
                identity,
                bundle: canonical,
                is_consolidated,
                available_versions: versions,
            });
        }

        consolidated
    }

    /// All cached versions of an identity, latest first
    pub fn get_all_versions(&self, identity: &BundleIdentity) -> Option<Vec<BundleVersion>> {
        self.lock_cache().get(identity).cloned()
    }

    /// One cached version of an identity (a leading `v` is ignored)
    pub fn get_bundle_version(
        &self,
        identity: &BundleIdentity,
        version: &str,
    ) -> Option<BundleVersion> {
        let wanted = version.trim_start_matches('v');
        self.lock_cache()
            .get(identity)?
            .iter()
            .find(|v| v.version.trim_start_matches('v') == wanted)
            .cloned()
    }

    /// The latest cached version of an identity
    pub fn latest_version(&self, identity: &BundleIdentity) -> Option<BundleVersion> {
        self.lock_cache().get(identity)?.first().cloned()
    }

    pub fn clear_cache(&self) {
        self.lock_cache().clear();
    }

    pub fn cache_len(&self) -> usize {
        self.lock_cache().len()
    }

    /// Cached identities from least to most recently used
    pub fn cached_identities(&self) -> Vec<BundleIdentity> {
        self.lock_cache().keys_by_recency().cloned().collect()
    }

    fn cache_versions(&self, identity: BundleIdentity, versions: Vec<BundleVersion>) {
        if let Some(evicted) = self.lock_cache().insert(identity, versions) {
            tracing::debug!(identity = %evicted, "evicted from version cache");
        }
    }

    fn lock_cache(&self) -> MutexGuard<'_, LruCache<BundleIdentity, Vec<BundleVersion>>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for VersionConsolidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VersionConsolidator")
            .field("cached", &self.cache_len())
            .field("has_resolver", &self.resolver.is_some())
            .finish()
    }
}
