//! Domain Services
//!
//! Business logic that operates on domain entities. Services reach the
//! outside world only through ports.

mod lru_cache;
mod scope_conflict_resolver;
mod version_consolidator;
mod version_order;

pub use lru_cache::{CacheConfigError, CacheEntry, LruCache};
pub use scope_conflict_resolver::{
    MigrationFailure, MigrationPhase, MigrationResult, ScopeConflict, ScopeConflictResolver,
};
pub use version_consolidator::{SourceTypeResolver, VersionConsolidator, DEFAULT_CACHE_SIZE};
pub use version_order::{parse_version, sort_latest_first, OrderingStrategy};
