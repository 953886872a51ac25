//! Property tests for the LRU cache and the consolidator cache bound.

use proptest::prelude::*;

use bundlelock::domain::services::LruCache;
use bundlelock::{Bundle, VersionConsolidator};

#[derive(Debug, Clone)]
enum Op {
    Insert(u8),
    Get(u8),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![(0u8..16).prop_map(Op::Insert), (0u8..16).prop_map(Op::Get)]
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: The cache never holds more than its capacity, and the most
    /// recently inserted key is always present.
    #[test]
    fn property_lru_never_exceeds_capacity(
        capacity in 1usize..6,
        ops in proptest::collection::vec(op(), 0..64),
    ) {
        let mut cache = LruCache::new(capacity).unwrap();
        for op in ops {
            match op {
                Op::Insert(key) => {
                    cache.insert(key, u32::from(key) * 10);
                    prop_assert!(cache.contains(&key));
                }
                Op::Get(key) => {
                    if let Some(value) = cache.get(&key) {
                        prop_assert_eq!(*value, u32::from(key) * 10);
                    }
                }
            }
            prop_assert!(cache.len() <= capacity);
            prop_assert_eq!(cache.keys_by_recency().count(), cache.len());
        }
    }

    /// PROPERTY: Consolidation caches at most `max_size` identities.
    #[test]
    fn property_consolidator_cache_is_bounded(
        max_size in 1usize..5,
        names in proptest::collection::vec("[a-d]{1,3}", 0..24),
    ) {
        let consolidator = VersionConsolidator::new(max_size).unwrap();
        let listings: Vec<Bundle> = names
            .iter()
            .map(|name| Bundle::new(format!("{}-v1.0.0", name), "1.0.0", "acme-github"))
            .collect();

        consolidator.consolidate_bundles(&listings);

        prop_assert!(consolidator.cache_len() <= max_size);
    }
}

#[test]
fn zero_capacity_is_rejected() {
    assert!(LruCache::<u8, u8>::new(0).is_err());
    assert!(VersionConsolidator::new(0).is_err());
}
