//! Property tests for latest-first version ordering.

use proptest::prelude::*;

use bundlelock::domain::services::{parse_version, sort_latest_first, OrderingStrategy};
use bundlelock::{Bundle, VersionConsolidator};

fn any_version() -> impl Strategy<Value = String> {
    prop_oneof![
        (0u64..4, 0u64..12, 0u64..12).prop_map(|(a, b, c)| format!("{}.{}.{}", a, b, c)),
        (0u64..4, 0u64..12, 0u64..12).prop_map(|(a, b, c)| format!("v{}.{}.{}", a, b, c)),
        "[a-z0-9.\\-]{0,8}",
    ]
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Ordering never panics, never loses listings, and is
    /// descending whenever every version parses.
    #[test]
    fn property_ordering_is_total(versions in proptest::collection::vec(any_version(), 0..10)) {
        let mut listings: Vec<Bundle> = versions
            .iter()
            .map(|v| Bundle::new(format!("tool-{}", v), v.clone(), "acme-github"))
            .collect();

        let strategy = sort_latest_first(&mut listings);

        prop_assert_eq!(listings.len(), versions.len());
        if strategy == OrderingStrategy::SemanticVersion {
            let parsed: Vec<_> = listings
                .iter()
                .map(|b| parse_version(&b.version).unwrap())
                .collect();
            prop_assert!(parsed.windows(2).all(|w| w[0] >= w[1]));
        }
    }

    /// PROPERTY: The consolidated latest version is the semver maximum.
    #[test]
    fn property_latest_is_maximum(
        triples in proptest::collection::vec((0u64..4, 0u64..12, 0u64..12), 1..8),
    ) {
        let consolidator = VersionConsolidator::new(8).unwrap();
        let listings: Vec<Bundle> = triples
            .iter()
            .map(|(a, b, c)| {
                let version = format!("{}.{}.{}", a, b, c);
                Bundle::new(format!("tool-v{}", version), version, "acme-github")
            })
            .collect();

        let consolidated = consolidator.consolidate_bundles(&listings);

        prop_assert_eq!(consolidated.len(), 1);
        let max = triples.iter().max().unwrap();
        let expected = format!("{}.{}.{}", max.0, max.1, max.2);
        prop_assert_eq!(consolidated[0].version(), expected.as_str());
    }
}
