//! Property-based tests for tab ordering.
//!
//! Pinned tabs always lead regardless of key and direction, and flipping
//! the direction inverts the relative order of unpinned tabs whose keys differ.

#[path = "../common/mod.rs"]
mod common;

use std::cmp::Ordering;

use common::{at, tab};
use proptest::prelude::*;
use tabbridge::managers::view_state::{compare_tabs, sort_tabs};
use tabbridge::types::sort::{SortDirection, SortOrder};
use tabbridge::types::tab::Tab;

fn arb_order() -> impl Strategy<Value = SortOrder> {
    prop::sample::select(SortOrder::ALL.to_vec())
}

fn arb_direction() -> impl Strategy<Value = SortDirection> {
    prop_oneof![Just(SortDirection::Ascending), Just(SortDirection::Descending)]
}

/// Tabs on one device with random titles, hosts, pins, positions and view times.
fn arb_tabs() -> impl Strategy<Value = Vec<Tab>> {
    prop::collection::vec(
        (
            proptest::option::of("[A-Za-z ]{0,8}"),
            "[a-d]{1,3}",
            any::<bool>(),
            proptest::option::of(-50i64..50),
            proptest::option::of(0i64..1_000),
        ),
        0..12,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (title, host, is_pinned, position, viewed))| {
                let mut t = tab(&format!("T{}", i), "D1");
                t.title = title;
                t.url = url::Url::parse(&format!("https://{}.test/{}", host, i)).unwrap();
                t.is_pinned = is_pinned;
                t.position_sort_value = position;
                t.last_viewed_time = viewed.map(at);
                t
            })
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn pinned_tabs_always_come_first(
        mut tabs in arb_tabs(),
        order in arb_order(),
        direction in arb_direction(),
    ) {
        sort_tabs(&mut tabs, order, direction);

        let first_unpinned = tabs.iter().position(|t| !t.is_pinned).unwrap_or(tabs.len());
        prop_assert!(tabs[first_unpinned..].iter().all(|t| !t.is_pinned));
    }

    #[test]
    fn toggling_direction_inverts_unpinned_pairs(
        tabs in arb_tabs(),
        order in arb_order(),
    ) {
        for a in tabs.iter().filter(|t| !t.is_pinned) {
            for b in tabs.iter().filter(|t| !t.is_pinned) {
                let forward = compare_tabs(a, b, order, false);
                let backward = compare_tabs(a, b, order, true);
                prop_assert_eq!(forward, backward.reverse());
                if forward == Ordering::Equal {
                    prop_assert_eq!(backward, Ordering::Equal);
                }
            }
        }
    }

    #[test]
    fn sorting_is_a_permutation(
        tabs in arb_tabs(),
        order in arb_order(),
        direction in arb_direction(),
    ) {
        let mut sorted = tabs.clone();
        sort_tabs(&mut sorted, order, direction);

        let mut before: Vec<&str> = tabs.iter().map(|t| t.id.as_str()).collect();
        let mut after: Vec<&str> = sorted.iter().map(|t| t.id.as_str()).collect();
        before.sort_unstable();
        after.sort_unstable();
        prop_assert_eq!(before, after);
    }

    #[test]
    fn position_ascending_puts_missing_values_last(mut tabs in arb_tabs()) {
        for t in tabs.iter_mut() {
            t.is_pinned = false;
        }
        sort_tabs(&mut tabs, SortOrder::Position, SortDirection::Ascending);

        let first_missing = tabs
            .iter()
            .position(|t| t.position_sort_value.is_none())
            .unwrap_or(tabs.len());
        prop_assert!(tabs[first_missing..].iter().all(|t| t.position_sort_value.is_none()));
        let present: Vec<i64> = tabs[..first_missing]
            .iter()
            .filter_map(|t| t.position_sort_value)
            .collect();
        prop_assert!(present.windows(2).all(|w| w[0] <= w[1]));
    }
}
