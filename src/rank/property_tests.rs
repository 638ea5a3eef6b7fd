//! Property-based tests for rank allocation
//!
//! These tests use proptest to verify ordering invariants across many random ranks.

#[cfg(test)]
mod tests {
    use crate::rank::{allocate_for_insert, generate_spread, Rank};
    use proptest::prelude::*;

    // ===== STRATEGY HELPERS =====

    /// Generate a canonical rank in bucket 0 with up to three fraction digits
    fn any_rank() -> impl Strategy<Value = Rank> {
        (
            "[0-9a-z]{6}",
            prop::collection::vec(0u32..36, 0..3),
            1u32..36,
            any::<bool>(),
        )
            .prop_map(|(integer, mut fraction, last, with_fraction)| {
                if with_fraction {
                    fraction.push(last);
                } else {
                    fraction.clear();
                }
                let fraction: String = fraction
                    .into_iter()
                    .filter_map(|d| std::char::from_digit(d, 36))
                    .collect();
                Rank::parse(&format!("0|{}:{}", integer, fraction)).unwrap()
            })
    }

    /// Generate an ordered pair of distinct ranks
    fn ordered_pair() -> impl Strategy<Value = (Rank, Rank)> {
        (any_rank(), any_rank())
            .prop_filter("ranks must differ", |(a, b)| a != b)
            .prop_map(|(a, b)| if a < b { (a, b) } else { (b, a) })
    }

    // ===== DENSITY =====

    proptest! {
        /// Property: between(a, b) lies strictly inside (a, b)
        #[test]
        fn test_between_is_strictly_inside((a, b) in ordered_pair()) {
            let mid = a.between(&b).unwrap();
            prop_assert!(a < mid);
            prop_assert!(mid < b);
        }

        /// Property: repeated bisection toward one end never collides
        #[test]
        fn test_repeated_bisection_never_collides(
            (a, b) in ordered_pair(),
            toward_low in prop::collection::vec(any::<bool>(), 1..60)
        ) {
            let (mut low, mut high) = (a, b);
            let mut seen = vec![low.clone(), high.clone()];
            for go_low in toward_low {
                let mid = low.between(&high).unwrap();
                prop_assert!(!seen.contains(&mid));
                seen.push(mid.clone());
                if go_low { high = mid } else { low = mid }
            }
        }

        /// Property: value order and string order agree
        #[test]
        fn test_order_matches_string_order(a in any_rank(), b in any_rank()) {
            prop_assert_eq!(a.cmp(&b), a.to_string().cmp(&b.to_string()));
        }

        /// Property: printing then parsing gives the same rank
        #[test]
        fn test_display_parses_back(a in any_rank()) {
            prop_assert_eq!(Rank::parse(&a.to_string()).unwrap(), a);
        }
    }

    // ===== ADJACENCY =====

    proptest! {
        /// Property: next and prev move strictly in their direction
        #[test]
        fn test_next_and_prev_are_monotone(a in any_rank()) {
            if a < Rank::max() {
                prop_assert!(a.next().unwrap() > a);
            }
            if !a.is_min() {
                prop_assert!(a.prev().unwrap() < a);
            }
        }

        /// Property: N appends to an empty column give a strictly increasing sequence
        #[test]
        fn test_appends_strictly_increase(n in 1usize..200) {
            let mut column: Vec<Option<Rank>> = Vec::new();
            for _ in 0..n {
                let next = allocate_for_insert(&column, column.len()).unwrap();
                if let Some(Some(last)) = column.last() {
                    prop_assert!(&next > last);
                }
                column.push(Some(next));
            }
        }

        /// Property: inserting at any index keeps the column sorted
        #[test]
        fn test_insert_keeps_column_sorted(
            inserts in prop::collection::vec(0usize..30, 1..40)
        ) {
            let mut column: Vec<Option<Rank>> = Vec::new();
            for index in inserts {
                let index = index.min(column.len());
                let rank = allocate_for_insert(&column, index).unwrap();
                column.insert(index, Some(rank));
            }
            let ranks: Vec<Rank> = column.into_iter().flatten().collect();
            for pair in ranks.windows(2) {
                prop_assert!(pair[0] < pair[1]);
            }
        }
    }

    // ===== SPREAD =====

    proptest! {
        /// Property: a spread is sorted, unique and within its bounds
        #[test]
        fn test_spread_sorted_unique_and_bounded(count in 2usize..64, (a, b) in ordered_pair()) {
            let ranks = generate_spread(count, Some(a.clone()), Some(b.clone())).unwrap();
            prop_assert_eq!(ranks.len(), count);
            prop_assert_eq!(&ranks[0], &a);
            prop_assert_eq!(&ranks[count - 1], &b);
            for pair in ranks.windows(2) {
                prop_assert!(pair[0] < pair[1]);
                prop_assert!(pair[0].to_string() < pair[1].to_string());
            }
        }
    }
}
