//! Null-tolerant comparators over query result tuples.
//!
//! Comparators take `Option<&CountTuple>` operands: a missing operand sorts
//! strictly before a present one, and two missing operands compare equal.
//! Each descending comparator is the exact negation of its ascending
//! counterpart on every input pair, not a separately defined order.

use std::cmp::Ordering;

use crate::tuple::CountTuple;

/// Three-way comparison by event time.
pub fn compare_by_time(a: Option<&CountTuple>, b: Option<&CountTuple>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => a.time.cmp(&b.time),
    }
}

/// Three-way comparison by count.
pub fn compare_by_count(a: Option<&CountTuple>, b: Option<&CountTuple>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => a.count.cmp(&b.count),
    }
}

/// Single-field comparator by time.
pub fn time_comparator(
    ascending: bool,
) -> impl Fn(Option<&CountTuple>, Option<&CountTuple>) -> Ordering {
    move |a, b| {
        let ord = compare_by_time(a, b);
        if ascending {
            ord
        } else {
            ord.reverse()
        }
    }
}

/// Single-field comparator by count.
pub fn count_comparator(
    ascending: bool,
) -> impl Fn(Option<&CountTuple>, Option<&CountTuple>) -> Ordering {
    move |a, b| {
        let ord = compare_by_count(a, b);
        if ascending {
            ord
        } else {
            ord.reverse()
        }
    }
}

/// Composite comparator: primary key count, tie-break by time.
///
/// `ascending` flips both keys together; there is no mixed
/// count-ascending/time-descending order.
pub fn count_time_comparator(
    ascending: bool,
) -> impl Fn(Option<&CountTuple>, Option<&CountTuple>) -> Ordering {
    move |a, b| {
        let ord = match compare_by_count(a, b) {
            Ordering::Equal => compare_by_time(a, b),
            ord => ord,
        };
        if ascending {
            ord
        } else {
            ord.reverse()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Ident;
    use proptest::prelude::*;

    fn tuple(count: i64, time: i64) -> CountTuple {
        CountTuple {
            subject: Ident::from("s"),
            action: Ident::from("a"),
            object: Ident::from("o"),
            count,
            time,
        }
    }

    #[test]
    fn test_missing_sorts_before_present() {
        let t = tuple(1, 100);

        assert_eq!(compare_by_time(None, Some(&t)), Ordering::Less);
        assert_eq!(compare_by_time(Some(&t), None), Ordering::Greater);
        assert_eq!(compare_by_time(None, None), Ordering::Equal);

        assert_eq!(compare_by_count(None, Some(&t)), Ordering::Less);
        assert_eq!(compare_by_count(Some(&t), None), Ordering::Greater);
        assert_eq!(compare_by_count(None, None), Ordering::Equal);
    }

    #[test]
    fn test_time_comparator_orders_by_time() {
        let early = tuple(5, 100);
        let late = tuple(1, 200);

        let asc = time_comparator(true);
        assert_eq!(asc(Some(&early), Some(&late)), Ordering::Less);

        let desc = time_comparator(false);
        assert_eq!(desc(Some(&early), Some(&late)), Ordering::Greater);
    }

    #[test]
    fn test_count_time_composite_tiebreak() {
        let a = tuple(2, 100);
        let b = tuple(2, 200);
        let c = tuple(3, 50);

        let asc = count_time_comparator(true);
        // Equal counts fall through to time.
        assert_eq!(asc(Some(&a), Some(&b)), Ordering::Less);
        // Count dominates time.
        assert_eq!(asc(Some(&b), Some(&c)), Ordering::Less);
    }

    #[test]
    fn test_count_time_descending_reverses_whole_sequence() {
        let mut tuples = vec![tuple(2, 200), tuple(1, 50), tuple(2, 100), tuple(3, 10)];

        let asc = count_time_comparator(true);
        let desc = count_time_comparator(false);

        let mut ascending = tuples.clone();
        ascending.sort_by(|a, b| asc(Some(a), Some(b)));

        tuples.sort_by(|a, b| desc(Some(a), Some(b)));

        let mut reversed = ascending.clone();
        reversed.reverse();
        assert_eq!(tuples, reversed);

        // Non-decreasing by (count, time).
        for pair in ascending.windows(2) {
            assert!((pair[0].count, pair[0].time) <= (pair[1].count, pair[1].time));
        }
    }

    proptest! {
        #[test]
        fn prop_descending_is_exact_negation(
            c1 in -1000i64..=1000, t1 in 0i64..=100_000,
            c2 in -1000i64..=1000, t2 in 0i64..=100_000,
            a_missing: bool, b_missing: bool,
        ) {
            let ta = tuple(c1, t1);
            let tb = tuple(c2, t2);
            let a = if a_missing { None } else { Some(&ta) };
            let b = if b_missing { None } else { Some(&tb) };

            prop_assert_eq!(
                time_comparator(false)(a, b),
                time_comparator(true)(a, b).reverse()
            );
            prop_assert_eq!(
                count_comparator(false)(a, b),
                count_comparator(true)(a, b).reverse()
            );
            prop_assert_eq!(
                count_time_comparator(false)(a, b),
                count_time_comparator(true)(a, b).reverse()
            );
        }

        #[test]
        fn prop_comparators_are_antisymmetric(
            c1 in -1000i64..=1000, t1 in 0i64..=100_000,
            c2 in -1000i64..=1000, t2 in 0i64..=100_000,
        ) {
            let ta = tuple(c1, t1);
            let tb = tuple(c2, t2);
            let cmp = count_time_comparator(true);

            prop_assert_eq!(
                cmp(Some(&ta), Some(&tb)),
                cmp(Some(&tb), Some(&ta)).reverse()
            );
        }
    }
}
