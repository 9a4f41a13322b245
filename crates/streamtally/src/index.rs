//! The aggregation index: per-subject/action/object views over store scans.
//!
//! The index is derived from scan results at query time; the store remains
//! the single source of truth and no shadow state is kept between calls.
//! BTreeMaps throughout make every derived ordering deterministic for a
//! fixed store state.

use std::collections::{BTreeMap, BTreeSet};

use streamtally_core::{CountRecord, CountTriple, CountTuple, Filter, Ident, TupleKey};

/// One counted (object, count, time) cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CountEntry {
    count: i64,
    time: i64,
}

/// All records under one subject, grouped by action, then object.
#[derive(Debug, Default)]
pub struct SubjectView {
    actions: BTreeMap<Ident, BTreeMap<Ident, CountEntry>>,
}

impl SubjectView {
    /// Distinct actions with at least one record under this subject.
    pub fn actions(&self) -> BTreeSet<Ident> {
        self.actions.keys().cloned().collect()
    }

    /// One triple per (action, object) record whose action passes the
    /// filter. An empty `actions` slice matches every action. Triples for
    /// the same object under different actions are not merged.
    pub fn triples(&self, actions: &[Ident]) -> Vec<CountTriple> {
        self.matching(actions)
            .flat_map(|(_, objects)| {
                objects.iter().map(|(object, entry)| CountTriple {
                    object: object.clone(),
                    count: entry.count,
                    time: entry.time,
                })
            })
            .collect()
    }

    /// Sum of counts across records whose action passes the filter.
    pub fn sum(&self, actions: &[Ident]) -> i64 {
        self.matching(actions)
            .flat_map(|(_, objects)| objects.values())
            .map(|entry| entry.count)
            .sum()
    }

    fn matching<'a>(
        &'a self,
        actions: &'a [Ident],
    ) -> impl Iterator<Item = (&'a Ident, &'a BTreeMap<Ident, CountEntry>)> {
        self.actions
            .iter()
            .filter(move |&(action, _)| actions.is_empty() || actions.contains(action))
    }
}

/// The derived subject -> action -> object view of a cache namespace.
#[derive(Debug, Default)]
pub struct AggregationIndex {
    subjects: BTreeMap<Ident, SubjectView>,
}

impl AggregationIndex {
    /// Group raw scan entries into per-subject views.
    pub fn from_entries(entries: Vec<(TupleKey, CountRecord)>) -> Self {
        let mut subjects: BTreeMap<Ident, SubjectView> = BTreeMap::new();

        for (key, record) in entries {
            subjects
                .entry(key.subject)
                .or_default()
                .actions
                .entry(key.action)
                .or_default()
                .insert(
                    key.object,
                    CountEntry {
                        count: record.count,
                        time: record.last_time,
                    },
                );
        }

        Self { subjects }
    }

    /// The view for one subject, if any record exists under it.
    pub fn subject(&self, subj: &Ident) -> Option<&SubjectView> {
        self.subjects.get(subj)
    }

    /// Enumerate full tuples matching the subject and action filters.
    ///
    /// `Filter::Any` matches every subject; an empty `actions` slice
    /// matches every action. Order follows the key order of the underlying
    /// maps, so it is stable for a fixed store state.
    pub fn tuples(&self, subject: Filter<&Ident>, actions: &[Ident]) -> Vec<CountTuple> {
        self.subjects
            .iter()
            .filter(|&(subj, _)| subject.matches(subj))
            .flat_map(|(subj, view)| {
                view.matching(actions).flat_map(move |(action, objects)| {
                    objects.iter().map(move |(object, entry)| CountTuple {
                        subject: subj.clone(),
                        action: action.clone(),
                        object: object.clone(),
                        count: entry.count,
                        time: entry.time,
                    })
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn entry(s: &str, a: &str, o: &str, count: i64, time: i64) -> (TupleKey, CountRecord) {
        (
            TupleKey::new(s, a, o),
            CountRecord {
                count,
                last_time: time,
                snapshot: None,
            },
        )
    }

    fn sample() -> AggregationIndex {
        AggregationIndex::from_entries(vec![
            entry("alice", "like", "post1", 2, 100),
            entry("alice", "like", "post2", 1, 200),
            entry("alice", "share", "post1", 1, 300),
            entry("bob", "like", "post1", 5, 400),
        ])
    }

    #[test]
    fn test_subject_actions() {
        let index = sample();
        let alice = index.subject(&"alice".into()).unwrap();

        let actions: Vec<_> = alice.actions().into_iter().collect();
        assert_eq!(actions, vec![Ident::from("like"), Ident::from("share")]);

        assert!(index.subject(&"carol".into()).is_none());
    }

    #[test]
    fn test_triples_do_not_merge_across_actions() {
        let index = sample();
        let alice = index.subject(&"alice".into()).unwrap();

        // post1 appears once under like and once under share.
        let triples = alice.triples(&[]);
        assert_eq!(triples.len(), 3);
        let post1_count = triples
            .iter()
            .filter(|t| t.object == Ident::from("post1"))
            .count();
        assert_eq!(post1_count, 2);
    }

    #[test]
    fn test_triples_action_filter() {
        let index = sample();
        let alice = index.subject(&"alice".into()).unwrap();

        let likes = alice.triples(&[Ident::from("like")]);
        assert_eq!(likes.len(), 2);

        // Unknown action matches nothing.
        let none = alice.triples(&[Ident::from("report")]);
        assert!(none.is_empty());
    }

    #[test]
    fn test_sum_with_and_without_filter() {
        let index = sample();
        let alice = index.subject(&"alice".into()).unwrap();

        assert_eq!(alice.sum(&[]), 4);
        assert_eq!(alice.sum(&[Ident::from("like")]), 3);
        assert_eq!(alice.sum(&[Ident::from("share")]), 1);
        assert_eq!(
            alice.sum(&[Ident::from("like"), Ident::from("share")]),
            4
        );
    }

    #[test]
    fn test_tuples_subject_filter() {
        let index = sample();

        let all = index.tuples(Filter::Any, &[]);
        assert_eq!(all.len(), 4);

        let bob = Ident::from("bob");
        let bobs = index.tuples(Filter::Exactly(&bob), &[]);
        assert_eq!(bobs.len(), 1);
        assert_eq!(bobs[0].count, 5);
    }

    #[test]
    fn test_tuples_order_is_stable() {
        let index = sample();
        assert_eq!(index.tuples(Filter::Any, &[]), index.tuples(Filter::Any, &[]));
    }

    proptest! {
        #[test]
        fn prop_subject_sum_decomposes_by_action(
            rows in prop::collection::vec(
                ("[a-c]", "[a-c]", "[a-c]", 0i64..100, 0i64..1000),
                0..30,
            ),
        ) {
            // Last write wins per key, as in the store.
            let mut by_key = std::collections::BTreeMap::new();
            for (s, a, o, count, time) in rows {
                by_key.insert(TupleKey::new(s, a, o), (count, time));
            }
            let entries: Vec<_> = by_key
                .into_iter()
                .map(|(key, (count, time))| {
                    (
                        key,
                        CountRecord {
                            count,
                            last_time: time,
                            snapshot: None,
                        },
                    )
                })
                .collect();

            let index = AggregationIndex::from_entries(entries);
            let a = Ident::from("a");

            if let Some(view) = index.subject(&a) {
                let total = view.sum(&[]);
                let per_action: i64 = view
                    .actions()
                    .iter()
                    .map(|action| view.sum(std::slice::from_ref(action)))
                    .sum();
                prop_assert_eq!(total, per_action);
            }
        }
    }
}
