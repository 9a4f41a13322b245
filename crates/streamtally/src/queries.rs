//! The read-side query engine.
//!
//! [`CountSummary`] answers aggregate queries over one cache namespace. It
//! reads the same store the engine writes, takes no locks, and never
//! mutates; queries may run concurrently with each other and with updates
//! on unrelated keys.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::sync::Arc;

use streamtally_core::{CacheId, CountTriple, CountTuple, Filter, Ident, TupleKey};
use streamtally_store::Store;

use crate::error::Result;
use crate::index::AggregationIndex;

/// Read-only aggregate queries over one cache namespace.
///
/// Absence is a normal state everywhere on this surface: unseen keys read
/// as zero-valued results, empty filters mean "match everything", and no
/// query ever signals "not found" as an error.
pub struct CountSummary<S: Store> {
    store: Arc<S>,
    cache: CacheId,
}

impl<S: Store> CountSummary<S> {
    /// Create a query handle over a store and cache namespace.
    pub fn new(store: Arc<S>, cache: CacheId) -> Self {
        Self { store, cache }
    }

    /// The cache namespace this handle reads.
    pub fn cache(&self) -> &CacheId {
        &self.cache
    }

    /// Point lookup for one (subject, action, object) key.
    ///
    /// Returns `(obj, 0, 0)` when the key has never been updated; the read
    /// itself has no side effects.
    pub async fn get_count(
        &self,
        subj: &Ident,
        action: &Ident,
        obj: &Ident,
    ) -> Result<CountTriple> {
        let key = TupleKey::new(subj.clone(), action.clone(), obj.clone());

        let triple = match self.store.get(&self.cache, &key).await? {
            Some(record) => CountTriple {
                object: obj.clone(),
                count: record.count,
                time: record.last_time,
            },
            None => CountTriple::absent(obj.clone()),
        };

        Ok(triple)
    }

    /// Distinct actions with at least one record under the subject.
    ///
    /// Empty set when the subject is unseen; order is deterministic for a
    /// fixed store state.
    pub async fn actions_for_subj(&self, subj: &Ident) -> Result<BTreeSet<Ident>> {
        let index = self.subject_index(subj).await?;
        Ok(index
            .subject(subj)
            .map(|view| view.actions())
            .unwrap_or_default())
    }

    /// One `(object, count, time)` triple per matching (action, object)
    /// record under the subject.
    ///
    /// An empty `actions` slice matches every action. The result is an
    /// unordered collection; the same object under two different actions
    /// yields two triples.
    pub async fn counts_for_subj_action(
        &self,
        subj: &Ident,
        actions: &[Ident],
    ) -> Result<Vec<CountTriple>> {
        let index = self.subject_index(subj).await?;
        Ok(index
            .subject(subj)
            .map(|view| view.triples(actions))
            .unwrap_or_default())
    }

    /// Sum of all counts under the subject.
    pub async fn sum_counts(&self, subj: &Ident) -> Result<i64> {
        self.sum_counts_for(subj, &[]).await
    }

    /// Sum of counts under the subject, restricted to the given actions.
    ///
    /// An empty `actions` slice matches every action.
    pub async fn sum_counts_for(&self, subj: &Ident, actions: &[Ident]) -> Result<i64> {
        let index = self.subject_index(subj).await?;
        Ok(index
            .subject(subj)
            .map(|view| view.sum(actions))
            .unwrap_or(0))
    }

    /// Enumerate full tuples matching the filters.
    ///
    /// `Filter::Any` matches every subject and an empty `actions` slice
    /// every action. Order is implementation-defined but stable per call
    /// for a fixed store state.
    pub async fn tuples_for_subj_action(
        &self,
        subject: Filter<&Ident>,
        actions: &[Ident],
    ) -> Result<Vec<CountTuple>> {
        let scan_subject = match subject {
            Filter::Any => None,
            Filter::Exactly(subj) => Some(subj),
        };
        let entries = self.store.scan(&self.cache, scan_subject).await?;
        Ok(AggregationIndex::from_entries(entries).tuples(subject, actions))
    }

    /// Enumerate matching tuples in the total order given by `cmp`.
    pub async fn tuples_for_subj_action_sorted<F>(
        &self,
        subject: Filter<&Ident>,
        actions: &[Ident],
        cmp: F,
    ) -> Result<Vec<CountTuple>>
    where
        F: Fn(Option<&CountTuple>, Option<&CountTuple>) -> Ordering,
    {
        let mut tuples = self.tuples_for_subj_action(subject, actions).await?;
        tuples.sort_by(|a, b| cmp(Some(a), Some(b)));
        Ok(tuples)
    }

    /// Scan and group everything under one subject.
    async fn subject_index(&self, subj: &Ident) -> Result<AggregationIndex> {
        let entries = self.store.scan(&self.cache, Some(subj)).await?;
        Ok(AggregationIndex::from_entries(entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use streamtally_core::{ordering, Tuple};
    use streamtally_store::MemoryStore;

    use crate::cache::CountCache;

    async fn seeded() -> CountCache<MemoryStore> {
        let cache = CountCache::new(MemoryStore::new());
        for (s, a, o, delta, time) in [
            ("alice", "like", "post1", 2, 100),
            ("alice", "like", "post2", 1, 200),
            ("alice", "share", "post1", 1, 300),
            ("bob", "like", "post1", 5, 400),
        ] {
            cache
                .update(&Tuple::new("c1", TupleKey::new(s, a, o), delta, time))
                .await
                .unwrap();
        }
        cache
    }

    #[tokio::test]
    async fn test_get_count_absent_is_zero() {
        let cache = CountCache::new(MemoryStore::new());
        let summary = cache.summary(CacheId::from("c1"));

        let triple = summary
            .get_count(&"alice".into(), &"like".into(), &"post1".into())
            .await
            .unwrap();
        assert_eq!(triple, CountTriple::absent("post1".into()));

        // Repeated reads stay zero-valued and write nothing.
        let again = summary
            .get_count(&"alice".into(), &"like".into(), &"post1".into())
            .await
            .unwrap();
        assert_eq!(again.count, 0);
        assert!(cache.store().is_empty());
    }

    #[tokio::test]
    async fn test_actions_for_subj() {
        let cache = seeded().await;
        let summary = cache.summary(CacheId::from("c1"));

        let actions = summary.actions_for_subj(&"alice".into()).await.unwrap();
        let expected: BTreeSet<Ident> = ["like", "share"].map(Ident::from).into();
        assert_eq!(actions, expected);

        assert!(summary
            .actions_for_subj(&"carol".into())
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_counts_for_subj_action_empty_filter_matches_all() {
        let cache = seeded().await;
        let summary = cache.summary(CacheId::from("c1"));

        let triples = summary
            .counts_for_subj_action(&"alice".into(), &[])
            .await
            .unwrap();
        assert_eq!(triples.len(), 3);

        let likes = summary
            .counts_for_subj_action(&"alice".into(), &["like".into()])
            .await
            .unwrap();
        assert_eq!(likes.len(), 2);
    }

    #[tokio::test]
    async fn test_sum_counts() {
        let cache = seeded().await;
        let summary = cache.summary(CacheId::from("c1"));

        assert_eq!(summary.sum_counts(&"alice".into()).await.unwrap(), 4);
        assert_eq!(
            summary
                .sum_counts_for(&"alice".into(), &["like".into()])
                .await
                .unwrap(),
            3
        );
        assert_eq!(summary.sum_counts(&"carol".into()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_tuples_for_subj_action_filters() {
        let cache = seeded().await;
        let summary = cache.summary(CacheId::from("c1"));

        let all = summary
            .tuples_for_subj_action(Filter::Any, &[])
            .await
            .unwrap();
        assert_eq!(all.len(), 4);

        let bob = Ident::from("bob");
        let bobs = summary
            .tuples_for_subj_action(Filter::Exactly(&bob), &[])
            .await
            .unwrap();
        assert_eq!(bobs.len(), 1);

        let shares = summary
            .tuples_for_subj_action(Filter::Any, &["share".into()])
            .await
            .unwrap();
        assert_eq!(shares.len(), 1);
        assert_eq!(shares[0].subject, Ident::from("alice"));
    }

    #[tokio::test]
    async fn test_tuples_sorted_by_count_time() {
        let cache = seeded().await;
        let summary = cache.summary(CacheId::from("c1"));

        let sorted = summary
            .tuples_for_subj_action_sorted(Filter::Any, &[], ordering::count_time_comparator(true))
            .await
            .unwrap();

        let keys: Vec<_> = sorted.iter().map(|t| (t.count, t.time)).collect();
        assert_eq!(keys, vec![(1, 200), (1, 300), (2, 100), (5, 400)]);

        let reversed = summary
            .tuples_for_subj_action_sorted(Filter::Any, &[], ordering::count_time_comparator(false))
            .await
            .unwrap();
        let mut expected = sorted;
        expected.reverse();
        assert_eq!(reversed, expected);
    }

    #[tokio::test]
    async fn test_queries_are_isolated_per_namespace() {
        let cache = seeded().await;
        let summary = cache.summary(CacheId::from("c2"));

        assert_eq!(summary.sum_counts(&"alice".into()).await.unwrap(), 0);
        assert!(summary
            .tuples_for_subj_action(Filter::Any, &[])
            .await
            .unwrap()
            .is_empty());
    }
}
