//! Proptest generators for property-based testing.

use proptest::prelude::*;

use streamtally_core::{CacheId, Ident, Tuple, TupleKey};

/// Generate an identifier.
pub fn ident() -> impl Strategy<Value = Ident> {
    "[a-z][a-z0-9_]{0,11}".prop_map(Ident::from)
}

/// Generate a cache namespace id.
pub fn cache_id() -> impl Strategy<Value = CacheId> {
    "[a-z][a-z0-9-]{0,7}".prop_map(CacheId::from)
}

/// Generate a tuple key.
pub fn tuple_key() -> impl Strategy<Value = TupleKey> {
    (ident(), ident(), ident()).prop_map(|(subject, action, object)| TupleKey {
        subject,
        action,
        object,
    })
}

/// Generate an update delta (small, possibly negative).
pub fn delta() -> impl Strategy<Value = i64> {
    -100i64..=100
}

/// Generate a reasonable event timestamp (Unix ms).
pub fn timestamp() -> impl Strategy<Value = i64> {
    0i64..=1_700_000_000_000
}

/// Generate a complete wire tuple.
pub fn tuple() -> impl Strategy<Value = Tuple> {
    (cache_id(), tuple_key(), delta(), timestamp()).prop_map(|(cache, key, value, time)| Tuple {
        cache,
        key,
        value,
        time,
    })
}

/// Parameters for generating a tuple.
#[derive(Debug, Clone)]
pub struct TupleParams {
    pub cache: CacheId,
    pub key: TupleKey,
    pub value: i64,
    pub time: i64,
}

impl Arbitrary for TupleParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (cache_id(), tuple_key(), delta(), timestamp())
            .prop_map(|(cache, key, value, time)| TupleParams {
                cache,
                key,
                value,
                time,
            })
            .boxed()
    }
}

/// Build a tuple from parameters.
pub fn tuple_from_params(params: &TupleParams) -> Tuple {
    Tuple {
        cache: params.cache.clone(),
        key: params.key.clone(),
        value: params.value,
        time: params.time,
    }
}
