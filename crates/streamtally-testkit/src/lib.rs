//! # Streamtally Testkit
//!
//! Testing utilities for the streamtally cache.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: a memory-backed cache plus helpers for building tuples
//!   and seeding event streams
//! - **Generators**: proptest strategies for property-based testing
//!
//! ## Test Fixtures
//!
//! ```rust
//! use streamtally_testkit::fixtures::TestFixture;
//!
//! # async fn example() {
//! let fixture = TestFixture::new();
//! fixture
//!     .apply(&[("alice", "like", "post1", 1, 1000)])
//!     .await
//!     .unwrap();
//! # }
//! ```
//!
//! ## Property Testing
//!
//! Use the generators with proptest:
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use streamtally_testkit::generators::{tuple_from_params, TupleParams};
//!
//! proptest! {
//!     #[test]
//!     fn wire_roundtrip(params: TupleParams) {
//!         let tuple = tuple_from_params(&params);
//!         prop_assert_eq!(
//!             streamtally::Tuple::decode(&tuple.encode()).unwrap(),
//!             tuple
//!         );
//!     }
//! }
//! ```

pub mod fixtures;
pub mod generators;

pub use fixtures::TestFixture;
pub use generators::{tuple_from_params, TupleParams};
