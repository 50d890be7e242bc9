//! # Splitter Testkit
//!
//! Testing utilities for the receipt splitter.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Scenario vectors**: Named receipts with expected per-person figures
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: A memory-backed receipt store and canned receipts
//!
//! ## Scenario Vectors
//!
//! ```rust
//! use splitter_testkit::vectors::{all_vectors, verify_all_vectors};
//!
//! for (name, ok, detail) in verify_all_vectors() {
//!     assert!(ok, "{}: {}", name, detail);
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use splitter_testkit::generators::{ReceiptParams, receipt_from_params};
//!
//! proptest! {
//!     #[test]
//!     fn allocation_is_repeatable(params: ReceiptParams) {
//!         let receipt = receipt_from_params(&params);
//!         prop_assert_eq!(receipt.per_person_allocation(), receipt.per_person_allocation());
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use splitter_testkit::fixtures::{pizza_and_soda, TestFixture};
//!
//! let mut fixture = TestFixture::new();
//! fixture.store.insert(pizza_and_soda(10.0, 0.0)).unwrap();
//! assert_eq!(fixture.reopen().len(), 1);
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{pizza_and_soda, steak_dinner, TestFixture};
pub use generators::{receipt_from_params, ReceiptParams};
pub use vectors::{all_vectors, receipt_from_vector, verify_all_vectors, ScenarioVector};
