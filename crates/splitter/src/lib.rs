//! # Splitter
//!
//! Split a restaurant receipt among the people who shared it.
//!
//! ## Overview
//!
//! The crate provides:
//!
//! - **Receipts**: Items, persons, and tax/tip rates, with derived totals
//! - **Allocation**: Each person's share of items, tax, and tip
//! - **Receipt store**: An ordered collection persisted after every change
//!
//! ## Key Concepts
//!
//! - **Assignment**: An item shared by specific persons is split among them.
//! - **Even split**: An unassigned item is split across everyone on the receipt.
//! - **Head count**: Tax and tip are divided evenly per person.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use splitter::{ReceiptStore, StoreConfig};
//! use splitter::kv::SqliteStore;
//!
//! fn example() -> splitter::Result<()> {
//!     let backend = SqliteStore::open("receipts.db")?;
//!     let mut store = ReceiptStore::open(backend, StoreConfig::default());
//!
//!     let receipt = store
//!         .draft()
//!         .person("Alice")
//!         .person("Bob")
//!         .item("Pizza", 20.0)
//!         .item("Soda", 4.0)
//!         .assign("Pizza", "Alice")
//!         .assign("Pizza", "Bob")
//!         .build()?;
//!     let receipt = store.insert(receipt)?;
//!
//!     for total in receipt.per_person_totals()? {
//!         println!("{}: {:.2}", total.name, total.total_with_tax_and_tip());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `splitter::model` - Receipt model and allocation
//! - `splitter::kv` - Key-value backends

pub mod codec;
pub mod error;
pub mod receipts;

// Re-export component crates
pub use splitter_core as model;
pub use splitter_store as kv;

pub use error::{Result, SplitError};
pub use receipts::{Notice, ReceiptStore, StoreConfig};

// Re-export commonly used model types
pub use splitter_core::{
    Item, ItemId, Person, PersonId, PersonShare, PersonTotal, Receipt, ReceiptBuilder, ReceiptId,
    ReceiptSummary, ValidationError, DEFAULT_TAX_PERCENTAGE, DEFAULT_TIP_PERCENTAGE,
};
