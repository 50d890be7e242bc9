//! # Splitter Store
//!
//! Key-value persistence backends for the receipt splitter. The receipt
//! collection is written as a single blob under a single key, so all a
//! backend has to provide is get/put/delete on opaque bytes.
//!
//! ## Key Types
//!
//! - [`KvStore`] - The trait for all backends
//! - [`SqliteStore`] - SQLite-based persistent storage
//! - [`MemoryStore`] - In-memory storage for tests
//!
//! ## Usage
//!
//! ```rust,no_run
//! use splitter_store::{KvStore, SqliteStore};
//!
//! let store = SqliteStore::open("splitter.db").unwrap();
//! store.put("receipts", b"[]").unwrap();
//! assert!(store.contains("receipts").unwrap());
//! ```

pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::KvStore;
