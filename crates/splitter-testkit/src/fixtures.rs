//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::sync::Arc;

use splitter::{ReceiptStore, StoreConfig};
use splitter_core::{Receipt, ReceiptBuilder};
use splitter_store::{KvStore, MemoryStore};

/// A receipt store over a shared in-memory backend.
pub struct TestFixture {
    pub backend: Arc<MemoryStore>,
    pub store: ReceiptStore<Arc<MemoryStore>>,
}

impl TestFixture {
    /// Create an empty fixture with the default configuration.
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    pub fn with_config(config: StoreConfig) -> Self {
        let backend = Arc::new(MemoryStore::new());
        let store = ReceiptStore::new(Arc::clone(&backend), config);
        Self { backend, store }
    }

    /// Create a fixture whose store already holds the given receipts.
    pub fn with_receipts(receipts: impl IntoIterator<Item = Receipt>) -> Self {
        let mut fixture = Self::new();
        for receipt in receipts {
            fixture
                .store
                .insert(receipt)
                .expect("fixture receipt is valid");
        }
        fixture
    }

    /// Open a second store over the same backend, as a fresh process would.
    pub fn reopen(&self) -> ReceiptStore<Arc<MemoryStore>> {
        ReceiptStore::open(Arc::clone(&self.backend), self.store.config().clone())
    }

    /// The persisted document, parsed as JSON.
    pub fn stored_json(&self) -> Option<serde_json::Value> {
        let key = &self.store.config().key;
        self.backend
            .get(key)
            .expect("memory backend read")
            .map(|bytes| serde_json::from_slice(&bytes).expect("stored blob is JSON"))
    }

    /// Overwrite the persisted document with raw bytes.
    pub fn write_raw(&self, bytes: &[u8]) {
        let key = &self.store.config().key;
        self.backend.put(key, bytes).expect("memory backend write");
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Alice and Bob share a pizza; the soda is unassigned.
pub fn pizza_and_soda(tax: f64, tip: f64) -> Receipt {
    ReceiptBuilder::new()
        .person("Alice")
        .person("Bob")
        .item("Pizza", 20.0)
        .item("Soda", 4.0)
        .assign("Pizza", "Alice")
        .assign("Pizza", "Bob")
        .tax(tax)
        .tip(tip)
        .build()
        .expect("pizza_and_soda is valid")
}

/// Alice has the steak alone; the bread is shared by everyone.
pub fn steak_dinner() -> Receipt {
    ReceiptBuilder::new()
        .person("Alice")
        .person("Bob")
        .item("Steak", 30.0)
        .item("Bread", 2.0)
        .assign("Steak", "Alice")
        .tax(10.0)
        .tip(20.0)
        .build()
        .expect("steak_dinner is valid")
}
