//! The receipt store: an owned, ordered, persisted collection of receipts.
//!
//! The store keeps the working set in memory and writes the whole collection
//! to its backend after every change. A failed write rolls the in-memory
//! change back, so the collection always matches what was last persisted.

use std::collections::{BTreeSet, HashSet};

use splitter_core::{
    validate_receipt, Item, Person, Receipt, ReceiptBuilder, ReceiptId, ValidationError,
    DEFAULT_TAX_PERCENTAGE, DEFAULT_TIP_PERCENTAGE,
};
use splitter_store::KvStore;

use crate::codec;
use crate::error::{Result, SplitError};

/// Configuration for the receipt store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Backend key the collection is stored under.
    pub key: String,
    /// Whether to validate receipts read from the backend.
    pub validate_on_load: bool,
    /// Tax rate pre-filled by [`ReceiptStore::draft`].
    pub default_tax_percentage: f64,
    /// Tip rate pre-filled by [`ReceiptStore::draft`].
    pub default_tip_percentage: f64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            key: "receipts".to_string(),
            validate_on_load: true,
            default_tax_percentage: DEFAULT_TAX_PERCENTAGE,
            default_tip_percentage: DEFAULT_TIP_PERCENTAGE,
        }
    }
}

/// A non-fatal condition the caller may want to show the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Nothing was stored under the key yet; started empty.
    NothingStored,
    /// The stored collection could not be read; started empty.
    LoadFailed { reason: String },
    /// Assignments to unknown or repeated persons were dropped on load.
    ReceiptRepaired { id: ReceiptId, pruned: usize },
    /// A stored receipt failed validation and was left out of the collection.
    ReceiptDropped { id: ReceiptId, reason: String },
    /// The collection could not be written; the last change was undone.
    SaveFailed { reason: String },
}

/// The receipt store.
///
/// Provides:
/// - Loading and saving the whole collection
/// - Adding, updating, and removing receipts
/// - Read access in collection order
pub struct ReceiptStore<S: KvStore> {
    /// The storage backend.
    backend: S,
    /// Configuration.
    config: StoreConfig,
    /// The working set, in insertion order.
    receipts: Vec<Receipt>,
    /// Conditions not yet collected by the caller.
    notices: Vec<Notice>,
}

impl<S: KvStore> ReceiptStore<S> {
    /// Create an empty store without reading the backend.
    pub fn new(backend: S, config: StoreConfig) -> Self {
        Self {
            backend,
            config,
            receipts: Vec::new(),
            notices: Vec::new(),
        }
    }

    /// Create a store and load whatever the backend holds.
    pub fn open(backend: S, config: StoreConfig) -> Self {
        let mut store = Self::new(backend, config);
        store.load();
        store
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Persistence
    // ─────────────────────────────────────────────────────────────────────────

    /// Replace the working set with the persisted collection.
    ///
    /// Never fails: missing or unreadable data leaves the collection empty
    /// and records a [`Notice`]. With `validate_on_load`, dangling assignments
    /// are pruned and receipts that still fail validation are dropped one by
    /// one; the rest of the collection loads.
    pub fn load(&mut self) -> &[Receipt] {
        match self.read_collection() {
            Ok(Some(receipts)) => {
                let receipts = if self.config.validate_on_load {
                    self.screen(receipts)
                } else {
                    receipts
                };
                tracing::debug!(count = receipts.len(), key = %self.config.key, "receipts loaded");
                self.receipts = receipts;
            }
            Ok(None) => {
                tracing::debug!(key = %self.config.key, "no receipts stored");
                self.receipts.clear();
                self.notices.push(Notice::NothingStored);
            }
            Err(e) => {
                tracing::warn!(key = %self.config.key, "failed to load receipts: {}", e);
                self.receipts.clear();
                self.notices.push(Notice::LoadFailed {
                    reason: e.to_string(),
                });
            }
        }
        &self.receipts
    }

    fn read_collection(&self) -> Result<Option<Vec<Receipt>>> {
        let Some(bytes) = self.backend.get(&self.config.key)? else {
            return Ok(None);
        };

        codec::decode(&bytes).map(Some)
    }

    /// Repair what can be repaired and drop receipts that stay invalid.
    fn screen(&mut self, receipts: Vec<Receipt>) -> Vec<Receipt> {
        let mut seen = HashSet::with_capacity(receipts.len());
        let mut kept = Vec::with_capacity(receipts.len());

        for mut receipt in receipts {
            let id = receipt.id;

            let pruned = receipt.prune_assignments();
            if pruned > 0 {
                tracing::warn!(receipt = %id, pruned, "dropped dangling assignments");
                self.notices.push(Notice::ReceiptRepaired { id, pruned });
            }

            let verdict = if seen.contains(&id) {
                Err(ValidationError::DuplicateId(id.to_hex()))
            } else {
                validate_receipt(&receipt)
            };

            match verdict {
                Ok(()) => {
                    seen.insert(id);
                    kept.push(receipt);
                }
                Err(e) => {
                    tracing::warn!(receipt = %id, "dropping invalid receipt: {}", e);
                    self.notices.push(Notice::ReceiptDropped {
                        id,
                        reason: e.to_string(),
                    });
                }
            }
        }

        kept
    }

    /// Write the whole collection to the backend, overwriting the prior value.
    pub fn save(&mut self) -> Result<()> {
        let result = codec::encode(&self.receipts).and_then(|bytes| {
            self.backend
                .put(&self.config.key, &bytes)
                .map_err(SplitError::from)
        });

        match &result {
            Ok(()) => {
                tracing::debug!(count = self.receipts.len(), key = %self.config.key, "receipts saved");
            }
            Err(e) => {
                tracing::warn!(key = %self.config.key, "failed to save receipts: {}", e);
                self.notices.push(Notice::SaveFailed {
                    reason: e.to_string(),
                });
            }
        }
        result
    }

    /// Collect and clear pending notices.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutation
    // ─────────────────────────────────────────────────────────────────────────

    /// A receipt builder pre-filled with the configured tax and tip rates.
    pub fn draft(&self) -> ReceiptBuilder {
        ReceiptBuilder::new()
            .tax(self.config.default_tax_percentage)
            .tip(self.config.default_tip_percentage)
    }

    /// Create a receipt with a fresh id and append it.
    pub fn add(
        &mut self,
        items: Vec<Item>,
        tax_percentage: f64,
        tip_percentage: f64,
        persons: Vec<Person>,
    ) -> Result<&Receipt> {
        let receipt = Receipt::new(items, tax_percentage, tip_percentage, persons)?;
        self.insert(receipt)
    }

    /// Append an already built receipt.
    pub fn insert(&mut self, receipt: Receipt) -> Result<&Receipt> {
        validate_receipt(&receipt)?;
        if self.position(&receipt.id).is_some() {
            return Err(ValidationError::DuplicateId(receipt.id.to_hex()).into());
        }

        let index = self.receipts.len();
        self.receipts.push(receipt);

        if let Err(e) = self.save() {
            self.receipts.truncate(index);
            return Err(e);
        }
        Ok(&self.receipts[index])
    }

    /// Replace the contents of the receipt with `id`, keeping its position.
    pub fn update(
        &mut self,
        id: &ReceiptId,
        items: Vec<Item>,
        tax_percentage: f64,
        tip_percentage: f64,
        persons: Vec<Person>,
    ) -> Result<&Receipt> {
        let index = self.position(id).ok_or(SplitError::NotFound(*id))?;
        let receipt = Receipt::with_id(*id, items, tax_percentage, tip_percentage, persons)?;
        self.replace_at(index, receipt)
    }

    /// Store an edited copy of a receipt back at its position.
    pub fn replace(&mut self, receipt: Receipt) -> Result<&Receipt> {
        let index = self
            .position(&receipt.id)
            .ok_or(SplitError::NotFound(receipt.id))?;
        validate_receipt(&receipt)?;
        self.replace_at(index, receipt)
    }

    fn replace_at(&mut self, index: usize, receipt: Receipt) -> Result<&Receipt> {
        let previous = std::mem::replace(&mut self.receipts[index], receipt);
        if let Err(e) = self.save() {
            self.receipts[index] = previous;
            return Err(e);
        }
        Ok(&self.receipts[index])
    }

    /// Remove the receipt with `id`.
    pub fn remove(&mut self, id: &ReceiptId) -> Result<Receipt> {
        let index = self.position(id).ok_or(SplitError::NotFound(*id))?;
        let removed = self.receipts.remove(index);
        if let Err(e) = self.save() {
            self.receipts.insert(index, removed);
            return Err(e);
        }
        Ok(removed)
    }

    /// Remove the receipts at the given positions.
    ///
    /// Positions may be given in any order; duplicates are ignored. If any
    /// position is out of range nothing is removed. Removed receipts are
    /// returned in collection order.
    pub fn remove_at(&mut self, positions: &[usize]) -> Result<Vec<Receipt>> {
        let len = self.receipts.len();
        let positions: BTreeSet<usize> = positions.iter().copied().collect();
        if let Some(&position) = positions.iter().find(|&&p| p >= len) {
            return Err(SplitError::InvalidPosition { position, len });
        }

        let mut removed: Vec<(usize, Receipt)> = positions
            .iter()
            .rev()
            .map(|&p| (p, self.receipts.remove(p)))
            .collect();
        removed.reverse();

        if let Err(e) = self.save() {
            for (position, receipt) in removed {
                self.receipts.insert(position, receipt);
            }
            return Err(e);
        }
        Ok(removed.into_iter().map(|(_, receipt)| receipt).collect())
    }

    /// Remove every receipt. Returns how many were removed.
    pub fn clear(&mut self) -> Result<usize> {
        let previous = std::mem::take(&mut self.receipts);
        if let Err(e) = self.save() {
            self.receipts = previous;
            return Err(e);
        }
        Ok(previous.len())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    pub fn receipts(&self) -> &[Receipt] {
        &self.receipts
    }

    pub fn get(&self, id: &ReceiptId) -> Option<&Receipt> {
        self.receipts.iter().find(|r| r.id == *id)
    }

    pub fn position(&self, id: &ReceiptId) -> Option<usize> {
        self.receipts.iter().position(|r| r.id == *id)
    }

    pub fn len(&self) -> usize {
        self.receipts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receipts.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Receipt> {
        self.receipts.iter()
    }
}

impl<'a, S: KvStore> IntoIterator for &'a ReceiptStore<S> {
    type Item = &'a Receipt;
    type IntoIter = std::slice::Iter<'a, Receipt>;

    fn into_iter(self) -> Self::IntoIter {
        self.receipts.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use splitter_store::{MemoryStore, StoreError};
    use std::sync::atomic::{AtomicBool, Ordering};

    /// A backend whose writes can be switched off.
    #[derive(Default)]
    struct FlakyStore {
        inner: MemoryStore,
        fail_writes: AtomicBool,
    }

    impl FlakyStore {
        fn set_failing(&self, failing: bool) {
            self.fail_writes.store(failing, Ordering::SeqCst);
        }
    }

    impl KvStore for FlakyStore {
        fn get(&self, key: &str) -> splitter_store::Result<Option<Vec<u8>>> {
            self.inner.get(key)
        }

        fn put(&self, key: &str, value: &[u8]) -> splitter_store::Result<()> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(StoreError::Io(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    "disk full",
                )));
            }
            self.inner.put(key, value)
        }

        fn delete(&self, key: &str) -> splitter_store::Result<()> {
            self.inner.delete(key)
        }
    }

    fn memory_store() -> ReceiptStore<MemoryStore> {
        ReceiptStore::new(MemoryStore::new(), StoreConfig::default())
    }

    fn lunch(store: &ReceiptStore<impl KvStore>) -> Receipt {
        store
            .draft()
            .person("Alice")
            .person("Bob")
            .item("Pizza", 20.0)
            .item("Soda", 4.0)
            .assign("Pizza", "Alice")
            .assign("Pizza", "Bob")
            .build()
            .unwrap()
    }

    #[test]
    fn test_add_appends_and_persists() {
        let mut store = memory_store();
        let alice = Person::new("Alice");
        let id = store
            .add(vec![Item::new("Tea", 3.0)], 10.0, 0.0, vec![alice])
            .unwrap()
            .id;

        assert_eq!(store.len(), 1);
        assert_eq!(store.receipts()[0].id, id);
        assert!(store.backend().contains("receipts").unwrap());
    }

    #[test]
    fn test_add_rejects_invalid_input() {
        let mut store = memory_store();
        let result = store.add(vec![Item::new("Tea", -3.0)], 10.0, 0.0, vec![]);
        assert!(matches!(result, Err(SplitError::InvalidAllocation(_))));
        assert!(store.is_empty());
        assert!(!store.backend().contains("receipts").unwrap());
    }

    #[test]
    fn test_insert_rejects_duplicate_id() {
        let mut store = memory_store();
        let receipt = lunch(&store);
        store.insert(receipt.clone()).unwrap();

        let result = store.insert(receipt);
        assert!(matches!(
            result,
            Err(SplitError::InvalidAllocation(ValidationError::DuplicateId(_)))
        ));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_update_keeps_position_and_id() {
        let mut store = memory_store();
        let first = store.insert(lunch(&store)).unwrap().id;
        let second = store.insert(lunch(&store)).unwrap().id;

        let updated = store
            .update(&first, vec![Item::new("Salad", 9.0)], 5.0, 5.0, vec![])
            .unwrap();
        assert_eq!(updated.id, first);

        assert_eq!(store.position(&first), Some(0));
        assert_eq!(store.position(&second), Some(1));
        assert_eq!(store.receipts()[0].items[0].name, "Salad");
    }

    #[test]
    fn test_update_unknown_id() {
        let mut store = memory_store();
        store.insert(lunch(&store)).unwrap();
        let before = store.receipts().to_vec();

        let ghost = ReceiptId::generate();
        let result = store.update(&ghost, vec![], 0.0, 0.0, vec![]);
        assert!(matches!(result, Err(SplitError::NotFound(id)) if id == ghost));
        assert_eq!(store.receipts(), before.as_slice());
    }

    #[test]
    fn test_replace_edited_copy() {
        let mut store = memory_store();
        let mut receipt = store.insert(lunch(&store)).unwrap().clone();

        let bob = receipt.persons[1].id;
        receipt.remove_person(&bob).unwrap();
        receipt.set_tip_percentage(20.0).unwrap();
        store.replace(receipt.clone()).unwrap();

        assert_eq!(store.get(&receipt.id), Some(&receipt));
    }

    #[test]
    fn test_remove_and_remove_at() {
        let mut store = memory_store();
        let ids: Vec<ReceiptId> = (0..4)
            .map(|_| store.insert(lunch(&store)).unwrap().id)
            .collect();

        let removed = store.remove(&ids[1]).unwrap();
        assert_eq!(removed.id, ids[1]);
        assert!(matches!(store.remove(&ids[1]), Err(SplitError::NotFound(_))));

        // Remaining: ids[0], ids[2], ids[3]
        let removed = store.remove_at(&[2, 0, 2]).unwrap();
        assert_eq!(
            removed.iter().map(|r| r.id).collect::<Vec<_>>(),
            vec![ids[0], ids[3]]
        );
        assert_eq!(store.receipts().len(), 1);
        assert_eq!(store.receipts()[0].id, ids[2]);
    }

    #[test]
    fn test_remove_at_out_of_range() {
        let mut store = memory_store();
        store.insert(lunch(&store)).unwrap();
        store.insert(lunch(&store)).unwrap();

        let result = store.remove_at(&[0, 5]);
        assert!(matches!(
            result,
            Err(SplitError::InvalidPosition { position: 5, len: 2 })
        ));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_clear() {
        let mut store = memory_store();
        store.insert(lunch(&store)).unwrap();
        store.insert(lunch(&store)).unwrap();

        assert_eq!(store.clear().unwrap(), 2);
        assert!(store.is_empty());

        let reloaded = ReceiptStore::open(store.backend(), StoreConfig::default());
        assert!(reloaded.is_empty());
    }

    #[test]
    fn test_load_missing_is_empty() {
        let mut store = memory_store();
        assert!(store.load().is_empty());
        assert_eq!(store.take_notices(), vec![Notice::NothingStored]);
        assert!(store.take_notices().is_empty());
    }

    #[test]
    fn test_load_corrupt_is_empty() {
        let backend = MemoryStore::new();
        backend.put("receipts", b"{not json").unwrap();

        let mut store = ReceiptStore::open(backend, StoreConfig::default());
        assert!(store.is_empty());
        assert!(matches!(
            store.take_notices().as_slice(),
            [Notice::LoadFailed { .. }]
        ));
    }

    #[test]
    fn test_load_drops_only_invalid_receipts() {
        let backend = MemoryStore::new();
        let valid = ReceiptBuilder::new().item("Tea", 3.0).build().unwrap();
        let mut coupon = ReceiptBuilder::new().item("Coupon", 2.0).build().unwrap();
        coupon.items[0].price = -2.0;
        backend
            .put(
                "receipts",
                &serde_json::to_vec(&[valid.clone(), coupon.clone()]).unwrap(),
            )
            .unwrap();

        let mut store = ReceiptStore::open(&backend, StoreConfig::default());
        assert_eq!(store.receipts(), &[valid.clone()]);
        assert!(matches!(
            store.take_notices().as_slice(),
            [Notice::ReceiptDropped { id, .. }] if *id == coupon.id
        ));

        // The next write keeps the valid receipt.
        store.add(vec![Item::new("Cake", 4.0)], 0.0, 0.0, vec![]).unwrap();
        let reopened = ReceiptStore::open(&backend, StoreConfig::default());
        assert_eq!(reopened.len(), 2);
        assert_eq!(reopened.receipts()[0], valid);

        let lenient = ReceiptStore::open(
            &backend,
            StoreConfig {
                validate_on_load: false,
                ..StoreConfig::default()
            },
        );
        assert_eq!(lenient.len(), 2);
    }

    #[test]
    fn test_load_repairs_dangling_assignments() {
        let backend = MemoryStore::new();
        let mut receipt = ReceiptBuilder::new()
            .person("Alice")
            .item("Pizza", 20.0)
            .assign("Pizza", "Alice")
            .build()
            .unwrap();
        let alice = receipt.persons[0].id;
        let deleted = Person::new("Bob");
        receipt.items[0].assigned_to = vec![alice, deleted.id, alice];
        backend
            .put("receipts", &codec::encode(&[receipt.clone()]).unwrap())
            .unwrap();

        let mut store = ReceiptStore::open(&backend, StoreConfig::default());
        assert_eq!(store.len(), 1);
        assert_eq!(store.receipts()[0].items[0].assigned_to, vec![alice]);
        assert_eq!(
            store.take_notices(),
            vec![Notice::ReceiptRepaired {
                id: receipt.id,
                pruned: 2
            }]
        );
    }

    #[test]
    fn test_load_keeps_first_of_duplicate_ids() {
        let backend = MemoryStore::new();
        let first = ReceiptBuilder::new().item("Tea", 3.0).build().unwrap();
        let mut second = first.clone();
        second.items[0].name = "Coffee".to_string();
        backend
            .put("receipts", &codec::encode(&[first.clone(), second]).unwrap())
            .unwrap();

        let mut store = ReceiptStore::open(&backend, StoreConfig::default());
        assert_eq!(store.receipts(), &[first]);
        assert!(matches!(
            store.take_notices().as_slice(),
            [Notice::ReceiptDropped { .. }]
        ));
    }

    #[test]
    fn test_custom_key() {
        let backend = MemoryStore::new();
        let config = StoreConfig {
            key: "dinner-club".to_string(),
            ..StoreConfig::default()
        };
        let mut store = ReceiptStore::new(&backend, config);
        store.insert(lunch(&store)).unwrap();

        assert!(backend.contains("dinner-club").unwrap());
        assert!(!backend.contains("receipts").unwrap());
    }

    #[test]
    fn test_failed_save_rolls_back() {
        let backend = FlakyStore::default();
        let mut store = ReceiptStore::new(&backend, StoreConfig::default());
        let kept = store.insert(lunch(&store)).unwrap().id;
        let before = store.receipts().to_vec();

        backend.set_failing(true);
        assert!(matches!(
            store.insert(lunch(&store)),
            Err(SplitError::Backend(_))
        ));
        assert!(store
            .update(&kept, vec![Item::new("Water", 1.0)], 0.0, 0.0, vec![])
            .is_err());
        assert!(store.remove(&kept).is_err());
        assert!(store.remove_at(&[0]).is_err());
        assert!(store.clear().is_err());

        assert_eq!(store.receipts(), before.as_slice());
        let notices = store.take_notices();
        assert_eq!(notices.len(), 5);
        assert!(notices
            .iter()
            .all(|n| matches!(n, Notice::SaveFailed { .. })));

        backend.set_failing(false);
        let reloaded = ReceiptStore::open(&backend, StoreConfig::default());
        assert_eq!(reloaded.receipts(), before.as_slice());
    }

    #[test]
    fn test_draft_uses_configured_rates() {
        let store = ReceiptStore::new(
            MemoryStore::new(),
            StoreConfig {
                default_tax_percentage: 8.0,
                default_tip_percentage: 20.0,
                ..StoreConfig::default()
            },
        );
        let receipt = store.draft().build().unwrap();
        assert_eq!(receipt.tax_percentage, 8.0);
        assert_eq!(receipt.tip_percentage, 20.0);
    }
}
