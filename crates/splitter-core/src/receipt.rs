//! Receipt: items, persons, and tax/tip rates.
//!
//! A receipt is a plain value. Totals are always derived from its items and
//! rates; nothing computed is ever stored on it. Editing methods mutate only
//! the receipt they are called on and leave it untouched when they fail.

use std::collections::HashSet;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{ModelError, Result, ValidationError};
use crate::types::{ItemId, PersonId, ReceiptId};
use crate::validation::{validate_amount, validate_name, validate_receipt};

/// Tax rate pre-filled when a new receipt is drafted.
pub const DEFAULT_TAX_PERCENTAGE: f64 = 9.625;

/// Tip rate pre-filled when a new receipt is drafted.
pub const DEFAULT_TIP_PERCENTAGE: f64 = 15.0;

/// A participant on a receipt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    pub name: String,
}

impl Person {
    /// Create a person with a fresh id.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: PersonId::generate(),
            name: name.into(),
        }
    }
}

/// A priced line entry, optionally assigned to specific persons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub price: f64,

    /// Persons sharing this item. Empty means split across everyone.
    #[serde(default, deserialize_with = "deserialize_assignees")]
    pub assigned_to: Vec<PersonId>,
}

/// Assignees are written as person ids. Older documents embedded a full
/// person snapshot instead; only its id is kept.
fn deserialize_assignees<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Vec<PersonId>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Assignee {
        Id(PersonId),
        Snapshot { id: PersonId },
    }

    let assignees = Vec::<Assignee>::deserialize(deserializer)?;
    Ok(assignees
        .into_iter()
        .map(|a| match a {
            Assignee::Id(id) | Assignee::Snapshot { id } => id,
        })
        .collect())
}

impl Item {
    /// Create an unassigned item with a fresh id.
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            id: ItemId::generate(),
            name: name.into(),
            price,
            assigned_to: Vec::new(),
        }
    }

    /// Set the persons sharing this item.
    pub fn with_assignees(mut self, persons: impl IntoIterator<Item = PersonId>) -> Self {
        self.assigned_to = persons.into_iter().collect();
        self
    }

    /// Check whether the item is explicitly assigned to a person.
    pub fn is_assigned_to(&self, person: &PersonId) -> bool {
        self.assigned_to.contains(person)
    }

    /// Check whether the item falls back to an even split.
    pub fn is_unassigned(&self) -> bool {
        self.assigned_to.is_empty()
    }
}

/// A purchase record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub id: ReceiptId,
    pub items: Vec<Item>,

    /// Whole-number percent, e.g. `9.625` means 9.625%.
    pub tax_percentage: f64,

    /// Whole-number percent.
    pub tip_percentage: f64,

    pub persons: Vec<Person>,
}

/// Snapshot of the receipt-level figures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReceiptSummary {
    pub subtotal: f64,
    pub tax_amount: f64,
    pub tip_amount: f64,
    pub total_with_tax: f64,
    pub total_with_tax_and_tip: f64,
}

impl Receipt {
    /// Create a validated receipt with a fresh id.
    pub fn new(
        items: Vec<Item>,
        tax_percentage: f64,
        tip_percentage: f64,
        persons: Vec<Person>,
    ) -> Result<Self> {
        Self::with_id(
            ReceiptId::generate(),
            items,
            tax_percentage,
            tip_percentage,
            persons,
        )
    }

    /// Create a validated receipt that keeps an existing id.
    pub fn with_id(
        id: ReceiptId,
        items: Vec<Item>,
        tax_percentage: f64,
        tip_percentage: f64,
        persons: Vec<Person>,
    ) -> Result<Self> {
        let receipt = Self {
            id,
            items,
            tax_percentage,
            tip_percentage,
            persons,
        };
        validate_receipt(&receipt)?;
        Ok(receipt)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Derived Values
    // ─────────────────────────────────────────────────────────────────────────

    /// Sum of item prices. Zero for an empty receipt.
    pub fn subtotal(&self) -> f64 {
        self.items.iter().map(|item| item.price).sum()
    }

    pub fn tax_amount(&self) -> f64 {
        self.subtotal() * (self.tax_percentage / 100.0)
    }

    pub fn tip_amount(&self) -> f64 {
        self.subtotal() * (self.tip_percentage / 100.0)
    }

    pub fn total_with_tax(&self) -> f64 {
        self.subtotal() + self.tax_amount()
    }

    pub fn total_with_tax_and_tip(&self) -> f64 {
        self.total_with_tax() + self.tip_amount()
    }

    /// All receipt-level figures at once.
    pub fn summary(&self) -> ReceiptSummary {
        ReceiptSummary {
            subtotal: self.subtotal(),
            tax_amount: self.tax_amount(),
            tip_amount: self.tip_amount(),
            total_with_tax: self.total_with_tax(),
            total_with_tax_and_tip: self.total_with_tax_and_tip(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Lookup
    // ─────────────────────────────────────────────────────────────────────────

    pub fn person(&self, id: &PersonId) -> Option<&Person> {
        self.persons.iter().find(|p| p.id == *id)
    }

    pub fn item(&self, id: &ItemId) -> Option<&Item> {
        self.items.iter().find(|i| i.id == *id)
    }

    /// Number of persons the tax and tip are divided across.
    pub fn person_count(&self) -> usize {
        self.persons.len()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Editing
    // ─────────────────────────────────────────────────────────────────────────

    /// Append an unassigned item.
    pub fn add_item(&mut self, name: impl Into<String>, price: f64) -> Result<ItemId> {
        let name = validate_name("item name", name.into())?;
        let price = validate_amount("price", price)?;
        let item = Item::new(name, price);
        let id = item.id;
        self.items.push(item);
        Ok(id)
    }

    pub fn remove_item(&mut self, id: &ItemId) -> Result<Item> {
        let index = self
            .items
            .iter()
            .position(|i| i.id == *id)
            .ok_or(ModelError::ItemNotFound(*id))?;
        Ok(self.items.remove(index))
    }

    /// Append a person.
    pub fn add_person(&mut self, name: impl Into<String>) -> Result<PersonId> {
        let name = validate_name("person name", name.into())?;
        let person = Person::new(name);
        let id = person.id;
        self.persons.push(person);
        Ok(id)
    }

    /// Remove a person and drop them from every item's assignment list.
    ///
    /// Items the person shared with others stay assigned to the others; an
    /// item left with no assignees falls back to the even split.
    pub fn remove_person(&mut self, id: &PersonId) -> Result<Person> {
        let index = self
            .persons
            .iter()
            .position(|p| p.id == *id)
            .ok_or(ModelError::PersonNotFound(*id))?;
        let person = self.persons.remove(index);

        for item in &mut self.items {
            item.assigned_to.retain(|assignee| assignee != id);
        }

        Ok(person)
    }

    /// Flip a person's assignment to an item.
    ///
    /// Returns `true` if the person is now assigned.
    pub fn toggle_assignment(&mut self, item_id: &ItemId, person_id: &PersonId) -> Result<bool> {
        if self.person(person_id).is_none() {
            return Err(ModelError::PersonNotFound(*person_id));
        }

        let item = self
            .items
            .iter_mut()
            .find(|i| i.id == *item_id)
            .ok_or(ModelError::ItemNotFound(*item_id))?;

        if item.is_assigned_to(person_id) {
            item.assigned_to.retain(|assignee| assignee != person_id);
            Ok(false)
        } else {
            item.assigned_to.push(*person_id);
            Ok(true)
        }
    }

    /// Drop assignments to persons not on the receipt and repeated
    /// assignments of the same person. Returns how many were dropped.
    ///
    /// An item left with no assignees falls back to the even split.
    pub fn prune_assignments(&mut self) -> usize {
        let persons: HashSet<PersonId> = self.persons.iter().map(|p| p.id).collect();
        let mut pruned = 0;

        for item in &mut self.items {
            let before = item.assigned_to.len();
            let mut seen = HashSet::with_capacity(before);
            item.assigned_to
                .retain(|assignee| persons.contains(assignee) && seen.insert(*assignee));
            pruned += before - item.assigned_to.len();
        }

        pruned
    }

    pub fn set_tax_percentage(&mut self, percentage: f64) -> Result<()> {
        self.tax_percentage = validate_amount("tax percentage", percentage)?;
        Ok(())
    }

    pub fn set_tip_percentage(&mut self, percentage: f64) -> Result<()> {
        self.tip_percentage = validate_amount("tip percentage", percentage)?;
        Ok(())
    }
}

/// Builder for assembling a receipt by name.
///
/// Assignments refer to items and persons by the names given to
/// [`ReceiptBuilder::item`] and [`ReceiptBuilder::person`]; names are resolved
/// when the receipt is built.
pub struct ReceiptBuilder {
    items: Vec<Item>,
    persons: Vec<Person>,
    assignments: Vec<(String, String)>,
    tax_percentage: f64,
    tip_percentage: f64,
}

impl ReceiptBuilder {
    /// Start a receipt with the default tax and tip rates.
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            persons: Vec::new(),
            assignments: Vec::new(),
            tax_percentage: DEFAULT_TAX_PERCENTAGE,
            tip_percentage: DEFAULT_TIP_PERCENTAGE,
        }
    }

    /// Add a line item.
    pub fn item(mut self, name: impl Into<String>, price: f64) -> Self {
        self.items.push(Item::new(name, price));
        self
    }

    /// Add a person.
    pub fn person(mut self, name: impl Into<String>) -> Self {
        self.persons.push(Person::new(name));
        self
    }

    /// Assign a previously added item to a previously added person.
    ///
    /// Both are looked up by name when the receipt is built; the names must
    /// each refer to exactly one entry.
    pub fn assign(mut self, item: impl Into<String>, person: impl Into<String>) -> Self {
        self.assignments.push((item.into(), person.into()));
        self
    }

    /// Set the tax rate.
    pub fn tax(mut self, percentage: f64) -> Self {
        self.tax_percentage = percentage;
        self
    }

    /// Set the tip rate.
    pub fn tip(mut self, percentage: f64) -> Self {
        self.tip_percentage = percentage;
        self
    }

    /// Resolve assignments and build a validated receipt.
    ///
    /// An assignment naming an item or person that was added more than once
    /// is rejected with `AmbiguousName`.
    pub fn build(mut self) -> Result<Receipt> {
        for (item_name, person_name) in std::mem::take(&mut self.assignments) {
            let person_index = resolve("person", &person_name, &self.persons, |p| &p.name)?;
            let person_id = self.persons[person_index].id;

            let item_index = resolve("item", &item_name, &self.items, |i| &i.name)?;
            let item = &mut self.items[item_index];

            if !item.is_assigned_to(&person_id) {
                item.assigned_to.push(person_id);
            }
        }

        Receipt::new(
            self.items,
            self.tax_percentage,
            self.tip_percentage,
            self.persons,
        )
    }
}

/// Find the single entry called `name`.
fn resolve<T>(
    kind: &'static str,
    name: &str,
    entries: &[T],
    name_of: impl Fn(&T) -> &String,
) -> std::result::Result<usize, ValidationError> {
    let mut matches = entries
        .iter()
        .enumerate()
        .filter(|(_, entry)| name_of(*entry) == name)
        .map(|(index, _)| index);

    match (matches.next(), matches.next()) {
        (Some(index), None) => Ok(index),
        (Some(_), Some(_)) => Err(ValidationError::AmbiguousName {
            kind,
            name: name.to_string(),
        }),
        (None, _) => Err(ValidationError::UnknownName {
            kind,
            name: name.to_string(),
        }),
    }
}

impl Default for ReceiptBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pizza_and_soda() -> Receipt {
        ReceiptBuilder::new()
            .person("Alice")
            .person("Bob")
            .item("Pizza", 20.0)
            .item("Soda", 4.0)
            .assign("Pizza", "Alice")
            .assign("Pizza", "Bob")
            .tax(10.0)
            .tip(0.0)
            .build()
            .unwrap()
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_empty_receipt_totals() {
        let receipt = Receipt::new(vec![], 9.625, 15.0, vec![]).unwrap();
        assert_eq!(receipt.subtotal(), 0.0);
        assert_eq!(receipt.tax_amount(), 0.0);
        assert_eq!(receipt.total_with_tax_and_tip(), 0.0);
    }

    #[test]
    fn test_receipt_totals() {
        let receipt = pizza_and_soda();
        assert!(approx(receipt.subtotal(), 24.0));
        assert!(approx(receipt.tax_amount(), 2.4));
        assert!(approx(receipt.tip_amount(), 0.0));
        assert!(approx(receipt.total_with_tax(), 26.4));
        assert!(approx(receipt.total_with_tax_and_tip(), 26.4));
    }

    #[test]
    fn test_summary_matches_accessors() {
        let mut receipt = pizza_and_soda();
        receipt.set_tip_percentage(15.0).unwrap();
        let summary = receipt.summary();
        assert_eq!(summary.subtotal, receipt.subtotal());
        assert_eq!(summary.tip_amount, receipt.tip_amount());
        assert_eq!(summary.total_with_tax_and_tip, receipt.total_with_tax_and_tip());
    }

    #[test]
    fn test_builder_defaults() {
        let receipt = ReceiptBuilder::new().build().unwrap();
        assert_eq!(receipt.tax_percentage, DEFAULT_TAX_PERCENTAGE);
        assert_eq!(receipt.tip_percentage, DEFAULT_TIP_PERCENTAGE);
    }

    #[test]
    fn test_builder_unknown_person() {
        let result = ReceiptBuilder::new()
            .item("Pizza", 20.0)
            .assign("Pizza", "Carol")
            .build();
        assert!(matches!(
            result,
            Err(ModelError::InvalidAllocation(ValidationError::UnknownName { kind: "person", .. }))
        ));
    }

    #[test]
    fn test_new_rejects_negative_price() {
        let result = Receipt::new(vec![Item::new("Refund", -1.0)], 0.0, 0.0, vec![]);
        assert!(matches!(
            result,
            Err(ModelError::InvalidAllocation(ValidationError::Negative { field: "price", .. }))
        ));
    }

    #[test]
    fn test_remove_person_cascades() {
        let mut receipt = pizza_and_soda();
        let alice = receipt.persons[0].id;
        let bob = receipt.persons[1].id;
        let soda = receipt.items[1].id;
        receipt.toggle_assignment(&soda, &alice).unwrap();

        let removed = receipt.remove_person(&alice).unwrap();
        assert_eq!(removed.name, "Alice");
        assert_eq!(receipt.items[0].assigned_to, vec![bob]);
        assert!(receipt.items[1].is_unassigned());
        assert!(receipt.items.iter().all(|i| !i.is_assigned_to(&alice)));
    }

    #[test]
    fn test_remove_person_not_found() {
        let mut receipt = pizza_and_soda();
        let before = receipt.clone();
        let ghost = PersonId::generate();
        assert_eq!(
            receipt.remove_person(&ghost),
            Err(ModelError::PersonNotFound(ghost))
        );
        assert_eq!(receipt, before);
    }

    #[test]
    fn test_toggle_assignment() {
        let mut receipt = pizza_and_soda();
        let alice = receipt.persons[0].id;
        let soda = receipt.items[1].id;

        assert!(receipt.toggle_assignment(&soda, &alice).unwrap());
        assert!(receipt.items[1].is_assigned_to(&alice));
        assert!(!receipt.toggle_assignment(&soda, &alice).unwrap());
        assert!(receipt.items[1].is_unassigned());
    }

    #[test]
    fn test_toggle_assignment_unknown_person() {
        let mut receipt = pizza_and_soda();
        let soda = receipt.items[1].id;
        let ghost = PersonId::generate();
        assert_eq!(
            receipt.toggle_assignment(&soda, &ghost),
            Err(ModelError::PersonNotFound(ghost))
        );
    }

    #[test]
    fn test_add_and_remove_item() {
        let mut receipt = pizza_and_soda();
        let id = receipt.add_item("Fries", 6.0).unwrap();
        assert!(approx(receipt.subtotal(), 30.0));

        let removed = receipt.remove_item(&id).unwrap();
        assert_eq!(removed.name, "Fries");
        assert!(approx(receipt.subtotal(), 24.0));
        assert_eq!(receipt.remove_item(&id), Err(ModelError::ItemNotFound(id)));
    }

    #[test]
    fn test_add_item_rejects_bad_input() {
        let mut receipt = pizza_and_soda();
        assert!(receipt.add_item("  ", 1.0).is_err());
        assert!(receipt.add_item("Water", f64::NAN).is_err());
        assert_eq!(receipt.items.len(), 2);
    }

    #[test]
    fn test_add_person_rejects_empty_name() {
        let mut receipt = pizza_and_soda();
        assert!(matches!(
            receipt.add_person(""),
            Err(ModelError::InvalidAllocation(ValidationError::EmptyName { .. }))
        ));
        assert_eq!(receipt.person_count(), 2);
    }

    #[test]
    fn test_set_percentages() {
        let mut receipt = pizza_and_soda();
        receipt.set_tax_percentage(8.25).unwrap();
        assert_eq!(receipt.tax_percentage, 8.25);

        assert!(receipt.set_tip_percentage(-5.0).is_err());
        assert_eq!(receipt.tip_percentage, 0.0);
    }

    #[test]
    fn test_serialized_field_names() {
        let receipt = pizza_and_soda();
        let value = serde_json::to_value(&receipt).unwrap();
        assert!(value.get("taxPercentage").is_some());
        assert!(value.get("tipPercentage").is_some());
        assert!(value["items"][0].get("assignedTo").is_some());
        assert_eq!(value["persons"][0]["name"], "Alice");
    }

    #[test]
    fn test_prune_assignments() {
        let mut receipt = pizza_and_soda();
        let alice = receipt.persons[0].id;
        let stranger = PersonId::generate();
        receipt.items[0].assigned_to = vec![alice, stranger, alice];
        receipt.items[1].assigned_to = vec![stranger];

        assert_eq!(receipt.prune_assignments(), 3);
        assert_eq!(receipt.items[0].assigned_to, vec![alice]);
        assert!(receipt.items[1].is_unassigned());
        assert!(validate_receipt(&receipt).is_ok());
        assert_eq!(receipt.prune_assignments(), 0);
    }

    #[test]
    fn test_builder_rejects_ambiguous_names() {
        let result = ReceiptBuilder::new()
            .person("Sam")
            .person("Sam")
            .item("Pizza", 20.0)
            .assign("Pizza", "Sam")
            .build();
        assert!(matches!(
            result,
            Err(ModelError::InvalidAllocation(ValidationError::AmbiguousName { kind: "person", .. }))
        ));

        let result = ReceiptBuilder::new()
            .person("Sam")
            .item("Soda", 2.0)
            .item("Soda", 2.0)
            .assign("Soda", "Sam")
            .build();
        assert!(matches!(
            result,
            Err(ModelError::InvalidAllocation(ValidationError::AmbiguousName { kind: "item", .. }))
        ));

        // Repeated names are fine when no assignment refers to them.
        let receipt = ReceiptBuilder::new()
            .item("Soda", 2.0)
            .item("Soda", 2.0)
            .build()
            .unwrap();
        assert_eq!(receipt.items.len(), 2);
    }
}
