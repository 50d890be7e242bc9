//! Proptest generators for property-based testing.
//!
//! [`amount`] and [`percentage`] produce hand-entered looking values in whole
//! cents. [`any_amount`] covers every finite non-negative `f64`, including
//! subnormals and values needing all 17 significant digits.

use proptest::prelude::*;

use splitter_core::{Item, ItemId, Person, PersonId, Receipt, ReceiptId};

/// Generate a random ReceiptId.
pub fn receipt_id() -> impl Strategy<Value = ReceiptId> {
    any::<[u8; 16]>().prop_map(ReceiptId::from_bytes)
}

/// Generate a random PersonId.
pub fn person_id() -> impl Strategy<Value = PersonId> {
    any::<[u8; 16]>().prop_map(PersonId::from_bytes)
}

/// Generate a random ItemId.
pub fn item_id() -> impl Strategy<Value = ItemId> {
    any::<[u8; 16]>().prop_map(ItemId::from_bytes)
}

/// Generate a price between 0.00 and 999.99.
pub fn amount() -> impl Strategy<Value = f64> {
    (0u32..100_000).prop_map(|cents| f64::from(cents) / 100.0)
}

/// Generate a tax or tip rate between 0.00 and 49.99 percent.
pub fn percentage() -> impl Strategy<Value = f64> {
    (0u32..5_000).prop_map(|hundredths| f64::from(hundredths) / 100.0)
}

/// Generate any finite, non-negative `f64`.
///
/// Bit patterns below the infinity encoding are exactly the non-negative
/// finite doubles.
pub fn any_amount() -> impl Strategy<Value = f64> {
    (0u64..0x7FF0_0000_0000_0000).prop_map(f64::from_bits)
}

/// Generate a person name.
pub fn person_name() -> impl Strategy<Value = String> {
    "[A-Z][a-z]{1,8}".prop_map(String::from)
}

/// Generate an item name.
pub fn item_name() -> impl Strategy<Value = String> {
    "[A-Z][a-z]{2,10}( [a-z]{2,8})?".prop_map(String::from)
}

/// Parameters for generating a receipt.
#[derive(Debug, Clone)]
pub struct ReceiptParams {
    pub persons: Vec<String>,
    /// Name, price, and the indices of the persons sharing the item.
    pub items: Vec<(String, f64, Vec<usize>)>,
    pub tax_percentage: f64,
    pub tip_percentage: f64,
}

impl Arbitrary for ReceiptParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            prop::collection::vec(person_name(), 0..6),
            prop::collection::vec((item_name(), amount(), any::<u8>()), 0..10),
            percentage(),
            percentage(),
        )
            .prop_map(|(persons, items, tax, tip)| {
                let items = items
                    .into_iter()
                    .map(|(name, price, mask)| {
                        let assignees = (0..persons.len())
                            .filter(|bit| mask & (1u8 << bit) != 0)
                            .collect();
                        (name, price, assignees)
                    })
                    .collect();
                ReceiptParams {
                    persons,
                    items,
                    tax_percentage: tax,
                    tip_percentage: tip,
                }
            })
            .boxed()
    }
}

/// Build a receipt from parameters.
pub fn receipt_from_params(params: &ReceiptParams) -> Receipt {
    let persons: Vec<Person> = params.persons.iter().map(Person::new).collect();
    let items = params
        .items
        .iter()
        .map(|(name, price, assignees)| {
            Item::new(name, *price).with_assignees(assignees.iter().map(|&i| persons[i].id))
        })
        .collect();

    Receipt::new(items, params.tax_percentage, params.tip_percentage, persons)
        .expect("generated receipt is valid")
}

/// Generate a receipt.
pub fn receipt() -> impl Strategy<Value = Receipt> {
    any::<ReceiptParams>().prop_map(|params| receipt_from_params(&params))
}

/// Generate a receipt with no persons and arbitrary finite amounts.
pub fn wide_receipt() -> impl Strategy<Value = Receipt> {
    (
        prop::collection::vec((item_name(), any_amount()), 0..8),
        any_amount(),
        any_amount(),
    )
        .prop_map(|(items, tax, tip)| {
            let items = items
                .into_iter()
                .map(|(name, price)| Item::new(name, price))
                .collect();
            Receipt::new(items, tax, tip, Vec::new()).expect("generated receipt is valid")
        })
}

/// Generate a collection of receipts.
pub fn receipts(max_len: usize) -> impl Strategy<Value = Vec<Receipt>> {
    prop::collection::vec(receipt(), 0..=max_len)
}
