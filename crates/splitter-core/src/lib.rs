//! # Splitter Core
//!
//! The receipt model for the receipt splitter: items, persons, tax and tip
//! rates, and the rules that turn them into per-person totals.
//!
//! This crate contains no I/O and no storage. It is pure computation over
//! receipt values.
//!
//! ## Key Types
//!
//! - [`Receipt`] - Items, persons, and tax/tip percentages
//! - [`Item`] - A priced line entry, optionally assigned to persons
//! - [`Person`] - A participant who owes a share
//! - [`PersonShare`] / [`PersonTotal`] - Results of an allocation pass
//!
//! ## Allocation
//!
//! An item with assignees is split evenly among them; an item with none is
//! split evenly across everyone on the receipt. Tax and tip are divided by
//! head count. See [`allocation`].

pub mod allocation;
pub mod error;
pub mod receipt;
pub mod types;
pub mod validation;

pub use allocation::{PersonShare, PersonTotal};
pub use error::{ModelError, ValidationError};
pub use receipt::{
    Item, Person, Receipt, ReceiptBuilder, ReceiptSummary, DEFAULT_TAX_PERCENTAGE,
    DEFAULT_TIP_PERCENTAGE,
};
pub use types::{ItemId, PersonId, ReceiptId};
pub use validation::{parse_amount, validate_amount, validate_name, validate_receipt};
