//! Per-person allocation of a receipt.
//!
//! Item prices are split among the persons assigned to each item, or evenly
//! across every person on the receipt when an item has no assignees. Tax and
//! tip are then divided evenly by head count, independent of what each person
//! ordered.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};
use crate::receipt::Receipt;
use crate::types::PersonId;

/// A person's share of the item subtotal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonShare {
    pub person_id: PersonId,
    pub name: String,
    pub subtotal: f64,
}

/// A person's share including their even portion of tax and tip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonTotal {
    pub person_id: PersonId,
    pub name: String,
    pub subtotal: f64,
    pub tax: f64,
    pub tip: f64,
}

impl PersonTotal {
    pub fn total_with_tax(&self) -> f64 {
        self.subtotal + self.tax
    }

    pub fn total_with_tax_and_tip(&self) -> f64 {
        self.subtotal + self.tax + self.tip
    }
}

impl Receipt {
    /// Split the item subtotal across persons, in receipt person order.
    ///
    /// # Errors
    /// - `NoPersons` if an unassigned item has no one to be split across.
    /// - `UnknownAssignee` if an item is assigned to someone not on the receipt.
    pub fn per_person_allocation(&self) -> Result<Vec<PersonShare>> {
        let mut shares: Vec<PersonShare> = self
            .persons
            .iter()
            .map(|person| PersonShare {
                person_id: person.id,
                name: person.name.clone(),
                subtotal: 0.0,
            })
            .collect();

        for item in &self.items {
            if item.is_unassigned() {
                if shares.is_empty() {
                    return Err(ValidationError::NoPersons { item: item.id }.into());
                }
                let split = item.price / shares.len() as f64;
                for share in &mut shares {
                    share.subtotal += split;
                }
            } else {
                let split = item.price / item.assigned_to.len() as f64;
                for person in &item.assigned_to {
                    let share = shares
                        .iter_mut()
                        .find(|s| s.person_id == *person)
                        .ok_or(ValidationError::UnknownAssignee {
                            item: item.id,
                            person: *person,
                        })?;
                    share.subtotal += split;
                }
            }
        }

        Ok(shares)
    }

    /// Per-person totals with tax and tip divided evenly by head count.
    pub fn per_person_totals(&self) -> Result<Vec<PersonTotal>> {
        let shares = self.per_person_allocation()?;
        if shares.is_empty() {
            return Ok(Vec::new());
        }

        let count = shares.len() as f64;
        let tax = self.tax_amount() / count;
        let tip = self.tip_amount() / count;

        Ok(shares
            .into_iter()
            .map(|share| PersonTotal {
                person_id: share.person_id,
                name: share.name,
                subtotal: share.subtotal,
                tax,
                tip,
            })
            .collect())
    }
}
