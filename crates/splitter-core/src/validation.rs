//! Receipt validation: amount checks, user input parsing, and structural rules.

use std::collections::HashSet;

use crate::error::ValidationError;
use crate::receipt::Receipt;

/// Check that an amount is finite and not negative.
pub fn validate_amount(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFinite { field });
    }
    if value < 0.0 {
        return Err(ValidationError::Negative { field, value });
    }
    Ok(value)
}

/// Parse user-entered text (a price or a percentage) into an amount.
///
/// Surrounding whitespace is ignored. Anything that is not a finite,
/// non-negative decimal number is rejected.
pub fn parse_amount(field: &'static str, input: &str) -> Result<f64, ValidationError> {
    let trimmed = input.trim();
    let value: f64 = trimmed.parse().map_err(|_| ValidationError::Malformed {
        field,
        input: input.to_string(),
    })?;
    validate_amount(field, value)
}

/// Check that a display name is not blank. Returns the trimmed name.
pub fn validate_name(field: &'static str, name: String) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyName { field });
    }
    Ok(trimmed.to_string())
}

/// Validate a receipt's amounts and structure.
///
/// This performs:
/// - Price and percentage checks
/// - Id uniqueness for persons and items
/// - Assignment checks (every assignee is on the receipt, listed once)
pub fn validate_receipt(receipt: &Receipt) -> Result<(), ValidationError> {
    // 1. Rates
    validate_amount("tax percentage", receipt.tax_percentage)?;
    validate_amount("tip percentage", receipt.tip_percentage)?;

    // 2. Person ids
    let mut persons = HashSet::with_capacity(receipt.persons.len());
    for person in &receipt.persons {
        if !persons.insert(person.id) {
            return Err(ValidationError::DuplicateId(person.id.to_hex()));
        }
    }

    // 3. Items and their assignments
    let mut items = HashSet::with_capacity(receipt.items.len());
    for item in &receipt.items {
        if !items.insert(item.id) {
            return Err(ValidationError::DuplicateId(item.id.to_hex()));
        }

        validate_amount("price", item.price)?;

        let mut assignees = HashSet::with_capacity(item.assigned_to.len());
        for person in &item.assigned_to {
            if !persons.contains(person) {
                return Err(ValidationError::UnknownAssignee {
                    item: item.id,
                    person: *person,
                });
            }
            if !assignees.insert(*person) {
                return Err(ValidationError::DuplicateAssignee {
                    item: item.id,
                    person: *person,
                });
            }
        }
    }

    Ok(())
}
