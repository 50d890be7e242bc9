//! Scenario vectors with known per-person figures.
//!
//! Each vector describes a receipt by names and the amount every person is
//! expected to owe. Any change to the allocation rules shows up here first.

use serde::Serialize;

use splitter_core::{Receipt, ReceiptBuilder};

/// What one person is expected to owe.
#[derive(Debug, Clone, Serialize)]
pub struct ExpectedShare {
    pub name: &'static str,
    pub subtotal: f64,
    pub tax: f64,
    pub tip: f64,
    pub total: f64,
}

/// A named receipt scenario.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    pub persons: &'static [&'static str],
    /// Item name, price, and the names of the persons sharing it.
    pub items: &'static [(&'static str, f64, &'static [&'static str])],
    pub tax_percentage: f64,
    pub tip_percentage: f64,
    /// Expected shares, in person order.
    pub expected: Vec<ExpectedShare>,
}

fn share(name: &'static str, subtotal: f64, tax: f64, tip: f64, total: f64) -> ExpectedShare {
    ExpectedShare {
        name,
        subtotal,
        tax,
        tip,
        total,
    }
}

/// Get all scenario vectors.
pub fn all_vectors() -> Vec<ScenarioVector> {
    vec![
        ScenarioVector {
            name: "shared pizza, unassigned soda",
            persons: &["Alice", "Bob"],
            items: &[("Pizza", 20.0, &["Alice", "Bob"]), ("Soda", 4.0, &[])],
            tax_percentage: 0.0,
            tip_percentage: 0.0,
            expected: vec![
                share("Alice", 12.0, 0.0, 0.0, 12.0),
                share("Bob", 12.0, 0.0, 0.0, 12.0),
            ],
        },
        ScenarioVector {
            name: "ten percent tax",
            persons: &["Alice", "Bob"],
            items: &[("Pizza", 20.0, &["Alice", "Bob"]), ("Soda", 4.0, &[])],
            tax_percentage: 10.0,
            tip_percentage: 0.0,
            expected: vec![
                share("Alice", 12.0, 1.2, 0.0, 13.2),
                share("Bob", 12.0, 1.2, 0.0, 13.2),
            ],
        },
        ScenarioVector {
            name: "tax and tip by head count",
            persons: &["Alice", "Bob"],
            items: &[("Steak", 30.0, &["Alice"]), ("Bread", 2.0, &[])],
            tax_percentage: 10.0,
            tip_percentage: 20.0,
            expected: vec![
                share("Alice", 31.0, 1.6, 3.2, 35.8),
                share("Bob", 1.0, 1.6, 3.2, 5.8),
            ],
        },
        ScenarioVector {
            name: "default rates, one diner",
            persons: &["Carol"],
            items: &[("Burger", 10.0, &[])],
            tax_percentage: 9.625,
            tip_percentage: 15.0,
            expected: vec![share("Carol", 10.0, 0.9625, 1.5, 12.4625)],
        },
        ScenarioVector {
            name: "partial assignments",
            persons: &["Alice", "Bob", "Carol"],
            items: &[
                ("Nachos", 9.0, &["Alice", "Bob", "Carol"]),
                ("Wine", 30.0, &["Alice", "Carol"]),
                ("Water", 0.0, &[]),
            ],
            tax_percentage: 0.0,
            tip_percentage: 0.0,
            expected: vec![
                share("Alice", 18.0, 0.0, 0.0, 18.0),
                share("Bob", 3.0, 0.0, 0.0, 3.0),
                share("Carol", 18.0, 0.0, 0.0, 18.0),
            ],
        },
        ScenarioVector {
            name: "no items",
            persons: &["Alice", "Bob"],
            items: &[],
            tax_percentage: 10.0,
            tip_percentage: 10.0,
            expected: vec![
                share("Alice", 0.0, 0.0, 0.0, 0.0),
                share("Bob", 0.0, 0.0, 0.0, 0.0),
            ],
        },
    ]
}

/// Build the receipt a vector describes.
pub fn receipt_from_vector(vector: &ScenarioVector) -> Receipt {
    let mut builder = ReceiptBuilder::new()
        .tax(vector.tax_percentage)
        .tip(vector.tip_percentage);

    for person in vector.persons {
        builder = builder.person(*person);
    }
    for (item, price, assignees) in vector.items {
        builder = builder.item(*item, *price);
        for person in *assignees {
            builder = builder.assign(*item, *person);
        }
    }

    builder.build().expect("scenario vector is valid")
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}

/// Check every vector against the allocation rules.
///
/// Returns the vector name, whether it matched, and a description of the
/// first mismatch (empty when it matched).
pub fn verify_all_vectors() -> Vec<(String, bool, String)> {
    all_vectors()
        .iter()
        .map(|v| {
            let detail = match receipt_from_vector(v).per_person_totals() {
                Ok(totals) if totals.len() != v.expected.len() => format!(
                    "expected {} persons, got {}",
                    v.expected.len(),
                    totals.len()
                ),
                Ok(totals) => totals
                    .iter()
                    .zip(&v.expected)
                    .find_map(|(got, want)| {
                        let matches = got.name == want.name
                            && approx(got.subtotal, want.subtotal)
                            && approx(got.tax, want.tax)
                            && approx(got.tip, want.tip)
                            && approx(got.total_with_tax_and_tip(), want.total);
                        (!matches).then(|| format!("{}: got {:?}", want.name, got))
                    })
                    .unwrap_or_default(),
                Err(e) => e.to_string(),
            };
            (v.name.to_string(), detail.is_empty(), detail)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_vectors_match() {
        for (name, ok, detail) in verify_all_vectors() {
            assert!(ok, "Vector '{}' mismatched: {}", name, detail);
        }
    }

    #[test]
    fn test_vector_names_unique() {
        let vectors = all_vectors();
        let mut names: Vec<_> = vectors.iter().map(|v| v.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), vectors.len());
    }

    #[test]
    fn test_vectors_conserve_totals() {
        for vector in all_vectors() {
            let receipt = receipt_from_vector(&vector);
            let owed: f64 = vector.expected.iter().map(|s| s.total).sum();
            assert!(
                approx(owed, receipt.total_with_tax_and_tip()),
                "Vector '{}' does not add up",
                vector.name
            );
        }
    }

    #[test]
    fn test_vectors_serialize() {
        let json = serde_json::to_value(all_vectors()).unwrap();
        assert_eq!(json.as_array().unwrap().len(), all_vectors().len());
        assert_eq!(json[0]["expected"][0]["name"], "Alice");
    }
}
