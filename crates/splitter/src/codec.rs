//! JSON encoding of the whole receipt collection.
//!
//! The collection is one document:
//!
//! ```json
//! {"version": 1, "receipts": [ ... ]}
//! ```
//!
//! A bare array of receipts (the unversioned layout) is still accepted when
//! decoding; it is always written back in the versioned form.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use splitter_core::Receipt;

use crate::error::{Result, SplitError};

/// The document format version written by [`encode`].
pub const FORMAT_VERSION: u32 = 1;

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    version: u32,
    receipts: &'a [Receipt],
}

#[derive(Deserialize)]
struct Envelope {
    version: u32,
    receipts: Vec<Receipt>,
}

/// Serialize a collection into a single blob.
pub fn encode(receipts: &[Receipt]) -> Result<Vec<u8>> {
    let envelope = EnvelopeRef {
        version: FORMAT_VERSION,
        receipts,
    };
    Ok(serde_json::to_vec(&envelope)?)
}

/// Deserialize a blob written by [`encode`], or a legacy bare array.
pub fn decode(bytes: &[u8]) -> Result<Vec<Receipt>> {
    let value: Value =
        serde_json::from_slice(bytes).map_err(|e| SplitError::Parse(e.to_string()))?;

    match value {
        Value::Array(_) => {
            serde_json::from_value(value).map_err(|e| SplitError::Parse(e.to_string()))
        }
        Value::Object(_) => {
            let envelope: Envelope =
                serde_json::from_value(value).map_err(|e| SplitError::Parse(e.to_string()))?;
            if envelope.version != FORMAT_VERSION {
                return Err(SplitError::Parse(format!(
                    "unsupported document version {} (expected {})",
                    envelope.version, FORMAT_VERSION
                )));
            }
            Ok(envelope.receipts)
        }
        other => Err(SplitError::Parse(format!(
            "expected a receipt document, found {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
