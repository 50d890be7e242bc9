//! Strong identifier types for the receipt splitter.
//!
//! All identifiers are newtypes so a `PersonId` can never be passed where an
//! `ItemId` is expected. Each is 16 random bytes, rendered as lowercase hex.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Length of every identifier in bytes.
pub const ID_LEN: usize = 16;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub [u8; ID_LEN]);

        impl $name {
            /// Generate a fresh random identifier.
            pub fn generate() -> Self {
                Self(rand::random())
            }

            /// Create from raw bytes.
            pub const fn from_bytes(bytes: [u8; ID_LEN]) -> Self {
                Self(bytes)
            }

            /// Get the raw bytes.
            pub const fn as_bytes(&self) -> &[u8; ID_LEN] {
                &self.0
            }

            /// Convert to hex string.
            pub fn to_hex(&self) -> String {
                hex::encode(self.0)
            }

            /// Parse from hex string.
            ///
            /// The hyphenated 8-4-4-4-12 UUID layout is accepted as well.
            pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
                let bytes = if s.len() == 36 && s.contains('-') {
                    hex::decode(s.replace('-', ""))?
                } else {
                    hex::decode(s)?
                };
                if bytes.len() != ID_LEN {
                    return Err(hex::FromHexError::InvalidStringLength);
                }
                let mut arr = [0u8; ID_LEN];
                arr.copy_from_slice(&bytes);
                Ok(Self(arr))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), &self.to_hex()[..8])
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", &self.to_hex()[..8])
            }
        }

        impl From<[u8; ID_LEN]> for $name {
            fn from(bytes: [u8; ID_LEN]) -> Self {
                Self(bytes)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.to_hex())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                Self::from_hex(&s).map_err(de::Error::custom)
            }
        }
    };
}

define_id!(
    /// Identifier of a receipt within a collection.
    ReceiptId
);

define_id!(
    /// Identifier of a line item within a receipt.
    ItemId
);

define_id!(
    /// Identifier of a person within a receipt.
    PersonId
);
