//! Typed IDs for backend entity references.
//!
//! The REST backend hands out opaque string identifiers. Wrapping them keeps a
//! `TaxId` from being passed where a `BudgetId` is expected.

use serde::{Deserialize, Serialize};

/// Macro to generate typed string ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Creates an ID from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the ID as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Returns the inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }

            /// Returns true if the ID is blank.
            #[must_use]
            pub fn is_empty(&self) -> bool {
                self.0.trim().is_empty()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

typed_id!(BudgetId, "Backend identifier of a budget record.");
typed_id!(TaxId, "Unique identifier for a tax rule.");
typed_id!(CategoryId, "Unique identifier for a budget category.");
typed_id!(CurrencyId, "Unique identifier for a currency record.");
typed_id!(MerchantId, "Unique identifier for a merchant.");
typed_id!(UnitId, "Unique identifier for a unit of measure.");

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
