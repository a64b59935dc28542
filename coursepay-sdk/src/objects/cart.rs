//! Cart line items and the mutations mirrored to the cart-sync service.

use compact_str::CompactString;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use url::Url;

/// Stable course identifier, unique within a cart.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CourseId(pub CompactString);

impl CourseId {
    pub fn new(id: impl Into<CompactString>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for CourseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for CourseId {
    fn from(s: &str) -> Self {
        Self(CompactString::from(s))
    }
}

/// One course selected for purchase, with its pricing snapshot taken at
/// the time of selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: CourseId,
    pub title: String,
    /// Instructor display name.
    pub instructor: String,
    pub thumbnail: Url,
    /// Original list price.
    pub price: Decimal,
    /// Promotional price, when one applies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discounted_price: Option<Decimal>,
}

impl CartItem {
    /// The price this item actually contributes to the cart total:
    /// the discounted price when present, the list price otherwise.
    pub fn effective_price(&self) -> Decimal {
        self.discounted_price.unwrap_or(self.price)
    }
}

/// A cart mutation mirrored server-side by the cart-sync service.
///
/// The local cart store is the authority for UI purposes; these are
/// best-effort echoes of what it already did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum CartMutation {
    Add { item: CartItem },
    Remove { id: CourseId },
    Clear,
}
