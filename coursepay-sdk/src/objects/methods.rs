//! Payment-method directory types.
//!
//! Supplied by the payment-method directory service and immutable from
//! the client's perspective for the duration of a checkout session.

use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use url::Url;

/// Stable settlement-channel code, e.g. `"MOMO"`, `"VNPAY"`, `"BANK"`,
/// `"CRYPTO"`, `"PAYPAL"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MethodCode(pub CompactString);

impl MethodCode {
    pub fn new(code: impl Into<CompactString>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for MethodCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for MethodCode {
    fn from(s: &str) -> Self {
        Self(CompactString::from(s))
    }
}

/// Coarse settlement category. Drives which instruction flow the
/// checkout renders for a method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MethodCategory {
    Card,
    Bank,
    Digital,
    Crypto,
}

/// One selectable settlement channel from the directory service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethod {
    pub id: MethodCode,
    pub name: String,
    pub category: MethodCategory,
    pub description: String,
    pub icon: Url,
}
