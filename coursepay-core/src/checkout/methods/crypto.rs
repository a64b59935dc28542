//! Crypto flow: receiving address, network, and the exact amount to send.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::MethodFlow;

/// The merchant wallet visitors send coins to. Deployment configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CryptoWallet {
    /// Network label shown to the visitor, e.g. "USDT (TRC-20)".
    pub network: String,
    pub address: String,
}

/// Instructions payload for a crypto payment.
#[derive(Debug, Clone, PartialEq)]
pub struct CryptoPayload {
    pub address: String,
    pub network: String,
    pub amount: Decimal,
}

/// Build the crypto payload for one order.
pub fn build(wallet: &CryptoWallet, amount: Decimal) -> CryptoPayload {
    CryptoPayload {
        address: wallet.address.clone(),
        network: wallet.network.clone(),
        amount,
    }
}

impl MethodFlow for CryptoPayload {
    fn instructions(&self) -> Vec<String> {
        vec![
            format!("Send exactly {} on {}.", self.amount, self.network),
            format!("Receiving address: {}", self.address),
            "Sending a different amount or network will delay reconciliation.".to_owned(),
        ]
    }
}
