//! Bank transfer flow: account details plus a QR string and a transfer
//! reference derived from the order id.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::MethodFlow;

/// The merchant account visitors transfer into. Deployment configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankAccount {
    pub bank_name: String,
    pub account_number: String,
    pub account_holder: String,
}

/// Instructions payload for a manual bank transfer.
#[derive(Debug, Clone, PartialEq)]
pub struct BankTransferPayload {
    pub bank_name: String,
    pub account_number: String,
    pub account_holder: String,
    pub amount: Decimal,
    /// Transfer reference the visitor must include so the backend can
    /// reconcile the payment. Deterministic per order.
    pub reference: String,
    pub qr_data: String,
}

/// Build the bank-transfer payload for one order.
pub fn build(account: &BankAccount, order_id: Uuid, amount: Decimal) -> BankTransferPayload {
    let reference = transfer_reference(order_id);
    let qr_data = format!(
        "bank://{}?amount={amount}&ref={reference}",
        account.account_number
    );
    BankTransferPayload {
        bank_name: account.bank_name.clone(),
        account_number: account.account_number.clone(),
        account_holder: account.account_holder.clone(),
        amount,
        reference,
        qr_data,
    }
}

/// `CP-` plus the first 8 hex digits of the order id, uppercased.
fn transfer_reference(order_id: Uuid) -> String {
    let hex = order_id.simple().to_string();
    let short = hex.get(..8).unwrap_or(&hex);
    format!("CP-{}", short.to_uppercase())
}

impl MethodFlow for BankTransferPayload {
    fn instructions(&self) -> Vec<String> {
        vec![
            format!("Transfer {} to the account below.", self.amount),
            format!("Bank: {}", self.bank_name),
            format!("Account number: {}", self.account_number),
            format!("Account holder: {}", self.account_holder),
            format!("Transfer reference: {}", self.reference),
            "Or scan the QR code with your banking app.".to_owned(),
        ]
    }
}
