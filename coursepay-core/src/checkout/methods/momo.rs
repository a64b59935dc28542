//! MoMo-style e-wallet flow: a time-boxed QR code plus deep link.
//!
//! The QR is valid for [`MOMO_COUNTDOWN_SECS`]. Reaching zero flips the
//! payload into an expired display state; it does not fail the order.
//! Regeneration issues a brand-new QR token with a fresh countdown.

use rust_decimal::Decimal;
use uuid::Uuid;

use super::MethodFlow;

/// How long a generated QR stays scannable, in seconds.
pub const MOMO_COUNTDOWN_SECS: u32 = 120;

/// Instructions payload for an e-wallet QR payment.
#[derive(Debug, Clone, PartialEq)]
pub struct MomoPayload {
    pub qr_data: String,
    pub deeplink: String,
    pub amount: Decimal,
    pub countdown_secs: u32,
    /// Set when the countdown reached zero; the visitor must regenerate.
    pub expired: bool,
}

/// Build a fresh QR payload for one order. Each call mints a new token.
pub fn build(order_id: Uuid, amount: Decimal) -> MomoPayload {
    let token = Uuid::new_v4().simple().to_string();
    MomoPayload {
        qr_data: format!("momo://pay?token={token}&amount={amount}&order={order_id}"),
        deeplink: format!("https://momo.vn/pay/{token}"),
        amount,
        countdown_secs: MOMO_COUNTDOWN_SECS,
        expired: false,
    }
}

impl MomoPayload {
    pub fn expire(&mut self) {
        self.expired = true;
    }
}

impl MethodFlow for MomoPayload {
    fn instructions(&self) -> Vec<String> {
        if self.expired {
            return vec![
                "This QR code has expired.".to_owned(),
                "Generate a new code to continue.".to_owned(),
            ];
        }
        vec![
            format!("Scan the QR code in your MoMo app to pay {}.", self.amount),
            format!("Or open the app directly: {}", self.deeplink),
            format!("The code expires in {} seconds.", self.countdown_secs),
        ]
    }
}
