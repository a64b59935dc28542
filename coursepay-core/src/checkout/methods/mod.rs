//! Per-method payment flows.
//!
//! Each settlement category gets its own module producing its payload and
//! instruction lines through the common [`MethodFlow`] trait, so nothing
//! outside this tree branches on method strings.

pub mod bank;
pub mod crypto;
pub mod momo;
pub mod redirect;

pub use bank::{BankAccount, BankTransferPayload};
pub use crypto::{CryptoPayload, CryptoWallet};
pub use momo::{MOMO_COUNTDOWN_SECS, MomoPayload};
pub use redirect::RedirectPayload;

use serde::{Deserialize, Serialize};

/// The capability set every method flow implements.
pub trait MethodFlow {
    /// Human-readable instruction lines shown while awaiting payment.
    fn instructions(&self) -> Vec<String>;
}

/// Method-specific payload displayed in the awaiting-payment state.
///
/// Built fresh on method selection (and on QR regeneration) and discarded
/// whenever the visitor goes back to method selection.
#[derive(Debug, Clone, PartialEq)]
pub enum MethodPayload {
    BankTransfer(BankTransferPayload),
    MomoQr(MomoPayload),
    Crypto(CryptoPayload),
    Redirect(RedirectPayload),
}

impl MethodPayload {
    pub fn instructions(&self) -> Vec<String> {
        match self {
            MethodPayload::BankTransfer(p) => p.instructions(),
            MethodPayload::MomoQr(p) => p.instructions(),
            MethodPayload::Crypto(p) => p.instructions(),
            MethodPayload::Redirect(p) => p.instructions(),
        }
    }
}

/// Static receiving details for methods settled by the visitor pushing
/// funds (bank transfer, crypto). Part of the deployment configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceivingDetails {
    pub bank: BankAccount,
    pub crypto: CryptoWallet,
}
