//! Hosted-page redirect flow (card, PayPal): the payment service mints a
//! URL and the visitor completes payment there.

use url::Url;

use super::MethodFlow;

/// Instructions payload for a redirect payment.
#[derive(Debug, Clone, PartialEq)]
pub struct RedirectPayload {
    pub payment_url: Url,
}

impl MethodFlow for RedirectPayload {
    fn instructions(&self) -> Vec<String> {
        vec![
            format!("Complete your payment at: {}", self.payment_url),
            "You will be brought back here once the provider confirms.".to_owned(),
        ]
    }
}
