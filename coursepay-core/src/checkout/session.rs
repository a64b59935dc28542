//! The pure checkout state machine.
//!
//! No I/O, no timers: transitions are synchronous methods returning
//! `Result`, which keeps every edge testable without a runtime. The
//! orchestrator owns the side effects around these transitions.

use coursepay_sdk::objects::PaymentMethod;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::methods::MethodPayload;

/// Fixed checkout tax: 10% of the cart subtotal.
pub fn tax_rate() -> Decimal {
    Decimal::new(1, 1)
}

/// `subtotal + subtotal * 10%`, the single rounding path for the whole
/// session. Every method's instructions display this exact value.
pub fn final_amount_for(cart_total: Decimal) -> Decimal {
    cart_total + cart_total * tax_rate()
}

/// Where a purchase attempt currently stands.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckoutState {
    /// The visitor is choosing a payment method.
    SelectingMethod,
    /// Method-specific instructions are displayed; waiting on the visitor
    /// or the provider.
    AwaitingPayment {
        method: PaymentMethod,
        payload: MethodPayload,
    },
    /// The visitor asserted completion (or a redirect returned); the
    /// backend is confirming. Guards against duplicate submission.
    Processing { method: PaymentMethod },
    /// Terminal: the backend confirmed the payment.
    Succeeded { order_id: Uuid },
    /// Terminal for the attempt: the backend rejected the payment. The
    /// visitor may restart from method selection.
    Failed,
}

impl CheckoutState {
    /// Short state label, as used in transition errors and logs.
    pub fn name(&self) -> &'static str {
        match self {
            CheckoutState::SelectingMethod => "selecting-method",
            CheckoutState::AwaitingPayment { .. } => "awaiting-payment",
            CheckoutState::Processing { .. } => "processing",
            CheckoutState::Succeeded { .. } => "succeeded",
            CheckoutState::Failed => "failed",
        }
    }
}

/// A transition was requested from a state that does not allow it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot {action} from the {from} state")]
pub struct TransitionError {
    pub action: &'static str,
    pub from: &'static str,
}

impl TransitionError {
    fn new(action: &'static str, from: &CheckoutState) -> Self {
        Self {
            action,
            from: from.name(),
        }
    }
}

/// One in-progress purchase attempt.
///
/// `final_amount` is computed once at construction and never recomputed;
/// switching methods within the session cannot change it. The `epoch`
/// counter is bumped by every transition that invalidates in-flight work
/// (polls, countdowns), so stale async results can be detected and
/// discarded instead of applied blindly.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutSession {
    order_id: Uuid,
    final_amount: Decimal,
    epoch: u64,
    state: CheckoutState,
}

impl CheckoutSession {
    /// Start a session for an order created from a cart with the given
    /// subtotal.
    pub fn new(order_id: Uuid, cart_total: Decimal) -> Self {
        Self {
            order_id,
            final_amount: final_amount_for(cart_total),
            epoch: 0,
            state: CheckoutState::SelectingMethod,
        }
    }

    pub fn order_id(&self) -> Uuid {
        self.order_id
    }

    pub fn final_amount(&self) -> Decimal {
        self.final_amount
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn state(&self) -> &CheckoutState {
        &self.state
    }

    fn bump(&mut self) {
        self.epoch += 1;
    }

    /// Selecting-method → Awaiting-payment.
    pub fn select_method(
        &mut self,
        method: PaymentMethod,
        payload: MethodPayload,
    ) -> Result<(), TransitionError> {
        if !matches!(self.state, CheckoutState::SelectingMethod) {
            return Err(TransitionError::new("select a method", &self.state));
        }
        self.state = CheckoutState::AwaitingPayment { method, payload };
        self.bump();
        Ok(())
    }

    /// Awaiting-payment → Selecting-method, discarding all method-specific
    /// payload state.
    pub fn choose_another(&mut self) -> Result<(), TransitionError> {
        if !matches!(self.state, CheckoutState::AwaitingPayment { .. }) {
            return Err(TransitionError::new("choose another method", &self.state));
        }
        self.state = CheckoutState::SelectingMethod;
        self.bump();
        Ok(())
    }

    /// Flip a time-boxed QR into its expired display state. Stays in
    /// Awaiting-payment; expiry is recoverable, not a failure.
    pub fn expire_countdown(&mut self) -> Result<(), TransitionError> {
        match &mut self.state {
            CheckoutState::AwaitingPayment {
                payload: MethodPayload::MomoQr(momo),
                ..
            } => {
                momo.expire();
                Ok(())
            }
            other => Err(TransitionError::new("expire the countdown", other)),
        }
    }

    /// Re-enter Awaiting-payment with a freshly generated payload (after
    /// QR expiry). The final amount is untouched.
    pub fn regenerate(&mut self, payload: MethodPayload) -> Result<(), TransitionError> {
        match &mut self.state {
            CheckoutState::AwaitingPayment {
                payload: current, ..
            } => {
                *current = payload;
                self.bump();
                Ok(())
            }
            other => Err(TransitionError::new("regenerate the payload", other)),
        }
    }

    /// Awaiting-payment → Processing, on "I have transferred" or a
    /// returning redirect. Calling this again while Processing is the
    /// duplicate-submission case and errors.
    pub fn confirm_payment(&mut self) -> Result<(), TransitionError> {
        match std::mem::replace(&mut self.state, CheckoutState::SelectingMethod) {
            CheckoutState::AwaitingPayment { method, .. } => {
                self.state = CheckoutState::Processing { method };
                self.bump();
                Ok(())
            }
            other => {
                let err = TransitionError::new("confirm payment", &other);
                self.state = other;
                Err(err)
            }
        }
    }

    /// Processing → Succeeded.
    pub fn resolve_succeeded(&mut self) -> Result<(), TransitionError> {
        if !matches!(self.state, CheckoutState::Processing { .. }) {
            return Err(TransitionError::new("resolve the payment", &self.state));
        }
        self.state = CheckoutState::Succeeded {
            order_id: self.order_id,
        };
        self.bump();
        Ok(())
    }

    /// Processing → Failed.
    pub fn resolve_failed(&mut self) -> Result<(), TransitionError> {
        if !matches!(self.state, CheckoutState::Processing { .. }) {
            return Err(TransitionError::new("resolve the payment", &self.state));
        }
        self.state = CheckoutState::Failed;
        self.bump();
        Ok(())
    }

    /// Failed → Selecting-method, for another attempt at the same order.
    pub fn restart(&mut self) -> Result<(), TransitionError> {
        if !matches!(self.state, CheckoutState::Failed) {
            return Err(TransitionError::new("restart checkout", &self.state));
        }
        self.state = CheckoutState::SelectingMethod;
        self.bump();
        Ok(())
    }
}
