//! CheckoutOrchestrator.
//!
//! Drives one purchase attempt at a time: order creation, method
//! selection (building the per-method payload), QR countdown ownership,
//! and settlement polling. Side effects on the cart and notification
//! stores happen here, around the pure [`CheckoutSession`] transitions.

use std::time::Duration;

use coursepay_sdk::client::ClientError;
use coursepay_sdk::objects::{MethodCategory, PaymentMethod, PaymentStatus};
use tracing::{debug, info, warn};

use super::countdown::{CountdownHandle, CountdownTickReceiver, spawn_countdown};
use super::gateway::{OrderService, PaymentService};
use super::methods::{
    MOMO_COUNTDOWN_SECS, MethodPayload, ReceivingDetails, bank, crypto, momo,
    redirect::RedirectPayload,
};
use super::session::{CheckoutSession, CheckoutState, TransitionError};
use crate::entities::{NewNotification, NotificationVariant};
use crate::stores::{CartStore, NotificationStore};

/// Tuning and deployment inputs for the checkout flow.
#[derive(Debug, Clone)]
pub struct CheckoutConfig {
    /// Delay between settlement polls while Processing.
    pub poll_interval: Duration,
    /// Polls per confirmation attempt before giving the turn back to the
    /// visitor.
    pub max_polls: u32,
    /// Receiving details for push-style methods (bank, crypto).
    pub receiving: ReceivingDetails,
}

impl CheckoutConfig {
    pub fn new(receiving: ReceivingDetails) -> Self {
        Self {
            poll_interval: Duration::from_secs(3),
            max_polls: 20,
            receiving,
        }
    }
}

/// Errors surfaced to the UI layer by the orchestrator.
#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    #[error("the cart is empty")]
    EmptyCart,

    #[error("no checkout session is in progress")]
    NoSession,

    #[error("a checkout session is already in progress")]
    SessionInProgress,

    #[error(transparent)]
    Transition(#[from] TransitionError),

    /// A collaborator service was unreachable or rejected the request.
    /// The session state is unchanged; the same action can be retried.
    #[error("backend error: {0}")]
    Backend(#[from] ClientError),

    /// The backend is still confirming after the polling budget. The
    /// session stays in Processing; call
    /// [`CheckoutOrchestrator::poll_settlement`] to keep waiting.
    #[error("payment is still being confirmed")]
    ConfirmationPending,

    /// A settlement result arrived for a flow that has since moved on and
    /// was discarded.
    #[error("the checkout flow moved on before this result arrived")]
    Superseded,
}

/// Walks the visitor through method selection → instructions →
/// completion, for exactly one order at a time.
pub struct CheckoutOrchestrator<O, P> {
    orders: O,
    payments: P,
    config: CheckoutConfig,
    session: Option<CheckoutSession>,
    countdown: Option<CountdownHandle>,
    ticks: Option<CountdownTickReceiver>,
}

impl<O: OrderService, P: PaymentService> CheckoutOrchestrator<O, P> {
    pub fn new(orders: O, payments: P, config: CheckoutConfig) -> Self {
        Self {
            orders,
            payments,
            config,
            session: None,
            countdown: None,
            ticks: None,
        }
    }

    pub fn session(&self) -> Option<&CheckoutSession> {
        self.session.as_ref()
    }

    /// Start a checkout: create an order for the current cart and enter
    /// method selection. The final amount is computed once here, from the
    /// cart subtotal, and displayed verbatim by every method.
    pub async fn begin(
        &mut self,
        cart: &CartStore,
        promotion_code: Option<String>,
    ) -> Result<&CheckoutSession, CheckoutError> {
        if cart.count() == 0 {
            return Err(CheckoutError::EmptyCart);
        }
        if self
            .session
            .as_ref()
            .is_some_and(|s| !matches!(s.state(), CheckoutState::Succeeded { .. } | CheckoutState::Failed))
        {
            return Err(CheckoutError::SessionInProgress);
        }

        let order = self.orders.create_order_from_cart(promotion_code).await?;
        info!(order_id = %order.order_id, "Checkout started");

        let session = CheckoutSession::new(order.order_id, cart.total());
        self.session = Some(session);
        self.countdown = None;
        self.ticks = None;
        self.session.as_ref().ok_or(CheckoutError::NoSession)
    }

    /// Select a payment method and enter awaiting-payment with its
    /// freshly built payload.
    ///
    /// For redirect methods this requests a payment URL first; a failure
    /// there surfaces immediately and the session stays in
    /// selecting-method, untouched.
    pub async fn select_method(&mut self, method: PaymentMethod) -> Result<(), CheckoutError> {
        let (order_id, amount) = {
            let session = self.session.as_ref().ok_or(CheckoutError::NoSession)?;
            if !matches!(session.state(), CheckoutState::SelectingMethod) {
                return Err(TransitionError {
                    action: "select a method",
                    from: session.state().name(),
                }
                .into());
            }
            (session.order_id(), session.final_amount())
        };

        let payload = match method.category {
            MethodCategory::Bank => {
                MethodPayload::BankTransfer(bank::build(&self.config.receiving.bank, order_id, amount))
            }
            MethodCategory::Digital => MethodPayload::MomoQr(momo::build(order_id, amount)),
            MethodCategory::Crypto => {
                MethodPayload::Crypto(crypto::build(&self.config.receiving.crypto, amount))
            }
            MethodCategory::Card => {
                let redirect = self
                    .payments
                    .create_redirect_url(order_id, method.id.clone())
                    .await?;
                MethodPayload::Redirect(RedirectPayload {
                    payment_url: redirect.payment_url,
                })
            }
        };

        let has_countdown = matches!(payload, MethodPayload::MomoQr(_));
        self.session
            .as_mut()
            .ok_or(CheckoutError::NoSession)?
            .select_method(method, payload)?;

        if has_countdown {
            self.start_countdown();
        }
        Ok(())
    }

    /// Take the tick receiver for the current QR countdown, if one is
    /// running. The hosting UI drains it and calls
    /// [`expire_qr`](Self::expire_qr) when it reads zero.
    pub fn countdown_ticks(&mut self) -> Option<CountdownTickReceiver> {
        self.ticks.take()
    }

    /// Flip the displayed QR into its expired state. Recoverable: the
    /// visitor regenerates, the order is unaffected.
    pub fn expire_qr(&mut self) -> Result<(), CheckoutError> {
        self.stop_countdown();
        let session = self.session.as_mut().ok_or(CheckoutError::NoSession)?;
        session.expire_countdown()?;
        Ok(())
    }

    /// Regenerate the QR payload after expiry: fresh token, fresh
    /// countdown, same final amount.
    pub fn regenerate_qr(&mut self) -> Result<(), CheckoutError> {
        self.stop_countdown();
        let session = self.session.as_mut().ok_or(CheckoutError::NoSession)?;
        let payload = MethodPayload::MomoQr(momo::build(session.order_id(), session.final_amount()));
        session.regenerate(payload)?;
        self.start_countdown();
        Ok(())
    }

    /// Go back to method selection, discarding all method-specific
    /// payload state and cancelling any countdown.
    pub fn choose_another(&mut self) -> Result<(), CheckoutError> {
        self.stop_countdown();
        let session = self.session.as_mut().ok_or(CheckoutError::NoSession)?;
        session.choose_another()?;
        Ok(())
    }

    /// The visitor asserted completion ("I have transferred"), or an
    /// external redirect returned. Enters Processing and polls the
    /// payment service until the backend settles the attempt.
    pub async fn confirm_payment(
        &mut self,
        cart: &mut CartStore,
        notifications: &mut NotificationStore,
    ) -> Result<PaymentStatus, CheckoutError> {
        {
            let session = self.session.as_mut().ok_or(CheckoutError::NoSession)?;
            session.confirm_payment()?;
        }
        self.stop_countdown();
        self.poll_settlement(cart, notifications).await
    }

    /// Poll the settlement status of the in-flight confirmation.
    ///
    /// Callable again after a transient [`CheckoutError::Backend`] or
    /// [`CheckoutError::ConfirmationPending`]; the session stays in
    /// Processing across such retries.
    pub async fn poll_settlement(
        &mut self,
        cart: &mut CartStore,
        notifications: &mut NotificationStore,
    ) -> Result<PaymentStatus, CheckoutError> {
        let (order_id, epoch) = {
            let session = self.session.as_ref().ok_or(CheckoutError::NoSession)?;
            if !matches!(session.state(), CheckoutState::Processing { .. }) {
                return Err(TransitionError {
                    action: "poll settlement",
                    from: session.state().name(),
                }
                .into());
            }
            (session.order_id(), session.epoch())
        };

        for _ in 0..self.config.max_polls {
            let status = self.payments.payment_status(order_id).await?;
            match status {
                PaymentStatus::Pending => {
                    tokio::time::sleep(self.config.poll_interval).await;
                }
                PaymentStatus::Succeeded | PaymentStatus::Failed => {
                    // A reply that raced a state change is stale; discard
                    // it rather than applying it blindly.
                    let still_current = self
                        .session
                        .as_ref()
                        .is_some_and(|s| s.epoch() == epoch);
                    if !still_current {
                        debug!(order_id = %order_id, "Stale settlement result discarded");
                        return Err(CheckoutError::Superseded);
                    }
                    return self.apply_settlement(status, cart, notifications);
                }
            }
        }

        Err(CheckoutError::ConfirmationPending)
    }

    /// After a failed attempt, return to method selection for another try
    /// at the same order.
    pub fn restart(&mut self) -> Result<(), CheckoutError> {
        let session = self.session.as_mut().ok_or(CheckoutError::NoSession)?;
        session.restart()?;
        Ok(())
    }

    /// Drop the session entirely (order completed, or the visitor walked
    /// away). Cancels any countdown.
    pub fn reset(&mut self) {
        self.stop_countdown();
        self.session = None;
    }

    fn apply_settlement(
        &mut self,
        status: PaymentStatus,
        cart: &mut CartStore,
        notifications: &mut NotificationStore,
    ) -> Result<PaymentStatus, CheckoutError> {
        let session = self.session.as_mut().ok_or(CheckoutError::NoSession)?;
        let order_id = session.order_id();

        match status {
            PaymentStatus::Succeeded => {
                session.resolve_succeeded()?;
                let amount = session.final_amount();
                cart.clear();
                notifications.add(
                    NewNotification::new(
                        "Payment successful",
                        format!("Your order is confirmed. Amount paid: {amount}."),
                        NotificationVariant::Success,
                    )
                    .with_link(format!("/orders/{order_id}")),
                );
                info!(order_id = %order_id, "Payment settled");
            }
            PaymentStatus::Failed => {
                session.resolve_failed()?;
                notifications.add(NewNotification::new(
                    "Payment failed",
                    "The payment was not confirmed. No charge was made; you can try another method.",
                    NotificationVariant::Destructive,
                ));
                warn!(order_id = %order_id, "Payment rejected by the backend");
            }
            PaymentStatus::Pending => {}
        }
        Ok(status)
    }

    fn start_countdown(&mut self) {
        let (handle, rx) = spawn_countdown(MOMO_COUNTDOWN_SECS);
        self.countdown = Some(handle);
        self.ticks = Some(rx);
    }

    // Releasing the handle aborts the ticking task; called on every exit
    // path out of awaiting-payment.
    fn stop_countdown(&mut self) {
        self.countdown = None;
        self.ticks = None;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::checkout::methods::{BankAccount, CryptoWallet, MethodFlow};
    use crate::persist::MemoryStore;
    use async_trait::async_trait;
    use coursepay_sdk::objects::{
        CartItem, CourseId, MethodCode, OrderResponse, OrderStatus, RedirectPaymentUrl,
    };
    use rust_decimal::Decimal;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};
    use uuid::Uuid;

    fn transport_error() -> ClientError {
        ClientError::Json(serde_json::from_str::<u8>("not json").unwrap_err())
    }

    struct FakeOrders {
        fail: bool,
    }

    #[async_trait]
    impl OrderService for FakeOrders {
        async fn create_order_from_cart(
            &self,
            _promotion_code: Option<String>,
        ) -> Result<OrderResponse, ClientError> {
            if self.fail {
                return Err(transport_error());
            }
            Ok(OrderResponse {
                order_id: Uuid::new_v4(),
                final_amount: Decimal::ZERO,
                status: OrderStatus::Pending,
                created_at: 0,
            })
        }

        async fn get_order(&self, order_id: Uuid) -> Result<OrderResponse, ClientError> {
            Ok(OrderResponse {
                order_id,
                final_amount: Decimal::ZERO,
                status: OrderStatus::Pending,
                created_at: 0,
            })
        }
    }

    enum PollStep {
        Status(PaymentStatus),
        Error,
    }

    struct FakePayments {
        redirect_fails: bool,
        steps: Mutex<VecDeque<PollStep>>,
    }

    impl FakePayments {
        fn with_steps(steps: Vec<PollStep>) -> Self {
            Self {
                redirect_fails: false,
                steps: Mutex::new(steps.into()),
            }
        }
    }

    #[async_trait]
    impl PaymentService for FakePayments {
        async fn create_redirect_url(
            &self,
            _order_id: Uuid,
            _method: MethodCode,
        ) -> Result<RedirectPaymentUrl, ClientError> {
            if self.redirect_fails {
                return Err(transport_error());
            }
            Ok(RedirectPaymentUrl {
                payment_url: url::Url::parse("https://pay.example.com/session/1").unwrap(),
            })
        }

        async fn payment_status(&self, _order_id: Uuid) -> Result<PaymentStatus, ClientError> {
            let step = self.steps.lock().unwrap().pop_front();
            match step {
                Some(PollStep::Status(s)) => Ok(s),
                Some(PollStep::Error) => Err(transport_error()),
                None => Ok(PaymentStatus::Pending),
            }
        }
    }

    fn receiving() -> ReceivingDetails {
        ReceivingDetails {
            bank: BankAccount {
                bank_name: "Vietcombank".to_owned(),
                account_number: "0071000123456".to_owned(),
                account_holder: "COURSEPAY JSC".to_owned(),
            },
            crypto: CryptoWallet {
                network: "USDT (TRC-20)".to_owned(),
                address: "TXYZabc123".to_owned(),
            },
        }
    }

    fn config() -> CheckoutConfig {
        CheckoutConfig {
            poll_interval: Duration::ZERO,
            max_polls: 5,
            receiving: receiving(),
        }
    }

    fn orchestrator(
        payments: FakePayments,
    ) -> CheckoutOrchestrator<FakeOrders, FakePayments> {
        CheckoutOrchestrator::new(FakeOrders { fail: false }, payments, config())
    }

    fn item(id: &str, price: i64) -> CartItem {
        CartItem {
            id: CourseId::from(id),
            title: format!("Course {id}"),
            instructor: "Ada".to_owned(),
            thumbnail: url::Url::parse("https://cdn.example.com/t.png").unwrap(),
            price: Decimal::from(price),
            discounted_price: None,
        }
    }

    fn stores() -> (CartStore, NotificationStore) {
        (
            CartStore::load(Arc::new(MemoryStore::new())),
            NotificationStore::load(Arc::new(MemoryStore::new())),
        )
    }

    fn method(code: &str, category: MethodCategory) -> PaymentMethod {
        PaymentMethod {
            id: MethodCode::from(code),
            name: code.to_owned(),
            category,
            description: String::new(),
            icon: url::Url::parse("https://cdn.example.com/i.png").unwrap(),
        }
    }

    #[tokio::test]
    async fn begin_requires_a_non_empty_cart() {
        let (cart, _) = stores();
        let mut orch = orchestrator(FakePayments::with_steps(vec![]));

        let err = orch.begin(&cart, None).await.unwrap_err();
        assert!(matches!(err, CheckoutError::EmptyCart));
        assert!(orch.session().is_none());
    }

    #[tokio::test]
    async fn begin_computes_the_final_amount_once() {
        let (mut cart, _) = stores();
        cart.add_item(item("1", 100));
        let mut orch = orchestrator(FakePayments::with_steps(vec![]));

        let session = orch.begin(&cart, None).await.unwrap();
        assert_eq!(session.final_amount(), Decimal::from(110));
        assert!(matches!(session.state(), CheckoutState::SelectingMethod));
    }

    #[tokio::test]
    async fn one_order_at_a_time() {
        let (mut cart, _) = stores();
        cart.add_item(item("1", 100));
        let mut orch = orchestrator(FakePayments::with_steps(vec![]));

        orch.begin(&cart, None).await.unwrap();
        let err = orch.begin(&cart, None).await.unwrap_err();
        assert!(matches!(err, CheckoutError::SessionInProgress));
    }

    #[tokio::test]
    async fn order_creation_failure_leaves_no_session() {
        let (mut cart, _) = stores();
        cart.add_item(item("1", 100));
        let mut orch = CheckoutOrchestrator::new(
            FakeOrders { fail: true },
            FakePayments::with_steps(vec![]),
            config(),
        );

        let err = orch.begin(&cart, None).await.unwrap_err();
        assert!(matches!(err, CheckoutError::Backend(_)));
        assert!(orch.session().is_none());
    }

    #[tokio::test]
    async fn bank_selection_builds_instructions_with_the_session_amount() {
        let (mut cart, _) = stores();
        cart.add_item(item("1", 100));
        let mut orch = orchestrator(FakePayments::with_steps(vec![]));

        orch.begin(&cart, None).await.unwrap();
        orch.select_method(method("BANK", MethodCategory::Bank)).await.unwrap();

        let session = orch.session().unwrap();
        match session.state() {
            CheckoutState::AwaitingPayment {
                payload: MethodPayload::BankTransfer(p),
                ..
            } => {
                assert_eq!(p.amount, Decimal::from(110));
                assert!(p.instructions().iter().any(|l| l.contains("110")));
            }
            other => panic!("unexpected state: {other:?}"),
        }
    }

    #[tokio::test]
    async fn amount_survives_switching_methods() {
        let (mut cart, _) = stores();
        cart.add_item(item("1", 100));
        let mut orch = orchestrator(FakePayments::with_steps(vec![]));

        orch.begin(&cart, None).await.unwrap();
        orch.select_method(method("BANK", MethodCategory::Bank)).await.unwrap();
        orch.choose_another().unwrap();
        orch.select_method(method("CRYPTO", MethodCategory::Crypto)).await.unwrap();

        assert_eq!(orch.session().unwrap().final_amount(), Decimal::from(110));
    }

    #[tokio::test]
    async fn redirect_failure_stays_in_method_selection() {
        let (mut cart, _) = stores();
        cart.add_item(item("1", 100));
        let mut payments = FakePayments::with_steps(vec![]);
        payments.redirect_fails = true;
        let mut orch = orchestrator(payments);

        orch.begin(&cart, None).await.unwrap();
        let err = orch
            .select_method(method("VNPAY", MethodCategory::Card))
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::Backend(_)));
        assert!(matches!(
            orch.session().unwrap().state(),
            CheckoutState::SelectingMethod
        ));
    }

    #[tokio::test]
    async fn momo_selection_runs_a_countdown_and_regenerates() {
        let (mut cart, _) = stores();
        cart.add_item(item("1", 100));
        let mut orch = orchestrator(FakePayments::with_steps(vec![]));

        orch.begin(&cart, None).await.unwrap();
        orch.select_method(method("MOMO", MethodCategory::Digital)).await.unwrap();
        assert!(orch.countdown_ticks().is_some());

        let old_qr = match orch.session().unwrap().state() {
            CheckoutState::AwaitingPayment {
                payload: MethodPayload::MomoQr(p),
                ..
            } => p.qr_data.clone(),
            other => panic!("unexpected state: {other:?}"),
        };

        orch.expire_qr().unwrap();
        orch.regenerate_qr().unwrap();
        assert!(orch.countdown_ticks().is_some());

        match orch.session().unwrap().state() {
            CheckoutState::AwaitingPayment {
                payload: MethodPayload::MomoQr(p),
                ..
            } => {
                assert!(!p.expired);
                assert_ne!(p.qr_data, old_qr);
            }
            other => panic!("unexpected state: {other:?}"),
        }
        assert_eq!(orch.session().unwrap().final_amount(), Decimal::from(110));
    }

    #[tokio::test]
    async fn successful_settlement_clears_cart_and_raises_notification() {
        let (mut cart, mut inbox) = stores();
        cart.add_item(item("1", 100));
        let mut orch = orchestrator(FakePayments::with_steps(vec![
            PollStep::Status(PaymentStatus::Pending),
            PollStep::Status(PaymentStatus::Succeeded),
        ]));

        orch.begin(&cart, None).await.unwrap();
        orch.select_method(method("BANK", MethodCategory::Bank)).await.unwrap();
        let status = orch.confirm_payment(&mut cart, &mut inbox).await.unwrap();

        assert_eq!(status, PaymentStatus::Succeeded);
        assert_eq!(cart.count(), 0);
        assert!(matches!(
            orch.session().unwrap().state(),
            CheckoutState::Succeeded { .. }
        ));
        let top = &inbox.entries()[0];
        assert_eq!(top.variant, NotificationVariant::Success);
        assert!(top.link.as_deref().unwrap().starts_with("/orders/"));
    }

    #[tokio::test]
    async fn failed_settlement_notifies_and_allows_restart() {
        let (mut cart, mut inbox) = stores();
        cart.add_item(item("1", 100));
        let mut orch = orchestrator(FakePayments::with_steps(vec![PollStep::Status(
            PaymentStatus::Failed,
        )]));

        orch.begin(&cart, None).await.unwrap();
        orch.select_method(method("BANK", MethodCategory::Bank)).await.unwrap();
        let status = orch.confirm_payment(&mut cart, &mut inbox).await.unwrap();

        assert_eq!(status, PaymentStatus::Failed);
        // The cart is untouched on failure.
        assert_eq!(cart.count(), 1);
        assert_eq!(inbox.entries()[0].variant, NotificationVariant::Destructive);
        assert!(matches!(orch.session().unwrap().state(), CheckoutState::Failed));

        orch.restart().unwrap();
        assert!(matches!(
            orch.session().unwrap().state(),
            CheckoutState::SelectingMethod
        ));
    }

    #[tokio::test]
    async fn transient_poll_error_keeps_processing_for_retry() {
        let (mut cart, mut inbox) = stores();
        cart.add_item(item("1", 100));
        let mut orch = orchestrator(FakePayments::with_steps(vec![
            PollStep::Error,
            PollStep::Status(PaymentStatus::Succeeded),
        ]));

        orch.begin(&cart, None).await.unwrap();
        orch.select_method(method("BANK", MethodCategory::Bank)).await.unwrap();

        let err = orch.confirm_payment(&mut cart, &mut inbox).await.unwrap_err();
        assert!(matches!(err, CheckoutError::Backend(_)));
        assert!(matches!(
            orch.session().unwrap().state(),
            CheckoutState::Processing { .. }
        ));

        // Same action retried; the queued success settles the attempt.
        let status = orch.poll_settlement(&mut cart, &mut inbox).await.unwrap();
        assert_eq!(status, PaymentStatus::Succeeded);
    }

    #[tokio::test]
    async fn polling_budget_exhaustion_is_not_terminal() {
        let (mut cart, mut inbox) = stores();
        cart.add_item(item("1", 100));
        let mut orch = orchestrator(FakePayments::with_steps(vec![]));

        orch.begin(&cart, None).await.unwrap();
        orch.select_method(method("BANK", MethodCategory::Bank)).await.unwrap();

        let err = orch.confirm_payment(&mut cart, &mut inbox).await.unwrap_err();
        assert!(matches!(err, CheckoutError::ConfirmationPending));
        assert!(matches!(
            orch.session().unwrap().state(),
            CheckoutState::Processing { .. }
        ));
        assert_eq!(cart.count(), 1);
    }
}
