//! The checkout/payment flow: method selection, method-specific
//! instructions, and settlement confirmation, for exactly one order at a
//! time.
//!
//! The pure state machine lives in [`session`]; [`orchestrator`] drives
//! it against the backend gateways and the two stores.

pub mod countdown;
pub mod gateway;
pub mod methods;
pub mod orchestrator;
pub mod session;

pub use gateway::{OrderService, PaymentService};
pub use methods::{MethodPayload, ReceivingDetails};
pub use orchestrator::{CheckoutConfig, CheckoutError, CheckoutOrchestrator};
pub use session::{CheckoutSession, CheckoutState, TransitionError};
