//! Wire types shared between the client core and the marketplace backend.
//!
//! Everything here serializes as camelCase JSON, which is what the REST
//! API speaks.

pub mod cart;
pub mod methods;
pub mod order;
pub mod payment;

pub use cart::{CartItem, CartMutation, CourseId};
pub use methods::{MethodCategory, MethodCode, PaymentMethod};
pub use order::{CreateOrderRequest, OrderResponse, OrderStatus};
pub use payment::{CreateRedirectPayment, PaymentStatus, PaymentStatusResponse, RedirectPaymentUrl};
