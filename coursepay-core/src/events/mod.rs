//! Event channel factories and handles.
//!
//! The stores never talk to a UI or to the network directly. They emit
//! events onto these channels: transient toasts for whatever front-end
//! hosts the core, and cart mutations for the best-effort backend mirror.

mod cart_sync;

pub use cart_sync::CartSyncWorker;

use coursepay_sdk::objects::CartMutation;
use tokio::sync::mpsc;

use crate::entities::NotificationVariant;

/// Default buffer size for event channels.
///
/// Events are produced one user action at a time, so a small buffer only
/// has to absorb a slow consumer, not a burst.
pub const DEFAULT_CHANNEL_BUFFER: usize = 64;

/// The immediate visual echo of a store mutation: "added to cart",
/// "already in cart", a new notification, and so on. Ephemeral; the
/// durable record (when there is one) lives in the notification store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastEvent {
    pub title: String,
    pub message: String,
    pub variant: NotificationVariant,
}

/// Sender handle for ToastEvent events.
pub type ToastSender = mpsc::Sender<ToastEvent>;
/// Receiver handle for ToastEvent events.
pub type ToastReceiver = mpsc::Receiver<ToastEvent>;

/// Sender handle for mirrored cart mutations.
pub type CartMutationSender = mpsc::Sender<CartMutation>;
/// Receiver handle for mirrored cart mutations.
pub type CartMutationReceiver = mpsc::Receiver<CartMutation>;

/// Create a new toast channel.
pub fn toast_channel() -> (ToastSender, ToastReceiver) {
    mpsc::channel(DEFAULT_CHANNEL_BUFFER)
}

/// Create a new cart-mutation channel for the [`CartSyncWorker`].
pub fn cart_mutation_channel() -> (CartMutationSender, CartMutationReceiver) {
    mpsc::channel(DEFAULT_CHANNEL_BUFFER)
}
