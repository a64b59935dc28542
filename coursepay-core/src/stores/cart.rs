//! The cart store: single source of truth for what the visitor intends
//! to buy, independent of any particular page.

use std::sync::Arc;

use coursepay_sdk::objects::{CartItem, CartMutation, CourseId};
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::entities::NotificationVariant;
use crate::events::{CartMutationSender, ToastEvent, ToastSender};
use crate::persist::{CART_STORAGE_KEY, Persist};

/// Result of [`CartStore::add_item`].
///
/// A duplicate add is an acknowledged outcome, not an error: the cart is
/// left untouched and the caller gets an "already in cart" toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    AlreadyInCart,
}

/// The visitor's cart. At most one item per course id.
pub struct CartStore {
    items: Vec<CartItem>,
    persist: Arc<dyn Persist>,
    toast_tx: Option<ToastSender>,
    mutation_tx: Option<CartMutationSender>,
}

impl CartStore {
    /// Rehydrate the cart from durable storage.
    ///
    /// Fails soft: a missing, unreadable, or unparsable blob logs a
    /// warning and yields an empty cart. Startup never crashes on a
    /// corrupt snapshot.
    pub fn load(persist: Arc<dyn Persist>) -> Self {
        let items = match persist.load(CART_STORAGE_KEY) {
            Ok(Some(blob)) => match serde_json::from_str::<Vec<CartItem>>(&blob) {
                Ok(items) => items,
                Err(e) => {
                    warn!(error = %e, "Corrupt cart snapshot, starting empty");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "Failed to read cart snapshot, starting empty");
                Vec::new()
            }
        };

        Self {
            items,
            persist,
            toast_tx: None,
            mutation_tx: None,
        }
    }

    /// Emit transient toasts for add/remove/clear acknowledgements.
    pub fn with_toast_sender(mut self, tx: ToastSender) -> Self {
        self.toast_tx = Some(tx);
        self
    }

    /// Mirror mutations to the backend cart-sync worker.
    pub fn with_mutation_sender(mut self, tx: CartMutationSender) -> Self {
        self.mutation_tx = Some(tx);
        self
    }

    /// Add an item to the cart.
    ///
    /// If an item with the same course id is already present the cart is
    /// not mutated; the caller gets [`AddOutcome::AlreadyInCart`] and the
    /// visitor an informational toast.
    pub fn add_item(&mut self, item: CartItem) -> AddOutcome {
        if self.is_in_cart(&item.id) {
            debug!(course = %item.id, "Duplicate add ignored");
            self.toast(
                "Already in cart",
                format!("\"{}\" is already in your cart", item.title),
                NotificationVariant::Info,
            );
            return AddOutcome::AlreadyInCart;
        }

        let title = item.title.clone();
        self.items.push(item.clone());
        self.save();
        self.mirror(CartMutation::Add { item });
        self.toast(
            "Added to cart",
            format!("\"{title}\" was added to your cart"),
            NotificationVariant::Success,
        );
        AddOutcome::Added
    }

    /// Remove the item with the given course id.
    ///
    /// A no-op (not an error) when the id is absent. Returns the removed
    /// item so callers can acknowledge it by name.
    pub fn remove_item(&mut self, id: &CourseId) -> Option<CartItem> {
        let pos = self.items.iter().position(|i| &i.id == id)?;
        let removed = self.items.remove(pos);
        self.save();
        self.mirror(CartMutation::Remove { id: id.clone() });
        self.toast(
            "Removed from cart",
            format!("\"{}\" was removed from your cart", removed.title),
            NotificationVariant::Default,
        );
        Some(removed)
    }

    /// Empty the cart unconditionally.
    pub fn clear(&mut self) {
        self.items.clear();
        self.save();
        self.mirror(CartMutation::Clear);
        self.toast("Cart cleared", "Your cart is now empty", NotificationVariant::Default);
    }

    /// Pure membership query.
    pub fn is_in_cart(&self, id: &CourseId) -> bool {
        self.items.iter().any(|i| &i.id == id)
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Number of line items, recomputed from the live list.
    pub fn count(&self) -> usize {
        self.items.len()
    }

    /// Sum of each item's discounted-or-original price, recomputed from
    /// the live list on every call. Never cached.
    pub fn total(&self) -> Decimal {
        self.items.iter().map(CartItem::effective_price).sum()
    }

    /// Snapshot the full collection. Runs after the in-memory mutation so
    /// a crash mid-write leaves storage at most one event tick behind.
    fn save(&self) {
        let blob = match serde_json::to_string(&self.items) {
            Ok(blob) => blob,
            Err(e) => {
                warn!(error = %e, "Failed to serialize cart snapshot");
                return;
            }
        };
        if let Err(e) = self.persist.save(CART_STORAGE_KEY, &blob) {
            warn!(error = %e, "Failed to persist cart snapshot");
        }
    }

    fn toast(&self, title: &str, message: impl Into<String>, variant: NotificationVariant) {
        let Some(tx) = &self.toast_tx else { return };
        let event = ToastEvent {
            title: title.to_owned(),
            message: message.into(),
            variant,
        };
        if let Err(e) = tx.try_send(event) {
            debug!(error = %e, "Toast dropped, no consumer keeping up");
        }
    }

    fn mirror(&self, mutation: CartMutation) {
        let Some(tx) = &self.mutation_tx else { return };
        if let Err(e) = tx.try_send(mutation) {
            warn!(error = %e, "Cart mutation not mirrored; local cart stays authoritative");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::events::toast_channel;
    use crate::persist::MemoryStore;

    fn item(id: &str, price: i64, discounted: Option<i64>) -> CartItem {
        CartItem {
            id: CourseId::from(id),
            title: format!("Course {id}"),
            instructor: "Ada".to_owned(),
            thumbnail: url::Url::parse("https://cdn.example.com/t.png").unwrap(),
            price: Decimal::from(price),
            discounted_price: discounted.map(Decimal::from),
        }
    }

    fn empty_store() -> CartStore {
        CartStore::load(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn add_and_remove_update_count_and_total() {
        let mut cart = empty_store();

        assert_eq!(cart.add_item(item("1", 10, None)), AddOutcome::Added);
        assert_eq!(cart.count(), 1);
        assert_eq!(cart.total(), Decimal::from(10));

        assert_eq!(cart.add_item(item("2", 20, Some(15))), AddOutcome::Added);
        assert_eq!(cart.count(), 2);
        assert_eq!(cart.total(), Decimal::from(25));

        let removed = cart.remove_item(&CourseId::from("1")).unwrap();
        assert_eq!(removed.id, CourseId::from("1"));
        assert_eq!(cart.count(), 1);
        assert_eq!(cart.total(), Decimal::from(15));
    }

    #[test]
    fn duplicate_add_is_idempotent_and_acknowledged() {
        let (toast_tx, mut toast_rx) = toast_channel();
        let mut cart = empty_store().with_toast_sender(toast_tx);

        cart.add_item(item("2", 20, Some(15)));
        let first = toast_rx.try_recv().unwrap();
        assert_eq!(first.title, "Added to cart");

        assert_eq!(cart.add_item(item("2", 20, Some(15))), AddOutcome::AlreadyInCart);
        assert_eq!(cart.count(), 1);
        assert_eq!(cart.total(), Decimal::from(15));

        let ack = toast_rx.try_recv().unwrap();
        assert_eq!(ack.title, "Already in cart");
        assert_eq!(ack.variant, NotificationVariant::Info);
    }

    #[test]
    fn remove_is_a_noop_on_absence() {
        let mut cart = empty_store();
        cart.add_item(item("1", 10, None));

        assert!(cart.remove_item(&CourseId::from("missing")).is_none());
        assert_eq!(cart.count(), 1);
        assert_eq!(cart.total(), Decimal::from(10));
    }

    #[test]
    fn clear_empties_the_cart() {
        let mut cart = empty_store();
        cart.add_item(item("1", 10, None));
        cart.add_item(item("2", 20, None));

        cart.clear();
        assert_eq!(cart.count(), 0);
        assert_eq!(cart.total(), Decimal::ZERO);
        assert!(!cart.is_in_cart(&CourseId::from("1")));
    }

    #[test]
    fn total_prefers_discounted_price() {
        let mut cart = empty_store();
        cart.add_item(item("1", 100, Some(79)));
        cart.add_item(item("2", 50, None));
        assert_eq!(cart.total(), Decimal::from(129));
    }

    #[test]
    fn snapshot_round_trips_through_storage() {
        let persist = Arc::new(MemoryStore::new());

        {
            let mut cart = CartStore::load(persist.clone());
            cart.add_item(item("1", 10, None));
            cart.add_item(item("2", 20, Some(15)));
        }

        // Simulated restart.
        let reloaded = CartStore::load(persist);
        assert_eq!(reloaded.count(), 2);
        assert_eq!(reloaded.total(), Decimal::from(25));
        assert!(reloaded.is_in_cart(&CourseId::from("2")));
    }

    #[test]
    fn corrupt_snapshot_falls_back_to_empty() {
        let persist = Arc::new(
            MemoryStore::new().with_blob(CART_STORAGE_KEY, "{not json"),
        );
        let cart = CartStore::load(persist);
        assert_eq!(cart.count(), 0);
    }

    #[test]
    fn mutations_are_mirrored_in_order() {
        let (tx, mut rx) = crate::events::cart_mutation_channel();
        let mut cart = empty_store().with_mutation_sender(tx);

        cart.add_item(item("1", 10, None));
        cart.remove_item(&CourseId::from("1"));
        cart.clear();

        assert!(matches!(rx.try_recv().unwrap(), CartMutation::Add { .. }));
        assert!(matches!(rx.try_recv().unwrap(), CartMutation::Remove { .. }));
        assert!(matches!(rx.try_recv().unwrap(), CartMutation::Clear));
    }
}
