//! CartSyncWorker processor.
//!
//! The CartSyncWorker is responsible for:
//! - Receiving `CartMutation` events from the cart store
//! - Mirroring each mutation to the backend cart-sync service
//! - Logging delivery failures and moving on
//!
//! The local cart store is authoritative. A failed mirror never fails the
//! user action that produced it, and the worker does not retry: the next
//! mutation carries the full intent again from the store's perspective.

use coursepay_sdk::client::CartSyncClient;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::CartMutationReceiver;

/// CartSyncWorker mirrors local cart mutations to the backend.
pub struct CartSyncWorker {
    client: CartSyncClient,
    mutation_rx: CartMutationReceiver,
    shutdown_rx: watch::Receiver<bool>,
}

impl CartSyncWorker {
    /// Create a new CartSyncWorker.
    ///
    /// # Arguments
    ///
    /// * `client` - Cart-sync service client
    /// * `mutation_rx` - Receiver for mirrored cart mutations
    /// * `shutdown_rx` - Receiver for shutdown signal
    pub fn new(
        client: CartSyncClient,
        mutation_rx: CartMutationReceiver,
        shutdown_rx: watch::Receiver<bool>,
    ) -> Self {
        Self {
            client,
            mutation_rx,
            shutdown_rx,
        }
    }

    /// Run the CartSyncWorker.
    pub async fn run(mut self) {
        info!("CartSyncWorker started");

        loop {
            tokio::select! {
                biased;

                // Check for shutdown
                _ = self.shutdown_rx.changed() => {
                    if *self.shutdown_rx.borrow() {
                        info!("CartSyncWorker received shutdown signal");
                        break;
                    }
                }

                // Receive cart mutations
                Some(mutation) = self.mutation_rx.recv() => {
                    debug!(mutation = ?mutation, "Mirroring cart mutation");

                    if let Err(e) = self.client.push(&mutation).await {
                        warn!(
                            mutation = ?mutation,
                            error = %e,
                            "Failed to mirror cart mutation; local cart stays authoritative"
                        );
                    }
                }

                else => {
                    info!("Cart mutation channel closed");
                    break;
                }
            }
        }

        info!("CartSyncWorker shutdown complete");
    }
}
