//! Durable local storage for the stores.
//!
//! Persistence is an explicit on-change hook, separate from the mutation
//! itself: the stores serialize their full state and hand the blob to a
//! [`Persist`] backend, so the backend (file, in-memory, browser storage
//! behind a binding) can be swapped without touching store logic.
//!
//! There is no versioning or migration scheme for the blobs. Stores treat
//! any load or parse failure as "start empty": logged, never surfaced.

mod json_file;
mod memory;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

/// Storage key for the cart blob.
pub const CART_STORAGE_KEY: &str = "coursepay.cart";
/// Storage key for the notification inbox blob.
pub const NOTIFICATION_STORAGE_KEY: &str = "coursepay.notifications";

/// Errors produced by a persistence backend.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("storage i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// A keyed blob store. One JSON blob per fixed key.
pub trait Persist: Send + Sync {
    /// Load the blob stored under `key`, or `None` if nothing was ever
    /// saved there.
    fn load(&self, key: &str) -> Result<Option<String>, PersistError>;

    /// Replace the blob stored under `key`.
    ///
    /// Implementations must not leave a partially written blob visible:
    /// after a crash mid-save, a later `load` returns either the previous
    /// blob or the new one, never a torn mix.
    fn save(&self, key: &str, blob: &str) -> Result<(), PersistError>;
}
