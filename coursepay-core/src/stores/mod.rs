//! Process-wide client state stores.
//!
//! Both stores follow the same discipline: synchronous, single-writer
//! mutation (the hosting event loop processes one action at a time),
//! derived values recomputed on every read, and a full-state snapshot
//! persisted after every mutation. A snapshot that fails to load or parse
//! is logged and replaced by an empty initial state, never surfaced.

mod cart;
mod notifications;

pub use cart::{AddOutcome, CartStore};
pub use notifications::NotificationStore;
