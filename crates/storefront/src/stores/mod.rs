//! Observable state stores.
//!
//! Each store exclusively owns its in-memory state, mutates it only
//! through internal methods, and notifies subscribers after every
//! mutation. The presentation layer subscribes, reads snapshots through
//! the getters, and dispatches user intents back into store methods.
//! Failures never escape a store; they degrade to an error string in the
//! store's state.

pub mod catalog;
pub mod observer;
pub mod session;

pub use catalog::CatalogStore;
pub use observer::{ObserverId, ObserverSet};
pub use session::{ProfileUpdate, RegistrationDraft, SessionPhase, SessionStore};
