//! Visited / wishlist state for the castle catalog.
//!
//! Two disjoint identifier sets live in a durable local key-value store and,
//! while a user is signed in, are mirrored to a remote per-user document.
//! [`Tracker`] owns the sets and is the only way to change them.

pub mod error;
pub mod ids;
pub mod local;
pub mod remote;
pub mod tracker;

pub use error::StoreError;
pub use ids::IdSets;
pub use local::{load_id_sets, save_id_sets, JsonFileStore, LocalStore, MemoryStore};
pub use remote::{HttpRemoteStore, RemoteStore, RemoteUserState};
pub use tracker::{AuthEvent, PersistOutcome, SignInOutcome, Tracker};
