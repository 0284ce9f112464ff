//! Persisted client-side state containers.
//!
//! A store is a single typed value identified by a store id (`JWT`, ...).
//! Every mutation goes through [`PersistedStore::update`], which writes the
//! new state to a [`Persister`] and then notifies subscribers.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use imall_kv::MemoryKV;
//! use imall_state::{KvPersister, PersistedStore, StoreState};
//!
//! #[derive(Clone, Default, serde::Serialize, serde::Deserialize)]
//! struct Theme { dark: bool }
//!
//! impl StoreState for Theme {
//!     const ID: &'static str = "Theme";
//! }
//!
//! let persister = Arc::new(KvPersister::new(Arc::new(MemoryKV::new())));
//! let store = PersistedStore::<Theme>::restore(persister)?;
//! store.update(|t| t.dark = true);
//! ```

pub mod error;
pub mod persist;
pub mod store;

pub use error::StateError;
pub use persist::{KvPersister, NoopPersister, Persister};
pub use store::{ChangeHandler, PersistedStore, StoreState, SubscriptionId};
