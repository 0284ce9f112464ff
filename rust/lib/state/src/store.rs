use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::StateError;
use crate::persist::Persister;

/// State held by a [`PersistedStore`].
///
/// `ID` is the store identifier; it doubles as the persistence key.
pub trait StoreState:
    Serialize + DeserializeOwned + Default + Clone + Send + Sync + 'static
{
    const ID: &'static str;
}

/// Callback type for state change notifications.
pub type ChangeHandler<S> = Arc<dyn Fn(&S) + Send + Sync>;

/// Unique handle for a subscription, returned by `PersistedStore::subscribe()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct HandlerEntry<S> {
    id: SubscriptionId,
    handler: ChangeHandler<S>,
}

/// A single typed state value that persists itself on every change.
///
/// - `get()` / `read(f)` read the current state.
/// - `update(f)` mutates, persists, then notifies subscribers.
/// - `subscribe(handler)` registers a change handler.
///
/// Mutations never fail: a persistence error is logged and the in-memory
/// state stays authoritative. Use `flush()` to observe persistence errors.
pub struct PersistedStore<S: StoreState> {
    state: RwLock<S>,
    persister: Arc<dyn Persister>,
    handlers: RwLock<Vec<HandlerEntry<S>>>,
    next_id: AtomicU64,
}

impl<S: StoreState> PersistedStore<S> {
    /// Create a store holding `S::default()`. Nothing is loaded.
    pub fn new(persister: Arc<dyn Persister>) -> Self {
        Self::with_state(persister, S::default())
    }

    /// Create a store restored from whatever `persister` holds for `S::ID`.
    ///
    /// An undecodable entry is logged and replaced by `S::default()`.
    /// Failing to read the medium at all is an error.
    pub fn restore(persister: Arc<dyn Persister>) -> Result<Self, StateError> {
        let state = match persister.load(S::ID)? {
            Some(bytes) => match decode::<S>(&bytes) {
                Ok(state) => {
                    debug!(store = S::ID, "restored persisted state");
                    state
                }
                Err(e) => {
                    warn!(store = S::ID, error = %e, "discarding unreadable persisted state");
                    S::default()
                }
            },
            None => S::default(),
        };
        Ok(Self::with_state(persister, state))
    }

    fn with_state(persister: Arc<dyn Persister>, state: S) -> Self {
        Self {
            state: RwLock::new(state),
            persister,
            handlers: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Store identifier.
    pub fn id(&self) -> &'static str {
        S::ID
    }

    /// Clone of the current state.
    pub fn get(&self) -> S {
        self.read_state().clone()
    }

    /// Read the current state without cloning it.
    pub fn read<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        let state = self.read_state();
        f(&*state)
    }

    /// Mutate the state, persist it, then notify subscribers.
    ///
    /// The state is persisted while the write lock is held, so the persisted
    /// order matches the in-memory order. Handlers run after the lock is
    /// released and may read the store.
    pub fn update(&self, f: impl FnOnce(&mut S)) {
        let snapshot = {
            let mut state = self.write_state();
            f(&mut *state);
            if let Err(e) = self.persist(&*state) {
                warn!(store = S::ID, error = %e, "failed to persist store state");
            }
            state.clone()
        };
        self.notify(&snapshot);
    }

    /// Replace the whole state.
    pub fn replace(&self, state: S) {
        self.update(|s| *s = state);
    }

    /// Persist the current state again, surfacing any error.
    pub fn flush(&self) -> Result<(), StateError> {
        let state = self.read_state();
        self.persist(&*state)
    }

    /// Remove the persisted entry. The in-memory state is untouched.
    pub fn clear_persisted(&self) -> Result<(), StateError> {
        self.persister.clear(S::ID)
    }

    /// Subscribe to state changes. The handler is called synchronously after
    /// every `update` with the new state.
    pub fn subscribe<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&S) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(HandlerEntry {
                id,
                handler: Arc::new(handler),
            });
        id
    }

    /// Remove a handler. Unknown ids are ignored.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|entry| entry.id != id);
    }

    fn persist(&self, state: &S) -> Result<(), StateError> {
        let bytes = serde_json::to_vec(state).map_err(|e| StateError::Encode {
            store: S::ID,
            message: e.to_string(),
        })?;
        self.persister.save(S::ID, &bytes)
    }

    fn notify(&self, state: &S) {
        // Clone handlers out so a handler may subscribe or unsubscribe.
        let handlers: Vec<ChangeHandler<S>> = self
            .handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|entry| entry.handler.clone())
            .collect();
        for handler in handlers {
            handler(state);
        }
    }

    fn read_state(&self) -> RwLockReadGuard<'_, S> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, S> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn decode<S: StoreState>(bytes: &[u8]) -> Result<S, StateError> {
    serde_json::from_slice(bytes).map_err(|e| StateError::Decode {
        store: S::ID,
        message: e.to_string(),
    })
}
