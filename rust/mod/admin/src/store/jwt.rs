use std::sync::Arc;

use imall_state::{PersistedStore, Persister, StateError, StoreState, SubscriptionId};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Persisted shape of the session token store: `{"value":"..."}` or `{}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl StoreState for JwtState {
    const ID: &'static str = "JWT";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenPhase {
    Anonymous,
    Authenticated,
}

/// Holder of the current session token.
///
/// Starts anonymous (or with whatever was persisted, via `restore`).
/// `set` and `reset` are total; each one persists the new state.
pub struct JwtStore {
    inner: PersistedStore<JwtState>,
}

impl JwtStore {
    pub fn new(persister: Arc<dyn Persister>) -> Self {
        Self {
            inner: PersistedStore::new(persister),
        }
    }

    pub fn restore(persister: Arc<dyn Persister>) -> Result<Self, StateError> {
        Ok(Self {
            inner: PersistedStore::restore(persister)?,
        })
    }

    /// Store the token. Replaces any previous one.
    pub fn set(&self, value: impl Into<String>) {
        let value = value.into();
        self.inner.update(|s| s.value = Some(value));
        debug!("session token set");
    }

    /// Drop the token.
    pub fn reset(&self) {
        self.inner.update(|s| s.value = None);
        debug!("session token cleared");
    }

    pub fn value(&self) -> Option<String> {
        self.inner.read(|s| s.value.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.read(|s| s.value.is_some())
    }

    pub fn phase(&self) -> TokenPhase {
        if self.is_authenticated() {
            TokenPhase::Authenticated
        } else {
            TokenPhase::Anonymous
        }
    }

    /// `Authorization` header value for the current token.
    pub fn authorization(&self) -> Option<String> {
        self.inner
            .read(|s| s.value.as_ref().map(|token| format!("Bearer {}", token)))
    }

    /// Called with the new token (or `None`) after every `set` / `reset`.
    pub fn subscribe<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(Option<&str>) + Send + Sync + 'static,
    {
        self.inner.subscribe(move |s: &JwtState| handler(s.value.as_deref()))
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.inner.unsubscribe(id);
    }

    /// Persist the current state again and report any storage error.
    pub fn flush(&self) -> Result<(), StateError> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use imall_kv::{KVStore, MemoryKV};
    use imall_state::{KvPersister, NoopPersister};
    use std::sync::Mutex;

    fn store() -> (Arc<MemoryKV>, JwtStore) {
        let kv = Arc::new(MemoryKV::new());
        let store = JwtStore::new(Arc::new(KvPersister::new(kv.clone())));
        (kv, store)
    }

    #[test]
    fn starts_anonymous() {
        let (_kv, jwt) = store();
        assert_eq!(jwt.value(), None);
        assert_eq!(jwt.phase(), TokenPhase::Anonymous);
        assert_eq!(jwt.authorization(), None);
    }

    #[test]
    fn set_then_read() {
        let (_kv, jwt) = store();
        for token in ["tok", "", "eyJhbGciOiJIUzI1NiJ9.e30.sig", "空白 token"] {
            jwt.set(token);
            assert_eq!(jwt.value().as_deref(), Some(token));
        }
    }

    #[test]
    fn reset_from_any_state_is_absent() {
        let (_kv, jwt) = store();
        jwt.reset();
        assert_eq!(jwt.value(), None);

        jwt.set("tok");
        jwt.reset();
        assert_eq!(jwt.value(), None);
    }

    #[test]
    fn reset_is_idempotent() {
        let (kv, jwt) = store();
        jwt.set("tok");
        jwt.reset();
        let once = (jwt.value(), kv.get("JWT").unwrap());
        jwt.reset();
        let twice = (jwt.value(), kv.get("JWT").unwrap());
        assert_eq!(once, twice);
    }

    #[test]
    fn last_write_wins() {
        let (_kv, jwt) = store();
        jwt.set("a");
        jwt.set("b");
        assert_eq!(jwt.value().as_deref(), Some("b"));
        assert_eq!(jwt.phase(), TokenPhase::Authenticated);
    }

    #[test]
    fn login_logout_scenario() {
        let (_kv, jwt) = store();
        assert_eq!(jwt.phase(), TokenPhase::Anonymous);

        jwt.set("tok1");
        assert_eq!(jwt.value().as_deref(), Some("tok1"));
        assert_eq!(jwt.authorization().as_deref(), Some("Bearer tok1"));

        jwt.reset();
        assert_eq!(jwt.value(), None);
        assert_eq!(jwt.phase(), TokenPhase::Anonymous);
    }

    #[test]
    fn persisted_layout() {
        let (kv, jwt) = store();
        jwt.set("tok1");
        assert_eq!(kv.get("JWT").unwrap().unwrap(), br#"{"value":"tok1"}"#);

        jwt.reset();
        assert_eq!(kv.get("JWT").unwrap().unwrap(), b"{}");
    }

    #[test]
    fn restore_picks_up_persisted_token() {
        let kv = Arc::new(MemoryKV::new());
        {
            let jwt = JwtStore::new(Arc::new(KvPersister::new(kv.clone())));
            jwt.set("kept");
        }
        let jwt = JwtStore::restore(Arc::new(KvPersister::new(kv))).unwrap();
        assert_eq!(jwt.value().as_deref(), Some("kept"));
    }

    #[test]
    fn subscribers_observe_transitions() {
        let (_kv, jwt) = store();
        let seen = Arc::new(Mutex::new(Vec::<Option<String>>::new()));
        let seen_c = seen.clone();

        let id = jwt.subscribe(move |token| {
            seen_c.lock().unwrap().push(token.map(str::to_string));
        });
        jwt.set("a");
        jwt.reset();
        jwt.unsubscribe(id);
        jwt.set("ignored");

        assert_eq!(*seen.lock().unwrap(), vec![Some("a".to_string()), None]);
    }

    #[test]
    fn works_without_persistence() {
        let jwt = JwtStore::new(Arc::new(NoopPersister));
        jwt.set("tok");
        assert!(jwt.is_authenticated());
        jwt.flush().unwrap();
    }
}
