use std::sync::Arc;

use imall_kv::KVStore;
use tracing::debug;

use crate::error::StateError;

/// Persister is the on-change hook a [`PersistedStore`](crate::PersistedStore)
/// writes through. Implementations decide the medium; the store only hands
/// over the encoded state and its id.
pub trait Persister: Send + Sync {
    /// Load the persisted bytes for a store id, if any.
    fn load(&self, id: &str) -> Result<Option<Vec<u8>>, StateError>;

    /// Persist the encoded state for a store id.
    fn save(&self, id: &str, bytes: &[u8]) -> Result<(), StateError>;

    /// Remove whatever is persisted for a store id.
    fn clear(&self, id: &str) -> Result<(), StateError>;
}

/// Persists store state into a [`KVStore`] under `{prefix}{id}`.
pub struct KvPersister {
    kv: Arc<dyn KVStore>,
    prefix: String,
}

impl KvPersister {
    /// Use the store id itself as the key.
    pub fn new(kv: Arc<dyn KVStore>) -> Self {
        Self::with_prefix(kv, "")
    }

    pub fn with_prefix(kv: Arc<dyn KVStore>, prefix: impl Into<String>) -> Self {
        Self {
            kv,
            prefix: prefix.into(),
        }
    }

    /// The KV key a store id is persisted under.
    pub fn key(&self, id: &str) -> String {
        format!("{}{}", self.prefix, id)
    }
}

impl Persister for KvPersister {
    fn load(&self, id: &str) -> Result<Option<Vec<u8>>, StateError> {
        Ok(self.kv.get(&self.key(id))?)
    }

    fn save(&self, id: &str, bytes: &[u8]) -> Result<(), StateError> {
        let key = self.key(id);
        debug!(key = %key, len = bytes.len(), "persisting store");
        Ok(self.kv.set(&key, bytes)?)
    }

    fn clear(&self, id: &str) -> Result<(), StateError> {
        Ok(self.kv.delete(&self.key(id))?)
    }
}

/// Persistence disabled: loads nothing, saves nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopPersister;

impl Persister for NoopPersister {
    fn load(&self, _id: &str) -> Result<Option<Vec<u8>>, StateError> {
        Ok(None)
    }

    fn save(&self, _id: &str, _bytes: &[u8]) -> Result<(), StateError> {
        Ok(())
    }

    fn clear(&self, _id: &str) -> Result<(), StateError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use imall_kv::MemoryKV;

    #[test]
    fn kv_persister_uses_store_id_as_key() {
        let kv = Arc::new(MemoryKV::new());
        let persister = KvPersister::new(kv.clone());

        persister.save("JWT", b"{}").unwrap();
        assert_eq!(kv.get("JWT").unwrap(), Some(b"{}".to_vec()));
        assert_eq!(persister.load("JWT").unwrap(), Some(b"{}".to_vec()));
    }

    #[test]
    fn kv_persister_prefix() {
        let kv = Arc::new(MemoryKV::new());
        let persister = KvPersister::with_prefix(kv.clone(), "imall:");

        assert_eq!(persister.key("JWT"), "imall:JWT");
        persister.save("JWT", b"x").unwrap();
        assert!(kv.get("JWT").unwrap().is_none());
        assert!(kv.get("imall:JWT").unwrap().is_some());

        persister.clear("JWT").unwrap();
        assert!(kv.get("imall:JWT").unwrap().is_none());
    }

    #[test]
    fn noop_persister_never_loads() {
        let persister = NoopPersister;
        persister.save("JWT", b"x").unwrap();
        assert!(persister.load("JWT").unwrap().is_none());
    }
}
