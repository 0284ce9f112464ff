use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::error::KVError;
use crate::traits::KVStore;

/// MemoryKV keeps entries in a process-local map. Nothing outlives the
/// value itself; used for ephemeral sessions and tests.
#[derive(Default)]
pub struct MemoryKV {
    entries: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl MemoryKV {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned<T>(_: T) -> KVError {
    KVError::Storage("memory store lock poisoned".to_string())
}

impl KVStore for MemoryKV {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KVError> {
        let entries = self.entries.read().map_err(poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), KVError> {
        let mut entries = self.entries.write().map_err(poisoned)?;
        entries.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), KVError> {
        let mut entries = self.entries.write().map_err(poisoned)?;
        entries.remove(key);
        Ok(())
    }

    fn scan(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>, KVError> {
        let entries = self.entries.read().map_err(poisoned)?;
        Ok(entries
            .range(prefix.to_string()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}
