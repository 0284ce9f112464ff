use std::sync::Arc;

use imall_state::{NoopPersister, Persister};
use tracing::info;

use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::store::JwtStore;

/// Session-scoped state of the admin console.
///
/// Built once at startup and handed to whatever needs authorization state.
pub struct SessionContext {
    jwt: JwtStore,
}

impl SessionContext {
    /// Open the configured storage and restore the persisted stores.
    pub fn open(config: &SessionConfig) -> Result<Self, SessionError> {
        let ctx = Self::with_persister(config.persister()?)?;
        info!(
            storage = ?config.storage,
            persist = config.persist,
            authenticated = ctx.jwt.is_authenticated(),
            "session opened"
        );
        Ok(ctx)
    }

    /// Restore stores through an explicit persister.
    pub fn with_persister(persister: Arc<dyn Persister>) -> Result<Self, SessionError> {
        Ok(Self {
            jwt: JwtStore::restore(persister)?,
        })
    }

    /// A session that persists nothing.
    pub fn in_memory() -> Self {
        Self {
            jwt: JwtStore::new(Arc::new(NoopPersister)),
        }
    }

    pub fn jwt(&self) -> &JwtStore {
        &self.jwt
    }

    pub fn login(&self, token: impl Into<String>) {
        self.jwt.set(token);
    }

    pub fn logout(&self) {
        self.jwt.reset();
    }

    pub fn authorization(&self) -> Option<String> {
        self.jwt.authorization()
    }
}
