//! Admin console core — admin account schema + persisted session token.
//!
//! # Pieces
//!
//! - **Admin** — server-confirmed administrator account (read model)
//! - **AdminParam** — partial update submitted for an admin (write model)
//! - **JwtStore** — the session token, persisted under store id `JWT`
//! - **SessionContext** — owns the session stores; pass it to whatever needs
//!   authorization state instead of reaching for a global
//!
//! # Usage
//!
//! ```ignore
//! use imall_admin::{SessionConfig, SessionContext};
//!
//! let config = SessionConfig::load(&SessionConfig::default_path())?;
//! let session = SessionContext::open(&config)?;
//! session.login("eyJhbGciOi...");
//! let header = session.authorization(); // Some("Bearer eyJhbGciOi...")
//! session.logout();
//! ```

pub mod config;
pub mod error;
pub mod model;
pub mod session;
pub mod store;

pub use config::{SessionConfig, StorageKind};
pub use error::SessionError;
pub use model::{Admin, AdminParam};
pub use session::SessionContext;
pub use store::{JwtState, JwtStore, TokenPhase};
