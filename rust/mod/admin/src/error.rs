use std::path::PathBuf;

use imall_kv::KVError;
use imall_state::StateError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("failed to read config {path}: {message}")]
    Config { path: PathBuf, message: String },

    #[error("storage error: {0}")]
    Storage(#[from] KVError),

    #[error(transparent)]
    State(#[from] StateError),
}
