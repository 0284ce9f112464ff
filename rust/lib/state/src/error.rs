use imall_kv::KVError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StateError {
    #[error("storage error: {0}")]
    Storage(#[from] KVError),

    #[error("failed to encode store '{store}': {message}")]
    Encode { store: &'static str, message: String },

    #[error("failed to decode store '{store}': {message}")]
    Decode { store: &'static str, message: String },
}
