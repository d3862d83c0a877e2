//! Errors raised while declaring transitions in a registry.

use crate::core::SignatureError;
use thiserror::Error;

/// Errors that can occur when registering handlers or reading a registry.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Handler `{handler}` must be registered for at least one state")]
    InvalidStateInput { handler: String },

    #[error("Cannot register `{handler}`: the registry is frozen")]
    RegistryFrozen { handler: String },

    #[error("Transitions are only available once the registry is frozen. Call .freeze() first")]
    RegistryNotFrozen,

    #[error(transparent)]
    Signature(#[from] SignatureError),
}
