//! Errors raised while compiling a machine type.

use crate::registry::RegistryError;
use thiserror::Error;

/// Errors that can occur when building a machine type.
///
/// All of them describe an invalid definition; none is transient.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CompileError {
    #[error(
        "Start state of `{machine}` not specified and not inherited. \
         Call .start(state) or .extends(parent) before .build()"
    )]
    MissingStartState { machine: String },

    #[error("`{machine}` allows one transition per state, found {} duplicate(s)", .conflicts.len())]
    DuplicateTransitions {
        machine: String,
        conflicts: Vec<DuplicateTransition>,
    },

    #[error("Registry opened for `{found}` cannot be attached to `{machine}`, expected `{expected}`")]
    IncompatibleRegistry {
        machine: String,
        expected: String,
        found: String,
    },

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// A second handler bound to a state under the strict policy.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("state `{state}` is already handled by `{existing}`, cannot add `{attempted}`")]
pub struct DuplicateTransition {
    pub state: String,
    pub existing: String,
    pub attempted: String,
}
