//! Builder API for compiling machine types.
//!
//! [`MachineBuilder`] combines a start state, an optional parent type and
//! frozen registries into one immutable [`MachineType`](crate::runtime::MachineType).
//! The [`state_enum!`](crate::state_enum) macro removes the boilerplate of
//! implementing [`State`](crate::core::State) for plain enums.

pub mod compile;
pub mod error;
pub mod machine;
pub mod macros;

pub use compile::{check_unique, merge, DispatchPolicy};
pub use error::{CompileError, DuplicateTransition};
pub use machine::MachineBuilder;
