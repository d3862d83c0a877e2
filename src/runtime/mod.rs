//! Run-time side of a machine definition.
//!
//! - **Dispatch table**: immutable per-state handler sequences
//! - **Machine type**: compiled start state and table, shared by instances
//! - **Machine**: one instance, holding the current state and the model
//!
//! `advance` is synchronous and total: it never fails, and a state without
//! handlers simply keeps the machine where it is.

mod machine;
mod table;

pub use machine::{Machine, MachineType};
pub use table::{DispatchTable, HandlerEntry, StateEntry, TableDescription};
