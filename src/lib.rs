//! Microstate: declarative transition tables for enum state machines
//!
//! Transitions are declared as named handlers bound to source states. Each
//! handler is checked against a reference signature when it is registered,
//! the registry is frozen into an immutable table, and a builder compiles one
//! or more tables into a machine type. Instances of the type advance by
//! asking the handlers of their current state, in registration order, for
//! the next state.
//!
//! # Core Concepts
//!
//! - **State**: enum state domains via the `State` trait
//! - **Registry**: validated, order-preserving handler declarations
//! - **MachineBuilder**: start state, inheritance and duplicate policy
//! - **Machine**: first-match dispatch over the compiled table
//!
//! # Example
//!
//! ```rust
//! use microstate::{state_enum, Handler, Machine, MachineBuilder, Model, Registry};
//!
//! state_enum! {
//!     enum Door {
//!         Locked,
//!         Unlocked,
//!         Broken,
//!     }
//!     error: [Broken]
//! }
//!
//! #[derive(Clone, Copy, PartialEq, Eq, Debug)]
//! enum Event {
//!     InsertKey,
//!     Break,
//!     Repair,
//! }
//!
//! struct Frame;
//!
//! impl Model for Frame {
//!     type State = Door;
//!     type Input = Option<Event>;
//! }
//!
//! let mut registry = Registry::<Frame>::new();
//! registry
//!     .register(
//!         [Door::Locked],
//!         Handler::new("to_unlocked", |_door, e: &Option<Event>| {
//!             (*e == Some(Event::InsertKey)).then_some(Door::Unlocked)
//!         }),
//!     )
//!     .unwrap();
//! registry
//!     .register(
//!         [Door::Locked, Door::Unlocked],
//!         Handler::new("to_broken", |_door, e: &Option<Event>| {
//!             (*e == Some(Event::Break)).then_some(Door::Broken)
//!         }),
//!     )
//!     .unwrap();
//! registry
//!     .register(
//!         [Door::Broken],
//!         Handler::new("to_locked", |_door, e: &Option<Event>| {
//!             (*e == Some(Event::Repair)).then_some(Door::Locked)
//!         }),
//!     )
//!     .unwrap();
//!
//! let kind = MachineBuilder::new()
//!     .start(Door::Locked)
//!     .registry(registry.frozen())
//!     .build()
//!     .unwrap();
//!
//! let mut door = Machine::new(kind, Frame);
//! assert_eq!(door.advance(None), Door::Locked);
//! assert_eq!(door.advance(Some(Event::InsertKey)), Door::Unlocked);
//! assert_eq!(door.advance(Some(Event::Break)), Door::Broken);
//! assert_eq!(door.advance(Some(Event::Repair)), Door::Locked);
//! ```

pub mod builder;
pub mod core;
pub mod registry;
pub mod runtime;

// Re-export commonly used types
pub use builder::{CompileError, DispatchPolicy, MachineBuilder};
pub use core::{Model, Signature, SignatureError, State};
pub use registry::{Handler, Manual, Registry, RegistryError};
pub use runtime::{DispatchTable, Machine, MachineType};
