//! Transition registries.
//!
//! A [`Registry`] collects the handlers of one machine type (or one reusable
//! block of transitions) during a bounded declaration window:
//!
//! 1. [`Registry::open`] scopes the registry to a reference signature.
//! 2. [`Registry::register`] validates a handler and binds it to its source
//!    states, preserving call order.
//! 3. [`Registry::freeze`] turns the per-state lists into an immutable
//!    [`DispatchTable`] and refuses every later registration.
//!
//! The frozen registry is then handed to the compiler
//! ([`MachineBuilder::registry`](crate::builder::MachineBuilder::registry)).
//!
//! # Example
//!
//! ```rust
//! use microstate::core::{Model, State};
//! use microstate::registry::{Handler, Registry, RegistryError};
//!
//! #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
//! enum Door { Locked, Unlocked }
//!
//! impl State for Door {
//!     fn name(&self) -> &str {
//!         match self {
//!             Self::Locked => "Locked",
//!             Self::Unlocked => "Unlocked",
//!         }
//!     }
//! }
//!
//! struct Frame;
//!
//! impl Model for Frame {
//!     type State = Door;
//!     type Input = bool;
//! }
//!
//! let mut registry = Registry::<Frame>::new();
//! registry
//!     .register([Door::Locked], Handler::new("unlock", |_door, key: &bool| {
//!         key.then_some(Door::Unlocked)
//!     }))
//!     .unwrap();
//!
//! assert!(matches!(registry.transitions(), Err(RegistryError::RegistryNotFrozen)));
//!
//! let table = registry.freeze();
//! assert_eq!(table.handler_names(&Door::Locked), vec!["unlock"]);
//! ```
//!
//! States of a different domain cannot be mixed into one registration; the
//! registry only accepts its model's state type:
//!
//! ```compile_fail
//! use microstate::core::{Model, State};
//! use microstate::registry::{Handler, Registry};
//!
//! #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
//! enum Door { Locked }
//! impl State for Door { fn name(&self) -> &str { "Locked" } }
//!
//! #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
//! enum Window { Open }
//! impl State for Window { fn name(&self) -> &str { "Open" } }
//!
//! struct Frame;
//! impl Model for Frame {
//!     type State = Door;
//!     type Input = ();
//! }
//!
//! let mut registry = Registry::<Frame>::new();
//! registry.register([Door::Locked, Window::Open], Handler::new("mixed", |_m, _: &()| None));
//! ```

mod error;
mod handler;
mod manual;

pub use error::RegistryError;
pub use handler::Handler;
pub use manual::Manual;

use crate::core::{validate, Model, Signature, State, TypeTag};
use crate::runtime::{DispatchTable, Machine};
use std::borrow::Cow;
use std::collections::HashMap;

/// Lifecycle phase of a registry.
enum Phase<M: Model> {
    Open {
        order: Vec<M::State>,
        lists: HashMap<M::State, Vec<Handler<M>>>,
    },
    Frozen(DispatchTable<M>),
}

/// Builder collecting the transition handlers of a machine type.
///
/// Single-owner and not meant to be shared while open. Once frozen it only
/// hands out clones of its immutable table.
pub struct Registry<M: Model> {
    signature: Signature,
    phase: Phase<M>,
}

impl<M: Model> Registry<M> {
    /// Open an empty registry scoped to `signature`.
    pub fn open(signature: Signature) -> Self {
        Self {
            signature,
            phase: Phase::Open {
                order: Vec::new(),
                lists: HashMap::new(),
            },
        }
    }

    /// Open a registry scoped to the model's `update` signature.
    pub fn new() -> Self {
        Self::open(Signature::update::<M>())
    }

    /// The reference signature every handler must match.
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn is_frozen(&self) -> bool {
        matches!(self.phase, Phase::Frozen(_))
    }

    /// Bind `handler` to every state in `states`.
    ///
    /// The handler is appended after the handlers already registered for
    /// each state. A state listed twice in `states` is bound once. On success
    /// the handler is handed back so it can still be used directly.
    pub fn register<I>(&mut self, states: I, handler: Handler<M>) -> Result<Handler<M>, RegistryError>
    where
        I: IntoIterator<Item = M::State>,
    {
        let Phase::Open { order, lists } = &mut self.phase else {
            return Err(RegistryError::RegistryFrozen {
                handler: handler.name().to_string(),
            });
        };

        let mut sources: Vec<M::State> = Vec::new();
        for state in states {
            if !sources.contains(&state) {
                sources.push(state);
            }
        }
        if sources.is_empty() {
            return Err(RegistryError::InvalidStateInput {
                handler: handler.name().to_string(),
            });
        }

        validate(
            handler.name(),
            handler.signature(),
            &self.signature,
            TypeTag::of::<M::State>(),
        )?;

        for state in &sources {
            if !lists.contains_key(state) {
                order.push(state.clone());
            }
            lists.entry(state.clone()).or_default().push(handler.clone());
        }

        tracing::debug!(
            handler = handler.name(),
            states = ?sources.iter().map(State::name).collect::<Vec<_>>(),
            "registered transition"
        );

        Ok(handler)
    }

    /// Freeze the registry and return its table.
    ///
    /// Calling `freeze` again returns the same table.
    pub fn freeze(&mut self) -> DispatchTable<M> {
        let table = match &mut self.phase {
            Phase::Frozen(table) => return table.clone(),
            Phase::Open { order, lists } => {
                DispatchTable::from_lists(std::mem::take(order), std::mem::take(lists))
            }
        };

        tracing::debug!(
            signature = %self.signature,
            states = table.len(),
            "froze transition registry"
        );

        self.phase = Phase::Frozen(table.clone());
        table
    }

    /// Consuming [`freeze`](Self::freeze), for builder chains.
    pub fn frozen(mut self) -> Self {
        self.freeze();
        self
    }

    /// The frozen table.
    pub fn transitions(&self) -> Result<DispatchTable<M>, RegistryError> {
        match &self.phase {
            Phase::Frozen(table) => Ok(table.clone()),
            Phase::Open { .. } => Err(RegistryError::RegistryNotFrozen),
        }
    }

    /// Wrap a body as a [`Manual`] transition.
    ///
    /// Manual transitions never enter the per-state table and may be declared
    /// whether or not the registry is frozen.
    pub fn manual<A, F>(&self, name: impl Into<Cow<'static, str>>, func: F) -> Manual<M, A>
    where
        A: 'static,
        F: Fn(&Machine<M>, &A) -> Option<M::State> + Send + Sync + 'static,
    {
        Manual::new(name, func)
    }
}

impl<M: Model> Default for Registry<M> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SignatureError;

    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
    enum Door {
        Locked,
        Unlocked,
        Broken,
    }

    impl State for Door {
        fn name(&self) -> &str {
            match self {
                Self::Locked => "Locked",
                Self::Unlocked => "Unlocked",
                Self::Broken => "Broken",
            }
        }
    }

    #[derive(Clone, Copy, PartialEq, Eq, Debug)]
    enum Event {
        InsertKey,
        Break,
    }

    struct Frame;

    impl Model for Frame {
        type State = Door;
        type Input = Option<Event>;
    }

    fn to_unlocked() -> Handler<Frame> {
        Handler::new("to_unlocked", |_m, e: &Option<Event>| {
            (*e == Some(Event::InsertKey)).then_some(Door::Unlocked)
        })
    }

    fn to_broken() -> Handler<Frame> {
        Handler::new("to_broken", |_m, e: &Option<Event>| {
            (*e == Some(Event::Break)).then_some(Door::Broken)
        })
    }

    #[test]
    fn register_preserves_call_order_per_state() {
        let mut registry = Registry::<Frame>::new();
        registry.register([Door::Locked], to_unlocked()).unwrap();
        registry
            .register([Door::Locked, Door::Unlocked], to_broken())
            .unwrap();

        let table = registry.freeze();
        assert_eq!(
            table.handler_names(&Door::Locked),
            vec!["to_unlocked", "to_broken"]
        );
        assert_eq!(table.handler_names(&Door::Unlocked), vec!["to_broken"]);
        assert!(table.handlers(&Door::Broken).is_empty());
        assert_eq!(
            table.states().cloned().collect::<Vec<_>>(),
            vec![Door::Locked, Door::Unlocked]
        );
    }

    #[test]
    fn register_hands_the_handler_back() {
        let mut registry = Registry::<Frame>::new();
        let handler = registry.register([Door::Locked], to_unlocked()).unwrap();
        assert_eq!(handler.name(), "to_unlocked");
    }

    #[test]
    fn empty_state_set_is_rejected() {
        let mut registry = Registry::<Frame>::new();
        let err = registry.register([], to_unlocked()).unwrap_err();

        assert_eq!(
            err,
            RegistryError::InvalidStateInput {
                handler: "to_unlocked".to_string()
            }
        );
    }

    #[test]
    fn repeated_state_is_bound_once() {
        let mut registry = Registry::<Frame>::new();
        registry
            .register([Door::Locked, Door::Locked], to_unlocked())
            .unwrap();

        assert_eq!(registry.freeze().handlers(&Door::Locked).len(), 1);
    }

    #[test]
    fn missing_parameter_is_a_signature_mismatch() {
        let mut registry = Registry::<Frame>::new();
        let bad = Handler::<Frame>::new("bad_transition", |_m, _: &()| None);

        let err = registry.register([Door::Locked], bad).unwrap_err();
        assert!(matches!(
            err,
            RegistryError::Signature(SignatureError::SignatureMismatch { .. })
        ));
    }

    #[test]
    fn foreign_target_is_a_return_type_mismatch() {
        let mut registry = Registry::<Frame>::new();
        let wrong = Handler::<Frame>::new("wrong_return", |_m, _: &Option<Event>| None).targets([42]);

        let err = registry.register([Door::Locked], wrong).unwrap_err();
        assert!(matches!(
            err,
            RegistryError::Signature(SignatureError::ReturnTypeMismatch { .. })
        ));
    }

    #[test]
    fn failed_registration_leaves_the_table_untouched() {
        let mut registry = Registry::<Frame>::new();
        let bad = Handler::<Frame>::new("bad", |_m, _: &u8| None);
        assert!(registry.register([Door::Locked], bad).is_err());

        assert!(registry.freeze().is_empty());
    }

    #[test]
    fn register_after_freeze_is_rejected() {
        let mut registry = Registry::<Frame>::new();
        registry.register([Door::Locked], to_unlocked()).unwrap();
        registry.freeze();

        let err = registry.register([Door::Locked], to_broken()).unwrap_err();
        assert_eq!(
            err,
            RegistryError::RegistryFrozen {
                handler: "to_broken".to_string()
            }
        );
        assert_eq!(registry.freeze().handlers(&Door::Locked).len(), 1);
    }

    #[test]
    fn transitions_require_freeze() {
        let mut registry = Registry::<Frame>::new();
        assert_eq!(
            registry.transitions().unwrap_err(),
            RegistryError::RegistryNotFrozen
        );

        registry.freeze();
        assert!(registry.transitions().is_ok());
        assert!(registry.is_frozen());
    }

    #[test]
    fn freeze_is_idempotent() {
        let mut registry = Registry::<Frame>::new();
        registry.register([Door::Locked], to_unlocked()).unwrap();

        let first = registry.freeze();
        let second = registry.freeze();
        assert_eq!(first.describe(), second.describe());
    }

    #[test]
    fn manual_is_available_after_freeze() {
        let mut registry = Registry::<Frame>::new();
        registry.freeze();

        let force_open = registry.manual("force_open", |_m, _: &()| Some(Door::Unlocked));
        assert_eq!(force_open.name(), "force_open");
    }

    #[test]
    fn custom_reference_signature_is_enforced() {
        let mut registry = Registry::<Frame>::open(Signature::new::<u8, Door>("tick"));
        assert_eq!(registry.signature().name(), "tick");

        let ok = Handler::<Frame>::new("tick_handler", |_m, _: &u8| None);
        assert!(registry.register([Door::Locked], ok).is_ok());
        assert!(registry.register([Door::Locked], to_unlocked()).is_err());
    }
}
