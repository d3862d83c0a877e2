//! Compiled machine types and the instances that run them.

use crate::builder::DispatchPolicy;
use crate::core::{Model, State};
use crate::runtime::table::DispatchTable;
use std::any::Any;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// A compiled machine type: start state plus its dispatch table.
///
/// Built once by [`MachineBuilder`](crate::builder::MachineBuilder) and shared
/// read-only, through an `Arc`, by every instance of the type.
pub struct MachineType<M: Model> {
    name: Cow<'static, str>,
    start: M::State,
    policy: DispatchPolicy,
    table: DispatchTable<M>,
}

impl<M: Model> MachineType<M> {
    pub(crate) fn new(
        name: Cow<'static, str>,
        start: M::State,
        policy: DispatchPolicy,
        table: DispatchTable<M>,
    ) -> Self {
        Self {
            name,
            start,
            policy,
            table,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// State every new instance begins in.
    pub fn start(&self) -> &M::State {
        &self.start
    }

    pub fn policy(&self) -> DispatchPolicy {
        self.policy
    }

    pub fn table(&self) -> &DispatchTable<M> {
        &self.table
    }
}

impl<M: Model> fmt::Debug for MachineType<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MachineType")
            .field("name", &self.name)
            .field("start", &self.start)
            .field("policy", &self.policy)
            .field("table", &self.table)
            .finish()
    }
}

/// A running instance of a machine type.
///
/// The current state is the only mutable runtime data. It changes through
/// [`advance`](Self::advance), through manual transitions and through
/// [`force_state`](Self::force_state). An instance is not internally
/// synchronized; callers serialize access to it.
pub struct Machine<M: Model> {
    kind: Arc<MachineType<M>>,
    current: M::State,
    model: M,
}

impl<M: Model> Machine<M> {
    /// Create an instance in the type's start state.
    pub fn new(kind: Arc<MachineType<M>>, model: M) -> Self {
        let current = kind.start().clone();
        Self {
            kind,
            current,
            model,
        }
    }

    pub fn current_state(&self) -> &M::State {
        &self.current
    }

    /// Overwrite the current state without running any handler.
    pub fn force_state(&mut self, state: M::State) {
        tracing::debug!(
            machine = self.kind.name(),
            from = self.current.name(),
            to = state.name(),
            "state forced"
        );
        self.current = state;
    }

    pub fn is_final(&self) -> bool {
        self.current.is_final()
    }

    pub fn machine_type(&self) -> &MachineType<M> {
        &self.kind
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    pub fn into_model(self) -> M {
        self.model
    }

    /// Compute and commit the next state for `input`.
    ///
    /// Handlers registered for the current state run in order. The first one
    /// returning a state different from the current one wins: that state is
    /// committed and no further handler runs. When none qualifies the state
    /// is left alone. Returns the state after the call.
    pub fn advance(&mut self, input: M::Input) -> M::State {
        let kind = Arc::clone(&self.kind);
        let handlers = kind.table().handlers(&self.current);
        let args: &dyn Any = &input;
        let this: &Self = self;

        let hit = handlers.iter().find_map(|handler| {
            handler
                .invoke(this, args)
                .filter(|next| *next != this.current)
                .map(|next| (handler, next))
        });

        match hit {
            Some((handler, next)) => {
                if !handler.returns().admits(&next) {
                    tracing::warn!(
                        machine = kind.name(),
                        handler = handler.name(),
                        to = next.name(),
                        "handler returned a state it did not declare"
                    );
                }
                self.commit(next, handler.name());
            }
            None => tracing::trace!(
                machine = kind.name(),
                state = self.current.name(),
                candidates = handlers.len(),
                "no transition taken"
            ),
        }

        self.current.clone()
    }

    pub(crate) fn commit(&mut self, next: M::State, via: &str) {
        tracing::debug!(
            machine = self.kind.name(),
            from = self.current.name(),
            to = next.name(),
            via,
            "state committed"
        );
        self.current = next;
    }
}

impl<M: Model + fmt::Debug> fmt::Debug for Machine<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Machine")
            .field("type", &self.kind.name())
            .field("current", &self.current)
            .field("model", &self.model)
            .finish()
    }
}
