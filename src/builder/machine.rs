//! Builder for compiling machine types.

use crate::builder::compile::{check_unique, merge, DispatchPolicy};
use crate::builder::error::CompileError;
use crate::core::{Model, Signature};
use crate::registry::Registry;
use crate::runtime::{DispatchTable, MachineType};
use std::borrow::Cow;
use std::sync::Arc;
use stillwater::validation::Validation;

/// Builder for compiling a machine type with a fluent API.
///
/// Collects the start state, an optional parent type and any number of
/// frozen registries, then [`build`](Self::build)s them into one immutable
/// [`MachineType`].
pub struct MachineBuilder<M: Model> {
    name: Option<Cow<'static, str>>,
    start: Option<M::State>,
    parent: Option<Arc<MachineType<M>>>,
    inherit_transitions: bool,
    policy: Option<DispatchPolicy>,
    registries: Vec<Registry<M>>,
}

impl<M: Model> MachineBuilder<M> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            name: None,
            start: None,
            parent: None,
            inherit_transitions: true,
            policy: None,
            registries: Vec::new(),
        }
    }

    /// Name used in logs and errors. Defaults to the model's type name.
    pub fn name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the start state. Required unless a parent provides one.
    pub fn start(mut self, state: M::State) -> Self {
        self.start = Some(state);
        self
    }

    /// Derive from an already compiled type.
    ///
    /// The parent's start state, policy and (unless disabled with
    /// [`inherit_transitions`](Self::inherit_transitions)) transitions become
    /// the defaults of the new type.
    pub fn extends(mut self, parent: &Arc<MachineType<M>>) -> Self {
        self.parent = Some(Arc::clone(parent));
        self
    }

    /// Whether the parent's transitions are carried over. Defaults to `true`.
    pub fn inherit_transitions(mut self, inherit: bool) -> Self {
        self.inherit_transitions = inherit;
        self
    }

    pub fn policy(mut self, policy: DispatchPolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Attach a frozen registry. Registries are merged in the order given.
    pub fn registry(mut self, registry: Registry<M>) -> Self {
        self.registries.push(registry);
        self
    }

    /// Compile the machine type.
    ///
    /// Fails when no start state is available, when a registry is still
    /// open or was opened for another signature, and, under
    /// [`DispatchPolicy::Strict`], when any state holds more than one handler.
    pub fn build(self) -> Result<Arc<MachineType<M>>, CompileError> {
        let Self {
            name,
            start,
            parent,
            inherit_transitions,
            policy,
            registries,
        } = self;

        let name = name.unwrap_or(Cow::Borrowed(std::any::type_name::<M>()));

        let start = start
            .or_else(|| parent.as_ref().map(|p| p.start().clone()))
            .ok_or_else(|| CompileError::MissingStartState {
                machine: name.to_string(),
            })?;

        let expected = Signature::update::<M>();
        let mut added: Vec<DispatchTable<M>> = Vec::with_capacity(registries.len());
        for registry in &registries {
            if !registry.signature().same_shape(&expected) {
                return Err(CompileError::IncompatibleRegistry {
                    machine: name.to_string(),
                    expected: expected.to_string(),
                    found: registry.signature().to_string(),
                });
            }
            added.push(registry.transitions()?);
        }

        let inherited = match &parent {
            Some(parent) if inherit_transitions => parent.table().clone(),
            _ => DispatchTable::empty(),
        };
        let table = merge(&inherited, &added);

        let policy = policy
            .or_else(|| parent.as_ref().map(|p| p.policy()))
            .unwrap_or_default();

        if policy == DispatchPolicy::Strict {
            if let Validation::Failure(conflicts) = check_unique(&table) {
                return Err(CompileError::DuplicateTransitions {
                    machine: name.to_string(),
                    conflicts: conflicts.iter().cloned().collect(),
                });
            }
        }

        tracing::debug!(
            machine = %name,
            parent = parent.as_ref().map(|p| p.name()),
            states = table.len(),
            ?policy,
            "compiled machine type"
        );

        Ok(Arc::new(MachineType::new(name, start, policy, table)))
    }
}

impl<M: Model> Default for MachineBuilder<M> {
    fn default() -> Self {
        Self::new()
    }
}
