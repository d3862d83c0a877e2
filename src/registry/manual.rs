//! Manual transitions: caller-invoked, committed unconditionally.

use crate::core::{Model, State};
use crate::runtime::Machine;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

type ManualFn<M, A> = Arc<dyn Fn(&Machine<M>, &A) -> Option<<M as Model>::State> + Send + Sync>;

/// A transition the caller runs directly instead of through `advance`.
///
/// Manual transitions are not part of any per-state table and take whatever
/// arguments they like. Whenever the wrapped body returns a state, that state
/// is committed, even if it equals the current one.
///
/// # Example
///
/// ```rust
/// use microstate::builder::MachineBuilder;
/// use microstate::core::{Model, State};
/// use microstate::registry::Manual;
/// use microstate::runtime::Machine;
///
/// #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
/// enum Door { Locked, Unlocked }
///
/// impl State for Door {
///     fn name(&self) -> &str {
///         match self {
///             Self::Locked => "Locked",
///             Self::Unlocked => "Unlocked",
///         }
///     }
/// }
///
/// struct Frame;
///
/// impl Model for Frame {
///     type State = Door;
///     type Input = ();
/// }
///
/// let force_open = Manual::<Frame, ()>::new("force_open", |door, _: &()| {
///     (*door.current_state() == Door::Locked).then_some(Door::Unlocked)
/// });
///
/// let kind = MachineBuilder::<Frame>::new().start(Door::Locked).build().unwrap();
/// let mut door = Machine::new(kind, Frame);
///
/// assert_eq!(force_open.run(&mut door), Door::Unlocked);
/// assert_eq!(force_open.run(&mut door), Door::Unlocked);
/// ```
pub struct Manual<M: Model, A> {
    name: Cow<'static, str>,
    func: ManualFn<M, A>,
}

impl<M: Model, A: 'static> Manual<M, A> {
    pub fn new<F>(name: impl Into<Cow<'static, str>>, func: F) -> Self
    where
        F: Fn(&Machine<M>, &A) -> Option<M::State> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the body and commit any state it returns.
    ///
    /// Returns the machine's state after the call.
    pub fn invoke(&self, machine: &mut Machine<M>, args: &A) -> M::State {
        match (self.func)(&*machine, args) {
            Some(next) => machine.commit(next, &self.name),
            None => tracing::trace!(
                machine = machine.machine_type().name(),
                state = machine.current_state().name(),
                manual = %self.name,
                "manual transition returned no state"
            ),
        }
        machine.current_state().clone()
    }
}

impl<M: Model> Manual<M, ()> {
    /// [`invoke`](Self::invoke) for transitions without arguments.
    pub fn run(&self, machine: &mut Machine<M>) -> M::State {
        self.invoke(machine, &())
    }
}

impl<M: Model, A> Clone for Manual<M, A> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            func: Arc::clone(&self.func),
        }
    }
}

impl<M: Model, A> fmt::Debug for Manual<M, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Manual").field("name", &self.name).finish()
    }
}
