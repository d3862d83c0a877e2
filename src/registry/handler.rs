//! Transition handlers and their fingerprints.

use crate::core::{HandlerSignature, Model, Returns, Target, TypeTag};
use crate::runtime::Machine;
use std::any::Any;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// Type-erased handler body.
///
/// Arguments arrive as `&dyn Any` and are downcast to the handler's own
/// parameter type; registration guarantees the two agree.
type HandlerFn<M> =
    Arc<dyn Fn(&Machine<M>, &dyn Any) -> Option<<M as Model>::State> + Send + Sync>;

/// A named transition candidate.
///
/// The handler computes a possible next state from the machine and the
/// caller's input, or `None` when it does not apply. Its parameter type and
/// declared return set are fingerprinted when the value is built, so a
/// mismatch with the registry's reference signature is caught by
/// [`Registry::register`](crate::registry::Registry::register) and never at
/// dispatch time.
///
/// Cloning is cheap; clones share the same body.
pub struct Handler<M: Model> {
    name: Cow<'static, str>,
    signature: HandlerSignature,
    func: HandlerFn<M>,
}

impl<M: Model> Handler<M> {
    /// Build a handler taking arguments of type `A`.
    ///
    /// The declared return set defaults to the whole state domain.
    pub fn new<A, F>(name: impl Into<Cow<'static, str>>, func: F) -> Self
    where
        A: 'static,
        F: Fn(&Machine<M>, &A) -> Option<M::State> + Send + Sync + 'static,
    {
        let func: HandlerFn<M> = Arc::new(move |machine: &Machine<M>, input: &dyn Any| {
            input
                .downcast_ref::<A>()
                .and_then(|args| func(machine, args))
        });

        Self {
            name: name.into(),
            signature: HandlerSignature {
                params: TypeTag::of::<A>(),
                returns: Returns::Type(TypeTag::of::<M::State>()),
            },
            func,
        }
    }

    /// Narrow the declared return set to `targets`.
    ///
    /// Targets are only checked against the state domain when the handler
    /// is registered; values of any other type make registration fail.
    pub fn targets<T, I>(mut self, targets: I) -> Self
    where
        T: fmt::Debug + Send + Sync + 'static,
        I: IntoIterator<Item = T>,
    {
        self.signature.returns = Returns::OneOf(targets.into_iter().map(Target::new).collect());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn signature(&self) -> &HandlerSignature {
        &self.signature
    }

    pub fn returns(&self) -> &Returns {
        &self.signature.returns
    }

    /// Run the handler directly, outside of dispatch.
    ///
    /// Returns `None` when `A` is not the handler's parameter type.
    pub fn call<A: 'static>(&self, machine: &Machine<M>, args: &A) -> Option<M::State> {
        self.invoke(machine, args)
    }

    pub(crate) fn invoke(&self, machine: &Machine<M>, input: &dyn Any) -> Option<M::State> {
        (self.func)(machine, input)
    }
}

impl<M: Model> Clone for Handler<M> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            signature: self.signature.clone(),
            func: Arc::clone(&self.func),
        }
    }
}

impl<M: Model> fmt::Debug for Handler<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("name", &self.name)
            .field("params", &self.signature.params)
            .field("returns", &self.signature.returns)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::MachineBuilder;
    use crate::core::State;

    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
    enum Phase {
        Start,
        End,
    }

    impl State for Phase {
        fn name(&self) -> &str {
            match self {
                Self::Start => "Start",
                Self::End => "End",
            }
        }
    }

    struct Stepper;

    impl Model for Stepper {
        type State = Phase;
        type Input = u32;
    }

    fn machine() -> Machine<Stepper> {
        let kind = MachineBuilder::<Stepper>::new()
            .start(Phase::Start)
            .build()
            .unwrap();
        Machine::new(kind, Stepper)
    }

    #[test]
    fn handler_fingerprints_its_parameters() {
        let handler = Handler::<Stepper>::new("finish", |_m, n: &u32| (*n > 3).then_some(Phase::End));

        assert_eq!(handler.name(), "finish");
        assert_eq!(handler.signature().params, TypeTag::of::<u32>());
        assert!(matches!(handler.returns(), Returns::Type(tag) if tag.is::<Phase>()));
    }

    #[test]
    fn call_runs_the_body() {
        let machine = machine();
        let handler = Handler::<Stepper>::new("finish", |_m, n: &u32| (*n > 3).then_some(Phase::End));

        assert_eq!(handler.call(&machine, &5_u32), Some(Phase::End));
        assert_eq!(handler.call(&machine, &1_u32), None);
    }

    #[test]
    fn call_with_foreign_arguments_yields_nothing() {
        let machine = machine();
        let handler = Handler::<Stepper>::new("finish", |_m, _n: &u32| Some(Phase::End));

        assert_eq!(handler.call(&machine, &"not a number"), None);
    }

    #[test]
    fn handler_sees_the_machine() {
        let machine = machine();
        let handler = Handler::<Stepper>::new("from_start", |m, _n: &u32| {
            (*m.current_state() == Phase::Start).then_some(Phase::End)
        });

        assert_eq!(handler.call(&machine, &0_u32), Some(Phase::End));
    }

    #[test]
    fn targets_narrow_the_return_set() {
        let handler =
            Handler::<Stepper>::new("finish", |_m, _n: &u32| Some(Phase::End)).targets([Phase::End]);

        assert!(handler.returns().admits(&Phase::End));
        assert!(!handler.returns().admits(&Phase::Start));
    }

    #[test]
    fn clones_share_the_body() {
        let machine = machine();
        let handler = Handler::<Stepper>::new("finish", |_m, _n: &u32| Some(Phase::End));
        let cloned = handler.clone();

        assert_eq!(cloned.name(), handler.name());
        assert_eq!(cloned.call(&machine, &0_u32), Some(Phase::End));
    }
}
