//! The per-type contract tying a state domain to an input bundle.

use super::state::State;

/// User data and associated types of one machine type.
///
/// `State` is the closed domain instances of the type move through. `Input`
/// is the argument bundle every transition handler of the type receives on
/// `advance`, the Rust counterpart of the reference "update" parameter list.
///
/// The implementing type itself is the per-instance data handlers can read
/// through [`Machine::model`](crate::runtime::Machine::model).
///
/// # Example
///
/// ```rust
/// use microstate::core::{Model, State};
///
/// #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
/// enum Light {
///     Off,
///     On,
/// }
///
/// impl State for Light {
///     fn name(&self) -> &str {
///         match self {
///             Self::Off => "Off",
///             Self::On => "On",
///         }
///     }
/// }
///
/// struct Switch {
///     presses: u32,
/// }
///
/// impl Model for Switch {
///     type State = Light;
///     type Input = bool;
/// }
/// ```
pub trait Model: Send + Sync + 'static {
    /// The closed state domain.
    type State: State;

    /// Arguments passed uniformly to every handler on `advance`.
    type Input: Send + Sync + 'static;
}
