//! Core State trait for state machine states.
//!
//! A state type is the closed domain a machine type may occupy. Values are
//! compared by equality and used as keys of the dispatch table.

use std::fmt::Debug;
use std::hash::Hash;

/// Trait for state machine states.
///
/// All methods are pure - no side effects. States are small immutable values,
/// usually fieldless enums, that describe the current position of a machine.
///
/// # Required Traits
///
/// - `Clone`: states are handed back from `advance` and manual transitions
/// - `Eq` + `Hash`: states key the per-state handler table
/// - `Debug`: states must be debuggable for diagnostics
/// - `Send` + `Sync` + `'static`: compiled tables are shared across threads
///
/// # Example
///
/// ```rust
/// use microstate::core::State;
///
/// #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
/// enum DoorState {
///     Locked,
///     Unlocked,
///     Broken,
/// }
///
/// impl State for DoorState {
///     fn name(&self) -> &str {
///         match self {
///             Self::Locked => "Locked",
///             Self::Unlocked => "Unlocked",
///             Self::Broken => "Broken",
///         }
///     }
///
///     fn is_error(&self) -> bool {
///         matches!(self, Self::Broken)
///     }
/// }
/// ```
pub trait State: Clone + Eq + Hash + Debug + Send + Sync + 'static {
    /// Get the state's name for display/logging.
    fn name(&self) -> &str;

    /// Check if this is a final (terminal) state.
    ///
    /// Informational only: dispatch never refuses to run handlers registered
    /// for a final state. A state without handlers is a sink regardless.
    ///
    /// Default implementation returns `false`.
    fn is_final(&self) -> bool {
        false
    }

    /// Check if this is an error state.
    ///
    /// Default implementation returns `false`.
    fn is_error(&self) -> bool {
        false
    }
}
