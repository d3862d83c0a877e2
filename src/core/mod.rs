//! Core types of a machine definition.
//!
//! This module contains the pieces every other layer builds on:
//! - State definitions via the `State` trait
//! - The `Model` trait binding a state domain to an input bundle
//! - Signature descriptors and the registration-time `validate` check
//!
//! Nothing in this module holds mutable state.

mod model;
mod signature;
mod state;

pub use model::Model;
pub use signature::{
    validate, HandlerSignature, Returns, Signature, SignatureError, Target, TypeTag,
};
pub use state::State;
