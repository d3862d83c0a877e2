//! Table assembly: inheritance merge and the strict-policy check.

use crate::builder::error::DuplicateTransition;
use crate::core::{Model, State};
use crate::registry::Handler;
use crate::runtime::DispatchTable;
use std::collections::HashMap;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// How many handlers a state may hold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DispatchPolicy {
    /// Any number of handlers per state, consulted in registration order.
    #[default]
    FirstMatch,

    /// At most one handler per state; more is a compile error.
    Strict,
}

/// Merge an inherited table with the tables registered for a derived type.
///
/// For every state, an inherited handler is dropped when a newly registered
/// handler for that same state carries the same name. The remaining inherited
/// handlers keep their order and come first; the new handlers follow in
/// registration order. States only the parent handles are kept as they are.
pub fn merge<M: Model>(inherited: &DispatchTable<M>, added: &[DispatchTable<M>]) -> DispatchTable<M> {
    let mut order: Vec<M::State> = inherited.states().cloned().collect();
    let mut lists: HashMap<M::State, Vec<Handler<M>>> = inherited
        .states()
        .map(|state| (state.clone(), inherited.handlers(state).to_vec()))
        .collect();

    let mut fresh_order: Vec<M::State> = Vec::new();
    let mut fresh: HashMap<M::State, Vec<Handler<M>>> = HashMap::new();
    for table in added {
        for state in table.states() {
            if !fresh.contains_key(state) {
                fresh_order.push(state.clone());
            }
            fresh
                .entry(state.clone())
                .or_default()
                .extend(table.handlers(state).iter().cloned());
        }
    }

    for state in fresh_order {
        let Some(new) = fresh.remove(&state) else {
            continue;
        };
        let list = lists.entry(state.clone()).or_insert_with(|| {
            order.push(state.clone());
            Vec::new()
        });

        list.retain(|old| {
            let overridden = new.iter().any(|handler| handler.name() == old.name());
            if overridden {
                tracing::debug!(
                    state = state.name(),
                    handler = old.name(),
                    "inherited transition overridden"
                );
            }
            !overridden
        });
        list.extend(new);
    }

    DispatchTable::from_lists(order, lists)
}

/// Report every state holding more than one handler.
///
/// Each extra handler yields one [`DuplicateTransition`] naming the handler
/// that came first.
pub fn check_unique<M: Model>(
    table: &DispatchTable<M>,
) -> Validation<(), NonEmptyVec<DuplicateTransition>> {
    let mut checks: Vec<Validation<(), NonEmptyVec<DuplicateTransition>>> = Vec::new();

    for state in table.states() {
        let Some((existing, rest)) = table.handlers(state).split_first() else {
            continue;
        };
        for attempted in rest {
            checks.push(Validation::fail(DuplicateTransition {
                state: state.name().to_string(),
                existing: existing.name().to_string(),
                attempted: attempted.name().to_string(),
            }));
        }
    }

    Validation::all_vec(checks).map(|_| ())
}
