//! Immutable per-state handler tables.

use crate::core::{Model, Returns, State};
use crate::registry::Handler;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

struct Entries<M: Model> {
    order: Vec<M::State>,
    handlers: HashMap<M::State, Arc<[Handler<M>]>>,
}

/// Ordered handler sequences keyed by source state.
///
/// Produced by freezing a registry and by compiling a machine type; never
/// mutated afterwards. Clones share the same storage, so a table can be
/// handed to any number of instances and threads.
pub struct DispatchTable<M: Model> {
    entries: Arc<Entries<M>>,
}

impl<M: Model> DispatchTable<M> {
    /// A table without handlers: every state is a sink.
    pub fn empty() -> Self {
        Self::from_lists(Vec::new(), HashMap::new())
    }

    /// `order` lists each key of `lists` once, in first-registration order.
    pub(crate) fn from_lists(
        order: Vec<M::State>,
        lists: HashMap<M::State, Vec<Handler<M>>>,
    ) -> Self {
        let handlers: HashMap<M::State, Arc<[Handler<M>]>> = lists
            .into_iter()
            .filter(|(_, list)| !list.is_empty())
            .map(|(state, list)| (state, Arc::from(list)))
            .collect();
        let order = order
            .into_iter()
            .filter(|state| handlers.contains_key(state))
            .collect();

        Self {
            entries: Arc::new(Entries { order, handlers }),
        }
    }

    /// Handlers for `state`, in dispatch order. Empty when none exist.
    pub fn handlers(&self, state: &M::State) -> &[Handler<M>] {
        self.entries
            .handlers
            .get(state)
            .map(|list| &**list)
            .unwrap_or(&[])
    }

    pub fn handler_names(&self, state: &M::State) -> Vec<&str> {
        self.handlers(state).iter().map(Handler::name).collect()
    }

    /// States holding at least one handler, in first-registration order.
    pub fn states(&self) -> impl Iterator<Item = &M::State> + '_ {
        self.entries.order.iter()
    }

    /// Number of states holding at least one handler.
    pub fn len(&self) -> usize {
        self.entries.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.order.is_empty()
    }

    /// Serializable summary of the table, for diagnostics.
    pub fn describe(&self) -> TableDescription {
        let states = self
            .states()
            .map(|state| StateEntry {
                state: state.name().to_string(),
                handlers: self
                    .handlers(state)
                    .iter()
                    .map(|handler| HandlerEntry {
                        name: handler.name().to_string(),
                        targets: target_names::<M>(handler.returns()),
                    })
                    .collect(),
            })
            .collect();

        TableDescription { states }
    }
}

fn target_names<M: Model>(returns: &Returns) -> Option<Vec<String>> {
    match returns {
        Returns::Type(_) => None,
        Returns::OneOf(targets) => Some(
            targets
                .iter()
                .map(|target| match target.downcast_ref::<M::State>() {
                    Some(state) => state.name().to_string(),
                    None => target.label().to_string(),
                })
                .collect(),
        ),
    }
}

impl<M: Model> Clone for DispatchTable<M> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
        }
    }
}

impl<M: Model> Default for DispatchTable<M> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<M: Model> fmt::Debug for DispatchTable<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.states().map(|state| (state, self.handler_names(state))))
            .finish()
    }
}

/// Summary of a dispatch table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDescription {
    pub states: Vec<StateEntry>,
}

/// Handlers registered for one source state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateEntry {
    pub state: String,
    pub handlers: Vec<HandlerEntry>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlerEntry {
    pub name: String,
    /// Declared targets; `None` when the handler may return any state.
    pub targets: Option<Vec<String>>,
}
