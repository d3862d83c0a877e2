//! Property-based tests for registration and dispatch.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated definitions and inputs.

use microstate::core::{Model, State};
use microstate::registry::{Handler, Registry};
use microstate::runtime::Machine;
use microstate::MachineBuilder;
use proptest::prelude::*;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
enum TestState {
    Initial,
    Processing,
    Complete,
    Failed,
}

impl State for TestState {
    fn name(&self) -> &str {
        match self {
            Self::Initial => "Initial",
            Self::Processing => "Processing",
            Self::Complete => "Complete",
            Self::Failed => "Failed",
        }
    }

    fn is_final(&self) -> bool {
        matches!(self, Self::Complete | Self::Failed)
    }

    fn is_error(&self) -> bool {
        matches!(self, Self::Failed)
    }
}

const ALL: [TestState; 4] = [
    TestState::Initial,
    TestState::Processing,
    TestState::Complete,
    TestState::Failed,
];

struct Job;

impl Model for Job {
    type State = TestState;
    type Input = u8;
}

prop_compose! {
    fn arbitrary_state()(variant in 0..4usize) -> TestState {
        ALL[variant]
    }
}

/// A handler answering `target` when the input matches `key`.
#[derive(Clone, Debug)]
struct Rule {
    from: TestState,
    key: Option<u8>,
    target: TestState,
}

prop_compose! {
    fn arbitrary_rule()(
        from in arbitrary_state(),
        key in prop::option::of(0..4u8),
        target in arbitrary_state(),
    ) -> Rule {
        Rule { from, key, target }
    }
}

fn handler(index: usize, rule: &Rule) -> Handler<Job> {
    let key = rule.key;
    let target = rule.target;
    Handler::new(format!("rule_{index}"), move |_m, input: &u8| {
        match key {
            Some(k) if k != *input => None,
            _ => Some(target),
        }
    })
}

fn registry(rules: &[Rule]) -> Registry<Job> {
    let mut registry = Registry::new();
    for (index, rule) in rules.iter().enumerate() {
        registry.register([rule.from], handler(index, rule)).unwrap();
    }
    registry.frozen()
}

fn machine(start: TestState, rules: &[Rule]) -> Machine<Job> {
    let kind = MachineBuilder::new()
        .start(start)
        .registry(registry(rules))
        .build()
        .unwrap();
    Machine::new(kind, Job)
}

/// Dispatch computed independently of the library: first rule for the
/// current state whose answer differs from it.
fn expected_next(current: TestState, input: u8, rules: &[Rule]) -> TestState {
    rules
        .iter()
        .filter(|rule| rule.from == current)
        .filter(|rule| rule.key.map_or(true, |k| k == input))
        .map(|rule| rule.target)
        .find(|target| *target != current)
        .unwrap_or(current)
}

proptest! {
    #[test]
    fn new_instance_is_in_start_state(
        start in arbitrary_state(),
        rules in prop::collection::vec(arbitrary_rule(), 0..8),
    ) {
        let machine = machine(start, &rules);
        prop_assert_eq!(*machine.current_state(), start);
    }

    #[test]
    fn state_without_handlers_is_a_sink(
        sink in arbitrary_state(),
        rules in prop::collection::vec(arbitrary_rule(), 0..8),
        inputs in prop::collection::vec(0..4u8, 1..10),
    ) {
        let rules: Vec<Rule> = rules.into_iter().filter(|r| r.from != sink).collect();
        let mut machine = machine(sink, &rules);

        for input in inputs {
            prop_assert_eq!(machine.advance(input), sink);
        }
    }

    #[test]
    fn advance_matches_first_differing_rule(
        start in arbitrary_state(),
        rules in prop::collection::vec(arbitrary_rule(), 0..12),
        inputs in prop::collection::vec(0..4u8, 1..12),
    ) {
        let mut machine = machine(start, &rules);
        let mut current = start;

        for input in inputs {
            current = expected_next(current, input, &rules);
            prop_assert_eq!(machine.advance(input), current);
            prop_assert_eq!(*machine.current_state(), current);
        }
    }

    #[test]
    fn registration_order_is_preserved(
        rules in prop::collection::vec(arbitrary_rule(), 0..12),
    ) {
        let table = registry(&rules).transitions().unwrap();

        for state in ALL {
            let expected: Vec<String> = rules
                .iter()
                .enumerate()
                .filter(|(_, rule)| rule.from == state)
                .map(|(index, _)| format!("rule_{index}"))
                .collect();
            prop_assert_eq!(table.handler_names(&state), expected);
        }
    }

    #[test]
    fn state_name_is_stable(state in arbitrary_state()) {
        let name1 = state.name();
        let name2 = state.name();
        prop_assert_eq!(name1, name2);
    }
}
