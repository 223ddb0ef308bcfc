//! Structural properties of the user graph.
//!
//! - **Symmetry**: `b` is related to `a` whenever `a` is related to `b`.
//! - **No duplicates**: no adjacency list names the same user twice.
//! - **No self relations**: no user is related to itself.
//! - **Idempotence**: declaring every relation a second time, in either
//!   orientation, changes nothing.

use proptest::test_runner::{TestCaseError, TestCaseResult};

use crate::{UserGraph, test_utils::graph_from};

use super::InfectionFixture;

/// Runs the adjacency invariants for the given fixture.
pub(super) fn run_adjacency_invariants_property(fixture: &InfectionFixture) -> TestCaseResult {
    let (graph, _) = graph_from(&fixture.topology);
    validate_adjacency(&graph)
}

/// Re-declares every relation, reversed, and checks nothing moves.
pub(super) fn run_idempotence_property(fixture: &InfectionFixture) -> TestCaseResult {
    let (mut graph, users) = graph_from(&fixture.topology);
    let before = snapshot(&graph);
    for &(left, right) in fixture.topology.relations() {
        let changed = graph
            .add_related(users[right], users[left])
            .map_err(|err| TestCaseError::fail(format!("re-relating failed: {err}")))?;
        if changed {
            return Err(TestCaseError::fail(format!(
                "relation ({left}, {right}) changed the graph on its second declaration"
            )));
        }
    }
    if snapshot(&graph) != before {
        return Err(TestCaseError::fail("adjacency lists changed after re-relating"));
    }
    Ok(())
}

fn validate_adjacency(graph: &UserGraph) -> TestCaseResult {
    for (index, user) in graph.iter() {
        for (position, &other) in user.related().iter().enumerate() {
            if other == index {
                return Err(TestCaseError::fail(format!("{index} is related to itself")));
            }
            if user.related()[..position].contains(&other) {
                return Err(TestCaseError::fail(format!("{index} lists {other} twice")));
            }
            let reciprocal = graph
                .user(other)
                .is_some_and(|neighbour| neighbour.is_related_to(index));
            if !reciprocal {
                return Err(TestCaseError::fail(format!(
                    "{index} -> {other} has no reverse relation"
                )));
            }
        }
    }
    Ok(())
}

fn snapshot(graph: &UserGraph) -> Vec<Vec<usize>> {
    graph
        .iter()
        .map(|(_, user)| user.related().iter().map(|other| other.get()).collect())
        .collect()
}
