//! Oracle equivalence for the infection operations.
//!
//! Components, total infections and limited infections must agree with the
//! union-find oracle, and a failed limited infection must leave every user
//! without a feature.

use std::sync::Arc;

use proptest::test_runner::{TestCaseError, TestCaseResult};

use crate::{
    Feature, RolloutError, UserGraph, UserIndex, components, connected_component,
    limited_infection, test_utils::graph_from, total_infection,
};

use super::InfectionFixture;
use super::oracle::ComponentOracle;

/// Every component agrees with the oracle's partition.
pub(super) fn run_component_equivalence_property(fixture: &InfectionFixture) -> TestCaseResult {
    let (graph, users) = graph_from(&fixture.topology);
    let oracle = ComponentOracle::new(&fixture.topology);

    let partition = components(&graph).map_err(fail("components"))?;
    let covered: usize = partition.iter().map(|component| component.len()).sum();
    if covered != graph.len() {
        return Err(TestCaseError::fail(format!(
            "components cover {covered} of {} users",
            graph.len()
        )));
    }

    for component in &partition {
        let seed = component.seed().get();
        let expected = oracle.union_of(&[seed]);
        if sorted_positions(component.members()) != expected {
            return Err(TestCaseError::fail(format!(
                "component of {seed} differs from the oracle"
            )));
        }
    }

    for &candidate in &fixture.candidates {
        let component = connected_component(&graph, users[candidate])
            .map_err(fail("connected_component"))?;
        if component.len() != oracle.size_of(candidate) || component.seed() != users[candidate] {
            return Err(TestCaseError::fail(format!(
                "component of {candidate} has size {} (oracle {})",
                component.len(),
                oracle.size_of(candidate)
            )));
        }
    }
    Ok(())
}

/// Total infection reaches exactly the union of the seeds' components.
pub(super) fn run_total_equivalence_property(fixture: &InfectionFixture) -> TestCaseResult {
    let (mut graph, users) = graph_from(&fixture.topology);
    let oracle = ComponentOracle::new(&fixture.topology);
    let seeds: Vec<UserIndex> = fixture
        .candidates
        .iter()
        .map(|position| users[*position])
        .collect();

    let infected =
        total_infection(&mut graph, &seeds, &feature()).map_err(fail("total_infection"))?;

    let expected = oracle.union_of(&fixture.candidates);
    if infected.len() != expected.len() || sorted_positions(&infected) != expected {
        return Err(TestCaseError::fail(format!(
            "total infection reached {} users, oracle expects {}",
            infected.len(),
            expected.len()
        )));
    }
    if featured_positions(&graph) != expected {
        return Err(TestCaseError::fail(
            "users outside the infected union carry the feature",
        ));
    }
    Ok(())
}

/// Limited infection selects the oracle's component or fails without
/// touching the graph.
pub(super) fn run_limited_equivalence_property(fixture: &InfectionFixture) -> TestCaseResult {
    let (mut graph, users) = graph_from(&fixture.topology);
    let oracle = ComponentOracle::new(&fixture.topology);
    let candidates: Vec<UserIndex> = fixture
        .candidates
        .iter()
        .map(|position| users[*position])
        .collect();

    let outcome = limited_infection(&mut graph, &candidates, fixture.limit, &feature());
    match (outcome, oracle.limited_choice(&fixture.candidates, fixture.limit)) {
        (Ok(infected), Some(choice)) => {
            let expected = oracle.union_of(&[choice]);
            if sorted_positions(&infected) != expected {
                return Err(TestCaseError::fail(format!(
                    "limited infection chose a different component than candidate {choice}"
                )));
            }
            if infected.len() > fixture.limit {
                return Err(TestCaseError::fail("limited infection exceeded its limit"));
            }
            if featured_positions(&graph) != expected {
                return Err(TestCaseError::fail(
                    "limited infection leaked outside its component",
                ));
            }
            Ok(())
        }
        (Err(RolloutError::InfeasibleLimit { smallest, .. }), None) => {
            let oracle_smallest = fixture
                .candidates
                .iter()
                .map(|position| oracle.size_of(*position))
                .min();
            if smallest != oracle_smallest {
                return Err(TestCaseError::fail(format!(
                    "smallest component reported as {smallest:?}, oracle says {oracle_smallest:?}"
                )));
            }
            if !featured_positions(&graph).is_empty() {
                return Err(TestCaseError::fail("failed limited infection mutated users"));
            }
            Ok(())
        }
        (Ok(infected), None) => Err(TestCaseError::fail(format!(
            "limited infection of {} users succeeded but no candidate fits {}",
            infected.len(),
            fixture.limit
        ))),
        (Err(err), choice) => Err(TestCaseError::fail(format!(
            "limited infection failed with {err}; oracle chose {choice:?}"
        ))),
    }
}

fn feature() -> Arc<Feature> {
    Arc::new(Feature::new("Cool Blue", Vec::new(), "version 1.0"))
}

fn sorted_positions(users: &[UserIndex]) -> Vec<usize> {
    let mut positions: Vec<usize> = users.iter().map(|user| user.get()).collect();
    positions.sort_unstable();
    positions
}

fn featured_positions(graph: &UserGraph) -> Vec<usize> {
    graph
        .iter()
        .filter(|(_, user)| user.feature().is_some())
        .map(|(index, _)| index.get())
        .collect()
}

fn fail(operation: &'static str) -> impl Fn(RolloutError) -> TestCaseError {
    move |err| TestCaseError::fail(format!("{operation} failed: {err}"))
}
