//! Shared test utilities for `rollout-core`.

use proptest::test_runner::Config as ProptestConfig;
use rollout_test_support::{ci::property_test_profile::ProptestRunProfile, topology::Topology};

use crate::graph::{UserGraph, UserIndex};

/// Builds a standard proptest configuration from the shared CI profile.
#[must_use]
pub(crate) fn suite_proptest_config(default_cases: u32) -> ProptestConfig {
    let profile = ProptestRunProfile::load(default_cases, false);
    ProptestConfig {
        cases: profile.cases(),
        fork: profile.fork(),
        ..ProptestConfig::default()
    }
}

/// Materialises `topology` as a graph, returning it with the index of every
/// topology position.
///
/// # Panics
/// Panics if the topology refers to a position outside its user count.
#[must_use]
pub(crate) fn graph_from(topology: &Topology) -> (UserGraph, Vec<UserIndex>) {
    let mut graph = UserGraph::with_capacity(topology.users());
    let users: Vec<UserIndex> = (0..topology.users())
        .map(|position| {
            graph
                .add_user(Topology::user_id(position), Topology::username(position))
                .expect("topology ids are unique")
        })
        .collect();
    for &(left, right) in topology.relations() {
        graph
            .add_related(users[left], users[right])
            .expect("topology positions are in range");
    }
    (graph, users)
}
