//! Strategy builders for infection property tests.
//!
//! Fixtures mix arbitrary relation lists, seeded random coaching graphs,
//! connected random graphs and disjoint unions of rings, so both sparse
//! forests of small components and dense single components get exercised.

use proptest::prelude::*;
use proptest::sample::subsequence;
use rollout_test_support::topology::Topology;

use super::InfectionFixture;

const MAX_USERS: usize = 40;
const MAX_RINGS: usize = 6;
const MAX_RING: usize = 8;

/// Generates a topology together with an ordered candidate list and a
/// limit spanning zero to slightly above the user count.
pub(super) fn infection_fixture_strategy() -> impl Strategy<Value = InfectionFixture> {
    topology_strategy().prop_flat_map(|topology| {
        let users = topology.users();
        let positions: Vec<usize> = (0..users).collect();
        (
            Just(topology),
            subsequence(positions, 0..=users).prop_shuffle(),
            0..=users + 2,
        )
            .prop_map(|(topology, candidates, limit)| InfectionFixture {
                topology,
                candidates,
                limit,
            })
    })
}

/// Samples one of the supported topology shapes.
pub(super) fn topology_strategy() -> impl Strategy<Value = Topology> {
    prop_oneof![
        arbitrary_relations(),
        (1..=MAX_USERS, any::<u64>()).prop_map(|(users, seed)| Topology::random(users, seed)),
        (1..=MAX_USERS, 0..MAX_USERS, any::<u64>())
            .prop_map(|(users, extra, seed)| Topology::connected_random(users, extra, seed)),
        prop::collection::vec(1..=MAX_RING, 1..=MAX_RINGS).prop_map(|sizes| {
            sizes
                .into_iter()
                .fold(Topology::default(), |acc, size| {
                    acc.disjoint_union(Topology::ring(size))
                })
        }),
    ]
}

fn arbitrary_relations() -> impl Strategy<Value = Topology> {
    (1..=MAX_USERS).prop_flat_map(|users| {
        prop::collection::vec((0..users, 0..users), 0..users * 2).prop_map(move |relations| {
            relations
                .into_iter()
                .fold(Topology::dangling(users), |acc, relation| {
                    acc.with_relation(relation)
                })
        })
    })
}
