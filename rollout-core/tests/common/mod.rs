use rollout_core::{UserGraph, UserIndex};
use rollout_test_support::topology::Topology;

/// Builds a graph whose user at position `n` has id `id-n`, returning the
/// indices in position order.
#[must_use]
pub fn graph_from(topology: &Topology) -> (UserGraph, Vec<UserIndex>) {
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

/// Indices of every user carrying a feature, in index order.
#[must_use]
pub fn infected(graph: &UserGraph) -> Vec<UserIndex> {
    graph
        .iter()
        .filter(|(_, user)| user.feature().is_some())
        .map(|(index, _)| index)
        .collect()
}
