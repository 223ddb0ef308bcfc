//! Union-find oracle for infection property verification.
//!
//! Computes components directly from a topology's relation list, without
//! going through the graph arena or the breadth-first walk, so the engine's
//! answers can be checked against an independent derivation.

use rollout_test_support::topology::Topology;

/// Component labels for every position in a topology.
pub(super) struct ComponentOracle {
    roots: Vec<usize>,
    sizes: Vec<usize>,
}

impl ComponentOracle {
    pub(super) fn new(topology: &Topology) -> Self {
        let mut parent: Vec<usize> = (0..topology.users()).collect();
        for &(left, right) in topology.relations() {
            let left_root = find_root(&mut parent, left);
            let right_root = find_root(&mut parent, right);
            if left_root != right_root {
                parent[right_root] = left_root;
            }
        }
        let roots: Vec<usize> = (0..topology.users())
            .map(|position| find_root(&mut parent, position))
            .collect();
        let mut sizes = vec![0; topology.users()];
        for root in &roots {
            sizes[*root] += 1;
        }
        Self { roots, sizes }
    }

    /// Returns `true` if the two positions share a component.
    pub(super) fn connected(&self, left: usize, right: usize) -> bool {
        self.roots[left] == self.roots[right]
    }

    /// Size of the component containing `position`.
    pub(super) fn size_of(&self, position: usize) -> usize {
        self.sizes[self.roots[position]]
    }

    /// Positions in the same component as any of `seeds`, ascending.
    pub(super) fn union_of(&self, seeds: &[usize]) -> Vec<usize> {
        (0..self.roots.len())
            .filter(|position| seeds.iter().any(|seed| self.connected(*seed, *position)))
            .collect()
    }

    /// The candidate whose component a limited infection must select: the
    /// first candidate with the largest component no bigger than `limit`.
    pub(super) fn limited_choice(&self, candidates: &[usize], limit: usize) -> Option<usize> {
        let mut best: Option<(usize, usize)> = None;
        for &candidate in candidates {
            let size = self.size_of(candidate);
            if size <= limit && best.is_none_or(|(_, chosen)| size > chosen) {
                best = Some((candidate, size));
            }
        }
        best.map(|(candidate, _)| candidate)
    }
}

fn find_root(parent: &mut [usize], node: usize) -> usize {
    let mut current = node;
    while parent[current] != current {
        let grandparent = parent[parent[current]];
        parent[current] = grandparent;
        current = grandparent;
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oracle_sizes_two_rings() {
        let oracle = ComponentOracle::new(&Topology::ring(5).disjoint_union(Topology::ring(2)));
        assert_eq!(oracle.size_of(0), 5);
        assert_eq!(oracle.size_of(6), 2);
        assert!(!oracle.connected(4, 5));
        assert_eq!(oracle.limited_choice(&[0, 5], 4), Some(5));
        assert_eq!(oracle.limited_choice(&[0], 4), None);
    }
}
