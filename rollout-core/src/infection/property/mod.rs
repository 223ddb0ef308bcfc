//! Property-based tests for component discovery and feature infection.
//!
//! Checks the graph's relation bookkeeping, then compares every infection
//! operation against a union-find oracle computed straight from the
//! topology's relation list.

mod equivalence;
mod oracle;
mod strategies;
mod structural;

use rollout_test_support::topology::Topology;

/// A generated topology plus the inputs for a limited infection.
#[derive(Clone, Debug)]
pub(super) struct InfectionFixture {
    pub(super) topology: Topology,
    /// Ordered candidate positions, without repeats.
    pub(super) candidates: Vec<usize>,
    pub(super) limit: usize,
}
