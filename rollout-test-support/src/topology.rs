//! Deterministic coaching-graph topologies for tests.
//!
//! A [`Topology`] is a user count plus a list of undirected relations between
//! user positions. It carries no dependency on the core crate so every crate
//! in the workspace can turn it into a graph with its own helpers.

use rand::{Rng, SeedableRng, rngs::SmallRng, seq::index::sample};

/// A user count and the undirected relations between user positions.
///
/// Relations may repeat or appear in both orientations; graph builders are
/// expected to treat them idempotently, the same way repeated coaching
/// declarations behave in production.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Topology {
    users: usize,
    relations: Vec<(usize, usize)>,
}

impl Topology {
    /// Users with no relations at all.
    ///
    /// # Examples
    /// ```
    /// use rollout_test_support::topology::Topology;
    ///
    /// let topology = Topology::dangling(3);
    /// assert_eq!(topology.users(), 3);
    /// assert!(topology.relations().is_empty());
    /// ```
    #[must_use]
    pub fn dangling(users: usize) -> Self {
        Self {
            users,
            relations: Vec::new(),
        }
    }

    /// A cycle `0 - 1 - ... - (n-1) - 0`.
    ///
    /// A two-user ring declares the same relation in both directions.
    ///
    /// # Examples
    /// ```
    /// use rollout_test_support::topology::Topology;
    ///
    /// let ring = Topology::ring(4);
    /// assert_eq!(ring.relations(), &[(0, 1), (1, 2), (2, 3), (3, 0)]);
    /// ```
    #[must_use]
    pub fn ring(users: usize) -> Self {
        if users < 2 {
            return Self::dangling(users);
        }
        let relations = (0..users)
            .map(|position| (position, (position + 1) % users))
            .collect();
        Self { users, relations }
    }

    /// Even positions coach every odd position.
    ///
    /// # Examples
    /// ```
    /// use rollout_test_support::topology::Topology;
    ///
    /// let cohort = Topology::cohort(6);
    /// let coached_by_zero = cohort
    ///     .relations()
    ///     .iter()
    ///     .filter(|(coach, _)| *coach == 0)
    ///     .count();
    /// assert_eq!(coached_by_zero, 3);
    /// ```
    #[must_use]
    pub fn cohort(users: usize) -> Self {
        let coaches = (0..users).step_by(2);
        let relations = coaches
            .flat_map(|coach| (1..users).step_by(2).map(move |student| (coach, student)))
            .collect();
        Self { users, relations }
    }

    /// Every user declares a random number of relations to random other
    /// users, seeded for reproducibility. The result may be disconnected.
    #[must_use]
    pub fn random(users: usize, seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut relations = Vec::new();
        let others = users.saturating_sub(1);
        if others == 0 {
            return Self::dangling(users);
        }
        for source in 0..users {
            let count = rng.gen_range(0..others);
            for picked in sample(&mut rng, others, count) {
                let target = if picked >= source { picked + 1 } else { picked };
                relations.push((source, target));
            }
        }
        Self { users, relations }
    }

    /// A seeded random graph guaranteed to form a single component: a random
    /// spanning tree plus `extra` random relations.
    ///
    /// # Examples
    /// ```
    /// use rollout_test_support::topology::Topology;
    ///
    /// let topology = Topology::connected_random(30, 12, 7);
    /// assert_eq!(topology.users(), 30);
    /// assert!(topology.relations().len() >= 29);
    /// ```
    #[must_use]
    pub fn connected_random(users: usize, extra: usize, seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut relations: Vec<(usize, usize)> = (1..users)
            .map(|position| (rng.gen_range(0..position), position))
            .collect();
        if users > 1 {
            for _ in 0..extra {
                relations.push((rng.gen_range(0..users), rng.gen_range(0..users)));
            }
        }
        Self { users, relations }
    }

    /// Places `other` after `self`, shifting its positions so the two stay
    /// disjoint.
    ///
    /// # Examples
    /// ```
    /// use rollout_test_support::topology::Topology;
    ///
    /// let both = Topology::ring(3).disjoint_union(Topology::ring(2));
    /// assert_eq!(both.users(), 5);
    /// assert!(both.relations().contains(&(3, 4)));
    /// ```
    #[must_use]
    pub fn disjoint_union(mut self, other: Self) -> Self {
        let offset = self.users;
        self.relations.extend(
            other
                .relations
                .into_iter()
                .map(|(left, right)| (left + offset, right + offset)),
        );
        self.users += other.users;
        self
    }

    /// Appends one relation between two existing positions.
    ///
    /// # Panics
    /// Panics if either position is outside the user count.
    #[must_use]
    pub fn with_relation(mut self, relation: (usize, usize)) -> Self {
        assert!(
            relation.0 < self.users && relation.1 < self.users,
            "relation {relation:?} is outside a topology of {} users",
            self.users
        );
        self.relations.push(relation);
        self
    }

    /// Number of users in the topology.
    #[must_use]
    pub fn users(&self) -> usize {
        self.users
    }

    /// Declared relations in declaration order.
    #[must_use]
    pub fn relations(&self) -> &[(usize, usize)] {
        &self.relations
    }

    /// Identifier conventionally assigned to the user at `position`.
    #[must_use]
    pub fn user_id(position: usize) -> String {
        format!("id-{position}")
    }

    /// Username conventionally assigned to the user at `position`.
    #[must_use]
    pub fn username(position: usize) -> String {
        format!("test-user-{position}")
    }
}
