//! Breadth-first discovery of connected components.

use std::collections::VecDeque;

use crate::{Result, graph::UserGraph, graph::UserIndex};

/// A connected component of the coaching graph, in breadth-first order from
/// the user it was discovered from.
///
/// A component is never empty: the seed is always its first member, even
/// when the seed has no relations.
///
/// # Examples
/// ```
/// use rollout_core::{UserGraph, connected_component};
///
/// let mut graph = UserGraph::new();
/// let lonely = graph.add_user("id-0", "lonely")?;
/// let component = connected_component(&graph, lonely)?;
/// assert_eq!(component.seed(), lonely);
/// assert_eq!(component.members(), &[lonely]);
/// # Ok::<(), rollout_core::RolloutError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    members: Vec<UserIndex>,
}

impl Component {
    /// The user the traversal started from.
    #[must_use]
    pub fn seed(&self) -> UserIndex {
        self.members[0]
    }

    /// Members in the order the traversal reached them.
    #[must_use]
    pub fn members(&self) -> &[UserIndex] {
        &self.members
    }

    /// Number of users in the component.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Returns `true` if `user` belongs to the component.
    #[must_use]
    pub fn contains(&self, user: UserIndex) -> bool {
        self.members.contains(&user)
    }

    /// Consumes the component, returning its members.
    #[must_use]
    pub fn into_members(self) -> Vec<UserIndex> {
        self.members
    }
}

/// Traversal state shared by every walk over one graph.
///
/// Components are disjoint, so a user marked while discovering one component
/// can never be part of another. That lets a single visited buffer serve
/// every walk and double as the set of users already covered.
pub(super) struct Walk {
    visited: Vec<bool>,
    queue: VecDeque<UserIndex>,
}

impl Walk {
    pub(super) fn new(users: usize) -> Self {
        Self {
            visited: vec![false; users],
            queue: VecDeque::new(),
        }
    }

    /// Returns `true` if `user` already belongs to a discovered component.
    pub(super) fn covers(&self, user: UserIndex) -> bool {
        self.visited[user.get()]
    }

    /// Discovers the component containing `seed`.
    ///
    /// `seed` must be a valid index for `graph` and must not be covered yet.
    pub(super) fn component(&mut self, graph: &UserGraph, seed: UserIndex) -> Result<Component> {
        let mut members = Vec::new();
        self.visit(seed, &mut members);
        while let Some(current) = self.queue.pop_front() {
            for &neighbour in graph.related(current)? {
                if !self.visited[neighbour.get()] {
                    self.visit(neighbour, &mut members);
                }
            }
        }
        Ok(Component { members })
    }

    fn visit(&mut self, user: UserIndex, members: &mut Vec<UserIndex>) {
        self.visited[user.get()] = true;
        self.queue.push_back(user);
        members.push(user);
    }
}
