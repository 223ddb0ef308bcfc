//! Arena-backed coaching graph.
//!
//! Users live in a `Vec` and refer to each other by [`UserIndex`]. The
//! "coaches" and "is coached by" relations are not distinguished: every
//! relation is stored on both endpoints, and [`UserGraph::add_related`] is the
//! only place that writes adjacency, so the symmetry invariant is enforced
//! there rather than assumed by callers.

mod user;

use std::{collections::HashMap, sync::Arc};

use tracing::trace;

use crate::{Result, error::RolloutError, feature::Feature};

pub use self::user::{User, UserIndex, UserSpec};

/// Mutable, append-only graph of users and their coaching relations.
///
/// Connectivity is never cached; the infection engine rediscovers it by
/// traversal on every call.
///
/// # Examples
/// ```
/// use rollout_core::UserGraph;
///
/// let mut graph = UserGraph::new();
/// let coach = graph.add_user("id-0", "coach")?;
/// let student = graph.add_user("id-1", "student")?;
/// assert!(graph.add_related(coach, student)?);
/// assert!(!graph.add_related(student, coach)?);
/// assert_eq!(graph.related(student)?, &[coach]);
/// assert_eq!(graph.relation_count(), 1);
/// # Ok::<(), rollout_core::RolloutError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct UserGraph {
    users: Vec<User>,
    by_id: HashMap<Arc<str>, UserIndex>,
}

impl UserGraph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty graph with room for `capacity` users.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            users: Vec::with_capacity(capacity),
            by_id: HashMap::with_capacity(capacity),
        }
    }

    /// Adds a user with no relations and no feature.
    ///
    /// # Errors
    /// Returns [`RolloutError::DuplicateUserId`] when `id` is already taken.
    pub fn add_user(
        &mut self,
        id: impl Into<Arc<str>>,
        username: impl Into<String>,
    ) -> Result<UserIndex> {
        self.insert(UserSpec::new(id, username))
    }

    /// Inserts the user described by `spec`, relating it to every user the
    /// spec lists.
    ///
    /// Nothing is inserted when the id is taken or a related index is
    /// unknown.
    ///
    /// # Errors
    /// Returns [`RolloutError::DuplicateUserId`] when the id is already taken
    /// and [`RolloutError::UnknownUser`] when a related index does not exist.
    pub fn insert(&mut self, spec: UserSpec) -> Result<UserIndex> {
        let UserSpec {
            id,
            username,
            related,
            feature,
        } = spec;
        if self.by_id.contains_key(&id) {
            return Err(RolloutError::DuplicateUserId { id });
        }
        for existing in &related {
            self.ensure(*existing)?;
        }

        let index = UserIndex::new(self.users.len());
        self.by_id.insert(Arc::clone(&id), index);
        self.users.push(User::new(id, username, feature));
        for existing in related {
            self.add_related(index, existing)?;
        }
        Ok(index)
    }

    /// Relates `a` and `b` in both directions.
    ///
    /// Returns `true` when the relation is new. Adding an existing relation,
    /// in either orientation, changes nothing and returns `false`; so does
    /// relating a user to itself.
    ///
    /// # Errors
    /// Returns [`RolloutError::UnknownUser`] if either index is out of bounds;
    /// the graph is left untouched in that case.
    pub fn add_related(&mut self, a: UserIndex, b: UserIndex) -> Result<bool> {
        self.ensure(a)?;
        self.ensure(b)?;
        if a == b {
            trace!(user = %a, "ignoring self relation");
            return Ok(false);
        }

        let added = self.users[a.get()].relate(b);
        if added {
            self.users[b.get()].relate(a);
            trace!(left = %a, right = %b, "related users");
        }
        Ok(added)
    }

    /// Deploys `feature` to `user`, replacing whatever it had.
    ///
    /// # Errors
    /// Returns [`RolloutError::UnknownUser`] if `user` is out of bounds.
    pub fn set_feature(&mut self, user: UserIndex, feature: Arc<Feature>) -> Result<()> {
        self.ensure(user)?;
        self.users[user.get()].deploy(feature);
        Ok(())
    }

    /// Users related to `user`, in the order the relations were added.
    ///
    /// # Errors
    /// Returns [`RolloutError::UnknownUser`] if `user` is out of bounds.
    pub fn related(&self, user: UserIndex) -> Result<&[UserIndex]> {
        self.user(user)
            .map(User::related)
            .ok_or_else(|| self.unknown(user))
    }

    /// Returns the user stored at `index`.
    #[must_use]
    pub fn user(&self, index: UserIndex) -> Option<&User> {
        self.users.get(index.get())
    }

    /// Finds a user by id.
    #[must_use]
    pub fn lookup(&self, id: &str) -> Option<UserIndex> {
        self.by_id.get(id).copied()
    }

    /// Number of users.
    #[must_use]
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Returns `true` if the graph holds no users.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Number of distinct undirected relations.
    #[must_use]
    pub fn relation_count(&self) -> usize {
        let endpoints: usize = self.users.iter().map(|user| user.related().len()).sum();
        endpoints / 2
    }

    /// Iterates users in index order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (UserIndex, &User)> + '_ {
        self.users
            .iter()
            .enumerate()
            .map(|(index, user)| (UserIndex::new(index), user))
    }

    /// Every index in the graph, in order.
    pub fn indices(&self) -> impl ExactSizeIterator<Item = UserIndex> + use<> {
        (0..self.users.len()).map(UserIndex::new)
    }

    /// Checks that `index` refers to a user.
    ///
    /// # Errors
    /// Returns [`RolloutError::UnknownUser`] if it does not.
    pub fn ensure(&self, index: UserIndex) -> Result<()> {
        if index.get() < self.users.len() {
            Ok(())
        } else {
            Err(self.unknown(index))
        }
    }

    fn unknown(&self, index: UserIndex) -> RolloutError {
        RolloutError::UnknownUser {
            index: index.get(),
            users: self.users.len(),
        }
    }
}
