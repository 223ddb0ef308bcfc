//! Users stored in the [`UserGraph`](super::UserGraph) arena.

use std::{fmt, sync::Arc};

use crate::feature::Feature;

/// Stable position of a user inside a [`UserGraph`](super::UserGraph).
///
/// Indices are assigned in insertion order and never reused, so they double
/// as the identity key for adjacency and visited sets.
///
/// # Examples
/// ```
/// use rollout_core::UserIndex;
///
/// let index = UserIndex::new(4);
/// assert_eq!(index.get(), 4);
/// assert_eq!(index.to_string(), "#4");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserIndex(usize);

impl UserIndex {
    /// Wraps a raw arena position.
    #[rustfmt::skip]
    #[must_use]
    pub const fn new(index: usize) -> Self { Self(index) }

    /// Returns the raw arena position.
    #[rustfmt::skip]
    #[must_use]
    pub const fn get(self) -> usize { self.0 }
}

impl fmt::Display for UserIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A user in the coaching graph.
///
/// Two users are equal when both their id and username match; adjacency and
/// the deployed feature do not take part in equality.
#[derive(Debug, Clone)]
pub struct User {
    id: Arc<str>,
    username: String,
    related: Vec<UserIndex>,
    feature: Option<Arc<Feature>>,
}

impl User {
    pub(super) fn new(id: Arc<str>, username: String, feature: Option<Arc<Feature>>) -> Self {
        Self {
            id,
            username,
            related: Vec::new(),
            feature,
        }
    }

    /// Unique identifier of the user.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Display name of the user.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Coaches and students of this user, in the order the relations were
    /// added.
    #[must_use]
    pub fn related(&self) -> &[UserIndex] {
        &self.related
    }

    /// Feature currently deployed to this user.
    #[must_use]
    pub fn feature(&self) -> Option<&Feature> {
        self.feature.as_deref()
    }

    /// Shared handle to the deployed feature, for callers that want to keep
    /// it alive independently of the graph.
    #[must_use]
    pub fn feature_handle(&self) -> Option<&Arc<Feature>> {
        self.feature.as_ref()
    }

    /// Returns `true` when `other` is already related to this user.
    #[must_use]
    pub fn is_related_to(&self, other: UserIndex) -> bool {
        self.related.contains(&other)
    }

    /// Records `other` as related. Returns `false` when the relation already
    /// existed.
    pub(super) fn relate(&mut self, other: UserIndex) -> bool {
        if self.is_related_to(other) {
            return false;
        }
        self.related.push(other);
        true
    }

    pub(super) fn deploy(&mut self, feature: Arc<Feature>) {
        self.feature = Some(feature);
    }
}

impl PartialEq for User {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.username == other.username
    }
}

impl Eq for User {}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "user {} ({}), {} related, feature: ",
            self.id,
            self.username,
            self.related.len()
        )?;
        match &self.feature {
            Some(feature) => write!(f, "{feature}"),
            None => f.write_str("none"),
        }
    }
}

/// Describes a user to insert into a [`UserGraph`](super::UserGraph),
/// optionally pre-populated with relations and a deployed feature.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use rollout_core::{Feature, UserGraph, UserSpec};
///
/// let mut graph = UserGraph::new();
/// let coach = graph.add_user("id-0", "coach")?;
/// let feature = Arc::new(Feature::new("Cool Blue", Vec::new(), "version 1.0"));
/// let student = graph.insert(
///     UserSpec::new("id-1", "student")
///         .with_related(coach)
///         .with_feature(Arc::clone(&feature)),
/// )?;
/// assert_eq!(graph.related(coach)?, &[student]);
/// assert_eq!(graph.user(student).and_then(|user| user.feature()), Some(&*feature));
/// # Ok::<(), rollout_core::RolloutError>(())
/// ```
#[derive(Debug, Clone)]
pub struct UserSpec {
    pub(super) id: Arc<str>,
    pub(super) username: String,
    pub(super) related: Vec<UserIndex>,
    pub(super) feature: Option<Arc<Feature>>,
}

impl UserSpec {
    /// Starts a spec with the user's identity.
    #[must_use]
    pub fn new(id: impl Into<Arc<str>>, username: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            related: Vec::new(),
            feature: None,
        }
    }

    /// Relates the new user to an existing one.
    #[must_use]
    pub fn with_related(mut self, user: UserIndex) -> Self {
        self.related.push(user);
        self
    }

    /// Starts the new user with `feature` already deployed.
    #[must_use]
    pub fn with_feature(mut self, feature: Arc<Feature>) -> Self {
        self.feature = Some(feature);
        self
    }
}
