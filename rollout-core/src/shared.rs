//! A user graph shared between threads.
//!
//! Infections mutate many users at once, so every operation holds one lock
//! for its whole duration: concurrent callers observe either the graph
//! before an infection or after it, never a partly infected component.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::{
    Result,
    error::RolloutError,
    feature::Feature,
    graph::{UserGraph, UserIndex},
    infection,
};

const RESOURCE: &str = "user graph";

/// Thread-safe wrapper serialising access to a [`UserGraph`].
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use rollout_core::{Feature, SharedUserGraph, UserGraph};
///
/// let mut graph = UserGraph::new();
/// let a = graph.add_user("id-0", "a")?;
/// let b = graph.add_user("id-1", "b")?;
/// let shared = SharedUserGraph::from(graph);
///
/// shared.add_related(a, b)?;
/// let feature = Arc::new(Feature::new("Cool Blue", Vec::new(), "version 1.0"));
/// assert_eq!(shared.total_infection(&[a], &feature)?.len(), 2);
/// assert!(shared.read(|graph| graph.user(b).and_then(|user| user.feature()).is_some())?);
/// # Ok::<(), rollout_core::RolloutError>(())
/// ```
#[derive(Debug, Default)]
pub struct SharedUserGraph {
    inner: Mutex<UserGraph>,
}

impl SharedUserGraph {
    /// Wraps `graph` for shared use.
    #[must_use]
    pub fn new(graph: UserGraph) -> Self {
        Self {
            inner: Mutex::new(graph),
        }
    }

    /// Relates two users under the lock. See [`UserGraph::add_related`].
    ///
    /// # Errors
    /// Returns [`RolloutError::LockPoisoned`] if a previous holder panicked,
    /// or the error from [`UserGraph::add_related`].
    pub fn add_related(&self, a: UserIndex, b: UserIndex) -> Result<bool> {
        self.write(|graph| graph.add_related(a, b))
    }

    /// Runs [`infection::total_infection`] under the lock.
    ///
    /// # Errors
    /// Returns [`RolloutError::LockPoisoned`] or the infection's own error.
    pub fn total_infection(
        &self,
        seeds: &[UserIndex],
        feature: &Arc<Feature>,
    ) -> Result<Vec<UserIndex>> {
        self.write(|graph| infection::total_infection(graph, seeds, feature))
    }

    /// Runs [`infection::limited_infection`] under the lock.
    ///
    /// # Errors
    /// Returns [`RolloutError::LockPoisoned`] or the infection's own error.
    pub fn limited_infection(
        &self,
        candidates: &[UserIndex],
        limit: usize,
        feature: &Arc<Feature>,
    ) -> Result<Vec<UserIndex>> {
        self.write(|graph| infection::limited_infection(graph, candidates, limit, feature))
    }

    /// Runs `f` with shared access to the graph.
    ///
    /// # Errors
    /// Returns [`RolloutError::LockPoisoned`] if a previous holder panicked.
    pub fn read<T>(&self, f: impl FnOnce(&UserGraph) -> T) -> Result<T> {
        let guard = self.lock()?;
        Ok(f(&guard))
    }

    /// Consumes the wrapper and returns the graph.
    ///
    /// # Errors
    /// Returns [`RolloutError::LockPoisoned`] if a previous holder panicked.
    pub fn into_inner(self) -> Result<UserGraph> {
        self.inner
            .into_inner()
            .map_err(|_| RolloutError::LockPoisoned { resource: RESOURCE })
    }

    fn write<T>(&self, f: impl FnOnce(&mut UserGraph) -> Result<T>) -> Result<T> {
        let mut guard = self.lock()?;
        f(&mut guard)
    }

    fn lock(&self) -> Result<MutexGuard<'_, UserGraph>> {
        self.inner
            .lock()
            .map_err(|_| RolloutError::LockPoisoned { resource: RESOURCE })
    }
}

impl From<UserGraph> for SharedUserGraph {
    fn from(graph: UserGraph) -> Self {
        Self::new(graph)
    }
}
