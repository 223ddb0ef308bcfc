//! Feature rollout by "infection" of connected coaching components.
//!
//! If A coaches B and B coaches C, giving any of them a feature must give it
//! to all three: a feature visible to a coach but not to their students (or
//! the reverse) is an inconsistent state. Every operation here therefore
//! commits whole connected components and nothing smaller.
//!
//! - [`total_infection`] deploys to the union of the components of its seeds.
//! - [`limited_infection`] deploys to the single largest candidate component
//!   whose size does not exceed a limit, and refuses when none fits. It does
//!   not combine several components to get closer to the limit.
//!
//! Selection always finishes before the first feature is written, so a failed
//! call leaves the graph exactly as it found it.

mod component;

use std::sync::Arc;

use tracing::{Span, debug, field, info, instrument, warn};

use crate::{
    Result,
    error::RolloutError,
    feature::Feature,
    graph::{UserGraph, UserIndex},
};

use self::component::Walk;

pub use self::component::Component;

/// Returns the connected component containing `seed`.
///
/// # Errors
/// Returns [`RolloutError::UnknownUser`] if `seed` is not in `graph`.
///
/// # Examples
/// ```
/// use rollout_core::{UserGraph, connected_component};
///
/// let mut graph = UserGraph::new();
/// let a = graph.add_user("id-0", "a")?;
/// let b = graph.add_user("id-1", "b")?;
/// let c = graph.add_user("id-2", "c")?;
/// graph.add_related(a, b)?;
///
/// let component = connected_component(&graph, b)?;
/// assert_eq!(component.members(), &[b, a]);
/// assert!(!component.contains(c));
/// # Ok::<(), rollout_core::RolloutError>(())
/// ```
#[instrument(
    name = "core.connected_component",
    err,
    skip(graph),
    fields(seed = %seed, size = field::Empty),
)]
pub fn connected_component(graph: &UserGraph, seed: UserIndex) -> Result<Component> {
    graph.ensure(seed)?;
    let component = Walk::new(graph.len()).component(graph, seed)?;
    Span::current().record("size", component.len());
    Ok(component)
}

/// Partitions the whole graph into connected components, discovered in user
/// index order.
///
/// # Examples
/// ```
/// use rollout_core::{UserGraph, components};
///
/// let mut graph = UserGraph::new();
/// let a = graph.add_user("id-0", "a")?;
/// let b = graph.add_user("id-1", "b")?;
/// graph.add_user("id-2", "c")?;
/// graph.add_related(a, b)?;
///
/// let sizes: Vec<usize> = components(&graph)?.iter().map(|c| c.len()).collect();
/// assert_eq!(sizes, vec![2, 1]);
/// # Ok::<(), rollout_core::RolloutError>(())
/// ```
///
/// # Errors
/// Only fails if the graph's adjacency refers to a missing user, which
/// [`UserGraph::add_related`] never allows.
pub fn components(graph: &UserGraph) -> Result<Vec<Component>> {
    let mut walk = Walk::new(graph.len());
    let mut found = Vec::new();
    for user in graph.indices() {
        if !walk.covers(user) {
            found.push(walk.component(graph, user)?);
        }
    }
    Ok(found)
}

/// Deploys `feature` to every user connected to any of `seeds`.
///
/// Returns the infected users: the union of the seeds' components,
/// deduplicated, in the order they were reached. Users outside the union
/// keep whatever feature they had. An empty `seeds` slice infects nobody.
///
/// # Errors
/// Returns [`RolloutError::UnknownUser`] if any seed is not in `graph`; no
/// user is modified in that case.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use rollout_core::{Feature, UserGraph, total_infection};
///
/// let mut graph = UserGraph::new();
/// let coach = graph.add_user("id-0", "coach")?;
/// let student = graph.add_user("id-1", "student")?;
/// let stranger = graph.add_user("id-2", "stranger")?;
/// graph.add_related(coach, student)?;
///
/// let feature = Arc::new(Feature::new("Cool Blue", Vec::new(), "version 1.0"));
/// let infected = total_infection(&mut graph, &[student], &feature)?;
/// assert_eq!(infected, vec![student, coach]);
/// assert_eq!(graph.user(coach).and_then(|user| user.feature()), Some(&*feature));
/// assert!(graph.user(stranger).and_then(|user| user.feature()).is_none());
/// # Ok::<(), rollout_core::RolloutError>(())
/// ```
#[instrument(
    name = "core.total_infection",
    err,
    skip(graph, seeds, feature),
    fields(seeds = seeds.len(), feature = %feature, infected = field::Empty),
)]
pub fn total_infection(
    graph: &mut UserGraph,
    seeds: &[UserIndex],
    feature: &Arc<Feature>,
) -> Result<Vec<UserIndex>> {
    for seed in seeds {
        graph.ensure(*seed)?;
    }

    let mut walk = Walk::new(graph.len());
    let mut infected = Vec::new();
    for &seed in seeds {
        if walk.covers(seed) {
            continue;
        }
        infected.extend(walk.component(graph, seed)?.into_members());
    }

    Span::current().record("infected", infected.len());
    deploy(graph, &infected, feature)?;
    Ok(infected)
}

/// Chooses the component [`limited_infection`] would deploy to, without
/// deploying anything.
///
/// Each candidate is considered on its own: the candidate's whole component
/// qualifies when its size is at most `limit`, and the largest qualifying
/// component wins. When several qualifying components share the largest
/// size, the one reached from the earliest candidate wins.
///
/// # Errors
/// Returns [`RolloutError::UnknownUser`] if a candidate is not in `graph`,
/// and [`RolloutError::InfeasibleLimit`] when no candidate's component fits,
/// which includes an empty `candidates` slice and a `limit` of zero.
///
/// # Examples
/// ```
/// use rollout_core::{RolloutError, UserGraph, plan_limited_infection};
///
/// let mut graph = UserGraph::new();
/// let users: Vec<_> = (0..3)
///     .map(|i| graph.add_user(format!("id-{i}"), format!("user-{i}")))
///     .collect::<Result<_, _>>()?;
/// graph.add_related(users[0], users[1])?;
///
/// let plan = plan_limited_infection(&graph, &users, 2)?;
/// assert_eq!(plan.len(), 2);
///
/// let err = plan_limited_infection(&graph, &users[..2], 1).unwrap_err();
/// assert!(matches!(err, RolloutError::InfeasibleLimit { smallest: Some(2), .. }));
/// # Ok::<(), RolloutError>(())
/// ```
#[instrument(
    name = "core.plan_limited_infection",
    err,
    skip(graph, candidates),
    fields(candidates = candidates.len(), limit = limit, selected = field::Empty),
)]
pub fn plan_limited_infection(
    graph: &UserGraph,
    candidates: &[UserIndex],
    limit: usize,
) -> Result<Component> {
    for candidate in candidates {
        graph.ensure(*candidate)?;
    }

    let mut walk = Walk::new(graph.len());
    let mut best: Option<Component> = None;
    let mut smallest: Option<usize> = None;
    for &candidate in candidates {
        // A covered candidate shares a component with an earlier one, which
        // has already been weighed and would win any tie.
        if walk.covers(candidate) {
            continue;
        }
        let component = walk.component(graph, candidate)?;
        let size = component.len();
        debug!(candidate = %candidate, size, "weighed candidate component");
        smallest = Some(smallest.map_or(size, |current| current.min(size)));
        if size <= limit && best.as_ref().is_none_or(|chosen| size > chosen.len()) {
            best = Some(component);
            if size == limit {
                break;
            }
        }
    }

    match best {
        Some(component) => {
            Span::current().record("selected", component.len());
            Ok(component)
        }
        None => {
            warn!(
                limit,
                candidates = candidates.len(),
                smallest = ?smallest,
                "no component fits within the limit"
            );
            #[cfg(feature = "metrics")]
            metrics::counter!("rollout_infeasible_limits").increment(1);
            Err(RolloutError::InfeasibleLimit {
                limit,
                candidates: candidates.len(),
                smallest,
            })
        }
    }
}

/// Deploys `feature` to the largest candidate component of at most `limit`
/// users, as chosen by [`plan_limited_infection`].
///
/// Returns the infected users in traversal order. The result can be far below
/// `limit` when no component comes close to it; splitting a component to get
/// nearer is never an option.
///
/// # Errors
/// Returns [`RolloutError::InfeasibleLimit`] when no candidate's component
/// fits and [`RolloutError::UnknownUser`] for candidates outside `graph`. The
/// graph is unchanged on error.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use rollout_core::{Feature, UserGraph, limited_infection};
///
/// let mut graph = UserGraph::new();
/// let users: Vec<_> = (0..5)
///     .map(|i| graph.add_user(format!("id-{i}"), format!("user-{i}")))
///     .collect::<Result<_, _>>()?;
/// graph.add_related(users[0], users[1])?;
/// graph.add_related(users[1], users[2])?;
/// graph.add_related(users[3], users[4])?;
///
/// let feature = Arc::new(Feature::new("Cool Blue", Vec::new(), "version 1.0"));
/// let infected = limited_infection(&mut graph, &users, 2, &feature)?;
/// assert_eq!(infected, vec![users[3], users[4]]);
/// assert!(graph.user(users[0]).and_then(|user| user.feature()).is_none());
/// # Ok::<(), rollout_core::RolloutError>(())
/// ```
#[instrument(
    name = "core.limited_infection",
    err,
    skip(graph, candidates, feature),
    fields(candidates = candidates.len(), limit = limit, feature = %feature),
)]
pub fn limited_infection(
    graph: &mut UserGraph,
    candidates: &[UserIndex],
    limit: usize,
    feature: &Arc<Feature>,
) -> Result<Vec<UserIndex>> {
    let infected = plan_limited_infection(graph, candidates, limit)?.into_members();
    deploy(graph, &infected, feature)?;
    Ok(infected)
}

fn deploy(graph: &mut UserGraph, users: &[UserIndex], feature: &Arc<Feature>) -> Result<()> {
    for user in users {
        graph.set_feature(*user, Arc::clone(feature))?;
    }
    info!(users = users.len(), feature = %feature, "feature deployed");
    #[cfg(feature = "metrics")]
    metrics::counter!("rollout_users_infected")
        .increment(u64::try_from(users.len()).unwrap_or(u64::MAX));
    Ok(())
}


#[cfg(test)]
mod property;
