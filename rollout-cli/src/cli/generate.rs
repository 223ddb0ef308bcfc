//! Seeded random coaching graphs for the CLI.

use rand::{Rng, SeedableRng, rngs::SmallRng, seq::index::sample};
use rollout_core::{UserGraph, UserIndex};
use thiserror::Error;
use tracing::{Span, field, instrument};

use super::CliError;

/// Largest graph the CLI will generate.
pub const MAX_USERS: usize = 1_000_000;

/// Most relations a generated user may declare towards earlier users.
pub const MAX_LINKS: usize = 64;

/// Reasons a [`RandomGraphConfig`] is rejected.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum GeneratorConfigError {
    /// A graph needs at least one user to roll anything out to.
    #[error("a generated graph needs at least one user")]
    NoUsers,
    /// The requested size exceeds [`MAX_USERS`].
    #[error("cannot generate {requested} users; the maximum is {max}")]
    TooManyUsers {
        /// Size that was asked for.
        requested: usize,
        /// Upper bound enforced by the generator.
        max: usize,
    },
    /// The requested link budget exceeds [`MAX_LINKS`].
    #[error("cannot declare {requested} links per user; the maximum is {max}")]
    TooManyLinks {
        /// Link budget that was asked for.
        requested: usize,
        /// Upper bound enforced by the generator.
        max: usize,
    },
}

/// Validated parameters for [`generate`].
///
/// # Examples
/// ```
/// use rollout_cli::cli::{GeneratorConfigError, RandomGraphConfig};
///
/// let config = RandomGraphConfig::new(10, 3, 7).expect("valid config");
/// assert_eq!(config.users(), 10);
/// assert_eq!(
///     RandomGraphConfig::new(0, 3, 7),
///     Err(GeneratorConfigError::NoUsers)
/// );
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RandomGraphConfig {
    users: usize,
    max_links: usize,
    seed: u64,
}

impl RandomGraphConfig {
    /// Validates and builds a configuration.
    ///
    /// # Errors
    /// Returns [`GeneratorConfigError`] when `users` is zero or above
    /// [`MAX_USERS`], or when `max_links` is above [`MAX_LINKS`].
    pub const fn new(
        users: usize,
        max_links: usize,
        seed: u64,
    ) -> Result<Self, GeneratorConfigError> {
        if users == 0 {
            return Err(GeneratorConfigError::NoUsers);
        }
        if users > MAX_USERS {
            return Err(GeneratorConfigError::TooManyUsers {
                requested: users,
                max: MAX_USERS,
            });
        }
        if max_links > MAX_LINKS {
            return Err(GeneratorConfigError::TooManyLinks {
                requested: max_links,
                max: MAX_LINKS,
            });
        }
        Ok(Self {
            users,
            max_links,
            seed,
        })
    }

    /// Number of users to generate.
    #[must_use]
    pub const fn users(&self) -> usize {
        self.users
    }

    /// Most relations a new user declares towards earlier users.
    #[must_use]
    pub const fn max_links(&self) -> usize {
        self.max_links
    }

    /// Seed for the generator's `SmallRng`.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }
}

/// Generates a random graph from `config`.
///
/// User `i` gets id `i` and username `n-i`, then relates to between zero and
/// `min(max_links, i)` distinct earlier users. The graph may be disconnected.
/// Equal configurations produce equal graphs.
///
/// # Errors
/// Returns [`CliError::Core`] if the graph rejects a user or relation, which
/// only happens if the generator itself is wrong.
#[instrument(
    name = "cli.generate",
    err,
    skip(config),
    fields(
        users = config.users(),
        max_links = config.max_links(),
        seed = config.seed(),
        relations = field::Empty,
    ),
)]
pub fn generate(config: &RandomGraphConfig) -> Result<UserGraph, CliError> {
    let mut rng = SmallRng::seed_from_u64(config.seed());
    let mut graph = UserGraph::with_capacity(config.users());
    let mut earlier: Vec<UserIndex> = Vec::with_capacity(config.users());

    for id in 0..config.users() {
        let user = graph.add_user(id.to_string(), format!("n-{id}"))?;
        let links = rng.gen_range(0..=config.max_links().min(id));
        for picked in sample(&mut rng, earlier.len(), links) {
            graph.add_related(user, earlier[picked])?;
        }
        earlier.push(user);
    }

    Span::current().record("relations", graph.relation_count());
    Ok(graph)
}
