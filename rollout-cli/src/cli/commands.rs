//! Command implementations and argument parsing for the rollout CLI.

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use clap::builder::RangedU64ValueParser;
use clap::{Args, Parser, Subcommand};
use rollout_core::{
    Feature, RolloutError, RolloutErrorCode, UserGraph, UserIndex, components, limited_infection,
    total_infection,
};
use thiserror::Error;
use tracing::{Span, field, info, instrument};

use super::dot::write_dot_file;
use super::generate::{GeneratorConfigError, MAX_LINKS, MAX_USERS, RandomGraphConfig, generate};

const DEFAULT_USERS: usize = 20;
const DEFAULT_MAX_LINKS: usize = 2;
const DEFAULT_SEED: u64 = 1;
const DEFAULT_FEATURE_NAME: &str = "Cool Blue";
const DEFAULT_FEATURE_VERSION: &str = "version 1.0";

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(
    name = "rollout",
    about = "Roll a feature out across whole components of a generated coaching graph."
)]
pub struct Cli {
    /// Shape of the generated graph.
    #[command(flatten)]
    pub graph: GraphArgs,

    /// Feature to deploy.
    #[command(flatten)]
    pub feature: FeatureArgs,

    /// Write a Graphviz rendering of the rollout to this path.
    #[arg(long, value_name = "PATH")]
    pub dot: Option<PathBuf>,

    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Options controlling random graph generation.
#[derive(Debug, Args, Clone)]
pub struct GraphArgs {
    /// Number of users to generate.
    #[arg(
        long,
        default_value_t = DEFAULT_USERS,
        value_parser = RangedU64ValueParser::<usize>::new().range(1..=MAX_USERS as u64),
    )]
    pub users: usize,

    /// Most relations each new user declares towards earlier users.
    #[arg(
        long = "max-links",
        default_value_t = DEFAULT_MAX_LINKS,
        value_parser = RangedU64ValueParser::<usize>::new().range(0..=MAX_LINKS as u64),
    )]
    pub max_links: usize,

    /// Seed for the graph generator.
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,
}

/// Description of the feature being rolled out.
#[derive(Debug, Args, Clone)]
pub struct FeatureArgs {
    /// Feature name.
    #[arg(long = "feature-name", default_value = DEFAULT_FEATURE_NAME)]
    pub name: String,

    /// Version being deployed.
    #[arg(long = "feature-version", default_value = DEFAULT_FEATURE_VERSION)]
    pub version: String,

    /// Older versions still supported; may be repeated.
    #[arg(long = "supported-version", value_name = "VERSION")]
    pub supported_versions: Vec<String>,
}

impl FeatureArgs {
    fn into_feature(self) -> Arc<Feature> {
        Arc::new(Feature::new(self.name, self.supported_versions, self.version))
    }
}

impl Default for FeatureArgs {
    fn default() -> Self {
        Self {
            name: DEFAULT_FEATURE_NAME.to_owned(),
            version: DEFAULT_FEATURE_VERSION.to_owned(),
            supported_versions: Vec::new(),
        }
    }
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Infect the whole component of one generated user.
    Total(TotalArgs),
    /// Infect the largest component that fits within a limit.
    Limited(LimitedArgs),
}

/// Options accepted by the `total` command.
#[derive(Debug, Args, Clone)]
pub struct TotalArgs {
    /// Index of the generated user to start from.
    #[arg(long)]
    pub start: usize,
}

/// Options accepted by the `limited` command.
#[derive(Debug, Args, Clone)]
pub struct LimitedArgs {
    /// Largest number of users that may receive the feature.
    #[arg(long)]
    pub limit: usize,
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Writing an output file failed.
    #[error("failed to write `{path}`: {source}")]
    Io {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// The generator options were rejected.
    #[error(transparent)]
    Generator(#[from] GeneratorConfigError),
    /// The `total` start index is not a generated user.
    #[error("start index {start} must be smaller than the graph size {users}")]
    StartOutOfRange {
        /// Requested start index.
        start: usize,
        /// Number of generated users.
        users: usize,
    },
    /// Graph construction or infection failed.
    #[error(transparent)]
    Core(#[from] RolloutError),
}

impl CliError {
    /// Stable code of the underlying [`RolloutError`], if any.
    #[must_use]
    pub const fn core_code(&self) -> Option<RolloutErrorCode> {
        match self {
            Self::Core(error) => Some(error.code()),
            _ => None,
        }
    }
}

/// Summarises the outcome of executing a CLI command.
#[derive(Debug, Clone)]
pub struct ExecutionSummary {
    /// The generated graph after the rollout.
    pub graph: UserGraph,
    /// Number of connected components in the graph.
    pub components: usize,
    /// The deployed feature.
    pub feature: Arc<Feature>,
    /// Users that received the feature, in traversal order.
    pub infected: Vec<UserIndex>,
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when generation, infection, or DOT output fails.
///
/// # Examples
/// ```
/// # use rollout_cli::cli::{Cli, Command, FeatureArgs, GraphArgs, TotalArgs, run_cli};
/// let cli = Cli {
///     graph: GraphArgs { users: 10, max_links: 2, seed: 3 },
///     feature: FeatureArgs::default(),
///     dot: None,
///     command: Command::Total(TotalArgs { start: 0 }),
/// };
/// let summary = run_cli(cli)?;
/// assert!(summary.infected.contains(&summary.graph.indices().next().unwrap()));
/// # Ok::<(), rollout_cli::cli::CliError>(())
/// ```
#[instrument(
    name = "cli.run",
    err,
    skip(cli),
    fields(command = field::Empty, users = cli.graph.users, seed = cli.graph.seed),
)]
pub fn run_cli(cli: Cli) -> Result<ExecutionSummary, CliError> {
    let Cli {
        graph: graph_args,
        feature,
        dot,
        command,
    } = cli;
    let config = RandomGraphConfig::new(graph_args.users, graph_args.max_links, graph_args.seed)?;
    let mut graph = generate(&config)?;
    let feature = feature.into_feature();

    let span = Span::current();
    let infected = match command {
        Command::Total(args) => {
            span.record("command", field::display("total"));
            run_total(&mut graph, &args, &feature)?
        }
        Command::Limited(args) => {
            span.record("command", field::display("limited"));
            run_limited(&mut graph, &args, &feature)?
        }
    };

    if let Some(path) = dot {
        write_dot_file(&path, &graph, &infected)?;
    }

    let components = components(&graph)?.len();
    info!(
        users = graph.len(),
        components,
        infected = infected.len(),
        "command completed"
    );
    Ok(ExecutionSummary {
        graph,
        components,
        feature,
        infected,
    })
}

#[instrument(
    name = "cli.total",
    err,
    skip(graph, args, feature),
    fields(start = args.start),
)]
pub(super) fn run_total(
    graph: &mut UserGraph,
    args: &TotalArgs,
    feature: &Arc<Feature>,
) -> Result<Vec<UserIndex>, CliError> {
    if args.start >= graph.len() {
        return Err(CliError::StartOutOfRange {
            start: args.start,
            users: graph.len(),
        });
    }
    Ok(total_infection(
        graph,
        &[UserIndex::new(args.start)],
        feature,
    )?)
}

#[instrument(
    name = "cli.limited",
    err,
    skip(graph, args, feature),
    fields(limit = args.limit),
)]
pub(super) fn run_limited(
    graph: &mut UserGraph,
    args: &LimitedArgs,
    feature: &Arc<Feature>,
) -> Result<Vec<UserIndex>, CliError> {
    let candidates: Vec<UserIndex> = graph.indices().collect();
    Ok(limited_infection(graph, &candidates, args.limit, feature)?)
}

/// Renders `summary` to `writer` as a header followed by one tab-separated
/// line per user: index, id, username, and `infected` or `clean`.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use std::sync::Arc;
/// # use rollout_cli::cli::{ExecutionSummary, render_summary};
/// # use rollout_core::{Feature, UserGraph};
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let mut graph = UserGraph::new();
/// graph.add_user("0", "n-0")?;
/// let summary = ExecutionSummary {
///     graph,
///     components: 1,
///     feature: Arc::new(Feature::new("Cool Blue", Vec::new(), "version 1.0")),
///     infected: Vec::new(),
/// };
/// let mut buffer = Vec::new();
/// render_summary(&summary, &mut buffer)?;
/// assert!(String::from_utf8(buffer)?.ends_with("0\t0\tn-0\tclean\n"));
/// # Ok(())
/// # }
/// ```
pub fn render_summary(summary: &ExecutionSummary, mut writer: impl Write) -> io::Result<()> {
    let graph = &summary.graph;
    writeln!(writer, "feature: {}", summary.feature)?;
    writeln!(writer, "users: {}", graph.len())?;
    writeln!(writer, "relations: {}", graph.relation_count())?;
    writeln!(writer, "components: {}", summary.components)?;
    writeln!(writer, "infected: {}", summary.infected.len())?;
    for (index, user) in graph.iter() {
        let state = if user.feature().is_some() {
            "infected"
        } else {
            "clean"
        };
        writeln!(
            writer,
            "{}\t{}\t{}\t{state}",
            index.get(),
            user.id(),
            user.username()
        )?;
    }
    Ok(())
}
