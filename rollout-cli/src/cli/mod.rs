//! Command-line interface orchestration for rollouts.
//!
//! Every invocation generates a seeded random coaching graph, then runs
//! either a `total` infection from one user or a `limited` infection over
//! all users, optionally writing a Graphviz rendering of the result.

mod commands;
mod dot;
mod generate;

pub use commands::{
    Cli, CliError, Command, ExecutionSummary, FeatureArgs, GraphArgs, LimitedArgs, TotalArgs,
    render_summary, run_cli,
};
pub use dot::{write_dot, write_dot_file};
pub use generate::{GeneratorConfigError, MAX_LINKS, MAX_USERS, RandomGraphConfig, generate};

#[cfg(test)]
mod test_helpers;
