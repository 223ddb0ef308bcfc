//! Small helpers shared across CLI tests.

use tempfile::TempDir;

use super::{Cli, CliError, Command, FeatureArgs, GraphArgs, run_cli};

pub(super) fn temp_dir() -> TempDir {
    match TempDir::new() {
        Ok(dir) => dir,
        Err(err) => panic!("failed to create temp dir: {err}"),
    }
}

/// A CLI invocation over `users` generated users with default feature
/// settings and no DOT output.
pub(super) fn cli_for(users: usize, max_links: usize, command: Command) -> Cli {
    Cli {
        graph: GraphArgs {
            users,
            max_links,
            seed: 1,
        },
        feature: FeatureArgs::default(),
        dot: None,
        command,
    }
}

pub(super) fn run_cli_expecting_error(cli: Cli, panic_msg: &str) -> CliError {
    match run_cli(cli) {
        Ok(_) => panic!("{panic_msg}"),
        Err(err) => err,
    }
}
