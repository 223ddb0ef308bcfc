//! Graphviz rendering of a rollout.
//!
//! Users become nodes labelled with their username; infected users are
//! filled red, everyone else black. Each relation is drawn once.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use rollout_core::{UserGraph, UserIndex};
use tracing::{Span, field, info, instrument};

use super::CliError;

const INFECTED_FILL: &str = "red";
const CLEAN_FILL: &str = "black";

/// Writes `graph` as an undirected DOT document, highlighting `infected`.
///
/// # Errors
/// Returns [`io::Error`] if writing to `writer` fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use rollout_cli::cli::write_dot;
/// # use rollout_core::UserGraph;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let mut graph = UserGraph::new();
/// let a = graph.add_user("0", "n-0")?;
/// let b = graph.add_user("1", "n-1")?;
/// graph.add_related(a, b)?;
///
/// let mut buffer = Vec::new();
/// write_dot(&graph, &[b], &mut buffer)?;
/// let text = String::from_utf8(buffer)?;
/// assert!(text.contains("u1 [label=\"n-1\", fillcolor=red];"));
/// assert!(text.contains("u0 -- u1;"));
/// # Ok(())
/// # }
/// ```
pub fn write_dot(
    graph: &UserGraph,
    infected: &[UserIndex],
    mut writer: impl Write,
) -> io::Result<()> {
    let mut marked = vec![false; graph.len()];
    for user in infected {
        if let Some(flag) = marked.get_mut(user.get()) {
            *flag = true;
        }
    }

    writeln!(writer, "graph infection {{")?;
    writeln!(
        writer,
        "  node [style=filled, fontcolor=white, fillcolor={CLEAN_FILL}];"
    )?;
    for (index, user) in graph.iter() {
        let label = escape(user.username());
        if marked.get(index.get()).copied().unwrap_or(false) {
            writeln!(
                writer,
                "  u{} [label=\"{label}\", fillcolor={INFECTED_FILL}];",
                index.get()
            )?;
        } else {
            writeln!(writer, "  u{} [label=\"{label}\"];", index.get())?;
        }
    }
    for (index, user) in graph.iter() {
        for other in user.related().iter().filter(|other| **other > index) {
            writeln!(writer, "  u{} -- u{};", index.get(), other.get())?;
        }
    }
    writeln!(writer, "}}")
}

/// Writes the DOT rendering of a rollout to `path`, replacing any existing
/// file.
///
/// # Errors
/// Returns [`CliError::Io`] if the file cannot be created or written.
#[instrument(
    name = "cli.write_dot",
    err,
    skip(graph, infected),
    fields(path = field::Empty, users = graph.len(), infected = infected.len()),
)]
pub fn write_dot_file(
    path: &Path,
    graph: &UserGraph,
    infected: &[UserIndex],
) -> Result<(), CliError> {
    Span::current().record("path", field::display(path.display()));
    let io_error = |source: io::Error| CliError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(io_error)?;
    let mut writer = BufWriter::new(file);
    write_dot(graph, infected, &mut writer).map_err(io_error)?;
    writer.flush().map_err(io_error)?;
    info!(path = %path.display(), "graph written");
    Ok(())
}

fn escape(label: &str) -> String {
    label.replace('\\', "\\\\").replace('"', "\\\"")
}
