//! Support library for the rollout CLI binary.
//!
//! Exposes argument parsing, graph generation and rendering so doctests and
//! unit tests can drive a whole rollout without spawning a subprocess.

pub mod cli;
pub mod logging;
