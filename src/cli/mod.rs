//! Command Line Interface (CLI) layer for GEOSTACK.
//!
//! This module defines argument parsing (`args`), error types (`errors`),
//! and the orchestration logic (`runner`) that wires subcommands to the
//! underlying library functionality exposed via `geostack::api`.
//!
//! If you are embedding GEOSTACK into another application, prefer using
//! the high-level `geostack::api` module instead of calling the CLI code.
pub mod args;
pub mod errors;
pub mod runner;

pub use args::CliArgs;
pub use runner::run;
