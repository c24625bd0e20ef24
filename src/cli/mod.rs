//! CLI module for docstore
//!
//! Provides one subcommand per table store operation, plus:
//! - tables: chart of table sizes
//! - put-file: store a blob
//! - show-image: describe the image a row points at
//! - exec: JSON requests on stdin, JSON responses on stdout

mod args;
mod commands;
mod errors;
mod io;

pub use args::{parse_assignment, parse_json_or_string, Cli, Command};
pub use commands::{load_config, run, run_command};
pub use errors::{CliError, CliResult};
pub use io::{read_requests, write_envelope, write_response, write_text};
