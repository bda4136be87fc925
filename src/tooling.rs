//! Tooling Layer
//!
//! Command-line front end over the session, plus text formatting for its output.

pub mod cli;
pub mod format;

pub use cli::{Cli, CliContext, Commands};
pub use format::format_section_heading;
