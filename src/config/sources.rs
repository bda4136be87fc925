//! Configuration sources, in precedence order: files, then environment.

pub mod environment;
pub mod file;
