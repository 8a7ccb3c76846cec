//! CLI module
//!
//! Command-line interface for extracting partner API resources.
//!
//! # Commands
//!
//! - `fetch` - Fetch one or more resources and write them out
//! - `inventories` - Show the inventory name→id map
//! - `list` - List the known resources

mod commands;
mod runner;

pub use commands::{Cli, Commands, FetchArgs, OutputFormat};
pub use runner::Runner;
