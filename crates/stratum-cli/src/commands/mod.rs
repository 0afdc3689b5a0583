//! Command handlers, one module per subcommand.

pub mod capture;
pub mod completions;
pub mod config;
pub mod extensions;
pub mod init;
pub mod migrate;
pub mod new;
