//! Version-control adapters backed by the `git` binary.

mod git;

pub use git::{GitCli, GitRepositoryHost};
