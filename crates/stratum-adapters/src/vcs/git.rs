//! `git` subprocess adapters.
//!
//! Every call runs to completion before the next one starts. No timeouts are
//! imposed; a hanging `git` hangs the caller.

use std::ffi::OsStr;
use std::path::Path;
use std::process::{Command, Output};

use tracing::{debug, instrument};

use stratum_core::{
    application::{
        ApplicationError,
        ports::{RepositoryHost, VersionControl},
    },
    domain::RemovalKind,
    error::StratumResult,
};

const GIT: &str = "git";

/// Runs `git` against local repositories.
#[derive(Debug, Clone, Default)]
pub struct GitCli {
    envs: Vec<(String, String)>,
}

impl GitCli {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commit as this identity instead of the user's git configuration.
    pub fn with_identity(mut self, name: &str, email: &str) -> Self {
        for role in ["AUTHOR", "COMMITTER"] {
            self.envs.push((format!("GIT_{role}_NAME"), name.to_string()));
            self.envs.push((format!("GIT_{role}_EMAIL"), email.to_string()));
        }
        self
    }

    fn with_env(mut self, key: &str, value: &str) -> Self {
        self.envs.push((key.to_string(), value.to_string()));
        self
    }

    fn output<I, S>(&self, repo: &Path, args: I) -> StratumResult<(String, Output)>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let args: Vec<S> = args.into_iter().collect();
        let command = describe(&args);
        debug!(repo = %repo.display(), %command, "Running git");
        let output = Command::new(GIT)
            .args(&args)
            .current_dir(repo)
            .envs(self.envs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .output()
            .map_err(|e| ApplicationError::ExternalTool {
                tool: GIT.into(),
                command: command.clone(),
                reason: e.to_string(),
            })?;
        Ok((command, output))
    }

    /// Run `git`, failing on a non-zero exit. Returns trimmed stdout.
    fn run_git<I, S>(&self, repo: &Path, args: I) -> StratumResult<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.run_git_raw(repo, args).map(|out| out.trim().to_string())
    }

    /// Run `git`, failing on a non-zero exit. Returns stdout untouched, for
    /// `-z` output where surrounding whitespace belongs to a path.
    fn run_git_raw<I, S>(&self, repo: &Path, args: I) -> StratumResult<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let (command, output) = self.output(repo, args)?;
        if !output.status.success() {
            return Err(failure(command, &output).into());
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

fn describe<S: AsRef<OsStr>>(args: &[S]) -> String {
    let mut command = GIT.to_string();
    for arg in args {
        command.push(' ');
        command.push_str(&arg.as_ref().to_string_lossy());
    }
    command
}

fn failure(command: String, output: &Output) -> ApplicationError {
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    ApplicationError::ExternalTool {
        tool: GIT.into(),
        command,
        reason: if stderr.is_empty() {
            format!("exited with {}", output.status)
        } else {
            stderr
        },
    }
}

/// NUL-separated fields of `-z` output. Paths come through verbatim, with
/// no C-style quoting of non-ASCII bytes.
fn nul_fields(stdout: &str) -> impl Iterator<Item = &str> {
    stdout.split('\0').filter(|f| !f.is_empty())
}

/// Parse `diff --name-status -z` output for deletions and renames. A rename
/// record carries the old path then the new one; only the old path was
/// removed.
fn parse_removals(stdout: &str) -> Vec<(RemovalKind, String)> {
    let mut fields = nul_fields(stdout);
    let mut removed = Vec::new();
    while let Some(status) = fields.next() {
        let Some(path) = fields.next() else { break };
        if status.starts_with('R') {
            fields.next();
            removed.push((RemovalKind::Renamed, path.to_string()));
        } else if status.starts_with('D') {
            removed.push((RemovalKind::Deleted, path.to_string()));
        }
    }
    removed
}

impl VersionControl for GitCli {
    fn add_remote(&self, repo: &Path, name: &str, url: &str) -> StratumResult<()> {
        let (_, existing) = self.output(repo, ["remote", "get-url", name])?;
        if existing.status.success() {
            debug!(remote = name, "Remote already present");
            return Ok(());
        }
        self.run_git(repo, ["remote", "add", name, url]).map(drop)
    }

    #[instrument(skip(self, repo))]
    fn fetch(&self, repo: &Path, remote: &str, branch: &str) -> StratumResult<()> {
        self.run_git(repo, ["fetch", "--no-tags", remote, branch])
            .map(drop)
    }

    fn rev_parse(&self, repo: &Path, rev: &str) -> StratumResult<String> {
        let commit = format!("{rev}^{{commit}}");
        self.run_git(repo, ["rev-parse", "--verify", commit.as_str()])
    }

    fn merge_base(&self, repo: &Path, rev: &str) -> StratumResult<Option<String>> {
        let (command, output) = self.output(repo, ["merge-base", "HEAD", rev])?;
        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        match output.status.code() {
            Some(0) => Ok(Some(stdout)),
            // Exit 1 with no output: the histories share no commit.
            Some(1) if stdout.is_empty() && output.stderr.is_empty() => Ok(None),
            _ => Err(failure(command, &output).into()),
        }
    }

    fn commit_timestamp(&self, repo: &Path, commit: &str) -> StratumResult<i64> {
        let stdout = self.run_git(repo, ["show", "-s", "--format=%ct", commit])?;
        stdout.parse().map_err(|e| {
            ApplicationError::ExternalTool {
                tool: GIT.into(),
                command: format!("git show -s --format=%ct {commit}"),
                reason: format!("unexpected timestamp '{stdout}': {e}"),
            }
            .into()
        })
    }

    fn changed_files(&self, repo: &Path, base: &str) -> StratumResult<Vec<String>> {
        let stdout = self.run_git_raw(
            repo,
            ["diff", "--name-only", "-z", "-M", "--diff-filter=d", base, "HEAD"],
        )?;
        Ok(nul_fields(&stdout).map(String::from).collect())
    }

    fn removed_files(&self, repo: &Path, base: &str) -> StratumResult<Vec<(RemovalKind, String)>> {
        let stdout = self.run_git_raw(
            repo,
            ["diff", "--name-status", "-z", "-M", "--diff-filter=DR", base, "HEAD"],
        )?;
        Ok(parse_removals(&stdout))
    }

    fn init_and_commit(&self, dir: &Path, message: &str) -> StratumResult<()> {
        if dir.join(".git").exists() {
            debug!(dir = %dir.display(), "Already a repository; not committing");
            return Ok(());
        }
        self.run_git(dir, ["init", "--quiet"])?;
        self.run_git(dir, ["add", "--all"])?;
        self.run_git(dir, ["commit", "--quiet", "-m", message])
            .map(drop)
    }
}

/// Remote repositories reached through `git ls-remote` and `git clone`.
#[derive(Debug, Clone, Default)]
pub struct GitRepositoryHost {
    git: GitCli,
}

impl GitRepositoryHost {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RepositoryHost for GitRepositoryHost {
    #[instrument(skip(self))]
    fn exists(&self, url: &str, branch: Option<&str>) -> StratumResult<bool> {
        let reference = match branch {
            Some(branch) => format!("refs/heads/{branch}"),
            None => "HEAD".to_string(),
        };
        let git = self
            .git
            .clone()
            .with_env("GIT_TERMINAL_PROMPT", "0");
        let (_, output) = git.output(
            Path::new("."),
            ["ls-remote", "--exit-code", "--quiet", url, reference.as_str()],
        )?;
        Ok(output.status.success())
    }

    #[instrument(skip(self))]
    fn clone_into(&self, url: &str, branch: Option<&str>, dest: &Path) -> StratumResult<()> {
        let mut args: Vec<&OsStr> = ["clone", "--depth", "1"].map(OsStr::new).to_vec();
        if let Some(branch) = branch {
            args.push(OsStr::new("--branch"));
            args.push(OsStr::new(branch));
        }
        args.push(OsStr::new(url));
        args.push(dest.as_os_str());
        self.git.run_git(Path::new("."), args).map(drop)
    }
}
