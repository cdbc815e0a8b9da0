//! Read-only git interface used for scaffolding draft records.
//!
//! The version-control system is an opaque command interface here: commit
//! metadata flows in, nothing flows back out. [`CommitLog`] is the seam:
//! scaffolding is written against the trait so tests can substitute a
//! stub, and [`GitLog`] is the production implementation that shells out
//! to `git` in an explicit repository root.

use std::path::PathBuf;
use std::process::Command;

use tracing::warn;

use crate::error::{PrdocError, Result};

/// One commit as reported by the commit log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub hash: String,
    pub subject: String,
    pub body: String,
}

/// Read-only commit metadata source.
///
/// A failed query degrades to "no data" (`None` / empty) rather than a
/// crash; only an interface that cannot be invoked at all is an error.
pub trait CommitLog {
    /// Most recent release tag reachable from HEAD, if any.
    fn latest_tag(&self) -> Result<Option<String>>;

    /// Commits after `since` up to HEAD, in log order (newest first).
    fn commits_since(&self, since: &str) -> Result<Vec<Commit>>;

    /// Root-relative paths touched by one commit.
    fn changed_files(&self, hash: &str) -> Result<Vec<String>>;
}

/// [`CommitLog`] implementation backed by the `git` binary.
pub struct GitLog {
    root: PathBuf,
}

impl GitLog {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Run one git query. Spawn failures are terminal; a non-zero exit is
    /// "no data" and logged, since scaffolding runs against arbitrary
    /// revisions the caller may have mistyped.
    fn query(&self, args: &[&str]) -> Result<Option<String>> {
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.root)
            .output()
            .map_err(|e| PrdocError::Git(format!("failed to run git: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!(args = ?args, stderr = %stderr.trim(), "git query failed");
            return Ok(None);
        }

        Ok(Some(String::from_utf8_lossy(&output.stdout).into_owned()))
    }
}

impl CommitLog for GitLog {
    fn latest_tag(&self) -> Result<Option<String>> {
        let output = self.query(&["describe", "--tags", "--abbrev=0"])?;
        Ok(output
            .map(|out| out.trim().to_string())
            .filter(|tag| !tag.is_empty()))
    }

    fn commits_since(&self, since: &str) -> Result<Vec<Commit>> {
        let range = format!("{since}..HEAD");
        let output = self.query(&[
            "log",
            &range,
            "--pretty=format:%H%x09%s%x09%b%x00",
        ])?;
        Ok(output.map(|out| parse_commits(&out)).unwrap_or_default())
    }

    fn changed_files(&self, hash: &str) -> Result<Vec<String>> {
        let output = self.query(&["show", "--name-only", "--pretty=format:", hash])?;
        Ok(output
            .map(|out| {
                out.lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default())
    }
}

/// Parse `%H%x09%s%x09%b%x00`-formatted log output.
fn parse_commits(output: &str) -> Vec<Commit> {
    let mut commits = Vec::new();
    for chunk in output.split('\0') {
        let chunk = chunk.trim();
        if chunk.is_empty() {
            continue;
        }
        let mut parts = chunk.splitn(3, '\t');
        let Some(hash) = parts.next() else { continue };
        let Some(subject) = parts.next() else { continue };
        let body = parts.next().unwrap_or_default();
        commits.push(Commit {
            hash: hash.to_string(),
            subject: subject.to_string(),
            body: body.trim().to_string(),
        });
    }
    commits
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::process::Command as StdCommand;

    fn run_git(repo_dir: &Path, args: &[&str]) {
        let output = StdCommand::new("git")
            .args(args)
            .current_dir(repo_dir)
            .output()
            .unwrap();
        assert!(
            output.status.success(),
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
    }

    fn make_git_repo() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        run_git(dir.path(), &["init"]);
        run_git(dir.path(), &["config", "user.name", "test-user"]);
        run_git(dir.path(), &["config", "user.email", "test@example.com"]);
        run_git(dir.path(), &["commit", "--allow-empty", "-m", "initial"]);
        dir
    }

    fn commit_file(repo: &Path, rel_path: &str, message: &str) {
        let path = repo.join(rel_path);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "contents\n").unwrap();
        run_git(repo, &["add", "."]);
        run_git(repo, &["commit", "-m", message]);
    }

    #[test]
    fn test_latest_tag_absent_then_present() {
        let repo = make_git_repo();
        let log = GitLog::new(repo.path());
        assert_eq!(log.latest_tag().unwrap(), None);

        run_git(repo.path(), &["tag", "v0.1.0"]);
        assert_eq!(log.latest_tag().unwrap(), Some("v0.1.0".to_string()));
    }

    #[test]
    fn test_commits_since_tag_with_subject_and_files() {
        let repo = make_git_repo();
        run_git(repo.path(), &["tag", "v0.1.0"]);
        commit_file(repo.path(), "crates/alpha/src/lib.rs", "Add alpha module");

        let log = GitLog::new(repo.path());
        let commits = log.commits_since("v0.1.0").unwrap();
        assert_eq!(commits.len(), 1);
        assert_eq!(commits[0].subject, "Add alpha module");
        assert_eq!(commits[0].hash.len(), 40);

        let files = log.changed_files(&commits[0].hash).unwrap();
        assert_eq!(files, vec!["crates/alpha/src/lib.rs".to_string()]);
    }

    #[test]
    fn test_unknown_revision_is_no_data() {
        let repo = make_git_repo();
        let log = GitLog::new(repo.path());
        let commits = log.commits_since("no-such-tag").unwrap();
        assert!(commits.is_empty());
    }

    #[test]
    fn test_parse_commits_with_multiline_body() {
        let raw = "aaaa\tSubject one\tline one\nline two\n\0bbbb\tSubject two\t\0";
        let commits = parse_commits(raw);
        assert_eq!(commits.len(), 2);
        assert_eq!(commits[0].hash, "aaaa");
        assert_eq!(commits[0].body, "line one\nline two");
        assert_eq!(commits[1].subject, "Subject two");
        assert_eq!(commits[1].body, "");
    }
}
