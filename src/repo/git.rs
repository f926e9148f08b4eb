//! `git` command line collaborator used by the binary.
//!
//! HEAD is resolved synchronously; branches, tags and commit history load on
//! background threads that invoke the completion callback once finished, even
//! when the command failed (the view then shows an empty, loaded group).

use super::{Loadable, OnBranchesLoaded, OnTagsLoaded, RepoData};
use crate::model::{Branch, Commit, Head, Oid, RepoError, Tag};
use chrono::DateTime;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use tracing::{debug, info, warn};

/// Maximum number of commits read for one history.
pub const COMMIT_LIMIT: usize = 10_000;

const REF_FORMAT: &str = "--format=%(objectname)%09%(*objectname)%09%(refname:short)";
const LOG_FORMAT: &str = "--format=%H%x09%an%x09%aI%x09%s";

#[derive(Default)]
struct GitState {
    head: Option<Head>,
    branches: Loadable<Vec<Branch>>,
    tags: Loadable<Vec<Tag>>,
    commits: HashMap<Oid, Loadable<Vec<Commit>>>,
}

struct Shared {
    repo_path: PathBuf,
    state: Mutex<GitState>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, GitState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Repository data read through the `git` binary.
#[derive(Clone)]
pub struct GitCliRepo {
    shared: Arc<Shared>,
}

impl GitCliRepo {
    pub fn new(repo_path: impl Into<PathBuf>) -> Self {
        Self {
            shared: Arc::new(Shared {
                repo_path: repo_path.into(),
                state: Mutex::new(GitState::default()),
            }),
        }
    }

    pub fn repo_path(&self) -> &Path {
        &self.shared.repo_path
    }

    fn spawn<F>(&self, name: &str, job: F) -> Result<(), RepoError>
    where
        F: FnOnce(Arc<Shared>) + Send + 'static,
    {
        let shared = Arc::clone(&self.shared);
        thread::Builder::new()
            .name(format!("refscope-{name}"))
            .spawn(move || job(shared))?;
        Ok(())
    }
}

fn run_git(repo_path: &Path, args: &[&str]) -> Result<String, RepoError> {
    let output = Command::new("git")
        .arg("-C")
        .arg(repo_path)
        .args(args)
        .output()?;

    if !output.status.success() {
        return Err(RepoError::CommandFailed {
            command: format!("git {}", args.join(" ")),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Parse `for-each-ref` output produced with [`REF_FORMAT`].
///
/// Annotated tags report the peeled commit in the second column.
fn parse_refs(output: &str) -> Result<Vec<(String, Oid)>, RepoError> {
    output
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let mut fields = line.splitn(3, '\t');
            match (fields.next(), fields.next(), fields.next()) {
                (Some(object), Some(peeled), Some(name)) => {
                    let target = if peeled.is_empty() { object } else { peeled };
                    Ok((name.to_string(), Oid::new(target)?))
                }
                _ => Err(RepoError::MalformedOutput {
                    command: "git for-each-ref".into(),
                    line: line.to_string(),
                }),
            }
        })
        .collect()
}

/// Parse `git log` output produced with [`LOG_FORMAT`].
fn parse_log(output: &str) -> Result<Vec<Commit>, RepoError> {
    output
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let malformed = || RepoError::MalformedOutput {
                command: "git log".into(),
                line: line.to_string(),
            };
            let mut fields = line.splitn(4, '\t');
            let (Some(oid), Some(author), Some(when), Some(summary)) =
                (fields.next(), fields.next(), fields.next(), fields.next())
            else {
                return Err(malformed());
            };
            Ok(Commit {
                oid: Oid::new(oid)?,
                author_name: author.to_string(),
                author_when: DateTime::parse_from_rfc3339(when).map_err(|_| malformed())?,
                summary: summary.to_string(),
            })
        })
        .collect()
}

impl RepoData for GitCliRepo {
    fn load_head(&self) -> Result<Head, RepoError> {
        let path = self.repo_path();
        let oid = Oid::new(run_git(path, &["rev-parse", "HEAD"])?)?;

        // Exits non-zero when HEAD is detached.
        let head = match run_git(path, &["symbolic-ref", "--quiet", "--short", "HEAD"]) {
            Ok(name) => Head::on_branch(Branch::new(name.trim(), oid)),
            Err(RepoError::CommandFailed { .. }) => Head::detached(oid),
            Err(err) => return Err(err),
        };

        info!(head = %head.display_name(), "Resolved HEAD");
        self.shared.lock().head = Some(head.clone());
        Ok(head)
    }

    fn head(&self) -> Option<Head> {
        self.shared.lock().head.clone()
    }

    fn load_local_branches(&self, on_done: OnBranchesLoaded) -> Result<(), RepoError> {
        self.shared.lock().branches.loading = true;
        self.spawn("branches", move |shared| {
            let branches = run_git(&shared.repo_path, &["for-each-ref", REF_FORMAT, "refs/heads"])
                .and_then(|out| parse_refs(&out))
                .map(|refs| {
                    refs.into_iter()
                        .map(|(name, oid)| Branch::new(name, oid))
                        .collect::<Vec<_>>()
                })
                .unwrap_or_else(|err| {
                    warn!(error = %err, "Failed to list branches");
                    Vec::new()
                });
            debug!(count = branches.len(), "Branches loaded");
            shared.lock().branches = Loadable::loaded(branches.clone());
            on_done(&branches);
        })
    }

    fn load_local_tags(&self, on_done: OnTagsLoaded) -> Result<(), RepoError> {
        self.shared.lock().tags.loading = true;
        self.spawn("tags", move |shared| {
            let tags = run_git(&shared.repo_path, &["for-each-ref", REF_FORMAT, "refs/tags"])
                .and_then(|out| parse_refs(&out))
                .map(|refs| {
                    refs.into_iter()
                        .map(|(name, oid)| Tag::new(name, oid))
                        .collect::<Vec<_>>()
                })
                .unwrap_or_else(|err| {
                    warn!(error = %err, "Failed to list tags");
                    Vec::new()
                });
            debug!(count = tags.len(), "Tags loaded");
            shared.lock().tags = Loadable::loaded(tags.clone());
            on_done(&tags);
        })
    }

    fn local_branches(&self) -> Loadable<Vec<Branch>> {
        self.shared.lock().branches.clone()
    }

    fn local_tags(&self) -> Loadable<Vec<Tag>> {
        self.shared.lock().tags.clone()
    }

    fn load_commits(&self, oid: &Oid) -> Result<(), RepoError> {
        self.shared
            .lock()
            .commits
            .insert(oid.clone(), Loadable::loading(Vec::new()));

        let oid = oid.clone();
        self.spawn("commits", move |shared| {
            let limit = format!("--max-count={COMMIT_LIMIT}");
            let commits = run_git(&shared.repo_path, &["log", LOG_FORMAT, &limit, oid.as_str()])
                .and_then(|out| parse_log(&out))
                .unwrap_or_else(|err| {
                    warn!(error = %err, %oid, "Failed to read history");
                    Vec::new()
                });
            debug!(count = commits.len(), %oid, "History loaded");
            shared.lock().commits.insert(oid, Loadable::loaded(commits));
        })
    }

    fn commits(&self, oid: &Oid) -> Loadable<Vec<Commit>> {
        self.shared
            .lock()
            .commits
            .get(oid)
            .cloned()
            .unwrap_or_else(|| Loadable::loading(Vec::new()))
    }
}
