//! In-memory repository collaborator.
//!
//! Serves a fixed set of refs and commits. Completion callbacks either run
//! inline ([`Completion::Immediate`]) or are parked until the owner releases
//! them ([`Completion::Deferred`]), which lets callers exercise the
//! loading-placeholder states and drive completions from another thread.

use super::{Loadable, OnBranchesLoaded, OnTagsLoaded, RepoData};
use crate::model::{Branch, Commit, Head, Oid, RepoError, Tag};
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

/// When load callbacks run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Completion {
    /// Callback runs before `load_*` returns.
    #[default]
    Immediate,
    /// Callback runs when `complete_*` is called.
    Deferred,
}

/// Which load requests should fail.
#[derive(Debug, Clone, Copy, Default)]
struct Failures {
    head: bool,
    branches: bool,
    tags: bool,
    commits: bool,
}

#[derive(Default)]
struct MemoryState {
    head_loaded: bool,
    branches_loaded: bool,
    tags_loaded: bool,
    pending_branches: Option<OnBranchesLoaded>,
    pending_tags: Option<OnTagsLoaded>,
    loaded_commits: HashSet<Oid>,
    commit_requests: Vec<Oid>,
}

/// Repository data held entirely in memory.
pub struct MemoryRepo {
    head: Head,
    branches: Vec<Branch>,
    tags: Vec<Tag>,
    commits: HashMap<Oid, Vec<Commit>>,
    completion: Completion,
    failures: Failures,
    state: Mutex<MemoryState>,
}

impl MemoryRepo {
    pub fn new(head: Head) -> Self {
        Self {
            head,
            branches: Vec::new(),
            tags: Vec::new(),
            commits: HashMap::new(),
            completion: Completion::Immediate,
            failures: Failures::default(),
            state: Mutex::new(MemoryState::default()),
        }
    }

    pub fn with_branches(mut self, branches: Vec<Branch>) -> Self {
        self.branches = branches;
        self
    }

    pub fn with_tags(mut self, tags: Vec<Tag>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_commits(mut self, oid: Oid, commits: Vec<Commit>) -> Self {
        self.commits.insert(oid, commits);
        self
    }

    pub fn with_completion(mut self, completion: Completion) -> Self {
        self.completion = completion;
        self
    }

    pub fn failing_head(mut self) -> Self {
        self.failures.head = true;
        self
    }

    pub fn failing_branches(mut self) -> Self {
        self.failures.branches = true;
        self
    }

    pub fn failing_tags(mut self) -> Self {
        self.failures.tags = true;
        self
    }

    pub fn failing_commits(mut self) -> Self {
        self.failures.commits = true;
        self
    }

    /// Release a parked branches callback. Returns `false` if none was parked.
    pub fn complete_branches(&self) -> bool {
        let callback = {
            let mut state = self.lock();
            let Some(callback) = state.pending_branches.take() else {
                return false;
            };
            state.branches_loaded = true;
            callback
        };
        callback(&self.branches);
        true
    }

    /// Release a parked tags callback. Returns `false` if none was parked.
    pub fn complete_tags(&self) -> bool {
        let callback = {
            let mut state = self.lock();
            let Some(callback) = state.pending_tags.take() else {
                return false;
            };
            state.tags_loaded = true;
            callback
        };
        callback(&self.tags);
        true
    }

    /// Mark a deferred commit load as finished.
    pub fn complete_commits(&self, oid: &Oid) {
        self.lock().loaded_commits.insert(oid.clone());
    }

    /// How many times history for `oid` was requested.
    pub fn commit_load_count(&self, oid: &Oid) -> usize {
        self.lock()
            .commit_requests
            .iter()
            .filter(|requested| *requested == oid)
            .count()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl RepoData for MemoryRepo {
    fn load_head(&self) -> Result<Head, RepoError> {
        if self.failures.head {
            return Err(RepoError::Unavailable("HEAD could not be resolved".into()));
        }
        self.lock().head_loaded = true;
        Ok(self.head.clone())
    }

    fn head(&self) -> Option<Head> {
        self.lock().head_loaded.then(|| self.head.clone())
    }

    fn load_local_branches(&self, on_done: OnBranchesLoaded) -> Result<(), RepoError> {
        if self.failures.branches {
            return Err(RepoError::Unavailable("branches could not be listed".into()));
        }
        debug!(completion = ?self.completion, "Loading in-memory branches");
        match self.completion {
            Completion::Immediate => {
                self.lock().branches_loaded = true;
                on_done(&self.branches);
            }
            Completion::Deferred => self.lock().pending_branches = Some(on_done),
        }
        Ok(())
    }

    fn load_local_tags(&self, on_done: OnTagsLoaded) -> Result<(), RepoError> {
        if self.failures.tags {
            return Err(RepoError::Unavailable("tags could not be listed".into()));
        }
        debug!(completion = ?self.completion, "Loading in-memory tags");
        match self.completion {
            Completion::Immediate => {
                self.lock().tags_loaded = true;
                on_done(&self.tags);
            }
            Completion::Deferred => self.lock().pending_tags = Some(on_done),
        }
        Ok(())
    }

    fn local_branches(&self) -> Loadable<Vec<Branch>> {
        if self.lock().branches_loaded {
            Loadable::loaded(self.branches.clone())
        } else {
            Loadable::loading(Vec::new())
        }
    }

    fn local_tags(&self) -> Loadable<Vec<Tag>> {
        if self.lock().tags_loaded {
            Loadable::loaded(self.tags.clone())
        } else {
            Loadable::loading(Vec::new())
        }
    }

    fn load_commits(&self, oid: &Oid) -> Result<(), RepoError> {
        if self.failures.commits {
            return Err(RepoError::Unavailable(format!(
                "history for {oid} could not be read"
            )));
        }
        let mut state = self.lock();
        state.commit_requests.push(oid.clone());
        if self.completion == Completion::Immediate {
            state.loaded_commits.insert(oid.clone());
        }
        Ok(())
    }

    fn commits(&self, oid: &Oid) -> Loadable<Vec<Commit>> {
        if self.lock().loaded_commits.contains(oid) {
            Loadable::loaded(self.commits.get(oid).cloned().unwrap_or_default())
        } else {
            Loadable::loading(Vec::new())
        }
    }
}
