//! Repository data collaborator.
//!
//! The views never talk to git directly. They issue fire-and-forget load
//! requests through [`RepoData`] and read synchronous snapshots back:
//! - [`MemoryRepo`] keeps everything in memory (embedding, tests)
//! - [`GitCliRepo`] shells out to the `git` binary on background threads
//!
//! Implementations are internally synchronized; callers may share one
//! instance between views and threads.

use crate::model::{Branch, Commit, Head, Oid, RepoError, Tag};

pub mod git;
pub mod memory;

pub use git::GitCliRepo;
pub use memory::{Completion, MemoryRepo};

/// Invoked exactly once when local branches have loaded.
pub type OnBranchesLoaded = Box<dyn FnOnce(&[Branch]) + Send + 'static>;

/// Invoked exactly once when local tags have loaded.
pub type OnTagsLoaded = Box<dyn FnOnce(&[Tag]) + Send + 'static>;

/// Snapshot of a value that may still be loading.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Loadable<T> {
    pub value: T,
    pub loading: bool,
}

impl<T> Loadable<T> {
    pub fn loaded(value: T) -> Self {
        Self {
            value,
            loading: false,
        }
    }

    pub fn loading(value: T) -> Self {
        Self {
            value,
            loading: true,
        }
    }
}

/// Narrow interface the views consume.
///
/// Loads never time out and are never cancelled: once a `load_*` call
/// returns `Ok`, its callback (if any) eventually runs, possibly on another
/// thread and possibly before the call returns.
pub trait RepoData: Send + Sync {
    /// Resolve HEAD and the branch it is on, if any.
    fn load_head(&self) -> Result<Head, RepoError>;

    /// HEAD as of the last successful [`RepoData::load_head`].
    fn head(&self) -> Option<Head>;

    fn load_local_branches(&self, on_done: OnBranchesLoaded) -> Result<(), RepoError>;

    fn load_local_tags(&self, on_done: OnTagsLoaded) -> Result<(), RepoError>;

    fn local_branches(&self) -> Loadable<Vec<Branch>>;

    fn local_tags(&self) -> Loadable<Vec<Tag>>;

    /// Start loading the history reachable from `oid`.
    fn load_commits(&self, oid: &Oid) -> Result<(), RepoError>;

    /// History loaded so far for `oid`.
    fn commits(&self, oid: &Oid) -> Loadable<Vec<Commit>>;
}
