//! References and commits as seen by the views.

use super::identifiers::Oid;
use chrono::{DateTime, FixedOffset};

/// A local branch and the commit it points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    pub name: String,
    pub oid: Oid,
}

impl Branch {
    pub fn new(name: impl Into<String>, oid: Oid) -> Self {
        Self {
            name: name.into(),
            oid,
        }
    }
}

/// A local tag and the object it points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    pub oid: Oid,
}

impl Tag {
    pub fn new(name: impl Into<String>, oid: Oid) -> Self {
        Self {
            name: name.into(),
            oid,
        }
    }
}

/// The currently checked out commit.
///
/// `branch` is `None` when HEAD is detached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Head {
    pub oid: Oid,
    pub branch: Option<Branch>,
}

impl Head {
    pub fn on_branch(branch: Branch) -> Self {
        Self {
            oid: branch.oid.clone(),
            branch: Some(branch),
        }
    }

    pub fn detached(oid: Oid) -> Self {
        Self { oid, branch: None }
    }

    pub fn is_detached(&self) -> bool {
        self.branch.is_none()
    }

    /// Name shown for HEAD: the branch name, or the detached description.
    pub fn display_name(&self) -> String {
        match &self.branch {
            Some(branch) => branch.name.clone(),
            None => detached_head_display_value(&self.oid),
        }
    }
}

/// `HEAD detached at abcdef1`
pub fn detached_head_display_value(oid: &Oid) -> String {
    format!("HEAD detached at {}", oid.short())
}

/// One entry of a commit history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub oid: Oid,
    pub author_name: String,
    pub author_when: DateTime<FixedOffset>,
    pub summary: String,
}
