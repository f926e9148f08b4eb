//! Domain model types (pure).
//!
//! All types in this module are pure data with smart constructors.

pub mod action;
pub mod error;
pub mod identifiers;
pub mod refs;

// Re-export for convenience
pub use action::Action;
pub use error::{AppError, RepoError, ViewError};
pub use identifiers::{InvalidOid, Oid, SHORT_OID_LEN};
pub use refs::{detached_head_display_value, Branch, Commit, Head, Tag};
