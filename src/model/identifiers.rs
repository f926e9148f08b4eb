//! Object identifier newtype with a smart constructor.
//!
//! An [`Oid`] is the content-derived identity of a branch tip, tag target or
//! commit. Two refs pointing at the same object compare equal regardless of
//! where they were loaded from, which is what the per-identity viewport cache
//! keys on.

use std::fmt;

/// Length of the abbreviated object id shown to users.
pub const SHORT_OID_LEN: usize = 7;

/// Git object identifier (lowercase hex).
/// NEVER export the constructor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Oid(String);

impl Oid {
    /// Smart constructor: validates a hex object id of at least
    /// [`SHORT_OID_LEN`] digits. Input is normalised to lowercase.
    pub fn new(raw: impl Into<String>) -> Result<Self, InvalidOid> {
        let raw = raw.into();
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            return Err(InvalidOid::Empty);
        }
        if let Some(bad) = trimmed.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(InvalidOid::NotHex {
                value: trimmed.to_string(),
                character: bad,
            });
        }
        if trimmed.len() < SHORT_OID_LEN {
            return Err(InvalidOid::TooShort {
                value: trimmed.to_string(),
            });
        }

        Ok(Self(trimmed.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Abbreviated form, e.g. `abcdef1`.
    pub fn short(&self) -> &str {
        &self.0[..SHORT_OID_LEN]
    }
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ===== Error Types =====

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidOid {
    #[error("Object id cannot be empty")]
    Empty,
    #[error("Object id {value:?} contains non-hex character {character:?}")]
    NotHex { value: String, character: char },
    #[error("Object id {value:?} is shorter than {SHORT_OID_LEN} characters")]
    TooShort { value: String },
}

// ===== Tests =====
