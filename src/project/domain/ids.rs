//! Identifier and validated scalar types for the project domain.

use super::ProjectDomainError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a production project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(Uuid);

impl ProjectId {
    /// Creates a new random project identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a project identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for ProjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for one snapshot line within a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineId(Uuid);

impl LineId {
    /// Creates a new random line identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a line identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for LineId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Human-readable, date-scoped sequential project identifier.
///
/// Formatted as `PREFIX-YYYY-MM-DD-NNN` where `NNN` is a three-digit,
/// zero-padded sequence within the calendar day. Assigned exactly once, on
/// the transition to active.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectNumber(String);

impl ProjectNumber {
    /// Prefix used when no custom prefix is configured.
    pub const DEFAULT_PREFIX: &'static str = "PRJ";

    /// Composes a project number from its parts.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectDomainError::EmptyNumberPrefix`] when the prefix is
    /// empty after trimming, or [`ProjectDomainError::InvalidSequence`] when
    /// the sequence is zero.
    pub fn compose(
        prefix: &str,
        day: NaiveDate,
        sequence: u32,
    ) -> Result<Self, ProjectDomainError> {
        if prefix.trim().is_empty() {
            return Err(ProjectDomainError::EmptyNumberPrefix);
        }
        if sequence == 0 {
            return Err(ProjectDomainError::InvalidSequence(sequence));
        }
        Ok(Self(format!("{prefix}-{day}-{sequence:03}")))
    }

    /// Returns the number as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ProjectNumber {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ProjectNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
