//! Domain-level error types.
//!
//! These errors are transport agnostic. Every handler failure is expressed as
//! an [`Error`] built from a [`CatalogEntry`]; inbound adapters decide how the
//! code and description are rendered to their callers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A pre-declared failure cause with a stable code and a fixed summary.
///
/// Entries are `const` values grouped per resource kind in
/// [`crate::domain::catalog`]. Building an error never mutates the entry, so
/// concurrent failures sharing one entry cannot observe each other's detail.
///
/// # Examples
/// ```
/// use identity_admin::domain::CatalogEntry;
///
/// const BROKEN: CatalogEntry = CatalogEntry::new("Example.Broken", "Something broke");
///
/// let err = BROKEN.with_detail("disk full");
/// assert_eq!(err.code(), "Example.Broken");
/// assert_eq!(err.description(), "Something broke: disk full");
/// assert_eq!(err.technical_detail(), Some("disk full"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CatalogEntry {
    code: &'static str,
    summary: &'static str,
}

impl CatalogEntry {
    /// Declare a catalog entry.
    pub const fn new(code: &'static str, summary: &'static str) -> Self {
        Self { code, summary }
    }

    /// Stable machine-readable code.
    pub const fn code(&self) -> &'static str {
        self.code
    }

    /// Fixed human-readable summary.
    pub const fn summary(&self) -> &'static str {
        self.summary
    }

    /// Build a fresh error carrying only the fixed summary.
    pub fn error(&self) -> Error {
        Error {
            code: self.code.to_owned(),
            description: self.summary.to_owned(),
            technical_detail: None,
        }
    }

    /// Build a fresh error whose description embeds a runtime detail.
    ///
    /// The description is `"{summary}: {detail}"`. A blank detail yields the
    /// same value as [`CatalogEntry::error`].
    pub fn with_detail(&self, detail: impl Into<String>) -> Error {
        let detail = detail.into();
        if detail.trim().is_empty() {
            return self.error();
        }
        Error {
            code: self.code.to_owned(),
            description: format!("{}: {detail}", self.summary),
            technical_detail: Some(detail),
        }
    }

    /// Whether `error` was built from this entry.
    pub fn matches(&self, error: &Error) -> bool {
        error.code == self.code
    }
}

/// Failure payload shared by every port, handler and adapter.
///
/// ## Invariants
/// - `code` is the code of the [`CatalogEntry`] the error was built from.
/// - `description` starts with that entry's summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Error {
    code: String,
    description: String,
    #[serde(skip)]
    technical_detail: Option<String>,
}

impl Error {
    /// Stable machine-readable error code.
    pub fn code(&self) -> &str {
        self.code.as_str()
    }

    /// Human-readable description returned to adapters.
    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Runtime detail supplied when the error was built, if any.
    pub fn technical_detail(&self) -> Option<&str> {
        self.technical_detail.as_deref()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.description)
    }
}

impl std::error::Error for Error {}
