//! Tenant identifiers and the request-scoped tenant context.
//!
//! A tenant is the isolation boundary (a realm on the identity backend) every
//! operation targets. Intents carry the tenant explicitly; the context exists
//! so inbound adapters can resolve it once per request and stamp it onto the
//! intents they build.

use std::fmt;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::catalog::TenantErrors;
use super::result::AdminResult;

/// Maximum accepted tenant identifier length.
pub const TENANT_ID_MAX: usize = 255;

/// Validation errors returned by [`TenantId::new`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TenantValidationError {
    /// The identifier was empty.
    #[error("tenant id must not be empty")]
    Empty,
    /// The identifier had leading or trailing whitespace.
    #[error("tenant id must not contain surrounding whitespace")]
    SurroundingWhitespace,
    /// The identifier exceeded [`TENANT_ID_MAX`] characters.
    #[error("tenant id must be at most {max} characters")]
    TooLong {
        /// Maximum accepted length.
        max: usize,
    },
    /// The identifier contained a character outside the accepted set.
    #[error("tenant id may only contain ASCII letters, digits, '-', '_' or '.'")]
    InvalidCharacters,
}

/// Validated tenant identifier.
///
/// # Examples
/// ```
/// use identity_admin::domain::TenantId;
///
/// let tenant = TenantId::new("acme-prod").expect("valid tenant");
/// assert_eq!(tenant.as_ref(), "acme-prod");
/// assert!(TenantId::new("acme prod").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TenantId(String);

impl TenantId {
    /// Validate and construct a [`TenantId`].
    pub fn new(id: impl Into<String>) -> Result<Self, TenantValidationError> {
        Self::from_owned(id.into())
    }

    fn from_owned(id: String) -> Result<Self, TenantValidationError> {
        if id.is_empty() {
            return Err(TenantValidationError::Empty);
        }
        if id.trim() != id {
            return Err(TenantValidationError::SurroundingWhitespace);
        }
        if id.chars().count() > TENANT_ID_MAX {
            return Err(TenantValidationError::TooLong { max: TENANT_ID_MAX });
        }
        if !id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        {
            return Err(TenantValidationError::InvalidCharacters);
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for TenantId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<TenantId> for String {
    fn from(value: TenantId) -> Self {
        value.0
    }
}

impl TryFrom<String> for TenantId {
    type Error = TenantValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Capability exposing the tenant of the current request scope.
///
/// The tenant may be set once per scope; the context does not own the scope's
/// lifecycle, callers create one context per inbound request.
pub trait TenantContext: Send + Sync {
    /// Tenant set for this scope.
    ///
    /// # Errors
    ///
    /// Returns [`TenantErrors::NOT_SET`] when no tenant has been set.
    fn tenant(&self) -> AdminResult<TenantId>;

    /// Set the tenant for this scope.
    ///
    /// # Errors
    ///
    /// Returns [`TenantErrors::ALREADY_SET`] when a tenant was set before.
    fn set_tenant(&self, tenant: TenantId) -> AdminResult<()>;
}

/// Set-once tenant context for a single request scope.
///
/// # Examples
/// ```
/// use identity_admin::domain::{RequestTenant, TenantContext, TenantId};
///
/// let context = RequestTenant::default();
/// context.set_tenant(TenantId::new("acme").unwrap()).unwrap();
/// assert_eq!(context.tenant().unwrap().as_ref(), "acme");
/// assert!(context.set_tenant(TenantId::new("other").unwrap()).is_err());
/// ```
#[derive(Debug, Default)]
pub struct RequestTenant {
    slot: OnceLock<TenantId>,
}

impl RequestTenant {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }
}

impl TenantContext for RequestTenant {
    fn tenant(&self) -> AdminResult<TenantId> {
        self.slot
            .get()
            .cloned()
            .ok_or_else(|| TenantErrors::NOT_SET.error())
    }

    fn set_tenant(&self, tenant: TenantId) -> AdminResult<()> {
        self.slot.set(tenant).map_err(|rejected| {
            let current = self.slot.get().map_or_else(String::new, ToString::to_string);
            TenantErrors::ALREADY_SET.with_detail(format!(
                "current tenant '{current}', rejected '{rejected}'"
            ))
        })
    }
}
