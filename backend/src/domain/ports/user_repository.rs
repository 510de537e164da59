//! Driven port for user operations against the identity backend.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::domain::{
    AdminResult, NewUser, Password, TenantId, User, UserFilter, UserId, UserLookup, UserUpdate,
};

/// Outcome of a user creation request.
///
/// The backend may decline a well-formed request (duplicate username,
/// rejected attribute); that is reported as `created == false` with the
/// backend's explanation rather than as a port failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserCreation {
    /// Whether the backend created the user.
    pub created: bool,
    /// Backend message accompanying the outcome.
    pub detail: String,
}

impl UserCreation {
    /// A successful creation.
    pub fn created(detail: impl Into<String>) -> Self {
        Self {
            created: true,
            detail: detail.into(),
        }
    }

    /// A declined creation.
    pub fn declined(detail: impl Into<String>) -> Self {
        Self {
            created: false,
            detail: detail.into(),
        }
    }
}

/// User capability set. Each call is one remote operation with no retry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a user without credentials.
    async fn create(
        &self,
        tenant: &TenantId,
        user: &NewUser,
        cancel: &CancellationToken,
    ) -> AdminResult<UserCreation>;

    /// Fetch one user by exact username or by identifier.
    async fn get(
        &self,
        tenant: &TenantId,
        lookup: &UserLookup,
        cancel: &CancellationToken,
    ) -> AdminResult<User>;

    /// List users within a paging window.
    async fn list(
        &self,
        tenant: &TenantId,
        filter: &UserFilter,
        cancel: &CancellationToken,
    ) -> AdminResult<Vec<User>>;

    /// Replace the user's password and return the user afterwards.
    async fn reset_password(
        &self,
        tenant: &TenantId,
        user_id: &UserId,
        password: &Password,
        cancel: &CancellationToken,
    ) -> AdminResult<User>;

    /// Apply a partial update.
    async fn update(
        &self,
        tenant: &TenantId,
        user_id: &UserId,
        update: &UserUpdate,
        cancel: &CancellationToken,
    ) -> AdminResult<bool>;

    /// Delete the user.
    async fn delete(
        &self,
        tenant: &TenantId,
        user_id: &UserId,
        cancel: &CancellationToken,
    ) -> AdminResult<bool>;
}
