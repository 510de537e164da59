//! Driven port for group membership.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::domain::{AdminResult, TenantId, User, UserId};

/// Group-membership capability set, keyed by user id and group id.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GroupUsersRepository: Send + Sync {
    /// Add the user to the group.
    async fn add_user_to_group(
        &self,
        tenant: &TenantId,
        user_id: &UserId,
        group_id: Uuid,
        cancel: &CancellationToken,
    ) -> AdminResult<bool>;

    /// Remove the user from the group.
    async fn remove_user_from_group(
        &self,
        tenant: &TenantId,
        user_id: &UserId,
        group_id: Uuid,
        cancel: &CancellationToken,
    ) -> AdminResult<bool>;

    /// List the direct members of the group.
    async fn get_members(
        &self,
        tenant: &TenantId,
        group_id: Uuid,
        cancel: &CancellationToken,
    ) -> AdminResult<Vec<User>>;
}
