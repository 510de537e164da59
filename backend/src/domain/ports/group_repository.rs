//! Driven port for group operations.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::domain::{AdminResult, Group, NewGroup, TenantId};

/// Group capability set.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GroupRepository: Send + Sync {
    /// List every top-level group with its children.
    async fn get_all(&self, tenant: &TenantId, cancel: &CancellationToken)
    -> AdminResult<Vec<Group>>;

    /// Fetch one group.
    async fn get_by_id(
        &self,
        tenant: &TenantId,
        group_id: Uuid,
        cancel: &CancellationToken,
    ) -> AdminResult<Group>;

    /// Create a top-level group.
    async fn create(
        &self,
        tenant: &TenantId,
        group: &NewGroup,
        cancel: &CancellationToken,
    ) -> AdminResult<bool>;

    /// Delete a group and its children.
    async fn delete(
        &self,
        tenant: &TenantId,
        group_id: Uuid,
        cancel: &CancellationToken,
    ) -> AdminResult<bool>;
}
