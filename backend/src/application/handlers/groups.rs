//! Group handlers.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::application::commands::{CreateGroupCommand, DeleteGroupCommand};
use crate::application::queries::{GetAllGroupsQuery, GetGroupQuery};
use crate::application::request::Handler;
use crate::domain::ports::GroupRepository;
use crate::domain::{AdminResult, GroupResponse};

/// Lists every group of a tenant.
pub struct GetAllGroupsHandler {
    groups: Arc<dyn GroupRepository>,
}

impl GetAllGroupsHandler {
    /// Create a handler over the group port.
    pub fn new(groups: Arc<dyn GroupRepository>) -> Self {
        Self { groups }
    }
}

#[async_trait]
impl Handler<GetAllGroupsQuery> for GetAllGroupsHandler {
    async fn handle(
        &self,
        query: GetAllGroupsQuery,
        cancel: &CancellationToken,
    ) -> AdminResult<Vec<GroupResponse>> {
        let groups = self.groups.get_all(&query.tenant, cancel).await?;
        Ok(groups.into_iter().map(GroupResponse::from).collect())
    }
}

/// Fetches one group.
pub struct GetGroupHandler {
    groups: Arc<dyn GroupRepository>,
}

impl GetGroupHandler {
    /// Create a handler over the group port.
    pub fn new(groups: Arc<dyn GroupRepository>) -> Self {
        Self { groups }
    }
}

#[async_trait]
impl Handler<GetGroupQuery> for GetGroupHandler {
    async fn handle(
        &self,
        query: GetGroupQuery,
        cancel: &CancellationToken,
    ) -> AdminResult<GroupResponse> {
        self.groups
            .get_by_id(&query.tenant, query.id, cancel)
            .await
            .map(GroupResponse::from)
    }
}

/// Creates top-level groups.
pub struct CreateGroupHandler {
    groups: Arc<dyn GroupRepository>,
}

impl CreateGroupHandler {
    /// Create a handler over the group port.
    pub fn new(groups: Arc<dyn GroupRepository>) -> Self {
        Self { groups }
    }
}

#[async_trait]
impl Handler<CreateGroupCommand> for CreateGroupHandler {
    async fn handle(
        &self,
        command: CreateGroupCommand,
        cancel: &CancellationToken,
    ) -> AdminResult<bool> {
        self.groups
            .create(&command.tenant, &command.group, cancel)
            .await
    }
}

/// Deletes groups.
pub struct DeleteGroupHandler {
    groups: Arc<dyn GroupRepository>,
}

impl DeleteGroupHandler {
    /// Create a handler over the group port.
    pub fn new(groups: Arc<dyn GroupRepository>) -> Self {
        Self { groups }
    }
}

#[async_trait]
impl Handler<DeleteGroupCommand> for DeleteGroupHandler {
    async fn handle(
        &self,
        command: DeleteGroupCommand,
        cancel: &CancellationToken,
    ) -> AdminResult<bool> {
        self.groups.delete(&command.tenant, command.id, cancel).await
    }
}
