//! Group membership handlers.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::application::commands::{AddUserToGroupCommand, RemoveUserFromGroupCommand};
use crate::application::queries::GetGroupMembersQuery;
use crate::application::request::Handler;
use crate::domain::ports::GroupUsersRepository;
use crate::domain::{AdminResult, UserResponse};

/// Adds users to groups.
pub struct AddUserToGroupHandler {
    memberships: Arc<dyn GroupUsersRepository>,
}

impl AddUserToGroupHandler {
    /// Create a handler over the membership port.
    pub fn new(memberships: Arc<dyn GroupUsersRepository>) -> Self {
        Self { memberships }
    }
}

#[async_trait]
impl Handler<AddUserToGroupCommand> for AddUserToGroupHandler {
    async fn handle(
        &self,
        command: AddUserToGroupCommand,
        cancel: &CancellationToken,
    ) -> AdminResult<bool> {
        self.memberships
            .add_user_to_group(&command.tenant, &command.user_id, command.group_id, cancel)
            .await
    }
}

/// Removes users from groups.
pub struct RemoveUserFromGroupHandler {
    memberships: Arc<dyn GroupUsersRepository>,
}

impl RemoveUserFromGroupHandler {
    /// Create a handler over the membership port.
    pub fn new(memberships: Arc<dyn GroupUsersRepository>) -> Self {
        Self { memberships }
    }
}

#[async_trait]
impl Handler<RemoveUserFromGroupCommand> for RemoveUserFromGroupHandler {
    async fn handle(
        &self,
        command: RemoveUserFromGroupCommand,
        cancel: &CancellationToken,
    ) -> AdminResult<bool> {
        self.memberships
            .remove_user_from_group(&command.tenant, &command.user_id, command.group_id, cancel)
            .await
    }
}

/// Lists the direct members of a group.
pub struct GetGroupMembersHandler {
    memberships: Arc<dyn GroupUsersRepository>,
}

impl GetGroupMembersHandler {
    /// Create a handler over the membership port.
    pub fn new(memberships: Arc<dyn GroupUsersRepository>) -> Self {
        Self { memberships }
    }
}

#[async_trait]
impl Handler<GetGroupMembersQuery> for GetGroupMembersHandler {
    async fn handle(
        &self,
        query: GetGroupMembersQuery,
        cancel: &CancellationToken,
    ) -> AdminResult<Vec<UserResponse>> {
        let members = self
            .memberships
            .get_members(&query.tenant, query.group_id, cancel)
            .await?;
        Ok(members.into_iter().map(UserResponse::from).collect())
    }
}
