//! User handlers, including the multi-step provisioning workflow.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::application::commands::{
    CreateUserCommand, DeleteUserCommand, ResetPasswordCommand, UpdateUserCommand,
};
use crate::application::queries::{GetUserQuery, GetUsersQuery};
use crate::application::request::Handler;
use crate::domain::ports::{TokenRepository, UserRepository};
use crate::domain::{AdminResult, UserErrors, UserLookup, UserResponse};

/// Provisions a user in four dependent steps.
///
/// 1. Acquire a token for the tenant; a failure stops the workflow before any
///    user call. Adapters that cache tokens reuse it for the later steps.
/// 2. Create the user without credentials; a declined creation stops the
///    workflow with [`UserErrors::WRONG_PASSWORD_DEFINITION`] carrying the
///    backend's explanation.
/// 3. Read the user back by username to learn its server-assigned id. The
///    lookup is always by username, even when the username parses as a UUID.
/// 4. Reset the password on that id to the supplied plaintext.
///
/// Steps run strictly in order and nothing runs after a failed step. Side
/// effects already committed (a created user) are not rolled back.
pub struct CreateUserHandler {
    tokens: Arc<dyn TokenRepository>,
    users: Arc<dyn UserRepository>,
}

impl CreateUserHandler {
    /// Create a handler over the token and user ports.
    pub fn new(tokens: Arc<dyn TokenRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { tokens, users }
    }
}

#[async_trait]
impl Handler<CreateUserCommand> for CreateUserHandler {
    async fn handle(
        &self,
        command: CreateUserCommand,
        cancel: &CancellationToken,
    ) -> AdminResult<bool> {
        let CreateUserCommand { tenant, user } = command;

        let token = self.tokens.get_access_token(&tenant, cancel).await?;
        debug!(expires_at = %token.expires_at, "access token acquired");

        let creation = self.users.create(&tenant, &user, cancel).await?;
        if !creation.created {
            return Err(UserErrors::WRONG_PASSWORD_DEFINITION.with_detail(creation.detail));
        }

        let lookup = UserLookup::Username(user.username.clone());
        let created = self.users.get(&tenant, &lookup, cancel).await?;
        let Some(user_id) = created.id else {
            return Err(UserErrors::MISSING_IDENTIFIER.with_detail(user.username));
        };

        self.users
            .reset_password(&tenant, &user_id, &user.password, cancel)
            .await?;

        info!(%tenant, %user_id, "user provisioned");
        Ok(true)
    }
}

/// Fetches one user.
pub struct GetUserHandler {
    users: Arc<dyn UserRepository>,
}

impl GetUserHandler {
    /// Create a handler over the user port.
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl Handler<GetUserQuery> for GetUserHandler {
    async fn handle(
        &self,
        query: GetUserQuery,
        cancel: &CancellationToken,
    ) -> AdminResult<UserResponse> {
        self.users
            .get(&query.tenant, &query.lookup, cancel)
            .await
            .map(UserResponse::from)
    }
}

/// Lists users.
pub struct GetUsersHandler {
    users: Arc<dyn UserRepository>,
}

impl GetUsersHandler {
    /// Create a handler over the user port.
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl Handler<GetUsersQuery> for GetUsersHandler {
    async fn handle(
        &self,
        query: GetUsersQuery,
        cancel: &CancellationToken,
    ) -> AdminResult<Vec<UserResponse>> {
        let users = self.users.list(&query.tenant, &query.filter, cancel).await?;
        Ok(users.into_iter().map(UserResponse::from).collect())
    }
}

/// Applies partial user updates.
pub struct UpdateUserHandler {
    users: Arc<dyn UserRepository>,
}

impl UpdateUserHandler {
    /// Create a handler over the user port.
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl Handler<UpdateUserCommand> for UpdateUserHandler {
    async fn handle(
        &self,
        command: UpdateUserCommand,
        cancel: &CancellationToken,
    ) -> AdminResult<bool> {
        self.users
            .update(&command.tenant, &command.user_id, &command.update, cancel)
            .await
    }
}

/// Deletes users.
pub struct DeleteUserHandler {
    users: Arc<dyn UserRepository>,
}

impl DeleteUserHandler {
    /// Create a handler over the user port.
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl Handler<DeleteUserCommand> for DeleteUserHandler {
    async fn handle(
        &self,
        command: DeleteUserCommand,
        cancel: &CancellationToken,
    ) -> AdminResult<bool> {
        self.users
            .delete(&command.tenant, &command.user_id, cancel)
            .await
    }
}

/// Resets passwords.
pub struct ResetPasswordHandler {
    users: Arc<dyn UserRepository>,
}

impl ResetPasswordHandler {
    /// Create a handler over the user port.
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl Handler<ResetPasswordCommand> for ResetPasswordHandler {
    async fn handle(
        &self,
        command: ResetPasswordCommand,
        cancel: &CancellationToken,
    ) -> AdminResult<UserResponse> {
        self.users
            .reset_password(&command.tenant, &command.user_id, &command.password, cancel)
            .await
            .map(UserResponse::from)
    }
}
