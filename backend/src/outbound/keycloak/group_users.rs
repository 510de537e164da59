//! Membership port over `users/{id}/groups` and `groups/{id}/members`.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use super::client::{AdminCall, KeycloakClient};
use super::error::ErrorMap;
use crate::domain::ports::GroupUsersRepository;
use crate::domain::{AdminResult, GroupErrors, MembershipErrors, TenantId, User, UserId};

const ADD: ErrorMap = ErrorMap::new(MembershipErrors::ADD);
const REMOVE: ErrorMap = ErrorMap::new(MembershipErrors::REMOVE);
const MEMBERS: ErrorMap =
    ErrorMap::new(MembershipErrors::RETRIEVAL).with_not_found(GroupErrors::NOT_FOUND);

/// Group memberships of one Keycloak deployment.
pub struct KeycloakGroupUsersRepository {
    client: Arc<KeycloakClient>,
}

impl KeycloakGroupUsersRepository {
    /// Create the repository over a shared client.
    pub fn new(client: Arc<KeycloakClient>) -> Self {
        Self { client }
    }

    async fn change_membership(
        &self,
        method: Method,
        tenant: &TenantId,
        user_id: &UserId,
        group_id: Uuid,
        cancel: &CancellationToken,
        errors: ErrorMap,
    ) -> AdminResult<bool> {
        let call = AdminCall::new(method, tenant, membership_path(user_id, group_id));
        let reply = self.client.admin(call, cancel, errors).await?;
        reply.into_success().map_err(|error| errors.map(error))?;
        Ok(true)
    }
}

fn membership_path(user_id: &UserId, group_id: Uuid) -> [String; 4] {
    [
        "users".to_owned(),
        user_id.to_string(),
        "groups".to_owned(),
        group_id.to_string(),
    ]
}

#[async_trait]
impl GroupUsersRepository for KeycloakGroupUsersRepository {
    async fn add_user_to_group(
        &self,
        tenant: &TenantId,
        user_id: &UserId,
        group_id: Uuid,
        cancel: &CancellationToken,
    ) -> AdminResult<bool> {
        self.change_membership(Method::PUT, tenant, user_id, group_id, cancel, ADD)
            .await
    }

    async fn remove_user_from_group(
        &self,
        tenant: &TenantId,
        user_id: &UserId,
        group_id: Uuid,
        cancel: &CancellationToken,
    ) -> AdminResult<bool> {
        self.change_membership(Method::DELETE, tenant, user_id, group_id, cancel, REMOVE)
            .await
    }

    async fn get_members(
        &self,
        tenant: &TenantId,
        group_id: Uuid,
        cancel: &CancellationToken,
    ) -> AdminResult<Vec<User>> {
        let call = AdminCall::new(
            Method::GET,
            tenant,
            ["groups".to_owned(), group_id.to_string(), "members".to_owned()],
        );
        let reply = self.client.admin(call, cancel, MEMBERS).await?;
        let reply = reply.into_success().map_err(|error| MEMBERS.map(error))?;
        reply.json().map_err(|error| MEMBERS.map(error))
    }
}
