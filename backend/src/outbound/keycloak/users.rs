//! User port over the admin `users` resource.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::client::{AdminCall, KeycloakClient};
use super::dto::CredentialDto;
use super::error::ErrorMap;
use crate::domain::ports::{UserCreation, UserRepository};
use crate::domain::{
    AdminResult, NewUser, Password, TenantId, User, UserErrors, UserFilter, UserId, UserLookup,
    UserUpdate,
};

const CREATE: ErrorMap = ErrorMap::new(UserErrors::CREATION);
const RETRIEVE: ErrorMap = ErrorMap::new(UserErrors::RETRIEVAL).with_not_found(UserErrors::NOT_FOUND);
const RESET: ErrorMap =
    ErrorMap::new(UserErrors::PASSWORD_RESET).with_not_found(UserErrors::NOT_FOUND);
const UPDATE: ErrorMap = ErrorMap::new(UserErrors::UPDATE).with_not_found(UserErrors::NOT_FOUND);
const DELETE: ErrorMap = ErrorMap::new(UserErrors::DELETION).with_not_found(UserErrors::NOT_FOUND);

/// Users of one Keycloak deployment.
pub struct KeycloakUserRepository {
    client: Arc<KeycloakClient>,
}

impl KeycloakUserRepository {
    /// Create the repository over a shared client.
    pub fn new(client: Arc<KeycloakClient>) -> Self {
        Self { client }
    }

    async fn get_by_id(
        &self,
        tenant: &TenantId,
        user_id: &UserId,
        cancel: &CancellationToken,
    ) -> AdminResult<User> {
        let call = lookup_call(tenant, &UserLookup::Id(user_id.clone()));
        let reply = self.client.admin(call, cancel, RETRIEVE).await?;
        let reply = reply.into_success().map_err(|error| RETRIEVE.map(error))?;
        reply.json().map_err(|error| RETRIEVE.map(error))
    }

    async fn get_by_username(
        &self,
        tenant: &TenantId,
        username: &str,
        cancel: &CancellationToken,
    ) -> AdminResult<User> {
        let call = lookup_call(tenant, &UserLookup::Username(username.to_owned()));
        let reply = self.client.admin(call, cancel, RETRIEVE).await?;
        let reply = reply.into_success().map_err(|error| RETRIEVE.map(error))?;
        let matches: Vec<User> = reply.json().map_err(|error| RETRIEVE.map(error))?;
        select_exact(matches, username)
    }
}

/// Request locating one user: the `users/{id}` resource for ids, an exact
/// username search otherwise.
fn lookup_call<'a>(tenant: &'a TenantId, lookup: &UserLookup) -> AdminCall<'a> {
    match lookup {
        UserLookup::Id(user_id) => {
            AdminCall::new(Method::GET, tenant, ["users", user_id.as_ref()])
        }
        UserLookup::Username(username) => AdminCall::new(Method::GET, tenant, ["users"])
            .query("username", username)
            .query("exact", true),
    }
}

/// Pick the account whose username matches exactly.
///
/// Keycloak lowercases usernames, so the comparison ignores ASCII case.
fn select_exact(matches: Vec<User>, username: &str) -> AdminResult<User> {
    matches
        .into_iter()
        .find(|user| user.username.eq_ignore_ascii_case(username))
        .ok_or_else(|| UserErrors::NOT_FOUND.with_detail(username))
}

#[async_trait]
impl UserRepository for KeycloakUserRepository {
    async fn create(
        &self,
        tenant: &TenantId,
        user: &NewUser,
        cancel: &CancellationToken,
    ) -> AdminResult<UserCreation> {
        let call = AdminCall::new(Method::POST, tenant, ["users"])
            .json(&user.to_representation())
            .map_err(|error| CREATE.map(error))?;
        let reply = self.client.admin(call, cancel, CREATE).await?;
        if reply.status.is_success() {
            debug!(%tenant, location = ?reply.location, "user created");
            return Ok(UserCreation::created(
                reply.location.unwrap_or_else(|| user.username.clone()),
            ));
        }
        if reply.status.is_client_error() {
            return Ok(UserCreation::declined(reply.message()));
        }
        Err(CREATE.map(reply.into_status_error()))
    }

    async fn get(
        &self,
        tenant: &TenantId,
        lookup: &UserLookup,
        cancel: &CancellationToken,
    ) -> AdminResult<User> {
        match lookup {
            UserLookup::Id(user_id) => self.get_by_id(tenant, user_id, cancel).await,
            UserLookup::Username(username) => self.get_by_username(tenant, username, cancel).await,
        }
    }

    async fn list(
        &self,
        tenant: &TenantId,
        filter: &UserFilter,
        cancel: &CancellationToken,
    ) -> AdminResult<Vec<User>> {
        let mut call = AdminCall::new(Method::GET, tenant, ["users"])
            .query("first", filter.first)
            .query("max", filter.max);
        if let Some(search) = filter.search.as_deref() {
            call = call.query("search", search);
        }
        let reply = self.client.admin(call, cancel, RETRIEVE).await?;
        let reply = reply.into_success().map_err(|error| RETRIEVE.map(error))?;
        reply.json().map_err(|error| RETRIEVE.map(error))
    }

    async fn reset_password(
        &self,
        tenant: &TenantId,
        user_id: &UserId,
        password: &Password,
        cancel: &CancellationToken,
    ) -> AdminResult<User> {
        let call = AdminCall::new(
            Method::PUT,
            tenant,
            ["users", user_id.as_ref(), "reset-password"],
        )
        .json(&CredentialDto::password(password.expose()))
        .map_err(|error| RESET.map(error))?;
        let reply = self.client.admin(call, cancel, RESET).await?;
        if reply.status == StatusCode::BAD_REQUEST {
            return Err(UserErrors::WRONG_PASSWORD_DEFINITION.with_detail(reply.message()));
        }
        reply.into_success().map_err(|error| RESET.map(error))?;
        self.get_by_id(tenant, user_id, cancel).await
    }

    async fn update(
        &self,
        tenant: &TenantId,
        user_id: &UserId,
        update: &UserUpdate,
        cancel: &CancellationToken,
    ) -> AdminResult<bool> {
        let call = AdminCall::new(Method::PUT, tenant, ["users", user_id.as_ref()])
            .json(update)
            .map_err(|error| UPDATE.map(error))?;
        let reply = self.client.admin(call, cancel, UPDATE).await?;
        reply.into_success().map_err(|error| UPDATE.map(error))?;
        Ok(true)
    }

    async fn delete(
        &self,
        tenant: &TenantId,
        user_id: &UserId,
        cancel: &CancellationToken,
    ) -> AdminResult<bool> {
        let call = AdminCall::new(Method::DELETE, tenant, ["users", user_id.as_ref()]);
        let reply = self.client.admin(call, cancel, DELETE).await?;
        reply.into_success().map_err(|error| DELETE.map(error))?;
        Ok(true)
    }
}
