//! Group port over the admin `groups` resource.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use super::client::{AdminCall, KeycloakClient};
use super::error::ErrorMap;
use crate::domain::ports::GroupRepository;
use crate::domain::{AdminResult, Group, GroupErrors, NewGroup, TenantId};

const LIST: ErrorMap = ErrorMap::new(GroupErrors::RETRIEVAL);
const FETCH: ErrorMap = ErrorMap::new(GroupErrors::RETRIEVAL).with_not_found(GroupErrors::NOT_FOUND);
const CREATE: ErrorMap = ErrorMap::new(GroupErrors::CREATION);
const DELETE: ErrorMap =
    ErrorMap::new(GroupErrors::DELETION).with_not_found(GroupErrors::NOT_FOUND);

/// Groups of one Keycloak deployment.
pub struct KeycloakGroupRepository {
    client: Arc<KeycloakClient>,
}

impl KeycloakGroupRepository {
    /// Create the repository over a shared client.
    pub fn new(client: Arc<KeycloakClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl GroupRepository for KeycloakGroupRepository {
    async fn get_all(
        &self,
        tenant: &TenantId,
        cancel: &CancellationToken,
    ) -> AdminResult<Vec<Group>> {
        let call = AdminCall::new(Method::GET, tenant, ["groups"])
            .query("briefRepresentation", false);
        let reply = self.client.admin(call, cancel, LIST).await?;
        let reply = reply.into_success().map_err(|error| LIST.map(error))?;
        reply.json().map_err(|error| LIST.map(error))
    }

    async fn get_by_id(
        &self,
        tenant: &TenantId,
        group_id: Uuid,
        cancel: &CancellationToken,
    ) -> AdminResult<Group> {
        let call = AdminCall::new(Method::GET, tenant, ["groups".to_owned(), group_id.to_string()]);
        let reply = self.client.admin(call, cancel, FETCH).await?;
        let reply = reply.into_success().map_err(|error| FETCH.map(error))?;
        reply.json().map_err(|error| FETCH.map(error))
    }

    async fn create(
        &self,
        tenant: &TenantId,
        group: &NewGroup,
        cancel: &CancellationToken,
    ) -> AdminResult<bool> {
        let call = AdminCall::new(Method::POST, tenant, ["groups"])
            .json(group)
            .map_err(|error| CREATE.map(error))?;
        let reply = self.client.admin(call, cancel, CREATE).await?;
        reply.into_success().map_err(|error| CREATE.map(error))?;
        Ok(true)
    }

    async fn delete(
        &self,
        tenant: &TenantId,
        group_id: Uuid,
        cancel: &CancellationToken,
    ) -> AdminResult<bool> {
        let call = AdminCall::new(
            Method::DELETE,
            tenant,
            ["groups".to_owned(), group_id.to_string()],
        );
        let reply = self.client.admin(call, cancel, DELETE).await?;
        reply.into_success().map_err(|error| DELETE.map(error))?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::outbound::keycloak::KeycloakError;

    #[rstest]
    #[case::listing_has_no_not_found(LIST, 404, "Group.RetrievalError")]
    #[case::fetch_missing(FETCH, 404, "Group.NotFound")]
    #[case::fetch_failure(FETCH, 503, "Group.RetrievalError")]
    #[case::duplicate_name(CREATE, 409, "Group.CreationError")]
    #[case::delete_missing(DELETE, 404, "Group.NotFound")]
    fn maps_statuses_per_operation(
        #[case] errors: ErrorMap,
        #[case] status: u16,
        #[case] expected: &str,
    ) {
        let error = errors.map(KeycloakError::status(status, "upstream message"));

        assert_eq!(error.code(), expected);
    }
}
