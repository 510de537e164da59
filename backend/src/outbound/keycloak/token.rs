//! Token port backed by the `client_credentials` grant.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::client::KeycloakClient;
use crate::domain::ports::TokenRepository;
use crate::domain::{AdminResult, TenantId, TokenDetails};

/// Issues service-account tokens per tenant.
pub struct KeycloakTokenRepository {
    client: Arc<KeycloakClient>,
}

impl KeycloakTokenRepository {
    /// Create the repository over a shared client.
    pub fn new(client: Arc<KeycloakClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TokenRepository for KeycloakTokenRepository {
    async fn get_access_token(
        &self,
        tenant: &TenantId,
        cancel: &CancellationToken,
    ) -> AdminResult<TokenDetails> {
        self.client.access_token(tenant, cancel).await
    }
}
