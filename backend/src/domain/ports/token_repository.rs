//! Driven port for acquiring backend access tokens.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::domain::{AdminResult, TenantId, TokenDetails};

/// Token capability set.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Acquire an access token for the tenant's service account.
    async fn get_access_token(
        &self,
        tenant: &TenantId,
        cancel: &CancellationToken,
    ) -> AdminResult<TokenDetails>;
}
