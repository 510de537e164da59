//! Intent and handler contracts.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::domain::{AdminResult, TenantId};

/// An immutable command or query naming one operation.
pub trait Request: Send + 'static {
    /// Payload produced on success.
    type Response: Send + 'static;

    /// Stable name used in logs.
    const NAME: &'static str;

    /// Tenant the operation targets.
    fn tenant(&self) -> &TenantId;
}

/// Orchestration bound to exactly one intent type.
///
/// Handlers are stateless; they validate nothing beyond what the intent's
/// types already guarantee and hand the cancellation token to every port call
/// unchanged.
#[async_trait]
pub trait Handler<R: Request>: Send + Sync {
    /// Perform the operation and produce exactly one outcome.
    async fn handle(&self, request: R, cancel: &CancellationToken) -> AdminResult<R::Response>;
}

/// Implement [`Request`] for intents carrying a `tenant` field.
macro_rules! impl_request {
    ($($intent:ty => $response:ty, $name:literal;)*) => {
        $(
            impl $crate::application::request::Request for $intent {
                type Response = $response;
                const NAME: &'static str = $name;

                fn tenant(&self) -> &$crate::domain::TenantId {
                    &self.tenant
                }
            }
        )*
    };
}

pub(crate) use impl_request;
