//! Transport failures and their translation into catalog errors.

use reqwest::StatusCode;
use tracing::debug;

use crate::domain::{CatalogEntry, Error, RequestErrors};
use crate::outbound::macros::define_adapter_error;

define_adapter_error! {
    /// Failures raised while talking to Keycloak.
    pub enum KeycloakError {
        /// The request could not be delivered or the response not read.
        Transport { message: String } => "transport failure: {message}",
        /// The request exceeded the configured timeout.
        Timeout { message: String } => "request timed out: {message}",
        /// Keycloak answered with a non-success status.
        Status { status: u16, message: String } => "status {status}: {message}",
        /// The response body did not match the expected shape.
        Decode { message: String } => "invalid response payload: {message}",
        /// The adapter was configured with unusable settings.
        Configuration { message: String } => "invalid configuration: {message}",
        /// The caller cancelled the request.
        Cancelled => "request cancelled",
    }
}

/// Catalog entries reported for one operation.
#[derive(Debug, Clone, Copy)]
pub(super) struct ErrorMap {
    failure: CatalogEntry,
    not_found: Option<CatalogEntry>,
}

impl ErrorMap {
    pub(super) const fn new(failure: CatalogEntry) -> Self {
        Self {
            failure,
            not_found: None,
        }
    }

    /// Report 404 responses as `entry` instead of the generic failure.
    pub(super) const fn with_not_found(self, entry: CatalogEntry) -> Self {
        Self {
            failure: self.failure,
            not_found: Some(entry),
        }
    }

    pub(super) fn map(&self, error: KeycloakError) -> Error {
        debug!(kind = error.kind(), entry = self.failure.code(), "keycloak call failed");
        match (&error, self.not_found) {
            (KeycloakError::Cancelled, _) => RequestErrors::CANCELLED.error(),
            (KeycloakError::Status { status, message }, Some(not_found))
                if *status == StatusCode::NOT_FOUND.as_u16() =>
            {
                if echoes_summary(message, not_found) {
                    not_found.error()
                } else {
                    not_found.with_detail(message.as_str())
                }
            }
            _ => self.failure.with_detail(error.to_string()),
        }
    }
}

/// Keycloak's 404 bodies often restate the entry summary verbatim.
fn echoes_summary(message: &str, entry: CatalogEntry) -> bool {
    message.trim().eq_ignore_ascii_case(entry.summary())
}

pub(super) fn map_transport_error(error: reqwest::Error) -> KeycloakError {
    if error.is_timeout() {
        KeycloakError::timeout(error.to_string())
    } else {
        KeycloakError::transport(error.to_string())
    }
}
