//! Wire shapes exchanged with Keycloak that have no domain counterpart.
//!
//! Users and groups decode straight into the domain types, whose serde
//! attributes already follow Keycloak's representation.

use serde::{Deserialize, Serialize};

/// Token endpoint response.
#[derive(Debug, Deserialize)]
pub(super) struct TokenResponseDto {
    pub(super) access_token: String,
    #[serde(default = "bearer")]
    pub(super) token_type: String,
    pub(super) expires_in: u64,
    #[serde(default)]
    pub(super) refresh_expires_in: u64,
    #[serde(default)]
    pub(super) scope: Option<String>,
}

fn bearer() -> String {
    "Bearer".to_owned()
}

/// Error body returned by the admin and token endpoints.
#[derive(Debug, Default, Deserialize)]
pub(super) struct ErrorBodyDto {
    #[serde(default, rename = "errorMessage")]
    error_message: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl ErrorBodyDto {
    /// Most specific message present in the body.
    pub(super) fn into_message(self) -> Option<String> {
        self.error_message
            .or(self.error_description)
            .or(self.error)
            .filter(|message| !message.trim().is_empty())
    }
}

/// Credential payload for `reset-password`.
#[derive(Debug, Serialize)]
pub(super) struct CredentialDto<'a> {
    #[serde(rename = "type")]
    pub(super) kind: &'static str,
    pub(super) value: &'a str,
    pub(super) temporary: bool,
}

impl<'a> CredentialDto<'a> {
    pub(super) fn password(value: &'a str) -> Self {
        Self {
            kind: "password",
            value,
            temporary: false,
        }
    }
}
