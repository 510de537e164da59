//! Administrative façade configuration loaded via OrthoConfig.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;
use url::Url;
use zeroize::Zeroizing;

use crate::domain::{TenantId, TenantValidationError};

/// Settings read from `IAM_ADMIN_*` environment variables, configuration
/// files and the command line.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "IAM_ADMIN")]
pub struct AdminSettings {
    /// Keycloak base URL, e.g. `https://sso.example.com/`.
    pub keycloak_url: Option<String>,
    /// Service-account client identifier.
    pub client_id: Option<String>,
    /// Service-account client secret.
    pub client_secret: Option<String>,
    /// Per-request timeout in seconds.
    #[ortho_config(default = 30)]
    pub request_timeout_secs: u64,
    /// Tenant used when the command line names none.
    pub default_tenant: Option<String>,
}

/// Validated connection settings for the Keycloak adapters.
#[derive(Debug)]
pub struct KeycloakSettings {
    /// Keycloak base URL.
    pub base_url: Url,
    /// Service-account client identifier.
    pub client_id: String,
    /// Service-account client secret.
    pub client_secret: Zeroizing<String>,
    /// Per-request timeout.
    pub request_timeout: Duration,
}

/// Reasons the loaded settings cannot be used.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required setting is absent or blank.
    #[error("missing setting {0}")]
    Missing(&'static str),
    /// The Keycloak URL could not be parsed.
    #[error("invalid keycloak url: {0}")]
    InvalidUrl(String),
    /// The timeout must be at least one second.
    #[error("request timeout must be positive")]
    ZeroTimeout,
    /// The default tenant is not a valid tenant identifier.
    #[error("invalid default tenant: {0}")]
    InvalidTenant(#[from] TenantValidationError),
}

impl AdminSettings {
    /// Validate the connection settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a required value is missing or malformed.
    pub fn keycloak(&self) -> Result<KeycloakSettings, ConfigError> {
        let raw_url = required(self.keycloak_url.as_deref(), "IAM_ADMIN_KEYCLOAK_URL")?;
        let base_url =
            Url::parse(raw_url).map_err(|error| ConfigError::InvalidUrl(error.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ConfigError::InvalidUrl(format!("{raw_url} cannot carry a path")));
        }
        let client_id = required(self.client_id.as_deref(), "IAM_ADMIN_CLIENT_ID")?;
        let client_secret = required(self.client_secret.as_deref(), "IAM_ADMIN_CLIENT_SECRET")?;
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(KeycloakSettings {
            base_url,
            client_id: client_id.to_owned(),
            client_secret: Zeroizing::new(client_secret.to_owned()),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        })
    }

    /// The configured fallback tenant, if any.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidTenant`] when the value is malformed.
    pub fn default_tenant(&self) -> Result<Option<TenantId>, ConfigError> {
        self.default_tenant
            .as_deref()
            .map(TenantId::new)
            .transpose()
            .map_err(ConfigError::from)
    }
}

fn required<'a>(value: Option<&'a str>, name: &'static str) -> Result<&'a str, ConfigError> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(ConfigError::Missing(name))
}
