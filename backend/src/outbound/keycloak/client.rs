//! Shared HTTP plumbing for the Keycloak adapters.
//!
//! The client owns transport details only: URL construction, bearer
//! authentication, cancellation and status decoding. Each repository decides
//! which catalog entries its failures map to.
//!
//! Every token the client is issued is remembered per tenant and reused by
//! admin calls until it is within a few seconds of expiring.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;
use reqwest::header::{AUTHORIZATION, LOCATION};
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use zeroize::Zeroizing;

use super::dto::{ErrorBodyDto, TokenResponseDto};
use super::error::{ErrorMap, KeycloakError, map_transport_error};
use crate::domain::{AccessToken, AdminResult, TenantId, TokenDetails, TokenErrors};

/// Tokens this close to expiry are refreshed rather than reused.
const TOKEN_EXPIRY_MARGIN_SECS: i64 = 10;

/// Service-account credentials used for the `client_credentials` grant.
pub struct KeycloakCredentials {
    /// OAuth client identifier.
    pub client_id: String,
    /// OAuth client secret.
    pub client_secret: Zeroizing<String>,
}

/// Authenticated HTTP access to one Keycloak deployment.
pub struct KeycloakClient {
    http: Client,
    base: Url,
    credentials: KeycloakCredentials,
    clock: Arc<dyn Clock>,
    tokens: Mutex<HashMap<TenantId, TokenDetails>>,
}

impl KeycloakClient {
    /// Build a client rooted at `base`, e.g. `https://sso.example.com/`.
    ///
    /// # Errors
    ///
    /// Returns [`KeycloakError::Configuration`] when `base` cannot carry path
    /// segments or the reqwest client cannot be constructed.
    pub fn new(
        base: Url,
        credentials: KeycloakCredentials,
        timeout: Duration,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, KeycloakError> {
        if base.cannot_be_a_base() {
            return Err(KeycloakError::configuration(format!(
                "base URL {base} cannot carry a path"
            )));
        }
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| KeycloakError::configuration(error.to_string()))?;
        Ok(Self {
            http,
            base,
            credentials,
            clock,
            tokens: Mutex::new(HashMap::new()),
        })
    }

    /// Append percent-encoded path segments to the base URL.
    pub(super) fn endpoint<S: AsRef<str>>(&self, segments: &[S]) -> Result<Url, KeycloakError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| KeycloakError::configuration("base URL cannot carry a path"))?
            .pop_if_empty()
            .extend(segments.iter().map(AsRef::as_ref));
        Ok(url)
    }

    /// Admin endpoint scoped to `tenant`.
    pub(super) fn admin_endpoint<S: AsRef<str>>(
        &self,
        tenant: &TenantId,
        segments: &[S],
    ) -> Result<Url, KeycloakError> {
        let mut url = self.endpoint(&["admin", "realms", tenant.as_ref()])?;
        url.path_segments_mut()
            .map_err(|()| KeycloakError::configuration("base URL cannot carry a path"))?
            .extend(segments.iter().map(AsRef::as_ref));
        Ok(url)
    }

    /// Request a fresh service-account token for `tenant` and remember it.
    pub(super) async fn access_token(
        &self,
        tenant: &TenantId,
        cancel: &CancellationToken,
    ) -> AdminResult<TokenDetails> {
        let errors = ErrorMap::new(TokenErrors::GENERATION);
        let url = self
            .endpoint(&[
                "realms",
                tenant.as_ref(),
                "protocol",
                "openid-connect",
                "token",
            ])
            .map_err(|error| errors.map(error))?;
        let request = self.http.post(url).form(&[
            ("grant_type", "client_credentials"),
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.as_str()),
        ]);
        let reply = self
            .send(request, cancel)
            .await
            .and_then(Reply::into_success)
            .map_err(|error| errors.map(error))?;
        let dto: TokenResponseDto = reply.json().map_err(|error| errors.map(error))?;
        let details = token_details(dto, self.clock.utc()).map_err(|error| errors.map(error))?;
        debug!(%tenant, expires_at = %details.expires_at, "token issued");
        self.remember(tenant, &details);
        Ok(details)
    }

    /// `Authorization` value for `tenant`, reusing a remembered token.
    async fn bearer(&self, tenant: &TenantId, cancel: &CancellationToken) -> AdminResult<String> {
        if let Some(bearer) = self.cached_bearer(tenant, self.clock.utc()) {
            return Ok(bearer);
        }
        Ok(self.access_token(tenant, cancel).await?.bearer())
    }

    pub(super) fn cached_bearer(&self, tenant: &TenantId, now: DateTime<Utc>) -> Option<String> {
        let horizon = now.checked_add_signed(TimeDelta::seconds(TOKEN_EXPIRY_MARGIN_SECS))?;
        let tokens = self.tokens.lock().ok()?;
        tokens
            .get(tenant)
            .filter(|token| !token.is_expired_at(horizon))
            .map(TokenDetails::bearer)
    }

    pub(super) fn remember(&self, tenant: &TenantId, details: &TokenDetails) {
        if let Ok(mut tokens) = self.tokens.lock() {
            tokens.insert(tenant.clone(), details.clone());
        }
    }

    /// Perform one authenticated admin call.
    ///
    /// Any status is returned as a [`Reply`]; transport failures and
    /// cancellation are mapped through `errors`.
    pub(super) async fn admin(
        &self,
        call: AdminCall<'_>,
        cancel: &CancellationToken,
        errors: ErrorMap,
    ) -> AdminResult<Reply> {
        let url = call.url(self).map_err(|error| errors.map(error))?;
        let bearer = self.bearer(call.tenant, cancel).await?;
        let mut request = self
            .http
            .request(call.method, url)
            .header(AUTHORIZATION, bearer);
        if let Some(body) = call.body {
            request = request.json(&body);
        }
        self.send(request, cancel)
            .await
            .map_err(|error| errors.map(error))
    }

    async fn send(
        &self,
        request: RequestBuilder,
        cancel: &CancellationToken,
    ) -> Result<Reply, KeycloakError> {
        race(cancel, async {
            let response = request.send().await.map_err(map_transport_error)?;
            let status = response.status();
            let location = response
                .headers()
                .get(LOCATION)
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned);
            let body = response.bytes().await.map_err(map_transport_error)?;
            Ok(Reply {
                status,
                location,
                body: body.to_vec(),
            })
        })
        .await
    }
}

/// One admin request: method, path below the tenant, query and JSON body.
pub(super) struct AdminCall<'a> {
    tenant: &'a TenantId,
    method: Method,
    segments: Vec<String>,
    query: Vec<(&'static str, String)>,
    body: Option<serde_json::Value>,
}

impl<'a> AdminCall<'a> {
    pub(super) fn new<I>(method: Method, tenant: &'a TenantId, segments: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            tenant,
            method,
            segments: segments.into_iter().map(Into::into).collect(),
            query: Vec::new(),
            body: None,
        }
    }

    /// Full admin URL including the query string.
    pub(super) fn url(&self, client: &KeycloakClient) -> Result<Url, KeycloakError> {
        let mut url = client.admin_endpoint(self.tenant, self.segments.as_slice())?;
        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&self.query);
        }
        Ok(url)
    }

    pub(super) fn query(mut self, key: &'static str, value: impl ToString) -> Self {
        self.query.push((key, value.to_string()));
        self
    }

    /// Attach a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`KeycloakError::Decode`] when `body` cannot be serialised.
    pub(super) fn json<T: serde::Serialize>(mut self, body: &T) -> Result<Self, KeycloakError> {
        let value = serde_json::to_value(body)
            .map_err(|error| KeycloakError::decode(format!("unserialisable body: {error}")))?;
        self.body = Some(value);
        Ok(self)
    }
}

/// A completed HTTP exchange.
#[derive(Debug)]
pub(super) struct Reply {
    pub(super) status: StatusCode,
    pub(super) location: Option<String>,
    pub(super) body: Vec<u8>,
}

impl Reply {
    /// Keep successful replies; turn any other status into a typed error.
    pub(super) fn into_success(self) -> Result<Self, KeycloakError> {
        if self.status.is_success() {
            Ok(self)
        } else {
            Err(self.into_status_error())
        }
    }

    pub(super) fn into_status_error(self) -> KeycloakError {
        KeycloakError::status(self.status.as_u16(), self.message())
    }

    /// Human-readable explanation carried by the body.
    pub(super) fn message(&self) -> String {
        serde_json::from_slice::<ErrorBodyDto>(&self.body)
            .ok()
            .and_then(ErrorBodyDto::into_message)
            .unwrap_or_else(|| {
                let preview = body_preview(&self.body);
                if preview.is_empty() {
                    self.status
                        .canonical_reason()
                        .unwrap_or("no response body")
                        .to_owned()
                } else {
                    preview
                }
            })
    }

    pub(super) fn json<T: DeserializeOwned>(&self) -> Result<T, KeycloakError> {
        serde_json::from_slice(&self.body).map_err(|error| {
            KeycloakError::decode(format!(
                "{error} in body: {}",
                body_preview(&self.body)
            ))
        })
    }
}

/// Resolve `operation` unless `cancel` fires first.
pub(super) async fn race<T, F>(cancel: &CancellationToken, operation: F) -> Result<T, KeycloakError>
where
    F: Future<Output = Result<T, KeycloakError>>,
{
    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(KeycloakError::cancelled()),
        result = operation => result,
    }
}

fn token_details(
    dto: TokenResponseDto,
    now: DateTime<Utc>,
) -> Result<TokenDetails, KeycloakError> {
    let expires_at = i64::try_from(dto.expires_in)
        .ok()
        .and_then(TimeDelta::try_seconds)
        .and_then(|lifetime| now.checked_add_signed(lifetime))
        .ok_or_else(|| {
            KeycloakError::decode(format!("expires_in out of range: {}", dto.expires_in))
        })?;
    Ok(TokenDetails {
        access_token: AccessToken::new(dto.access_token),
        token_type: dto.token_type,
        expires_in: dto.expires_in,
        refresh_expires_in: dto.refresh_expires_in,
        scope: dto.scope,
        expires_at,
    })
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
mod tests;
