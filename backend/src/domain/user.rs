//! User data model.
//!
//! [`User`] mirrors the identity backend's user representation and is only
//! ever held transiently by the handler that received it. [`NewUser`] and
//! [`UserUpdate`] are the payloads callers supply; [`UserResponse`] is the
//! outward shape handlers return.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;
use zeroize::Zeroizing;

/// Validation errors raised by user value constructors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserValidationError {
    /// The user id was empty.
    #[error("user id must not be empty")]
    EmptyId,
    /// The user id was not a UUID.
    #[error("user id must be a valid UUID")]
    InvalidId,
    /// The username was blank once trimmed.
    #[error("username must not be empty")]
    EmptyUsername,
    /// The password was empty.
    #[error("password must not be empty")]
    EmptyPassword,
}

/// Stable user identifier assigned by the backend.
///
/// Any textual UUID form parses; the identifier is kept in the lowercase
/// hyphenated form the backend uses in resource paths, so an id typed in
/// upper case names the same account and builds the same path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId {
    uuid: Uuid,
    canonical: String,
}

impl UserId {
    /// Parse an identifier, rejecting empty or padded input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let raw = id.as_ref();
        if raw.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if raw.trim() != raw {
            return Err(UserValidationError::InvalidId);
        }
        Uuid::parse_str(raw)
            .map(Self::from)
            .map_err(|_| UserValidationError::InvalidId)
    }

    /// A fresh random identifier, for tests and fixtures.
    pub fn random() -> Self {
        Self::from(Uuid::new_v4())
    }

    /// The identifier as a UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.uuid
    }
}

impl From<Uuid> for UserId {
    fn from(uuid: Uuid) -> Self {
        Self {
            uuid,
            canonical: uuid.hyphenated().to_string(),
        }
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        &self.canonical
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.canonical
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// How a single user is located on the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserLookup {
    /// Exact username match, even when the username happens to look like a
    /// UUID.
    Username(String),
    /// Server-assigned identifier.
    Id(UserId),
}

impl UserLookup {
    /// Read operator input: a UUID selects by id, anything else by username.
    pub fn parse(raw: &str) -> Self {
        UserId::new(raw).map_or_else(|_| Self::Username(raw.to_owned()), Self::Id)
    }
}

impl fmt::Display for UserLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Username(username) => write!(f, "username:{username}"),
            Self::Id(id) => write!(f, "id:{id}"),
        }
    }
}

/// Plaintext password supplied by an administrator.
///
/// The value is zeroed on drop and never printed by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(Zeroizing<String>);

impl Password {
    /// Validate and wrap a password. Whitespace is preserved.
    pub fn new(password: impl Into<String>) -> Result<Self, UserValidationError> {
        let password = Zeroizing::new(password.into());
        if password.is_empty() {
            return Err(UserValidationError::EmptyPassword);
        }
        Ok(Self(password))
    }

    /// Password text for the single call that needs it.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Per-user permissions the backend reports for the calling service account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserAccess {
    /// Whether group membership can be managed.
    pub manage_group_membership: bool,
    /// Whether the user can be viewed.
    pub view: bool,
    /// Whether roles can be mapped onto the user.
    pub map_roles: bool,
    /// Whether the user can be impersonated.
    pub impersonate: bool,
    /// Whether the user can be managed.
    pub manage: bool,
}

/// User as represented by the identity backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct User {
    /// Server-assigned identifier; absent before creation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<UserId>,
    /// Whether the account may sign in.
    pub enabled: bool,
    /// Whether the email address has been verified.
    pub email_verified: bool,
    /// Login name, unique within the tenant.
    pub username: String,
    /// Contact email address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Given name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// Family name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Whether one-time passwords are configured.
    pub totp: bool,
    /// Credential types the user may disable.
    pub disableable_credential_types: Vec<String>,
    /// Actions the user must complete at next sign-in.
    pub required_actions: Vec<String>,
    /// Tokens issued before this epoch second are rejected.
    pub not_before: i64,
    /// Creation time in epoch milliseconds.
    pub created_timestamp: i64,
    /// Permissions of the calling account over this user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access: Option<UserAccess>,
    /// Free-form multi-valued attributes.
    pub attributes: BTreeMap<String, Vec<String>>,
}

/// Payload for creating a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Login name, trimmed and non-empty.
    pub username: String,
    /// Initial password, applied after creation.
    pub password: Password,
    /// Contact email address.
    pub email: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Single-valued attributes stamped onto the new account.
    pub attributes: BTreeMap<String, String>,
}

impl NewUser {
    /// Build a payload, validating the username.
    pub fn new(
        username: &str,
        password: Password,
        email: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Result<Self, UserValidationError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(UserValidationError::EmptyUsername);
        }
        Ok(Self {
            username: username.to_owned(),
            password,
            email: email.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            attributes: BTreeMap::new(),
        })
    }

    /// Attach single-valued attributes.
    #[must_use]
    pub fn with_attributes(mut self, attributes: BTreeMap<String, String>) -> Self {
        self.attributes = attributes;
        self
    }

    /// The backend representation submitted on creation.
    ///
    /// The account starts enabled with an unverified email and no
    /// credentials; the password is applied by a separate reset call once the
    /// backend has assigned an identifier.
    pub fn to_representation(&self) -> User {
        User {
            enabled: true,
            email_verified: false,
            username: self.username.clone(),
            email: Some(self.email.clone()),
            first_name: Some(self.first_name.clone()),
            last_name: Some(self.last_name.clone()),
            attributes: self
                .attributes
                .iter()
                .map(|(key, value)| (key.clone(), vec![value.clone()]))
                .collect(),
            ..User::default()
        }
    }
}

/// Partial update applied to an existing user. `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    /// New email address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// New given name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// New family name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Enable or disable the account.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// Replacement attribute set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<BTreeMap<String, Vec<String>>>,
}

impl UserUpdate {
    /// Whether the update changes nothing.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Paging and search window for user listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserFilter {
    /// Offset of the first user returned.
    pub first: u32,
    /// Maximum number of users returned.
    pub max: u32,
    /// Optional substring matched against username, email and names.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl Default for UserFilter {
    fn default() -> Self {
        Self {
            first: 0,
            max: 100,
            search: None,
        }
    }
}

/// User shape returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    /// Server-assigned identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<UserId>,
    /// Login name.
    pub username: String,
    /// Contact email address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Given name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// Family name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Whether the account may sign in.
    pub enabled: bool,
    /// Whether the email address has been verified.
    pub email_verified: bool,
    /// Creation time, when the backend reported one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Free-form multi-valued attributes.
    pub attributes: BTreeMap<String, Vec<String>>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        let created_at = (user.created_timestamp > 0)
            .then(|| DateTime::from_timestamp_millis(user.created_timestamp))
            .flatten();
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            enabled: user.enabled,
            email_verified: user.email_verified,
            created_at,
            attributes: user.attributes,
        }
    }
}
