//! Integration coverage for the dispatcher and the user provisioning workflow.
//!
//! Recording doubles stand in for the Keycloak adapters and log every port
//! call into one shared journal, so ordering across ports can be asserted.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use identity_admin::application::commands::CreateUserCommand;
use identity_admin::application::queries::GetAllGroupsQuery;
use identity_admin::application::{Dispatcher, RepositoryPorts};
use identity_admin::domain::ports::{
    GroupRepository, GroupUsersRepository, TokenRepository, UserCreation, UserRepository,
};
use identity_admin::domain::{
    AccessToken, AdminResult, Group, GroupErrors, NewGroup, NewUser, Outcome, Password,
    RequestErrors, TenantId, TokenDetails, TokenErrors, User, UserErrors, UserFilter, UserId,
    UserLookup, UserUpdate,
};
use rstest::{fixture, rstest};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

const ASSIGNED_ID: &str = "6f1c2a4e-8d1b-4c3a-9e0f-2b7d5a1c3e90";

type Journal = Arc<Mutex<Vec<String>>>;

fn record(journal: &Journal, entry: impl Into<String>) {
    journal.lock().expect("journal lock").push(entry.into());
}

fn entries(journal: &Journal) -> Vec<String> {
    journal.lock().expect("journal lock").clone()
}

// -----------------------------------------------------------------------------
// Test doubles for driven ports
// -----------------------------------------------------------------------------

struct RecordingTokens {
    journal: Journal,
    outcome: AdminResult<TokenDetails>,
}

#[async_trait]
impl TokenRepository for RecordingTokens {
    async fn get_access_token(
        &self,
        tenant: &TenantId,
        cancel: &CancellationToken,
    ) -> AdminResult<TokenDetails> {
        record(&self.journal, format!("token:{tenant}:{}", cancel.is_cancelled()));
        self.outcome.clone()
    }
}

struct RecordingUsers {
    journal: Journal,
    creation: AdminResult<UserCreation>,
    lookup: AdminResult<User>,
}

#[async_trait]
impl UserRepository for RecordingUsers {
    async fn create(
        &self,
        tenant: &TenantId,
        user: &NewUser,
        cancel: &CancellationToken,
    ) -> AdminResult<UserCreation> {
        record(
            &self.journal,
            format!("create:{tenant}:{}:{}", user.username, cancel.is_cancelled()),
        );
        self.creation.clone()
    }

    async fn get(
        &self,
        tenant: &TenantId,
        lookup: &UserLookup,
        cancel: &CancellationToken,
    ) -> AdminResult<User> {
        record(
            &self.journal,
            format!("get:{tenant}:{lookup}:{}", cancel.is_cancelled()),
        );
        self.lookup.clone()
    }

    async fn list(
        &self,
        _tenant: &TenantId,
        _filter: &UserFilter,
        _cancel: &CancellationToken,
    ) -> AdminResult<Vec<User>> {
        record(&self.journal, "list");
        Ok(Vec::new())
    }

    async fn reset_password(
        &self,
        tenant: &TenantId,
        user_id: &UserId,
        password: &Password,
        cancel: &CancellationToken,
    ) -> AdminResult<User> {
        record(
            &self.journal,
            format!(
                "reset:{tenant}:{user_id}:{}:{}",
                password.expose(),
                cancel.is_cancelled()
            ),
        );
        self.lookup.clone()
    }

    async fn update(
        &self,
        _tenant: &TenantId,
        _user_id: &UserId,
        _update: &UserUpdate,
        _cancel: &CancellationToken,
    ) -> AdminResult<bool> {
        record(&self.journal, "update");
        Ok(true)
    }

    async fn delete(
        &self,
        _tenant: &TenantId,
        _user_id: &UserId,
        _cancel: &CancellationToken,
    ) -> AdminResult<bool> {
        record(&self.journal, "delete");
        Ok(true)
    }
}

struct FixedGroups {
    journal: Journal,
    groups: Vec<Group>,
}

#[async_trait]
impl GroupRepository for FixedGroups {
    async fn get_all(
        &self,
        tenant: &TenantId,
        _cancel: &CancellationToken,
    ) -> AdminResult<Vec<Group>> {
        record(&self.journal, format!("groups:{tenant}"));
        Ok(self.groups.clone())
    }

    async fn get_by_id(
        &self,
        _tenant: &TenantId,
        group_id: Uuid,
        _cancel: &CancellationToken,
    ) -> AdminResult<Group> {
        self.groups
            .iter()
            .find(|group| group.id == group_id)
            .cloned()
            .ok_or_else(|| GroupErrors::NOT_FOUND.with_detail(group_id.to_string()))
    }

    async fn create(
        &self,
        _tenant: &TenantId,
        _group: &NewGroup,
        _cancel: &CancellationToken,
    ) -> AdminResult<bool> {
        Ok(true)
    }

    async fn delete(
        &self,
        _tenant: &TenantId,
        _group_id: Uuid,
        _cancel: &CancellationToken,
    ) -> AdminResult<bool> {
        Ok(true)
    }
}

struct NoMemberships;

#[async_trait]
impl GroupUsersRepository for NoMemberships {
    async fn add_user_to_group(
        &self,
        _tenant: &TenantId,
        _user_id: &UserId,
        _group_id: Uuid,
        _cancel: &CancellationToken,
    ) -> AdminResult<bool> {
        Ok(false)
    }

    async fn remove_user_from_group(
        &self,
        _tenant: &TenantId,
        _user_id: &UserId,
        _group_id: Uuid,
        _cancel: &CancellationToken,
    ) -> AdminResult<bool> {
        Ok(false)
    }

    async fn get_members(
        &self,
        _tenant: &TenantId,
        _group_id: Uuid,
        _cancel: &CancellationToken,
    ) -> AdminResult<Vec<User>> {
        Ok(Vec::new())
    }
}

// -----------------------------------------------------------------------------
// Harness
// -----------------------------------------------------------------------------

struct Harness {
    journal: Journal,
    token: AdminResult<TokenDetails>,
    creation: AdminResult<UserCreation>,
    lookup: AdminResult<User>,
}

impl Harness {
    fn dispatcher(&self) -> Dispatcher {
        Dispatcher::new(RepositoryPorts {
            users: Arc::new(RecordingUsers {
                journal: Arc::clone(&self.journal),
                creation: self.creation.clone(),
                lookup: self.lookup.clone(),
            }),
            groups: Arc::new(FixedGroups {
                journal: Arc::clone(&self.journal),
                groups: vec![staff()],
            }),
            group_users: Arc::new(NoMemberships),
            tokens: Arc::new(RecordingTokens {
                journal: Arc::clone(&self.journal),
                outcome: self.token.clone(),
            }),
        })
    }
}

#[fixture]
fn harness() -> Harness {
    Harness {
        journal: Journal::default(),
        token: Ok(token()),
        creation: Ok(UserCreation::created("/admin/realms/acme/users/6f1c2a4e")),
        lookup: Ok(assigned_user()),
    }
}

fn tenant() -> TenantId {
    TenantId::new("acme").expect("valid tenant")
}

fn token() -> TokenDetails {
    TokenDetails {
        access_token: AccessToken::new("eyJ.token"),
        token_type: "Bearer".to_owned(),
        expires_in: 300,
        refresh_expires_in: 0,
        scope: None,
        expires_at: Utc
            .with_ymd_and_hms(2026, 1, 1, 12, 5, 0)
            .single()
            .expect("valid instant"),
    }
}

fn assigned_user() -> User {
    User {
        id: Some(UserId::new(ASSIGNED_ID).expect("valid id")),
        username: "grace".to_owned(),
        enabled: true,
        ..User::default()
    }
}

fn staff() -> Group {
    Group {
        id: Uuid::from_u128(42),
        name: "staff".to_owned(),
        path: "/staff".to_owned(),
        attributes: BTreeMap::new(),
        sub_groups: Vec::new(),
    }
}

fn create_command() -> CreateUserCommand {
    CreateUserCommand {
        tenant: tenant(),
        user: NewUser::new(
            "grace",
            Password::new("C0bol-4ever").expect("valid password"),
            "grace@example.test",
            "Grace",
            "Hopper",
        )
        .expect("valid user"),
    }
}

// -----------------------------------------------------------------------------
// Scenarios
// -----------------------------------------------------------------------------

#[rstest]
#[tokio::test]
async fn successful_provisioning_runs_every_step_in_order(harness: Harness) {
    let outcome = harness
        .dispatcher()
        .dispatch(create_command(), &CancellationToken::new())
        .await;

    assert!(outcome.is_success());
    assert!(*outcome.response());
    assert_eq!(
        entries(&harness.journal),
        [
            "token:acme:false".to_owned(),
            "create:acme:grace:false".to_owned(),
            "get:acme:username:grace:false".to_owned(),
            format!("reset:acme:{ASSIGNED_ID}:C0bol-4ever:false"),
        ]
    );
}

#[rstest]
#[tokio::test]
async fn uuid_shaped_username_is_looked_up_by_username(harness: Harness) {
    const UUID_NAME: &str = "11111111-2222-4333-8444-555555555555";
    let command = CreateUserCommand {
        tenant: tenant(),
        user: NewUser::new(
            UUID_NAME,
            Password::new("C0bol-4ever").expect("valid password"),
            "svc@example.test",
            "Service",
            "Account",
        )
        .expect("valid user"),
    };

    let outcome = harness
        .dispatcher()
        .dispatch(command, &CancellationToken::new())
        .await;

    assert!(outcome.is_success());
    assert_eq!(
        entries(&harness.journal).get(2).map(String::as_str),
        Some(format!("get:acme:username:{UUID_NAME}:false").as_str())
    );
}

#[rstest]
#[tokio::test]
async fn token_failure_makes_no_user_calls(mut harness: Harness) {
    harness.token = Err(TokenErrors::GENERATION.with_detail("invalid_client"));

    let outcome = harness
        .dispatcher()
        .dispatch(create_command(), &CancellationToken::new())
        .await;

    assert!(!outcome.is_success());
    assert!(TokenErrors::GENERATION.matches(outcome.error()));
    assert_eq!(entries(&harness.journal), ["token:acme:false"]);
}

#[rstest]
#[tokio::test]
async fn declined_creation_stops_before_lookup(mut harness: Harness) {
    harness.creation = Ok(UserCreation::declined("User exists with same username"));

    let outcome = harness
        .dispatcher()
        .dispatch(create_command(), &CancellationToken::new())
        .await;

    let error = outcome.into_error();
    assert!(UserErrors::WRONG_PASSWORD_DEFINITION.matches(&error));
    assert!(
        error
            .description()
            .starts_with(UserErrors::WRONG_PASSWORD_DEFINITION.summary())
    );
    assert_eq!(
        error.technical_detail(),
        Some("User exists with same username")
    );
    assert_eq!(
        entries(&harness.journal),
        ["token:acme:false", "create:acme:grace:false"]
    );
}

#[rstest]
#[tokio::test]
async fn cancellation_reaches_every_port_call(harness: Harness) {
    let cancel = CancellationToken::new();
    cancel.cancel();

    let outcome = harness.dispatcher().dispatch(create_command(), &cancel).await;

    assert!(outcome.is_success());
    assert!(
        entries(&harness.journal)
            .iter()
            .all(|entry| entry.ends_with(":true")),
        "every port call should observe the cancelled token"
    );
}

#[rstest]
#[tokio::test]
async fn cancelled_port_call_surfaces_as_cancelled_request(mut harness: Harness) {
    harness.lookup = Err(RequestErrors::CANCELLED.error());

    let outcome = harness
        .dispatcher()
        .dispatch(create_command(), &CancellationToken::new())
        .await;

    assert!(RequestErrors::CANCELLED.matches(outcome.error()));
    assert_eq!(entries(&harness.journal).len(), 3);
}

#[rstest]
#[tokio::test]
async fn repeated_group_listing_is_idempotent(harness: Harness) {
    let dispatcher = harness.dispatcher();
    let cancel = CancellationToken::new();

    let first = dispatcher
        .dispatch(GetAllGroupsQuery { tenant: tenant() }, &cancel)
        .await;
    let second = dispatcher
        .dispatch(GetAllGroupsQuery { tenant: tenant() }, &cancel)
        .await;

    assert_eq!(first.response(), second.response());
    assert_eq!(entries(&harness.journal), ["groups:acme", "groups:acme"]);
}
