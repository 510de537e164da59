//! Regression coverage for non-network client helpers.

use chrono::{DateTime, Local, TimeZone, Utc};
use rstest::{fixture, rstest};
use serde_json::json;

use super::*;

struct FixtureClock(DateTime<Utc>);

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

fn instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0)
        .single()
        .expect("valid instant")
}

fn client_at(base: &str) -> Result<KeycloakClient, KeycloakError> {
    KeycloakClient::new(
        Url::parse(base).expect("valid URL"),
        KeycloakCredentials {
            client_id: "admin-cli".to_owned(),
            client_secret: Zeroizing::new("secret".to_owned()),
        },
        Duration::from_secs(5),
        Arc::new(FixtureClock(instant())),
    )
}

#[fixture]
fn tenant() -> TenantId {
    TenantId::new("acme").expect("valid tenant")
}

fn reply(status: StatusCode, body: &str) -> Reply {
    Reply {
        status,
        location: None,
        body: body.as_bytes().to_vec(),
    }
}

#[rstest]
#[case::root("https://sso.example.test", "https://sso.example.test/admin/realms/acme/users")]
#[case::trailing_slash("https://sso.example.test/", "https://sso.example.test/admin/realms/acme/users")]
#[case::context_path("https://sso.example.test/auth/", "https://sso.example.test/auth/admin/realms/acme/users")]
fn admin_endpoint_appends_below_base(tenant: TenantId, #[case] base: &str, #[case] expected: &str) {
    let client = client_at(base).expect("client builds");

    let url = client.admin_endpoint(&tenant, &["users"]).expect("endpoint builds");

    assert_eq!(url.as_str(), expected);
}

#[rstest]
fn path_segments_are_percent_encoded(tenant: TenantId) {
    let client = client_at("https://sso.example.test/").expect("client builds");

    let url = client
        .admin_endpoint(&tenant, &["users", "a/b c"])
        .expect("endpoint builds");

    assert_eq!(
        url.as_str(),
        "https://sso.example.test/admin/realms/acme/users/a%2Fb%20c"
    );
}

#[test]
fn rejects_base_without_path() {
    let error = client_at("mailto:ops@example.test")
        .err()
        .expect("base must be rejected");

    assert!(matches!(error, KeycloakError::Configuration { .. }));
}

#[tokio::test]
async fn cancelled_token_wins_over_pending_operation() {
    let cancel = CancellationToken::new();
    cancel.cancel();

    let outcome: Result<(), _> = race(&cancel, std::future::pending()).await;

    assert_eq!(outcome, Err(KeycloakError::Cancelled));
}

#[tokio::test]
async fn cancellation_interrupts_in_flight_operation() {
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    let pending = race::<(), _>(&cancel, std::future::pending());
    let canceller = async move {
        tokio::task::yield_now().await;
        trigger.cancel();
    };

    let (outcome, ()) = tokio::join!(pending, canceller);

    assert_eq!(outcome, Err(KeycloakError::Cancelled));
}

#[tokio::test]
async fn completed_operation_is_returned() {
    let outcome = race(&CancellationToken::new(), async { Ok::<_, KeycloakError>(7) }).await;

    assert_eq!(outcome, Ok(7));
}

#[rstest]
#[case::error_message(r#"{"errorMessage":"Group name is missing"}"#, "Group name is missing")]
#[case::plain_text("upstream   exploded", "upstream exploded")]
#[case::empty("", "Bad Request")]
fn status_errors_carry_the_best_message(#[case] body: &str, #[case] expected: &str) {
    let error = reply(StatusCode::BAD_REQUEST, body)
        .into_success()
        .expect_err("400 must fail");

    assert_eq!(error, KeycloakError::status(400u16, expected));
}

#[test]
fn successful_reply_is_kept() {
    let kept = reply(StatusCode::NO_CONTENT, "")
        .into_success()
        .expect("204 succeeds");

    assert_eq!(kept.status, StatusCode::NO_CONTENT);
}

#[test]
fn undecodable_body_is_a_decode_error() {
    let error = reply(StatusCode::OK, "<html>")
        .json::<Vec<String>>()
        .expect_err("html is not JSON");

    assert!(matches!(error, KeycloakError::Decode { .. }));
}

#[test]
fn long_bodies_are_truncated_in_previews() {
    let preview = body_preview("x".repeat(400).as_bytes());

    assert_eq!(preview.chars().count(), 163);
    assert!(preview.ends_with("..."));
}

#[test]
fn token_expiry_is_relative_to_the_clock() {
    let dto: TokenResponseDto = serde_json::from_value(json!({
        "access_token": "abc",
        "token_type": "Bearer",
        "expires_in": 300,
        "refresh_expires_in": 0,
        "scope": "profile email"
    }))
    .expect("token decodes");

    let details = token_details(dto, instant()).expect("token maps");

    assert_eq!(details.expires_at, instant() + TimeDelta::seconds(300));
    assert_eq!(details.bearer(), "Bearer abc");
    assert!(!details.is_expired_at(instant()));
    assert_eq!(details.scope.as_deref(), Some("profile email"));
}

fn issued(token: &str, expires_at: DateTime<Utc>) -> TokenDetails {
    TokenDetails {
        access_token: AccessToken::new(token),
        token_type: "Bearer".to_owned(),
        expires_in: 300,
        refresh_expires_in: 0,
        scope: None,
        expires_at,
    }
}

#[rstest]
fn remembered_token_is_reused_for_its_tenant(tenant: TenantId) {
    let client = client_at("https://sso.example.test/").expect("client builds");
    client.remember(&tenant, &issued("abc", instant() + TimeDelta::seconds(300)));
    let other = TenantId::new("globex").expect("valid tenant");

    assert_eq!(
        client.cached_bearer(&tenant, instant()).as_deref(),
        Some("Bearer abc")
    );
    assert_eq!(client.cached_bearer(&other, instant()), None);
}

#[rstest]
#[case::expired(-1)]
#[case::inside_margin(5)]
fn nearly_expired_token_is_not_reused(tenant: TenantId, #[case] remaining_secs: i64) {
    let client = client_at("https://sso.example.test/").expect("client builds");
    client.remember(
        &tenant,
        &issued("abc", instant() + TimeDelta::seconds(remaining_secs)),
    );

    assert_eq!(client.cached_bearer(&tenant, instant()), None);
}

#[rstest]
fn newer_token_replaces_remembered_one(tenant: TenantId) {
    let client = client_at("https://sso.example.test/").expect("client builds");
    client.remember(&tenant, &issued("old", instant() + TimeDelta::seconds(60)));
    client.remember(&tenant, &issued("new", instant() + TimeDelta::seconds(300)));

    assert_eq!(
        client.cached_bearer(&tenant, instant()).as_deref(),
        Some("Bearer new")
    );
}

#[test]
fn absurd_token_lifetime_is_rejected() {
    let dto: TokenResponseDto =
        serde_json::from_value(json!({ "access_token": "abc", "expires_in": u64::MAX }))
            .expect("token decodes");

    let error = token_details(dto, instant()).expect_err("lifetime overflows");

    assert!(matches!(error, KeycloakError::Decode { .. }));
}
