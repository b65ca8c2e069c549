use super::*;
use crate::state::session::{UserProfile, UserType};
use crate::state::storage::MemoryStorage;

fn client_for(session: Session) -> ApiClient<Session> {
    ApiClient::new(ApiConfig::default(), session)
}

// =============================================================
// ApiConfig
// =============================================================

#[test]
fn default_config_matches_backend_defaults() {
    let config = ApiConfig::default();
    assert_eq!(config.base_url, "http://localhost:8080");
    assert_eq!(config.timeout_ms, 10_000);
}

#[test]
fn config_overrides_apply_when_valid() {
    let config = ApiConfig::from_values(Some(" https://aq.example.com/ "), Some("2500"));
    assert_eq!(config.base_url, "https://aq.example.com/");
    assert_eq!(config.timeout_ms, 2500);
}

#[test]
fn config_ignores_blank_or_invalid_overrides() {
    assert_eq!(ApiConfig::from_values(Some("  "), Some("soon")), ApiConfig::default());
    assert_eq!(ApiConfig::from_values(None, Some("0")), ApiConfig::default());
}

#[test]
fn url_joins_base_and_path() {
    let config = ApiConfig::default();
    assert_eq!(config.url("/api/auth/login"), "http://localhost:8080/api/auth/login");
    assert_eq!(config.url("api/stations"), "http://localhost:8080/api/stations");
    assert_eq!(config.url("https://other.example/x"), "https://other.example/x");

    let same_origin = ApiConfig { base_url: String::new(), timeout_ms: 1 };
    assert_eq!(same_origin.url("api/auth/login"), "/api/auth/login");
}

// =============================================================
// Request interceptor
// =============================================================

#[test]
fn prepare_adds_bearer_when_token_present() {
    let client = client_for(Session::new("abc", UserProfile::new()));
    let request = client.prepare(HttpMethod::Get, "/api/stations", None);
    assert_eq!(request.header("authorization"), Some("Bearer abc"));
    assert_eq!(request.header("Content-Type"), Some("application/json"));
    assert_eq!(request.url, "http://localhost:8080/api/stations");
}

#[test]
fn prepare_omits_bearer_when_signed_out() {
    let client = client_for(Session::default());
    let request = client.prepare(HttpMethod::Post, "/api/auth/login", Some("{}".to_owned()));
    assert_eq!(request.header("Authorization"), None);
    assert_eq!(request.body.as_deref(), Some("{}"));
}

#[test]
fn prepare_reads_token_at_send_time() {
    let owner = Owner::new();
    owner.set();
    let signal = RwSignal::new(SessionStore::initialize(MemoryStorage::new()));
    let client = ApiClient::new(ApiConfig::default(), signal);
    assert_eq!(client.prepare(HttpMethod::Get, "/x", None).header("Authorization"), None);

    signal.update(|store| {
        store.set_token("fresh");
        store.set_user(UserProfile::with_user_type(UserType::Regular));
    });
    assert_eq!(
        client.prepare(HttpMethod::Get, "/x", None).header("Authorization"),
        Some("Bearer fresh")
    );

    signal.update(|store| store.logout());
    assert_eq!(client.prepare(HttpMethod::Get, "/x", None).header("Authorization"), None);
}

// =============================================================
// Response interceptor
// =============================================================

#[test]
fn observe_passes_errors_through_unchanged() {
    let err = ApiError::Status { status: 500, message: "boom".to_owned() };
    assert_eq!(observe::<()>(Err(err.clone())), Err(err));
}

#[test]
fn observe_passes_success_through() {
    assert_eq!(observe(Ok(7)), Ok(7));
}

#[test]
fn status_error_prefers_error_field() {
    assert_eq!(
        status_error(401, r#"{"error":"invalid credentials"}"#),
        ApiError::Status { status: 401, message: "invalid credentials".to_owned() }
    );
    assert_eq!(
        status_error(409, r#"{"message":"username taken"}"#),
        ApiError::Status { status: 409, message: "username taken".to_owned() }
    );
}

#[test]
fn status_error_falls_back_to_raw_body() {
    assert_eq!(
        status_error(502, "Bad Gateway\n"),
        ApiError::Status { status: 502, message: "Bad Gateway".to_owned() }
    );
    assert_eq!(
        status_error(500, ""),
        ApiError::Status { status: 500, message: "no response body".to_owned() }
    );
}

#[test]
fn api_error_exposes_status() {
    assert_eq!(ApiError::Status { status: 403, message: String::new() }.status(), Some(403));
    assert_eq!(ApiError::Timeout { ms: 10 }.status(), None);
}

#[test]
fn response_json_reports_decode_errors() {
    let response = ApiResponse { status: 200, body: "not json".to_owned() };
    assert!(matches!(response.json::<serde_json::Value>(), Err(ApiError::Decode(_))));
}

#[cfg(not(feature = "hydrate"))]
#[test]
fn post_json_outside_browser_reports_unavailable() {
    let client = client_for(Session::new("abc", UserProfile::new()));
    let body = serde_json::json!({ "city": "Beijing" });
    let result = futures::executor::block_on(
        client.post_json::<_, serde_json::Value>("/api/subscriptions", &body),
    );
    assert_eq!(result, Err(ApiError::Unavailable));
}
