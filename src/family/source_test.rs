use axum::Router;
use axum::extract::Path;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use serde_json::json;

use super::*;
use crate::family::PersonType;

fn api_config(base_url: String, token: Option<&str>) -> FamilyApiConfig {
    FamilyApiConfig {
        base_url,
        token: token.map(str::to_string),
        request_timeout_secs: 5,
        connect_timeout_secs: 1,
    }
}

/// Serve `router` on an ephemeral local port and return its base URL.
async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

async fn family_handler(Path(id): Path<i64>, headers: HeaderMap) -> (StatusCode, String) {
    match id {
        1 => (
            StatusCode::OK,
            json!({ "id": 1, "surname": "Rivera", "members": [{ "id": 5 }], "visitors": [] }).to_string(),
        ),
        2 => (
            StatusCode::OK,
            json!({ "data": { "id": 2, "surname": "Lopez", "members": [], "visitors": [{ "id": 9 }] } }).to_string(),
        ),
        3 => (StatusCode::OK, json!({ "id": 3, "members": [] }).to_string()),
        4 => {
            let auth = headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string();
            (StatusCode::OK, json!({ "id": 4, "surname": auth, "members": [], "visitors": [] }).to_string())
        }
        _ => (StatusCode::NOT_FOUND, "no such family".into()),
    }
}

// =============================================================================
// PARSING
// =============================================================================

#[test]
fn parse_bare_record() {
    let record = parse_family(r#"{"id": 3, "surname": "Diaz", "members": [], "visitors": []}"#).unwrap();
    assert_eq!(record.id, 3);
    assert_eq!(record.surname, "Diaz");
}

#[test]
fn parse_wrapped_record() {
    let record = parse_family(r#"{"data": {"id": 3, "members": [{"id": 1}], "visitors": []}}"#).unwrap();
    assert_eq!(record.id, 3);
    assert_eq!(record.members.len(), 1);
}

#[test]
fn parse_invalid_json_is_decode_error() {
    let err = parse_family("not json").unwrap_err();
    assert!(matches!(err, FetchError::Decode(_)));
    assert_eq!(err.error_code(), "E_FAMILY_DECODE");
}

#[test]
fn parse_missing_visitors_is_shape_error() {
    let err = parse_family(r#"{"id": 3, "members": []}"#).unwrap_err();
    assert!(matches!(err, FetchError::Shape(ShapeError::MissingCollection { field: "visitors", .. })));
    assert_eq!(err.error_code(), "E_FAMILY_SHAPE");
}

#[test]
fn retryable_only_for_transport_and_server_errors() {
    assert!(FetchError::Request("timeout".into()).retryable());
    assert!(FetchError::Status { status: 503, body: String::new() }.retryable());
    assert!(FetchError::Status { status: 429, body: String::new() }.retryable());
    assert!(!FetchError::Status { status: 404, body: String::new() }.retryable());
    assert!(!FetchError::Decode("bad".into()).retryable());
}

// =============================================================================
// HTTP
// =============================================================================

#[tokio::test]
async fn http_source_fetches_bare_and_wrapped_records() {
    let base = serve(Router::new().route("/families/{id}", get(family_handler))).await;
    let source = HttpFamilySource::new(&api_config(base, None)).unwrap();

    let bare = source.get_family(1).await.unwrap();
    assert_eq!(bare.surname, "Rivera");
    assert_eq!(bare.members[0].person_type, PersonType::Member);

    let wrapped = source.get_family(2).await.unwrap();
    assert_eq!(wrapped.surname, "Lopez");
    assert_eq!(wrapped.visitors[0].person_type, PersonType::Visitor);
}

#[tokio::test]
async fn http_source_reports_non_success_status() {
    let base = serve(Router::new().route("/families/{id}", get(family_handler))).await;
    let source = HttpFamilySource::new(&api_config(base, None)).unwrap();

    let err = source.get_family(99).await.unwrap_err();
    assert!(matches!(err, FetchError::Status { status: 404, ref body } if body == "no such family"));
}

#[tokio::test]
async fn http_source_reports_shape_errors() {
    let base = serve(Router::new().route("/families/{id}", get(family_handler))).await;
    let source = HttpFamilySource::new(&api_config(base, None)).unwrap();

    assert!(matches!(source.get_family(3).await, Err(FetchError::Shape(_))));
}

#[tokio::test]
async fn http_source_sends_bearer_token() {
    let base = serve(Router::new().route("/families/{id}", get(family_handler))).await;
    let source = HttpFamilySource::new(&api_config(base, Some("secret"))).unwrap();

    let record = source.get_family(4).await.unwrap();
    assert_eq!(record.surname, "Bearer secret");
}

#[tokio::test]
async fn http_source_reports_connection_failure() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let source = HttpFamilySource::new(&api_config(format!("http://{addr}"), None)).unwrap();
    let err = source.get_family(1).await.unwrap_err();
    assert!(matches!(err, FetchError::Request(_)));
}
