use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use serde_json::json;
use wiremock::matchers::{body_json as body_json_matcher, body_string_contains, method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::helpers::{body_json, form_request, valid_fields, TestApp, ALLOWED_ORIGIN, BOUNDARY};

#[tokio::test]
async fn options_returns_204_without_body() {
    let app = TestApp::spawn().await;
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/")
        .header(header::ORIGIN, ALLOWED_ORIGIN)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::empty())
        .unwrap();

    let response = app.send(request).await;

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(response.headers().get(header::CONTENT_TYPE).is_none());
    let bytes = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
    assert!(bytes.is_empty());
}

#[tokio::test]
async fn get_returns_405() {
    let app = TestApp::spawn().await;
    let request = Request::builder()
        .method(Method::GET)
        .uri("/")
        .body(Body::empty())
        .unwrap();

    let response = app.send(request).await;

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body_json(response).await, json!({ "error": "Method not allowed" }));
}

#[tokio::test]
async fn json_content_type_returns_400() {
    let app = TestApp::spawn().await;
    let request = Request::builder()
        .method(Method::POST)
        .uri("/")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"name":"Alice"}"#))
        .unwrap();

    let response = app.send(request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await, json!({ "error": "Invalid content type" }));
}

#[tokio::test]
async fn valid_submission_returns_200() {
    let app = TestApp::spawn().await;
    Mock::given(method("POST"))
        .and(path("/siteverify"))
        .and(body_string_contains("secret=test-secret"))
        .and(body_string_contains("response=token-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&app.turnstile_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/webhook"))
        .and(body_json_matcher(json!({
            "content": "**新しいお問い合わせが届きました**\n\n\
                        - **お名前:** Alice\n\
                        - **メールアドレス:** alice@example.com\n\
                        - **会社名:** Acme\n\
                        - **メッセージ:** Hello there"
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&app.webhook_server)
        .await;

    let response = app.send(form_request(&valid_fields(), None)).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/json"
    );
    assert_eq!(
        body_json(response).await,
        json!({ "message": "Form submitted successfully!" })
    );
}

#[tokio::test]
async fn contact_route_is_also_served() {
    let app = TestApp::spawn().await;
    app.mock_turnstile(json!({ "success": true })).await;
    app.mock_webhook(204).await;

    let mut request = form_request(&valid_fields(), None);
    *request.uri_mut() = "/contact".parse().unwrap();

    let response = app.send(request).await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn rejected_token_returns_403() {
    let app = TestApp::spawn().await;
    app.mock_turnstile(json!({
        "success": false,
        "error-codes": ["invalid-input-response"]
    }))
    .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&app.webhook_server)
        .await;

    let response = app.send(form_request(&valid_fields(), None)).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(
        body_json(response).await,
        json!({ "error": "Turnstile verification failed" })
    );
}

#[tokio::test]
async fn verification_reply_without_success_returns_403() {
    let app = TestApp::spawn().await;
    app.mock_turnstile(json!({ "hostname": "example.com" })).await;

    let response = app.send(form_request(&valid_fields(), None)).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn webhook_failure_returns_500() {
    let app = TestApp::spawn().await;
    app.mock_turnstile(json!({ "success": true })).await;
    app.mock_webhook(400).await;

    let response = app.send(form_request(&valid_fields(), None)).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await,
        json!({ "error": "Failed to send message" })
    );
}

#[tokio::test]
async fn undecodable_verification_reply_returns_generic_500() {
    let app = TestApp::spawn().await;
    Mock::given(method("POST"))
        .and(path("/siteverify"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&app.turnstile_server)
        .await;

    let response = app.send(form_request(&valid_fields(), None)).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await,
        json!({ "error": "Internal Server Error" })
    );
}

#[tokio::test]
async fn missing_fields_return_400() {
    let app = TestApp::spawn().await;
    let cases = [
        ("name", "missing name"),
        ("email", "missing email"),
        ("message", "missing message"),
        ("cf-turnstile-response", "missing token"),
    ];

    for (missing, description) in cases {
        let fields: Vec<_> = valid_fields()
            .into_iter()
            .filter(|(name, _)| *name != missing)
            .collect();

        let response = app.send(form_request(&fields, None)).await;

        assert_eq!(
            response.status(),
            StatusCode::BAD_REQUEST,
            "did not reject: {}",
            description
        );
        assert_eq!(
            body_json(response).await,
            json!({ "error": "Missing required fields" }),
            "wrong error for: {}",
            description
        );
    }
}

#[tokio::test]
async fn company_name_is_optional() {
    let app = TestApp::spawn().await;
    app.mock_turnstile(json!({ "success": true })).await;
    app.mock_webhook(200).await;
    let fields: Vec<_> = valid_fields()
        .into_iter()
        .filter(|(name, _)| *name != "intra_name")
        .collect();

    let response = app.send(form_request(&fields, None)).await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn invalid_fields_return_specific_errors() {
    let app = TestApp::spawn().await;
    let long_name = "a".repeat(51);
    let long_message = "m".repeat(501);
    let cases = [
        ("name", long_name.as_str(), "Invalid name"),
        ("email", "not-an-email", "Invalid email address"),
        ("email", "alice@example", "Invalid email address"),
        ("message", long_message.as_str(), "Invalid message content"),
    ];

    for (field, value, expected) in cases {
        let fields: Vec<_> = valid_fields()
            .into_iter()
            .map(|(name, v)| if name == field { (name, value) } else { (name, v) })
            .collect();

        let response = app.send(form_request(&fields, None)).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{} = {}", field, value);
        assert_eq!(body_json(response).await, json!({ "error": expected }));
    }
}

#[tokio::test]
async fn escaping_counts_toward_name_length() {
    let app = TestApp::spawn().await;
    // 10 raw characters become 50 after escaping; one more pushes it over.
    let name = format!("{}x", "&".repeat(10));
    let mut fields: Vec<(&str, &str)> = valid_fields();
    fields[0] = ("name", name.as_str());

    let response = app.send(form_request(&fields, None)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await, json!({ "error": "Invalid name" }));
}

#[tokio::test]
async fn message_is_sanitized_before_delivery() {
    let app = TestApp::spawn().await;
    app.mock_turnstile(json!({ "success": true })).await;
    Mock::given(method("POST"))
        .and(path("/webhook"))
        .and(body_string_contains("[script removed] &amp; bye"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&app.webhook_server)
        .await;
    let mut fields = valid_fields();
    fields[2] = ("message", "<script>alert(1)</script> & bye");

    let response = app.send(form_request(&fields, None)).await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn malformed_multipart_returns_generic_500() {
    let app = TestApp::spawn().await;
    let request = Request::builder()
        .method(Method::POST)
        .uri("/")
        .header(header::CONTENT_TYPE, "multipart/form-data")
        .body(Body::from(format!("--{BOUNDARY}\r\n")))
        .unwrap();

    let response = app.send(request).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await,
        json!({ "error": "Internal Server Error" })
    );
}

#[tokio::test]
async fn health_check_returns_ok() {
    let app = TestApp::spawn().await;
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let response = app.send(request).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "status": "ok" }));
}
