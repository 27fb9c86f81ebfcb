use actix_web::{http::header, http::StatusCode, test};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD as BASE64_URL, Engine};
use chrono::Utc;
use serde_json::{json, Value};

use parksystem::{auth::issue_token, types::TokenType};

#[macro_use]
mod support;

fn google_token(payload: Value) -> String {
    let header = BASE64_URL.encode(br#"{"alg":"RS256","kid":"k1","typ":"JWT"}"#);
    format!(
        "{}.{}.c2lnbmF0dXJl",
        header,
        BASE64_URL.encode(payload.to_string())
    )
}

#[actix_web::test]
async fn reservations_require_a_token() {
    let app = test_app!(support::lazy_state());

    for uri in ["/api/reservations", "/api/reservations/", "/api/profile"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{}", uri);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], 401);
    }
}

#[actix_web::test]
async fn refresh_token_is_not_an_access_token() {
    let state = support::lazy_state();
    let refresh = issue_token(&state.config, 1, TokenType::Refresh).unwrap();
    let app = test_app!(state);

    let req = test::TestRequest::get()
        .uri("/api/auth/user")
        .insert_header((header::AUTHORIZATION, format!("Bearer {}", refresh)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get()
        .uri("/api/reservations")
        .insert_header((header::AUTHORIZATION, "Token abc"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn access_token_cannot_refresh() {
    let state = support::lazy_state();
    let access = issue_token(&state.config, 1, TokenType::Access).unwrap();
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/auth/token/refresh")
        .set_json(json!({ "refresh_token": access }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn google_login_rejects_bad_tokens() {
    let app = test_app!(support::lazy_state());
    let now = Utc::now().timestamp();

    let cases = [
        (json!({}), "Brak tokena"),
        (json!({ "id_token": "abc.def" }), "Nieprawidłowy format tokena"),
        (
            json!({ "id_token": google_token(json!({ "aud": support::CLIENT_ID, "exp": now + 60 })) }),
            "Brak emaila w tokenie",
        ),
        (
            json!({ "access_token": google_token(json!({
                "email": "jan@example.com",
                "aud": support::CLIENT_ID,
                "exp": now - 60,
            })) }),
            "Token wygasł",
        ),
        (
            json!({ "id_token": google_token(json!({
                "email": "jan@example.com",
                "aud": "someone-else",
                "exp": now + 60,
            })) }),
            "Nieprawidłowy audience",
        ),
    ];

    for (body, message) in cases {
        let req = test::TestRequest::post()
            .uri("/api/auth/google")
            .set_json(body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{}", message);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], message);
    }
}

#[actix_web::test]
async fn reservation_body_is_validated_before_storage() {
    let state = support::lazy_state();
    let access = issue_token(&state.config, 1, TokenType::Access).unwrap();
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/reservations/")
        .insert_header((header::AUTHORIZATION, format!("Bearer {}", access)))
        .set_json(json!({ "customerName": "Jan Kowalski", "passenger_count": 40000 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert!(body["fields"]["licensePlate"].is_array());
    assert!(body["fields"]["returnDate"].is_array());
    assert!(body["fields"]["passenger_count"].is_array());
    assert!(body["fields"].get("customerName").is_none());
}

#[actix_web::test]
async fn set_plan_rejects_unknown_codes() {
    let state = support::lazy_state();
    let access = issue_token(&state.config, 1, TokenType::Access).unwrap();
    let app = test_app!(state);

    for (body, message) in [
        (json!({}), "Brak kodu planu"),
        (json!({ "plan_code": "" }), "Brak kodu planu"),
        (json!({ "plan_code": "huge" }), "Nieprawidłowy kod planu"),
    ] {
        let req = test::TestRequest::post()
            .uri("/api/set-plan")
            .insert_header((header::AUTHORIZATION, format!("Bearer {}", access)))
            .set_json(body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], message);
    }
}

#[actix_web::test]
async fn malformed_json_is_a_client_error() {
    let app = test_app!(support::lazy_state());

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn logout_is_stateless() {
    let app = test_app!(support::lazy_state());

    let req = test::TestRequest::post().uri("/api/auth/logout").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["detail"], "Successfully logged out.");
}

#[actix_web::test]
async fn preflight_allows_listed_origin_with_credentials() {
    let app = test_app!(support::lazy_state());

    let req = test::TestRequest::default()
        .method(actix_web::http::Method::OPTIONS)
        .uri("/api/reservations")
        .insert_header((header::ORIGIN, support::ALLOWED_ORIGIN))
        .insert_header((header::ACCESS_CONTROL_REQUEST_METHOD, "PATCH"))
        .insert_header((
            header::ACCESS_CONTROL_REQUEST_HEADERS,
            "authorization, content-type",
        ))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let headers = resp.headers();
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        support::ALLOWED_ORIGIN
    );
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(),
        "true"
    );
    assert_eq!(headers.get(header::ACCESS_CONTROL_MAX_AGE).unwrap(), "86400");
}

#[actix_web::test]
async fn preflight_ignores_unlisted_origin() {
    let app = test_app!(support::lazy_state());

    let req = test::TestRequest::default()
        .method(actix_web::http::Method::OPTIONS)
        .uri("/api/reservations")
        .insert_header((header::ORIGIN, "http://evil.example.com"))
        .insert_header((header::ACCESS_CONTROL_REQUEST_METHOD, "GET"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert!(resp
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}

#[actix_web::test]
async fn oversized_amounts_are_rejected_before_storage() {
    let state = support::lazy_state();
    let access = issue_token(&state.config, 1, TokenType::Access).unwrap();
    let app = test_app!(state);

    let req = test::TestRequest::put()
        .uri("/api/pricing-settings")
        .insert_header((header::AUTHORIZATION, format!("Bearer {}", access)))
        .set_json(json!({ "day_1": "1e999999999", "extra_day": "-9E2000000000" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert!(body["fields"]["day_1"].is_array());
    assert!(body["fields"]["extra_day"].is_array());

    let req = test::TestRequest::post()
        .uri("/api/reservations")
        .insert_header((header::AUTHORIZATION, format!("Bearer {}", access)))
        .set_json(json!({
            "licensePlate": "ABC123",
            "customerName": "Jan Kowalski",
            "returnDate": "2025-06-01T10:00:00Z",
            "price": "1e999999999",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert!(body["fields"]["price"].is_array());
}
