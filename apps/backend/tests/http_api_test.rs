//! HTTP-level tests: extractors, problem+json error shape, and the party
//! routes wired the same way `main` wires them.

mod support;

use std::time::SystemTime;

use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use backend::auth::jwt::mint_access_token;
use backend::routes;
use backend::state::app_state::AppState;
use serde_json::Value;
use support::factory::{create_match, create_user, MatchSpec};
use support::test_state;

fn bearer(state: &AppState, user_id: i64) -> (&'static str, String) {
    let token = mint_access_token(user_id, SystemTime::now(), &state.security)
        .expect("mint access token");
    ("Authorization", format!("Bearer {token}"))
}

#[actix_web::test]
async fn register_join_and_roster_over_http() {
    let state = test_state().await;
    let db = state.db().unwrap();
    let match_ = create_match(db, MatchSpec::default()).await;
    let alice = create_user(db, "alice").await;
    let bob = create_user(db, "bob").await;

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state.clone()))
            .configure(routes::configure),
    )
    .await;

    // Alice registers and receives her invite token
    let req = test::TestRequest::post()
        .uri(&format!("/api/matches/{}/register", match_.slug))
        .insert_header(bearer(&state, alice.id))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let token = body["party_token"].as_str().expect("party_token").to_string();
    assert_eq!(token.len(), 32);

    // Bob registers, then joins via the token
    let req = test::TestRequest::post()
        .uri(&format!("/api/matches/{}/register", match_.slug))
        .insert_header(bearer(&state, bob.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri("/api/parties/join")
        .insert_header(bearer(&state, bob.id))
        .set_json(serde_json::json!({ "party": token }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let members = body["members"].as_array().expect("members");
    assert_eq!(members.len(), 2);
}

#[actix_web::test]
async fn unknown_token_yields_problem_details() {
    let state = test_state().await;
    let db = state.db().unwrap();
    let match_ = create_match(db, MatchSpec::default()).await;
    let alice = create_user(db, "alice").await;

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state.clone()))
            .configure(routes::configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/matches/{}/register", match_.slug))
        .insert_header(bearer(&state, alice.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri("/api/parties/join")
        .insert_header(bearer(&state, alice.id))
        .set_json(serde_json::json!({ "party": "definitely-not-a-token" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        resp.headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok()),
        Some("application/problem+json")
    );

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "PARTY_NOT_FOUND");
    assert_eq!(body["status"], 404);
    assert!(body["trace_id"].is_string());
}

#[actix_web::test]
async fn missing_bearer_is_unauthorized() {
    let state = test_state().await;
    let db = state.db().unwrap();
    let match_ = create_match(db, MatchSpec::default()).await;

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state.clone()))
            .configure(routes::configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/matches/{}/register", match_.slug))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "UNAUTHORIZED_MISSING_BEARER");
}

#[actix_web::test]
async fn malformed_body_is_bad_request() {
    let state = test_state().await;
    let db = state.db().unwrap();
    let alice = create_user(db, "alice").await;

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state.clone()))
            .configure(routes::configure),
    )
    .await;

    // Missing the required "party" field
    let req = test::TestRequest::post()
        .uri("/api/parties/join")
        .insert_header(bearer(&state, alice.id))
        .set_json(serde_json::json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "BAD_REQUEST");
}
