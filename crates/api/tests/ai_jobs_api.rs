//! HTTP-level integration tests for AI job submission, supersession,
//! cancellation, and the billing gate.

mod common;

use axum::http::{Method, StatusCode};
use common::{body_json, get_auth, post_json_auth, register_user, send_json_auth};
use loopline_api::auth::password::hash_password;
use loopline_db::models::user::CreateUser;
use loopline_db::repositories::UserRepo;
use sqlx::PgPool;

/// Create an admin directly in the database and return a login token.
async fn admin_token(app: axum::Router, pool: &PgPool) -> String {
    let input = CreateUser {
        email: "admin@example.com".into(),
        password_hash: hash_password("admin_password_123").unwrap(),
        display_name: "Admin".into(),
        role: Some("admin".into()),
    };
    UserRepo::create(pool, &input).await.unwrap();

    let response = common::post_json(
        app,
        "/api/v1/auth/login",
        serde_json::json!({ "email": "admin@example.com", "password": "admin_password_123" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["access_token"]
        .as_str()
        .unwrap()
        .to_string()
}

/// Credit a user's account through the admin endpoint.
async fn credit(app: axum::Router, admin: &str, user_id: i64, cents: i64) {
    let response = post_json_auth(
        app,
        "/api/v1/billing/credit",
        admin,
        serde_json::json!({ "user_id": user_id, "amount_cents": cents }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

fn submit_body(workspace_id: i64, lens: &str) -> serde_json::Value {
    serde_json::json!({
        "workspace_id": workspace_id,
        "lens": lens,
        "mode": "edit",
        "input_data": { "entities": [], "thread": [] },
    })
}

/// Submission with a zero balance is refused with 402.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_submit_requires_positive_balance(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, _) = register_user(app.clone(), "broke@example.com").await;

    let response = post_json_auth(
        app.clone(),
        "/api/v1/workspaces",
        &token,
        serde_json::json!({ "name": "W" }),
    )
    .await;
    let ws_id = body_json(response).await["id"].as_i64().unwrap();

    let response =
        post_json_auth(app, "/api/v1/ai/jobs", &token, submit_body(ws_id, "tasks")).await;
    assert_eq!(response.status(), StatusCode::PAYMENT_REQUIRED);
}

/// Unknown lens and mode values never reach the queue.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_submit_rejects_unknown_lens(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, _) = register_user(app.clone(), "lensy@example.com").await;

    let response = post_json_auth(
        app,
        "/api/v1/ai/jobs",
        &token,
        serde_json::json!({
            "workspace_id": 1,
            "lens": "epics",
            "mode": "edit",
            "input_data": {},
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// A new submission deletes the user's older pending job for the same lens
/// but leaves other lenses alone.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_submit_supersedes_same_lens(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (token, user_id) = register_user(app.clone(), "super@example.com").await;
    let admin = admin_token(app.clone(), &pool).await;
    credit(app.clone(), &admin, user_id, 1000).await;

    let response = post_json_auth(
        app.clone(),
        "/api/v1/workspaces",
        &token,
        serde_json::json!({ "name": "W" }),
    )
    .await;
    let ws_id = body_json(response).await["id"].as_i64().unwrap();

    let response =
        post_json_auth(app.clone(), "/api/v1/ai/jobs", &token, submit_body(ws_id, "tasks")).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let old_tasks_job = body_json(response).await["id"].as_i64().unwrap();

    let response = post_json_auth(
        app.clone(),
        "/api/v1/ai/jobs",
        &token,
        submit_body(ws_id, "initiatives"),
    )
    .await;
    let initiatives_job = body_json(response).await["id"].as_i64().unwrap();

    // Resubmit under the tasks lens: the old tasks job is deleted.
    let response =
        post_json_auth(app.clone(), "/api/v1/ai/jobs", &token, submit_body(ws_id, "tasks")).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let new_tasks_job = body_json(response).await["id"].as_i64().unwrap();
    assert_ne!(new_tasks_job, old_tasks_job);

    let response = get_auth(
        app.clone(),
        &format!("/api/v1/ai/jobs/{old_tasks_job}"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // The other lens and the fresh job are untouched and still pending.
    for id in [initiatives_job, new_tasks_job] {
        let response = get_auth(app.clone(), &format!("/api/v1/ai/jobs/{id}"), &token).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status_id"], 1);
    }
}

/// Cancelling a pending job works once; cancelling again is a conflict.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_cancel_pending_job(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (token, user_id) = register_user(app.clone(), "cancel@example.com").await;
    let admin = admin_token(app.clone(), &pool).await;
    credit(app.clone(), &admin, user_id, 500).await;

    let response = post_json_auth(
        app.clone(),
        "/api/v1/workspaces",
        &token,
        serde_json::json!({ "name": "W" }),
    )
    .await;
    let ws_id = body_json(response).await["id"].as_i64().unwrap();

    let response =
        post_json_auth(app.clone(), "/api/v1/ai/jobs", &token, submit_body(ws_id, "tasks")).await;
    let job_id = body_json(response).await["id"].as_i64().unwrap();

    let response = send_json_auth(
        app.clone(),
        Method::POST,
        &format!("/api/v1/ai/jobs/{job_id}/cancel"),
        &token,
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status_id"], 5);

    let response = send_json_auth(
        app,
        Method::POST,
        &format!("/api/v1/ai/jobs/{job_id}/cancel"),
        &token,
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

/// Jobs are private to their submitter.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_jobs_are_private(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (alice, alice_id) = register_user(app.clone(), "alice@example.com").await;
    let (mallory, _) = register_user(app.clone(), "mallory@example.com").await;
    let admin = admin_token(app.clone(), &pool).await;
    credit(app.clone(), &admin, alice_id, 500).await;

    let response = post_json_auth(
        app.clone(),
        "/api/v1/workspaces",
        &alice,
        serde_json::json!({ "name": "W" }),
    )
    .await;
    let ws_id = body_json(response).await["id"].as_i64().unwrap();

    let response =
        post_json_auth(app.clone(), "/api/v1/ai/jobs", &alice, submit_body(ws_id, "tasks")).await;
    let job_id = body_json(response).await["id"].as_i64().unwrap();

    let response = get_auth(app.clone(), &format!("/api/v1/ai/jobs/{job_id}"), &mallory).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get_auth(app, "/api/v1/ai/jobs", &mallory).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_json(response).await.as_array().unwrap().is_empty());
}
