//! HTTP-level integration tests for workspaces, initiatives, tasks, and
//! checklists, including ownership isolation between users.

mod common;

use axum::http::{Method, StatusCode};
use common::{
    body_json, delete_auth, get_auth, post_json_auth, register_user, send_json_auth,
};
use sqlx::PgPool;

/// Create a workspace and return its id.
async fn create_workspace(app: axum::Router, token: &str, name: &str) -> i64 {
    let response = post_json_auth(
        app,
        "/api/v1/workspaces",
        token,
        serde_json::json!({ "name": name }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_i64().unwrap()
}

/// Full hierarchy flow: workspace -> initiative -> task -> checklist.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_entity_hierarchy_flow(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, _) = register_user(app.clone(), "planner@example.com").await;

    let ws_id = create_workspace(app.clone(), &token, "Product").await;

    // First initiative in a workspace gets identifier I-001.
    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/workspaces/{ws_id}/initiatives"),
        &token,
        serde_json::json!({ "title": "Onboarding", "description": "First-run flow" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let initiative = body_json(response).await;
    assert_eq!(initiative["identifier"], "I-001");
    let init_id = initiative["id"].as_i64().unwrap();

    // First task gets T-001 and defaults to Backlog (status 1).
    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/initiatives/{init_id}/tasks"),
        &token,
        serde_json::json!({ "title": "Design welcome screen" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let task = body_json(response).await;
    assert_eq!(task["identifier"], "T-001");
    assert_eq!(task["status_id"], 1);
    let task_id = task["id"].as_i64().unwrap();

    // Partial update: move the task to In Progress without touching the title.
    let response = send_json_auth(
        app.clone(),
        Method::PATCH,
        &format!("/api/v1/tasks/{task_id}"),
        &token,
        serde_json::json!({ "status_id": 3 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let task = body_json(response).await;
    assert_eq!(task["status_id"], 3);
    assert_eq!(task["title"], "Design welcome screen");

    // Replace the checklist; submission order becomes sort order.
    let response = send_json_auth(
        app.clone(),
        Method::PUT,
        &format!("/api/v1/tasks/{task_id}/checklist"),
        &token,
        serde_json::json!([
            { "title": "Sketch layout" },
            { "title": "Review copy", "is_complete": true },
        ]),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let items = body_json(response).await;
    assert_eq!(items.as_array().unwrap().len(), 2);
    assert_eq!(items[0]["title"], "Sketch layout");
    assert_eq!(items[0]["sort_order"], 0);
    assert_eq!(items[1]["is_complete"], true);

    let response = get_auth(
        app,
        &format!("/api/v1/tasks/{task_id}/checklist"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let items = body_json(response).await;
    assert_eq!(items.as_array().unwrap().len(), 2);
}

/// Soft delete hides an initiative; restore brings it back with the same
/// identifier.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_initiative_delete_and_restore(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, _) = register_user(app.clone(), "restorer@example.com").await;
    let ws_id = create_workspace(app.clone(), &token, "Restore").await;

    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/workspaces/{ws_id}/initiatives"),
        &token,
        serde_json::json!({ "title": "Doomed" }),
    )
    .await;
    let init_id = body_json(response).await["id"].as_i64().unwrap();

    let response = delete_auth(app.clone(), &format!("/api/v1/initiatives/{init_id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(app.clone(), &format!("/api/v1/initiatives/{init_id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send_json_auth(
        app.clone(),
        Method::POST,
        &format!("/api/v1/initiatives/{init_id}/restore"),
        &token,
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let restored = body_json(response).await;
    assert_eq!(restored["identifier"], "I-001");

    // Restoring a live initiative is a conflict.
    let response = send_json_auth(
        app.clone(),
        Method::POST,
        &format!("/api/v1/initiatives/{init_id}/restore"),
        &token,
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

/// Identifiers keep counting after deletes; sequence numbers are never reused.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_identifiers_never_reused(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, _) = register_user(app.clone(), "counter@example.com").await;
    let ws_id = create_workspace(app.clone(), &token, "Counting").await;

    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/workspaces/{ws_id}/initiatives"),
        &token,
        serde_json::json!({ "title": "First" }),
    )
    .await;
    let first_id = body_json(response).await["id"].as_i64().unwrap();

    delete_auth(app.clone(), &format!("/api/v1/initiatives/{first_id}"), &token).await;

    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/workspaces/{ws_id}/initiatives"),
        &token,
        serde_json::json!({ "title": "Second" }),
    )
    .await;
    let second = body_json(response).await;
    assert_eq!(second["identifier"], "I-002");
}

/// Blank titles and names are rejected on update just like on create, so a
/// partial update cannot blank out a required field.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_blank_fields_rejected_on_update(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, _) = register_user(app.clone(), "strict@example.com").await;
    let ws_id = create_workspace(app.clone(), &token, "Strict").await;

    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/workspaces/{ws_id}/initiatives"),
        &token,
        serde_json::json!({ "title": "Valid" }),
    )
    .await;
    let init_id = body_json(response).await["id"].as_i64().unwrap();

    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/initiatives/{init_id}/tasks"),
        &token,
        serde_json::json!({ "title": "Also valid" }),
    )
    .await;
    let task_id = body_json(response).await["id"].as_i64().unwrap();

    let response = send_json_auth(
        app.clone(),
        Method::PATCH,
        &format!("/api/v1/workspaces/{ws_id}"),
        &token,
        serde_json::json!({ "name": "   " }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send_json_auth(
        app.clone(),
        Method::PATCH,
        &format!("/api/v1/initiatives/{init_id}"),
        &token,
        serde_json::json!({ "title": "  " }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send_json_auth(
        app.clone(),
        Method::PATCH,
        &format!("/api/v1/tasks/{task_id}"),
        &token,
        serde_json::json!({ "title": "" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Leaving the field out entirely still updates the rest.
    let response = send_json_auth(
        app,
        Method::PATCH,
        &format!("/api/v1/initiatives/{init_id}"),
        &token,
        serde_json::json!({ "description": "Filled in" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["title"], "Valid");
}

/// One user's entities are invisible to another user, reads and writes alike.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_ownership_isolation(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (alice, _) = register_user(app.clone(), "alice@example.com").await;
    let (mallory, _) = register_user(app.clone(), "mallory@example.com").await;

    let ws_id = create_workspace(app.clone(), &alice, "Private").await;
    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/workspaces/{ws_id}/initiatives"),
        &alice,
        serde_json::json!({ "title": "Secret plan" }),
    )
    .await;
    let init_id = body_json(response).await["id"].as_i64().unwrap();

    // Foreign workspace and initiative reads 404 rather than 403, so ids
    // cannot be probed.
    let response = get_auth(app.clone(), &format!("/api/v1/workspaces/{ws_id}"), &mallory).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get_auth(app.clone(), &format!("/api/v1/initiatives/{init_id}"), &mallory).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send_json_auth(
        app.clone(),
        Method::PATCH,
        &format!("/api/v1/initiatives/{init_id}"),
        &mallory,
        serde_json::json!({ "title": "Hijacked" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Alice still sees her own list.
    let response = get_auth(app, "/api/v1/workspaces", &alice).await;
    let list = body_json(response).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
}
