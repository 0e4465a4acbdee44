//! HTTP tests for listing and performing bulk actions.

mod common;

use axum::http::StatusCode;
use serde_json::json;
use sqlx::PgPool;

use common::{body_json, build_test_app, get, post_json, token_for};
use labelstack_db::models::organization::{CreateOrganization, CreateUser};
use labelstack_db::models::prediction::CreatePrediction;
use labelstack_db::models::project::CreateProject;
use labelstack_db::models::task::CreateTask;
use labelstack_db::repositories::{
    AnnotationRepo, OrganizationRepo, PredictionRepo, ProjectRepo, SummaryRepo, TaskRepo,
    UserRepo,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

struct Seed {
    manager_id: i64,
    annotator_id: i64,
    project_id: i64,
    task_a: i64,
    task_b: i64,
}

async fn create_user(pool: &PgPool, organization_id: i64, name: &str, role: &str) -> i64 {
    UserRepo::create(
        pool,
        &CreateUser {
            organization_id,
            email: format!("{name}@acme.test"),
            username: name.to_string(),
            role: role.to_string(),
        },
    )
    .await
    .unwrap()
    .id
}

/// One project (current model `v1`) with two tasks. Task A has a `v1` and a
/// `v2` prediction, task B a single `v1` prediction.
async fn seed(pool: &PgPool) -> Seed {
    let org = OrganizationRepo::create(pool, &CreateOrganization { title: "Acme".into() })
        .await
        .unwrap();
    let manager_id = create_user(pool, org.id, "manager", "manager").await;
    let annotator_id = create_user(pool, org.id, "annotator", "annotator").await;

    let project = ProjectRepo::create(
        pool,
        &CreateProject {
            organization_id: org.id,
            title: "Sentiment".into(),
            maximum_annotations: None,
            model_version: Some("v1".into()),
            created_by: Some(manager_id),
        },
    )
    .await
    .unwrap();

    let mut tasks = Vec::new();
    for _ in 0..2 {
        let task = TaskRepo::create(pool, &CreateTask { project_id: project.id, data: json!({"text": "ok"}) })
            .await
            .unwrap();
        tasks.push(task.id);
    }

    for (task_id, version, label) in [
        (tasks[0], "v1", "positive"),
        (tasks[0], "v2", "negative"),
        (tasks[1], "v1", "neutral"),
    ] {
        PredictionRepo::create(
            pool,
            &CreatePrediction {
                task_id,
                result: json!([{
                    "from_name": "sentiment", "to_name": "text", "type": "choices",
                    "value": {"choices": [label]}
                }]),
                score: Some(0.8),
                model_version: Some(version.to_string()),
            },
        )
        .await
        .unwrap();
    }

    Seed {
        manager_id,
        annotator_id,
        project_id: project.id,
        task_a: tasks[0],
        task_b: tasks[1],
    }
}

fn actions_uri(project_id: i64) -> String {
    format!("/api/v1/projects/{project_id}/actions")
}

fn perform_uri(project_id: i64) -> String {
    format!("/api/v1/projects/{project_id}/actions/predictions_to_annotations")
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_renders_model_version_form(pool: PgPool) {
    let seed = seed(&pool).await;
    let token = token_for(seed.manager_id, "manager");

    let response = get(build_test_app(pool), &actions_uri(seed.project_id), Some(&token)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let actions = json["data"].as_array().unwrap();
    assert_eq!(actions.len(), 1);

    let action = &actions[0];
    assert_eq!(action["id"], "predictions_to_annotations");
    assert_eq!(action["title"], "Create Annotations From Predictions");
    assert_eq!(action["order"], 91);
    assert_eq!(action["permission"], "tasks_change");
    assert_eq!(action["dialog"]["type"], "confirm");

    let field = &action["dialog"]["form"][0]["fields"][0];
    assert_eq!(field["name"], "model_version");
    assert_eq!(field["type"], "select");
    // The project's current version leads.
    assert_eq!(field["options"][0], "v1");
    assert_eq!(field["options"].as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_annotator_sees_no_actions(pool: PgPool) {
    let seed = seed(&pool).await;
    let token = token_for(seed.annotator_id, "annotator");

    let response = get(build_test_app(pool), &actions_uri(seed.project_id), Some(&token)).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"], json!([]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_requires_token(pool: PgPool) {
    let seed = seed(&pool).await;

    let response = get(build_test_app(pool), &actions_uri(seed.project_id), None).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "UNAUTHORIZED");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_deactivated_user_is_rejected(pool: PgPool) {
    let seed = seed(&pool).await;
    let token = token_for(seed.manager_id, "manager");
    sqlx::query("UPDATE users SET is_active = false WHERE id = $1")
        .bind(seed.manager_id)
        .execute(&pool)
        .await
        .unwrap();

    let response = get(build_test_app(pool), &actions_uri(seed.project_id), Some(&token)).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Performing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_convert_selected_tasks_for_one_version(pool: PgPool) {
    let seed = seed(&pool).await;
    let token = token_for(seed.manager_id, "manager");

    let response = post_json(
        build_test_app(pool.clone()),
        &perform_uri(seed.project_id),
        Some(&token),
        json!({
            "selected_items": {"all": true, "excluded": []},
            "model_version": "v1",
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json, json!({"response_code": 200, "detail": "Created 2 annotations"}));

    let annotations = AnnotationRepo::list_by_task(&pool, seed.task_a).await.unwrap();
    assert_eq!(annotations.len(), 1);
    assert_eq!(annotations[0].completed_by, seed.manager_id);
    assert_eq!(annotations[0].origin, "prediction");
    assert_eq!(annotations[0].result[0]["value"]["choices"][0], "positive");

    // Recalculation ran inline before the response.
    let task_a = TaskRepo::find_by_id(&pool, seed.task_a).await.unwrap().unwrap();
    assert_eq!(task_a.total_annotations, 1);
    assert!(task_a.is_labeled);
    assert_eq!(task_a.updated_by, Some(seed.manager_id));

    let summary = SummaryRepo::find(&pool, seed.project_id).await.unwrap().unwrap();
    assert_eq!(summary.created_annotations, json!({"sentiment|text|choices": 2}));
    assert_eq!(
        summary.created_labels,
        json!({"sentiment": {"positive": 1, "neutral": 1}})
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_second_run_converts_nothing(pool: PgPool) {
    let seed = seed(&pool).await;
    let token = token_for(seed.manager_id, "manager");
    let body = json!({"selected_items": {"all": false, "included": [seed.task_a, seed.task_b]}});

    let first = post_json(
        build_test_app(pool.clone()),
        &perform_uri(seed.project_id),
        Some(&token),
        body.clone(),
    )
    .await;
    assert_eq!(body_json(first).await["detail"], "Created 3 annotations");

    let second = post_json(
        build_test_app(pool.clone()),
        &perform_uri(seed.project_id),
        Some(&token),
        body,
    )
    .await;
    assert_eq!(second.status(), StatusCode::OK);
    assert_eq!(body_json(second).await["detail"], "Created 0 annotations");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_excluded_task_is_left_alone(pool: PgPool) {
    let seed = seed(&pool).await;
    let token = token_for(seed.manager_id, "manager");

    let response = post_json(
        build_test_app(pool.clone()),
        &perform_uri(seed.project_id),
        Some(&token),
        json!({
            "selected_items": {"all": true, "excluded": [seed.task_a]},
            "model_version": ["v1", "v2"],
        }),
    )
    .await;

    assert_eq!(body_json(response).await["detail"], "Created 1 annotations");
    assert!(AnnotationRepo::list_by_task(&pool, seed.task_a)
        .await
        .unwrap()
        .is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_annotator_cannot_convert(pool: PgPool) {
    let seed = seed(&pool).await;
    let token = token_for(seed.annotator_id, "annotator");

    let response = post_json(
        build_test_app(pool.clone()),
        &perform_uri(seed.project_id),
        Some(&token),
        json!({"selected_items": {"all": true, "excluded": []}}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["code"], "FORBIDDEN");
    assert!(AnnotationRepo::list_by_task(&pool, seed.task_b)
        .await
        .unwrap()
        .is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unknown_action_is_404(pool: PgPool) {
    let seed = seed(&pool).await;
    let token = token_for(seed.manager_id, "manager");

    let response = post_json(
        build_test_app(pool),
        &format!("{}/delete_everything", actions_uri(seed.project_id)),
        Some(&token),
        json!({}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_foreign_project_is_404(pool: PgPool) {
    let seed = seed(&pool).await;
    let other_org = OrganizationRepo::create(&pool, &CreateOrganization { title: "Other".into() })
        .await
        .unwrap();
    let outsider = create_user(&pool, other_org.id, "outsider", "owner").await;
    let token = token_for(outsider, "owner");

    let response = post_json(
        build_test_app(pool.clone()),
        &perform_uri(seed.project_id),
        Some(&token),
        json!({"selected_items": {"all": true, "excluded": []}}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(AnnotationRepo::list_by_task(&pool, seed.task_a)
        .await
        .unwrap()
        .is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_malformed_model_version_is_400(pool: PgPool) {
    let seed = seed(&pool).await;
    let token = token_for(seed.manager_id, "manager");

    let response = post_json(
        build_test_app(pool),
        &perform_uri(seed.project_id),
        Some(&token),
        json!({"selected_items": {"all": true, "excluded": []}, "model_version": 7}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}
