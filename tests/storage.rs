/// Project storage integration tests
///
/// Runs the CRUD surface against an in-memory SQLite database.

use flowpilot::project::{
    types::{CreatePreRegistration, CreateProject, ProjectStatus, UpdateProject},
    ProjectStorage,
};
use serde_json::json;
use sqlx::sqlite::SqlitePoolOptions;

async fn storage() -> ProjectStorage {
    // One connection: each pooled connection would otherwise get its own
    // empty in-memory database.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory database");
    let storage = ProjectStorage::new(pool);
    storage.init_schema().await.expect("schema init");
    storage
}

fn create(name: &str) -> CreateProject {
    CreateProject {
        name: name.to_string(),
        description: None,
        prompt: Some("automate order intake".to_string()),
    }
}

#[tokio::test]
async fn create_and_get_round_trip() {
    let storage = storage().await;
    let created = storage.create_project(create("Orders")).await.unwrap();

    assert_eq!(created.status, ProjectStatus::Draft);
    assert!(!created.id.is_empty());

    let fetched = storage.get_project(&created.id).await.unwrap().unwrap();
    assert_eq!(fetched.name, "Orders");
    assert_eq!(fetched.prompt.as_deref(), Some("automate order intake"));
    assert!(fetched.flow_json.is_none());
}

#[tokio::test]
async fn partial_update_persists_flow_and_bumps_timestamp() {
    let storage = storage().await;
    let created = storage.create_project(create("Orders")).await.unwrap();

    let flow = json!({"name": "F", "nodes": [{"name": "A"}], "connections": {}});
    let updated = storage
        .update_project(
            &created.id,
            UpdateProject {
                flow_json: Some(flow.clone()),
                status: Some(ProjectStatus::Deployed),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();

    // Untouched fields survive, updated ones change.
    assert_eq!(updated.name, "Orders");
    assert_eq!(updated.flow_json, Some(flow));
    assert_eq!(updated.status, ProjectStatus::Deployed);
    assert!(updated.updated_at >= created.updated_at);
}

#[tokio::test]
async fn update_of_unknown_project_is_none() {
    let storage = storage().await;
    let result = storage
        .update_project("does-not-exist", UpdateProject::default())
        .await
        .unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn list_orders_by_most_recently_updated() {
    let storage = storage().await;
    let first = storage.create_project(create("First")).await.unwrap();
    let _second = storage.create_project(create("Second")).await.unwrap();

    // Touch the first project so it becomes the most recent.
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    storage
        .update_project(
            &first.id,
            UpdateProject {
                description: Some("touched".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let listed = storage.list_projects().await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, first.id);
}

#[tokio::test]
async fn pre_registrations_are_appended_and_listed_in_order() {
    let storage = storage().await;

    let first = storage
        .create_pre_registration(CreatePreRegistration {
            email: "ada@example.com".to_string(),
            name: Some("Ada".to_string()),
            company: None,
            use_case: Some("order intake automation".to_string()),
        })
        .await
        .unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    storage
        .create_pre_registration(CreatePreRegistration {
            email: "grace@example.com".to_string(),
            name: None,
            company: Some("Acme".to_string()),
            use_case: None,
        })
        .await
        .unwrap();

    let listed = storage.list_pre_registrations().await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, first.id);
    assert_eq!(listed[0].email, "ada@example.com");
    assert_eq!(listed[1].company.as_deref(), Some("Acme"));
}

#[tokio::test]
async fn delete_reports_whether_a_row_existed() {
    let storage = storage().await;
    let created = storage.create_project(create("Orders")).await.unwrap();

    assert!(storage.delete_project(&created.id).await.unwrap());
    assert!(!storage.delete_project(&created.id).await.unwrap());
    assert!(storage.get_project(&created.id).await.unwrap().is_none());
}
