mod common;

use self::common::{empty, json, primed, Log};
use http::{Method, StatusCode};
use pretty_assertions::assert_eq;
use tasktracker_error::ErrorType;
use tasktracker_service::task::TaskService;
use tasktracker_type::task::{TaskRequest, TaskStatus};

const TASK: &str = r#"{
    "id": 1,
    "title": "Buy milk",
    "description": "2 litres",
    "status": "TODO",
    "createdAt": "2024-05-01T10:00:00",
    "updatedAt": "2024-05-01T10:00:00",
    "tags": []
}"#;

#[tokio::test]
async fn list_own_and_foreign_tasks() {
    let log = Log::default();
    let client = primed(log.clone(), |_| json(StatusCode::OK, &format!("[{TASK}]"))).await;
    let tasks = TaskService::builder().client(client).build();

    let own = tasks.list(None).await.unwrap();
    assert_eq!(own.len(), 1);
    assert_eq!(own[0].title, "Buy milk");

    tasks.list(Some(3)).await.unwrap();

    let log = log.lock().unwrap();
    assert_eq!(log[0].path, "/api/tasks");
    assert_eq!(log[1].path, "/api/tasks/user/3");
    assert!(log.iter().all(|req| req.method == Method::GET));
    assert!(log.iter().all(|req| req.token().is_none()));
}

#[tokio::test]
async fn create_carries_token_and_json() {
    let log = Log::default();
    let client = primed(log.clone(), |_| json(StatusCode::CREATED, TASK)).await;
    let tasks = TaskService::builder().client(client).build();

    let request = TaskRequest::builder()
        .title("Buy milk")
        .description("2 litres")
        .build();
    let task = tasks.create(&request).await.unwrap();
    assert_eq!(task.id, Some(1));
    assert_eq!(task.status, TaskStatus::Todo);

    let log = log.lock().unwrap();
    assert_eq!(log[0].method, Method::POST);
    assert_eq!(log[0].path, "/api/tasks");
    assert_eq!(log[0].token(), Some("tok123"));
    assert_eq!(log[0].headers["content-type"], "application/json");
    assert_eq!(
        log[0].body(),
        r#"{"title":"Buy milk","description":"2 litres","status":"TODO"}"#
    );
}

#[tokio::test]
async fn invalid_task_never_leaves_the_client() {
    let log = Log::default();
    let client = primed(log.clone(), |_| json(StatusCode::CREATED, TASK)).await;
    let tasks = TaskService::builder().client(client).build();

    let error = tasks
        .create(&TaskRequest::builder().title(" ").build())
        .await
        .unwrap_err();

    assert!(matches!(error.error_type(), ErrorType::BadRequest(Some(..))));
    assert!(log.lock().unwrap().is_empty());
}

#[tokio::test]
async fn update_and_delete() {
    let log = Log::default();
    let client = primed(log.clone(), |req| {
        if req.method == Method::DELETE {
            empty(StatusCode::NO_CONTENT)
        } else {
            json(StatusCode::OK, TASK)
        }
    })
    .await;
    let tasks = TaskService::builder().client(client).build();

    let request = TaskRequest::builder()
        .title("Buy milk")
        .status(TaskStatus::Done)
        .build();
    tasks.update(1, &request).await.unwrap();
    tasks.delete(1).await.unwrap();

    let log = log.lock().unwrap();
    assert_eq!((&log[0].method, log[0].path.as_str()), (&Method::PUT, "/api/tasks/1"));
    assert_eq!((&log[1].method, log[1].path.as_str()), (&Method::DELETE, "/api/tasks/1"));
    assert!(log.iter().all(|req| req.token() == Some("tok123")));
}

#[tokio::test]
async fn search_encodes_query() {
    let log = Log::default();
    let client = primed(log.clone(), |_| json(StatusCode::OK, "[]")).await;
    let tasks = TaskService::builder().client(client).build();

    assert!(tasks.search("milk & honey").await.unwrap().is_empty());

    let log = log.lock().unwrap();
    assert_eq!(log[0].path, "/api/tasks/search");
    assert_eq!(log[0].query.as_deref(), Some("q=milk+%26+honey"));
}

#[tokio::test]
async fn missing_task() {
    let client = primed(Log::default(), |_| empty(StatusCode::NOT_FOUND)).await;
    let tasks = TaskService::builder().client(client).build();

    let error = tasks.get(42).await.unwrap_err();
    assert_eq!(error.error_type(), &ErrorType::NotFound);
}
