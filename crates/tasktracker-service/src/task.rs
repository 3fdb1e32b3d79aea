use crate::{validate, ApiClient};
use tasktracker_error::Result;
use tasktracker_type::task::{Task, TaskRequest};
use typed_builder::TypedBuilder;

#[derive(Clone, TypedBuilder)]
pub struct TaskService {
    client: ApiClient,
}

impl TaskService {
    /// Tasks of the current user, or of the given user
    pub async fn list(&self, user_id: Option<i64>) -> Result<Vec<Task>> {
        match user_id {
            Some(user_id) => self.client.get(&format!("/api/tasks/user/{user_id}")).await,
            None => self.client.get("/api/tasks").await,
        }
    }

    pub async fn get(&self, id: i64) -> Result<Task> {
        self.client.get(&format!("/api/tasks/{id}")).await
    }

    pub async fn create(&self, request: &TaskRequest) -> Result<Task> {
        validate(request)?;
        self.client.post("/api/tasks", request).await
    }

    pub async fn update(&self, id: i64, request: &TaskRequest) -> Result<Task> {
        validate(request)?;
        self.client.put(&format!("/api/tasks/{id}"), request).await
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.client.delete(&format!("/api/tasks/{id}")).await
    }

    pub async fn search(&self, query: &str) -> Result<Vec<Task>> {
        self.client.search("/api/tasks/search", query).await
    }
}
