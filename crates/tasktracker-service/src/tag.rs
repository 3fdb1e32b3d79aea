use crate::{validate, ApiClient};
use tasktracker_error::Result;
use tasktracker_type::tag::{Tag, TagRequest};
use typed_builder::TypedBuilder;

#[derive(Clone, TypedBuilder)]
pub struct TagService {
    client: ApiClient,
}

impl TagService {
    pub async fn list(&self, user_id: Option<i64>) -> Result<Vec<Tag>> {
        match user_id {
            Some(user_id) => self.client.get(&format!("/api/tags/user/{user_id}")).await,
            None => self.client.get("/api/tags").await,
        }
    }

    pub async fn get(&self, id: i64) -> Result<Tag> {
        self.client.get(&format!("/api/tags/{id}")).await
    }

    pub async fn create(&self, request: &TagRequest) -> Result<Tag> {
        validate(request)?;
        self.client.post("/api/tags", request).await
    }

    pub async fn update(&self, id: i64, request: &TagRequest) -> Result<Tag> {
        validate(request)?;
        self.client.put(&format!("/api/tags/{id}"), request).await
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.client.delete(&format!("/api/tags/{id}")).await
    }

    /// Tags whose name contains `query`
    pub async fn search(&self, query: &str) -> Result<Vec<Tag>> {
        self.client.search("/api/tags/search", query).await
    }

    /// Number of tags the current user owns
    pub async fn count(&self) -> Result<u64> {
        self.client.get("/api/tags/count").await
    }
}
