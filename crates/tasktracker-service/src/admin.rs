use crate::{ApiClient, EmptyObject};
use tasktracker_error::Result;
use tasktracker_type::user::User;
use typed_builder::TypedBuilder;

/// User management, only available to administrators
#[derive(Clone, TypedBuilder)]
pub struct AdminService {
    client: ApiClient,
}

impl AdminService {
    pub async fn users(&self) -> Result<Vec<User>> {
        self.client.get("/api/admin/users").await
    }

    /// Flip the `enabled` flag of a user and return the updated user
    pub async fn toggle_enabled(&self, id: i64) -> Result<User> {
        self.client
            .put(&format!("/api/admin/users/{id}/enable"), &EmptyObject {})
            .await
    }
}
