use crate::{validate, ApiClient};
use tasktracker_error::Result;
use tasktracker_type::profile::{Profile, ProfileRequest};
use typed_builder::TypedBuilder;

#[derive(Clone, TypedBuilder)]
pub struct ProfileService {
    client: ApiClient,
}

impl ProfileService {
    pub async fn get(&self) -> Result<Profile> {
        self.client.get("/api/profile").await
    }

    /// Update the profile of the current user
    ///
    /// Fails with a conflict if the e-mail address is taken by someone else.
    pub async fn update(&self, request: &ProfileRequest) -> Result<Profile> {
        validate(request)?;
        self.client.put("/api/profile", request).await
    }
}
