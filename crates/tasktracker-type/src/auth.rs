use garde::Validate;
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    pub token: Option<String>,
    pub username: Option<String>,
    pub role: Option<String>,
}

impl AuthResponse {
    #[must_use]
    pub fn failure<M>(message: M) -> Self
    where
        M: Into<String>,
    {
        Self {
            success: false,
            message: message.into(),
            ..Self::default()
        }
    }
}

#[derive(Clone, Deserialize, Serialize, TypedBuilder, Validate)]
pub struct LoginRequest {
    #[builder(setter(into))]
    #[garde(custom(crate::not_blank))]
    pub username: String,

    #[builder(setter(into))]
    #[garde(custom(crate::not_blank))]
    pub password: String,
}

#[derive(Clone, Deserialize, Serialize, TypedBuilder, Validate)]
pub struct RegisterRequest {
    #[builder(setter(into))]
    #[garde(length(chars, min = 3, max = 50))]
    pub username: String,

    #[builder(setter(into))]
    #[garde(email)]
    pub email: String,

    #[builder(setter(into))]
    #[garde(length(chars, min = 8))]
    pub password: String,
}
