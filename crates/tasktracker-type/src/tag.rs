use garde::Validate;
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: Option<i64>,
    pub name: String,
    pub color: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Serialize, TypedBuilder, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TagRequest {
    #[builder(setter(into))]
    #[garde(custom(crate::not_blank), length(chars, min = 1, max = 50))]
    pub name: String,

    /// Hex colour code, e.g. `#FF5733`
    #[builder(default, setter(into, strip_option))]
    #[garde(pattern(r"^#[0-9A-Fa-f]{6}$"))]
    pub color: Option<String>,
}
