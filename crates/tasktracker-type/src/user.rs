use serde::{Deserialize, Serialize};

/// Account as seen through the administration endpoints
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub enabled: bool,
    pub role: String,
}
