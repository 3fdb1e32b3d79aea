use serde::Deserialize;

/// Settings taken from `TASKTRACKER_*` environment variables
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
pub struct Environment {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Environment {
    pub fn from_env() -> envy::Result<Self> {
        envy::prefixed("TASKTRACKER_").from_env()
    }
}
