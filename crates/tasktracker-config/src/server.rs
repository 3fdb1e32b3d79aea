use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case")]
pub struct Configuration {
    pub base_url: SmolStr,
    pub content_length_limit: usize,
    pub request_timeout_secs: u64,
    pub user_agent: Option<SmolStr>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            base_url: SmolStr::new("http://localhost:8080"),
            content_length_limit: 1024 * 1024,
            request_timeout_secs: 30,
            user_agent: None,
        }
    }
}
