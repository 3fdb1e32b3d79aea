pub mod server;
pub mod xsrf;

use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case")]
pub struct Configuration {
    pub server: server::Configuration,
    pub xsrf: xsrf::Configuration,
}

impl Configuration {
    pub async fn load<P>(path: P) -> eyre::Result<Self>
    where
        P: AsRef<Path>,
    {
        let content = fs::read_to_string(path).await?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> eyre::Result<Self> {
        toml::from_str(content).map_err(eyre::Report::from)
    }
}
