use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case")]
pub struct Configuration {
    pub cookie_name: SmolStr,
    pub header_name: SmolStr,
    pub priming_path: SmolStr,
    pub response_header_name: SmolStr,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            cookie_name: SmolStr::new("XSRF-TOKEN"),
            header_name: SmolStr::new("X-XSRF-TOKEN"),
            priming_path: SmolStr::new("/api/csrf"),
            response_header_name: SmolStr::new("XSRF-TOKEN"),
        }
    }
}
