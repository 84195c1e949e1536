use serde::{Deserialize, Serialize};

/// Errors emitted by third-party source adapters.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("upstream returned status {status}")]
    UpstreamStatus { status: u16 },
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unexpected response shape: {0}")]
    Shape(String),
    #[error("{0}")]
    MissingPayload(String),
    #[error("invalid url {url}")]
    InvalidUrl { url: String },
}

pub type Result<T> = std::result::Result<T, SourceError>;

/// Base URLs of every upstream source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceEndpoints {
    pub leetcode_mirror: String,
    pub leetcode_graphql: String,
    pub github_contributions: String,
    pub github_api: String,
    pub gfg_profile: String,
    pub gfg_proxy: Option<String>,
}

impl Default for SourceEndpoints {
    fn default() -> Self {
        Self {
            leetcode_mirror: "https://leetcode-stats-api.herokuapp.com".to_string(),
            leetcode_graphql: "https://leetcode.com/graphql".to_string(),
            github_contributions: "https://github-contributions-api.deno.dev".to_string(),
            github_api: "https://api.github.com".to_string(),
            gfg_profile: "https://www.geeksforgeeks.org/user".to_string(),
            gfg_proxy: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpSettings {
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            user_agent: concat!("Mozilla/5.0 (compatible; codestats/", env!("CARGO_PKG_VERSION"), ")")
                .to_string(),
        }
    }
}
