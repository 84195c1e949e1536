use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use serde_json::Value;
use stats_core::SourceKind;
use tracing::{debug, warn};

use crate::adapters::CountSource;
use crate::http::{HttpClient, parse_url, url_with_segments};
use crate::types::{Result, SourceError};
use crate::values::{as_count, find_value};

static NEXT_DATA_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<script\s+id="__NEXT_DATA__"[^>]*>(.*?)</script>"#)
        .expect("valid __NEXT_DATA__ pattern")
});

const SOLVED_PATHS: [&[&str]; 3] = [
    &["userInfo", "total_problems_solved"],
    &[
        "initialState",
        "userProfileApi",
        "getUserInfo",
        "data",
        "total_problems_solved",
    ],
    &[
        "initialState",
        "userProfileApi",
        "getUserInfo",
        "data",
        "data",
        "total_problems_solved",
    ],
];

/// Pulls the embedded `__NEXT_DATA__` JSON out of a profile page.
pub fn extract_next_data(html: &str) -> Result<Value> {
    let captures = NEXT_DATA_RE
        .captures(html)
        .and_then(|captures| captures.get(1))
        .ok_or_else(|| SourceError::MissingPayload("no __NEXT_DATA__ found".to_string()))?;
    Ok(serde_json::from_str(captures.as_str())?)
}

/// First non-zero solved count among the known profile layouts, else 0.
pub fn total_problems_solved(next_data: &Value) -> u64 {
    let root = find_value(next_data, &["props", "pageProps"])
        .or_else(|| find_value(next_data, &["props"]))
        .unwrap_or(next_data);
    SOLVED_PATHS
        .iter()
        .filter_map(|path| find_value(root, path))
        .filter_map(as_count)
        .find(|count| *count > 0)
        .unwrap_or(0)
}

pub fn count_from_profile_html(html: &str) -> Result<u64> {
    let next_data = extract_next_data(html)?;
    Ok(total_problems_solved(&next_data))
}

/// GeeksforGeeks profile scraper with an optional count proxy in front.
pub struct GfgProfile {
    http: HttpClient,
    profile_base: String,
    proxy: Option<String>,
}

impl GfgProfile {
    pub fn new(http: HttpClient, profile_base: impl Into<String>, proxy: Option<String>) -> Self {
        Self {
            http,
            profile_base: profile_base.into(),
            proxy,
        }
    }

    /// Fetches and parses the profile page, bypassing any proxy.
    pub async fn fetch_direct(&self, user: &str) -> Result<u64> {
        let url = url_with_segments(&self.profile_base, &[user, ""])?;
        let html = self.http.get_text(url).await?;
        count_from_profile_html(&html)
    }

    async fn fetch_via_proxy(&self, proxy: &str, user: &str) -> Result<u64> {
        let mut url = parse_url(proxy)?;
        url.query_pairs_mut().append_pair("user", user);
        let body = self.http.get_json(url).await?;
        body.get("count")
            .and_then(as_count)
            .ok_or_else(|| SourceError::Shape("proxy response has no numeric count".to_string()))
    }
}

#[async_trait]
impl CountSource for GfgProfile {
    fn kind(&self) -> SourceKind {
        SourceKind::GfgProfile
    }

    async fn solved_count(&self, user: &str) -> Result<u64> {
        if let Some(proxy) = self.proxy.as_deref() {
            match self.fetch_via_proxy(proxy, user).await {
                Ok(count) => {
                    debug!(user, count, "gfg count from proxy");
                    return Ok(count);
                }
                Err(err) => warn!(%err, "gfg proxy failed, fetching profile directly"),
            }
        }
        self.fetch_direct(user).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn page(next_data: &str) -> String {
        format!(
            "<html><head></head><body><div id=\"__next\"></div>\
             <SCRIPT id=\"__NEXT_DATA__\" type=\"application/json\">{next_data}</SCRIPT></body></html>"
        )
    }

    #[test]
    fn reads_user_info_from_page_props() {
        let html = page(r#"{"props":{"pageProps":{"userInfo":{"total_problems_solved":321}}}}"#);
        assert_eq!(count_from_profile_html(&html).expect("count"), 321);
    }

    #[test]
    fn falls_through_zero_to_nested_profile_api() {
        let data = json!({
            "props": {"pageProps": {
                "userInfo": {"total_problems_solved": 0},
                "initialState": {"userProfileApi": {"getUserInfo": {"data": {
                    "data": {"total_problems_solved": "88"}
                }}}}
            }}
        });
        assert_eq!(total_problems_solved(&data), 88);
    }

    #[test]
    fn root_without_props_is_searched_directly() {
        let data = json!({"userInfo": {"total_problems_solved": 12}});
        assert_eq!(total_problems_solved(&data), 12);
        assert_eq!(total_problems_solved(&json!({"props": {}})), 0);
    }

    #[test]
    fn missing_script_is_missing_payload() {
        assert!(matches!(
            count_from_profile_html("<html><body>maintenance</body></html>"),
            Err(SourceError::MissingPayload(_))
        ));
    }

    #[test]
    fn malformed_script_is_a_json_error() {
        assert!(matches!(
            count_from_profile_html(&page("{not json")),
            Err(SourceError::Json(_))
        ));
    }
}
