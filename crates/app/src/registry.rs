use std::sync::Arc;

use sources::{
    ContestSource, ContributionSource, CountSource, GfgProfile, GithubContributions, HttpClient,
    HttpSettings, LeetcodeGraphql, LeetcodeMirror, SourceEndpoints, TieredSource,
};

use crate::error::Result;

/// Source adapters the services aggregate over.
#[derive(Clone)]
pub struct SourceSet {
    /// Breakdown sources, tried in order until one succeeds.
    pub tiered: Vec<Arc<dyn TieredSource>>,
    /// Count-only sources, summed and allocated across tiers.
    pub untiered: Vec<Arc<dyn CountSource>>,
    pub contests: Option<Arc<dyn ContestSource>>,
    pub contributions: Arc<dyn ContributionSource>,
    /// Direct profile-page count behind the public count endpoint. Never
    /// routed through the proxy.
    pub profile_page: Arc<dyn CountSource>,
}

impl SourceSet {
    pub fn from_endpoints(endpoints: &SourceEndpoints, http: &HttpSettings) -> Result<Self> {
        let client = HttpClient::new(http)?;
        let mirror = Arc::new(LeetcodeMirror::new(
            client.clone(),
            endpoints.leetcode_mirror.clone(),
        ));
        let graphql = Arc::new(LeetcodeGraphql::new(
            client.clone(),
            endpoints.leetcode_graphql.clone(),
        ));
        let gfg = Arc::new(GfgProfile::new(
            client.clone(),
            endpoints.gfg_profile.clone(),
            endpoints.gfg_proxy.clone(),
        ));
        let gfg_page = Arc::new(GfgProfile::new(
            client.clone(),
            endpoints.gfg_profile.clone(),
            None,
        ));
        let github = Arc::new(GithubContributions::new(
            client,
            endpoints.github_contributions.clone(),
            endpoints.github_api.clone(),
        ));
        Ok(Self {
            tiered: vec![
                mirror as Arc<dyn TieredSource>,
                graphql.clone() as Arc<dyn TieredSource>,
            ],
            untiered: vec![gfg as Arc<dyn CountSource>],
            contests: Some(graphql as Arc<dyn ContestSource>),
            contributions: github,
            profile_page: gfg_page,
        })
    }
}
