use serde::Deserialize;
use stats_app::{ProfileParams, SettingsUpdate};

#[derive(Debug, Deserialize, Default)]
pub struct EmptyRequest {}

/// Optional per-request usernames; unset fields use stored settings.
#[derive(Debug, Deserialize, Default)]
pub struct ProfileRequest {
    pub leetcode: Option<String>,
    pub github: Option<String>,
    pub gfg: Option<String>,
}

impl From<ProfileRequest> for ProfileParams {
    fn from(req: ProfileRequest) -> Self {
        ProfileParams {
            leetcode: req.leetcode,
            github: req.github,
            gfg: req.gfg,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct ContributionsRequest {
    pub user: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct GfgCountQuery {
    pub user: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct CacheClearRequest {
    pub source: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct SettingsPutRequest {
    pub leetcode_username: Option<String>,
    pub github_username: Option<String>,
    pub gfg_username: Option<String>,
    pub extra_solved: Option<u64>,
    pub contest_rating: Option<f64>,
    #[serde(default)]
    pub clear_contest_rating: bool,
}

impl From<SettingsPutRequest> for SettingsUpdate {
    fn from(req: SettingsPutRequest) -> Self {
        SettingsUpdate {
            leetcode: req.leetcode_username,
            github: req.github_username,
            gfg: req.gfg_username,
            extra_solved: req.extra_solved,
            contest_rating: req.contest_rating,
            clear_contest_rating: req.clear_contest_rating,
        }
    }
}
