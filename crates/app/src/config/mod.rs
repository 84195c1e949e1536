use serde::{Deserialize, Serialize};
use stats_core::Profile;

/// Profile values used when no setting is stored in the DB.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ProfileDefaults {
    pub leetcode: String,
    pub github: String,
    pub gfg: String,
    pub extra_solved: u64,
    pub contest_rating: Option<f64>,
}

/// Per-request username overrides.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct ProfileParams {
    pub leetcode: Option<String>,
    pub github: Option<String>,
    pub gfg: Option<String>,
}

impl ProfileParams {
    pub fn apply(&self, profile: &mut Profile) {
        let overrides = [
            (&mut profile.leetcode, &self.leetcode),
            (&mut profile.github, &self.github),
            (&mut profile.gfg, &self.gfg),
        ];
        for (slot, value) in overrides {
            if let Some(value) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
                *slot = value.to_string();
            }
        }
    }
}
