mod adapters;
mod contributions;
mod gfg;
mod http;
mod leetcode;
mod types;
mod values;

pub use adapters::{ContestSource, ContributionSource, CountSource, TieredSource};
pub use contributions::{
    ContributionShape, GithubContributions, contributions_from_events, normalize_contributions,
};
pub use gfg::{GfgProfile, count_from_profile_html, extract_next_data, total_problems_solved};
pub use http::HttpClient;
pub use leetcode::{
    LeetcodeGraphql, LeetcodeMirror, parse_contest_history, parse_mirror_stats,
    parse_submission_stats,
};
pub use types::{HttpSettings, Result, SourceEndpoints, SourceError};
