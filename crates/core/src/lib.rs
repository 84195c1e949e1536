use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

pub const DEFAULT_CACHE_TTL_MS: i64 = 60 * 60 * 1000;
pub const CONTEST_HISTORY_LIMIT: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Easy,
    Medium,
    Hard,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Easy, Tier::Medium, Tier::Hard];

    pub fn label(self) -> &'static str {
        match self {
            Tier::Easy => "Easy",
            Tier::Medium => "Medium",
            Tier::Hard => "Hard",
        }
    }

    pub fn parse(value: &str) -> Option<Tier> {
        match value.trim().to_ascii_lowercase().as_str() {
            "easy" => Some(Tier::Easy),
            "medium" => Some(Tier::Medium),
            "hard" => Some(Tier::Hard),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TieredCount {
    pub easy: u64,
    pub medium: u64,
    pub hard: u64,
}

impl TieredCount {
    pub fn new(easy: u64, medium: u64, hard: u64) -> Self {
        Self { easy, medium, hard }
    }

    pub fn total(&self) -> u64 {
        self.easy.saturating_add(self.medium).saturating_add(self.hard)
    }

    pub fn get(&self, tier: Tier) -> u64 {
        match tier {
            Tier::Easy => self.easy,
            Tier::Medium => self.medium,
            Tier::Hard => self.hard,
        }
    }

    fn slot(&mut self, tier: Tier) -> &mut u64 {
        match tier {
            Tier::Easy => &mut self.easy,
            Tier::Medium => &mut self.medium,
            Tier::Hard => &mut self.hard,
        }
    }

    pub fn merged(&self, other: &TieredCount) -> TieredCount {
        TieredCount {
            easy: self.easy.saturating_add(other.easy),
            medium: self.medium.saturating_add(other.medium),
            hard: self.hard.saturating_add(other.hard),
        }
    }
}

/// Distributes an untiered `count` across tiers in proportion to `weights`,
/// conserving the total exactly.
///
/// With all-zero weights the count is split evenly and the remainder goes to
/// easy, medium, hard in that order. Otherwise each tier takes the floor of
/// its share and the remainder cycles through tiers sorted by descending
/// share (stable, so ties keep tier order).
pub fn allocate_untiered(count: u64, weights: TieredCount) -> TieredCount {
    let mut added = TieredCount::default();
    if count == 0 {
        return added;
    }
    let weight_total: u128 = Tier::ALL
        .iter()
        .map(|tier| weights.get(*tier) as u128)
        .sum();
    if weight_total == 0 {
        let share = count / 3;
        added = TieredCount::new(share, share, share);
        distribute_remainder(&mut added, count - share * 3, &Tier::ALL);
        return added;
    }

    let proportions: Vec<(Tier, f64)> = Tier::ALL
        .iter()
        .map(|tier| (*tier, weights.get(*tier) as f64 / weight_total as f64))
        .collect();
    for (tier, proportion) in &proportions {
        *added.slot(*tier) = (proportion * count as f64).floor() as u64;
    }
    if added.total() > count {
        for tier in Tier::ALL {
            let exact = weights.get(tier) as u128 * count as u128 / weight_total;
            *added.slot(tier) = exact as u64;
        }
    }

    let mut order = proportions;
    order.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    let order: Vec<Tier> = order.into_iter().map(|(tier, _)| tier).collect();
    let remainder = count - added.total();
    distribute_remainder(&mut added, remainder, &order);
    added
}

fn distribute_remainder(target: &mut TieredCount, remainder: u64, order: &[Tier]) {
    for index in 0..remainder {
        let tier = order[(index % order.len() as u64) as usize];
        *target.slot(tier) += 1;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    LeetcodeMirror,
    LeetcodeGraphql,
    LeetcodeContests,
    GithubContributions,
    GfgProfile,
}

impl SourceKind {
    pub const ALL: [SourceKind; 5] = [
        SourceKind::LeetcodeMirror,
        SourceKind::LeetcodeGraphql,
        SourceKind::LeetcodeContests,
        SourceKind::GithubContributions,
        SourceKind::GfgProfile,
    ];

    /// Key prefix used in the persistent cache.
    pub fn cache_prefix(self) -> &'static str {
        match self {
            SourceKind::LeetcodeMirror => "leetcode",
            SourceKind::LeetcodeGraphql => "leetcodeGraphql",
            SourceKind::LeetcodeContests => "leetcodeContests",
            SourceKind::GithubContributions => "ghContribs",
            SourceKind::GfgProfile => "gfgCount",
        }
    }

    pub fn from_cache_prefix(value: &str) -> Option<SourceKind> {
        SourceKind::ALL
            .into_iter()
            .find(|kind| kind.cache_prefix() == value)
    }

    pub fn cache_key(self, identity: &str) -> String {
        format!("{}:{}", self.cache_prefix(), identity)
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.cache_prefix())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolvedStats {
    pub total_solved: u64,
    pub easy_solved: u64,
    pub medium_solved: u64,
    pub hard_solved: u64,
    pub ranking: u64,
    pub contribution_points: u64,
}

impl SolvedStats {
    pub fn breakdown(&self) -> TieredCount {
        TieredCount::new(self.easy_solved, self.medium_solved, self.hard_solved)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionDay {
    pub date: String,
    pub count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contribution_level: Option<String>,
}

impl ContributionDay {
    pub fn new(date: impl Into<String>, count: u64) -> Self {
        Self {
            date: date.into(),
            count,
            color: None,
            contribution_level: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContestPoint {
    pub label: String,
    pub rating: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub leetcode: String,
    pub github: String,
    pub gfg: String,
}

impl Profile {
    /// Username a source is queried with.
    pub fn user_for(&self, kind: SourceKind) -> &str {
        match kind {
            SourceKind::LeetcodeMirror
            | SourceKind::LeetcodeGraphql
            | SourceKind::LeetcodeContests => &self.leetcode,
            SourceKind::GithubContributions => &self.github,
            SourceKind::GfgProfile => &self.gfg,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_solved: u64,
    pub leetcode: SolvedStats,
    pub untiered_solved: u64,
    pub extra_solved: u64,
    pub difficulty: TieredCount,
    pub allocation: TieredCount,
    pub contest_rating: Option<f64>,
    pub rating_history: Vec<ContestPoint>,
    pub errors: BTreeMap<SourceKind, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntryInfo {
    pub key: String,
    pub source: String,
    pub updated_at: String,
    pub bytes: u64,
}
