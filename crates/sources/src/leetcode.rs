use async_trait::async_trait;
use chrono::DateTime;
use serde_json::{Value, json};
use stats_core::{CONTEST_HISTORY_LIMIT, ContestPoint, SolvedStats, SourceKind, Tier};

use crate::adapters::{ContestSource, TieredSource};
use crate::http::{HttpClient, parse_url, url_with_segments};
use crate::types::{Result, SourceError};
use crate::values::{as_count, as_rating, count_at, find_value};

const SUBMISSION_STATS_QUERY: &str = "query userProblemsSolved($username: String!) {
  matchedUser(username: $username) {
    profile { ranking }
    contributions { points }
    submitStats { acSubmissionNum { difficulty count } }
  }
}";

const CONTEST_HISTORY_QUERY: &str = "query getUserContestHistory($username: String!) {
  userContestRankingHistory(username: $username) {
    contest { title start_time startTime }
    rating
    ranking
    attended
  }
}";

/// Parses the REST mirror body (`totalSolved`, `easySolved`, ...).
pub fn parse_mirror_stats(body: &Value) -> Result<SolvedStats> {
    if let Some(status) = body.get("status").and_then(Value::as_str) {
        if status.eq_ignore_ascii_case("error") {
            let message = body
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("mirror reported an error");
            return Err(SourceError::Shape(message.to_string()));
        }
    }
    if !body.is_object() {
        return Err(SourceError::Shape("mirror body is not an object".to_string()));
    }
    Ok(SolvedStats {
        total_solved: count_at(body, &["totalSolved"]),
        easy_solved: count_at(body, &["easySolved"]),
        medium_solved: count_at(body, &["mediumSolved"]),
        hard_solved: count_at(body, &["hardSolved"]),
        ranking: count_at(body, &["ranking"]),
        contribution_points: count_at(body, &["contributionPoints"]),
    })
}

/// Parses a GraphQL `matchedUser` response into solved stats.
pub fn parse_submission_stats(body: &Value) -> Result<SolvedStats> {
    graphql_errors(body)?;
    let user = find_value(body, &["data", "matchedUser"])
        .ok_or_else(|| SourceError::Shape("matchedUser is null".to_string()))?;
    let entries = find_value(user, &["submitStats", "acSubmissionNum"])
        .and_then(Value::as_array)
        .ok_or_else(|| SourceError::Shape("missing acSubmissionNum".to_string()))?;

    let mut stats = SolvedStats::default();
    let mut reported_total = None;
    for entry in entries {
        let Some(difficulty) = entry.get("difficulty").and_then(Value::as_str) else {
            continue;
        };
        let count = entry.get("count").and_then(as_count).unwrap_or(0);
        match Tier::parse(difficulty) {
            Some(Tier::Easy) => stats.easy_solved = count,
            Some(Tier::Medium) => stats.medium_solved = count,
            Some(Tier::Hard) => stats.hard_solved = count,
            None if difficulty.eq_ignore_ascii_case("all") => reported_total = Some(count),
            None => {}
        }
    }
    stats.total_solved = reported_total.unwrap_or_else(|| stats.breakdown().total());
    stats.ranking = count_at(user, &["profile", "ranking"]);
    stats.contribution_points = count_at(user, &["contributions", "points"]);
    Ok(stats)
}

/// Parses `userContestRankingHistory`, keeping the most recent entries.
pub fn parse_contest_history(body: &Value) -> Result<Vec<ContestPoint>> {
    graphql_errors(body)?;
    let history = find_value(body, &["data", "userContestRankingHistory"])
        .and_then(Value::as_array)
        .filter(|history| !history.is_empty())
        .ok_or_else(|| SourceError::Shape("no contest history".to_string()))?;

    let points: Vec<ContestPoint> = history
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let start_time = ["start_time", "startTime"]
                .iter()
                .filter_map(|key| find_value(entry, &["contest", *key]))
                .filter_map(as_count)
                .find(|ts| *ts > 0)
                .map(|ts| ts as i64);
            let label = start_time
                .and_then(|ts| DateTime::from_timestamp(ts, 0))
                .map(|at| at.format("%b %Y").to_string())
                .unwrap_or_else(|| format!("C{}", index + 1));
            ContestPoint {
                label,
                rating: entry.get("rating").and_then(as_rating).unwrap_or(0.0),
                start_time,
            }
        })
        .collect();
    let skip = points.len().saturating_sub(CONTEST_HISTORY_LIMIT);
    Ok(points.into_iter().skip(skip).collect())
}

fn graphql_errors(body: &Value) -> Result<()> {
    let Some(errors) = body.get("errors").and_then(Value::as_array) else {
        return Ok(());
    };
    if errors.is_empty() {
        return Ok(());
    }
    let message = errors
        .iter()
        .filter_map(|error| error.get("message").and_then(Value::as_str))
        .collect::<Vec<_>>()
        .join("; ");
    Err(SourceError::Shape(if message.is_empty() {
        "graphql error".to_string()
    } else {
        message
    }))
}

/// Community REST mirror of LeetCode profile stats.
pub struct LeetcodeMirror {
    http: HttpClient,
    base: String,
}

impl LeetcodeMirror {
    pub fn new(http: HttpClient, base: impl Into<String>) -> Self {
        Self {
            http,
            base: base.into(),
        }
    }
}

#[async_trait]
impl TieredSource for LeetcodeMirror {
    fn kind(&self) -> SourceKind {
        SourceKind::LeetcodeMirror
    }

    async fn solved_stats(&self, user: &str) -> Result<SolvedStats> {
        let url = url_with_segments(&self.base, &[user])?;
        let body = self.http.get_json(url).await?;
        parse_mirror_stats(&body)
    }
}

/// LeetCode's own GraphQL endpoint. Serves both solved stats and contest
/// history.
pub struct LeetcodeGraphql {
    http: HttpClient,
    endpoint: String,
}

impl LeetcodeGraphql {
    pub fn new(http: HttpClient, endpoint: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
        }
    }

    async fn query(&self, query: &str, user: &str) -> Result<Value> {
        let url = parse_url(&self.endpoint)?;
        let payload = json!({ "query": query, "variables": { "username": user } });
        self.http.post_json(url, &payload).await
    }
}

#[async_trait]
impl TieredSource for LeetcodeGraphql {
    fn kind(&self) -> SourceKind {
        SourceKind::LeetcodeGraphql
    }

    async fn solved_stats(&self, user: &str) -> Result<SolvedStats> {
        let body = self.query(SUBMISSION_STATS_QUERY, user).await?;
        parse_submission_stats(&body)
    }
}

#[async_trait]
impl ContestSource for LeetcodeGraphql {
    fn kind(&self) -> SourceKind {
        SourceKind::LeetcodeContests
    }

    async fn contest_history(&self, user: &str) -> Result<Vec<ContestPoint>> {
        let body = self.query(CONTEST_HISTORY_QUERY, user).await?;
        parse_contest_history(&body)
    }
}
