use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::Value;
use stats_core::{ContributionDay, SourceKind};
use tracing::{debug, warn};

use crate::adapters::ContributionSource;
use crate::http::{HttpClient, url_with_segments};
use crate::types::{Result, SourceError};
use crate::values::as_count;

const EVENTS_PER_PAGE: usize = 100;
const EVENTS_MAX_PAGES: usize = 3;
const CONTRIBUTION_EVENT_TYPES: &[&str] = &[
    "PushEvent",
    "PullRequestEvent",
    "IssuesEvent",
    "PullRequestReviewEvent",
    "IssueCommentEvent",
    "CreateEvent",
];

/// Known layouts of a contributions-mirror response, in detection order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContributionShape {
    /// `contributions` holds weekly buckets (arrays of days).
    Weekly,
    /// `contributions` is already a flat list of days.
    Flat,
    /// Days live under a top-level `data` array.
    DataList,
    /// Days are grouped per year under `years`.
    Yearly,
}

impl ContributionShape {
    pub const ORDER: [ContributionShape; 4] = [
        ContributionShape::Weekly,
        ContributionShape::Flat,
        ContributionShape::DataList,
        ContributionShape::Yearly,
    ];

    fn records<'a>(self, response: &'a Value) -> Option<Vec<&'a Value>> {
        match self {
            ContributionShape::Weekly => {
                let list = response.get("contributions")?.as_array()?;
                if !list.iter().any(Value::is_array) {
                    return None;
                }
                let mut records = Vec::new();
                for item in list {
                    match item.as_array() {
                        Some(week) => records.extend(week.iter()),
                        None => records.push(item),
                    }
                }
                Some(records)
            }
            ContributionShape::Flat => {
                let list = response.get("contributions")?.as_array()?;
                Some(list.iter().collect())
            }
            ContributionShape::DataList => {
                let list = response.get("data")?.as_array()?;
                Some(list.iter().collect())
            }
            ContributionShape::Yearly => {
                let years: Vec<&Value> = match response.get("years")? {
                    Value::Array(years) => years.iter().collect(),
                    Value::Object(by_year) => by_year.values().collect(),
                    _ => return None,
                };
                let mut records = Vec::new();
                for year in years {
                    let days = match year {
                        Value::Array(days) => Some(days),
                        other => other.get("contributions").and_then(Value::as_array),
                    };
                    if let Some(days) = days {
                        records.extend(days.iter());
                    }
                }
                Some(records)
            }
        }
    }
}

/// Flattens any known contributions-mirror layout into one ordered list.
/// Unrecognized layouts yield an empty list.
pub fn normalize_contributions(response: &Value) -> Vec<ContributionDay> {
    for shape in ContributionShape::ORDER {
        if let Some(records) = shape.records(response) {
            debug!(?shape, records = records.len(), "matched contributions shape");
            return records.into_iter().filter_map(contribution_day).collect();
        }
    }
    Vec::new()
}

fn contribution_day(record: &Value) -> Option<ContributionDay> {
    let date = record.get("date")?.as_str()?;
    let count = record
        .get("count")
        .and_then(as_count)
        .or_else(|| record.get("contributionCount").and_then(as_count))
        .unwrap_or(0);
    Some(ContributionDay {
        date: date.to_string(),
        count,
        color: record
            .get("color")
            .and_then(Value::as_str)
            .map(str::to_string),
        contribution_level: record
            .get("contributionLevel")
            .and_then(Value::as_str)
            .map(str::to_string),
    })
}

/// Counts contribution-like public events per day, ordered by date.
pub fn contributions_from_events(events: &[Value]) -> Vec<ContributionDay> {
    let mut by_date: BTreeMap<String, u64> = BTreeMap::new();
    for event in events {
        let Some(kind) = event.get("type").and_then(Value::as_str) else {
            continue;
        };
        if !CONTRIBUTION_EVENT_TYPES.contains(&kind) {
            continue;
        }
        let Some(date) = event
            .get("created_at")
            .and_then(Value::as_str)
            .and_then(|ts| ts.get(..10))
        else {
            continue;
        };
        *by_date.entry(date.to_string()).or_insert(0) += 1;
    }
    by_date
        .into_iter()
        .map(|(date, count)| ContributionDay::new(date, count))
        .collect()
}

/// Contributions mirror with a public-events fallback.
pub struct GithubContributions {
    http: HttpClient,
    mirror_base: String,
    api_base: String,
}

impl GithubContributions {
    pub fn new(http: HttpClient, mirror_base: impl Into<String>, api_base: impl Into<String>) -> Self {
        Self {
            http,
            mirror_base: mirror_base.into(),
            api_base: api_base.into(),
        }
    }

    async fn events_fallback(&self, user: &str) -> Vec<ContributionDay> {
        let mut events: Vec<Value> = Vec::new();
        for page in 1..=EVENTS_MAX_PAGES {
            let mut url = match url_with_segments(&self.api_base, &["users", user, "events", "public"]) {
                Ok(url) => url,
                Err(err) => {
                    warn!(%err, "events fallback url");
                    break;
                }
            };
            url.query_pairs_mut()
                .append_pair("per_page", &EVENTS_PER_PAGE.to_string())
                .append_pair("page", &page.to_string());
            let batch = match self.http.get_json(url).await {
                Ok(Value::Array(batch)) => batch,
                Ok(_) => break,
                Err(err) => {
                    debug!(%err, page, "events page failed");
                    break;
                }
            };
            if batch.is_empty() {
                break;
            }
            let short_page = batch.len() < EVENTS_PER_PAGE;
            events.extend(batch);
            if short_page {
                break;
            }
        }
        contributions_from_events(&events)
    }
}

#[async_trait]
impl ContributionSource for GithubContributions {
    fn kind(&self) -> SourceKind {
        SourceKind::GithubContributions
    }

    async fn contributions(&self, user: &str) -> Result<Vec<ContributionDay>> {
        let file_name = format!("{user}.json");
        let url = url_with_segments(&self.mirror_base, &[file_name.as_str()])?;
        let response = self.http.get_json(url).await?;
        let days = normalize_contributions(&response);
        if !days.is_empty() {
            return Ok(days);
        }

        warn!(user, "contributions mirror returned no days, trying public events");
        let days = self.events_fallback(user).await;
        if days.is_empty() {
            return Err(SourceError::MissingPayload(
                "no contribution data available from the mirror or public events".to_string(),
            ));
        }
        Ok(days)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn weekly_buckets_flatten_in_order() {
        let response = json!({
            "contributions": [
                [{"date": "2025-01-01", "count": 2}],
                [{"date": "2025-01-08", "count": 0}]
            ]
        });
        let days = normalize_contributions(&response);
        assert_eq!(
            days,
            vec![
                ContributionDay::new("2025-01-01", 2),
                ContributionDay::new("2025-01-08", 0),
            ]
        );
    }

    #[test]
    fn mixed_weekly_list_keeps_loose_records_in_place() {
        let response = json!({
            "contributions": [
                {"date": "2025-01-01", "count": 1},
                [{"date": "2025-01-02", "count": 2}, {"date": "2025-01-03", "count": 3}]
            ]
        });
        let dates: Vec<String> = normalize_contributions(&response)
            .into_iter()
            .map(|day| day.date)
            .collect();
        assert_eq!(dates, vec!["2025-01-01", "2025-01-02", "2025-01-03"]);
    }

    #[test]
    fn flat_list_reads_contribution_count_and_extras() {
        let response = json!({
            "contributions": [
                {"date": "2025-02-01", "contributionCount": 4, "color": "#216e39", "contributionLevel": "FOURTH_QUARTILE"},
                {"date": "2025-02-02"}
            ]
        });
        let days = normalize_contributions(&response);
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].count, 4);
        assert_eq!(days[0].color.as_deref(), Some("#216e39"));
        assert_eq!(days[0].contribution_level.as_deref(), Some("FOURTH_QUARTILE"));
        assert_eq!(days[1].count, 0);
    }

    #[test]
    fn yearly_layouts_flat_map_contributions() {
        let as_array = json!({
            "years": [
                {"year": "2024", "contributions": [{"date": "2024-12-31", "count": 1}]},
                {"year": "2025", "contributions": [{"date": "2025-01-01", "count": 2}]}
            ]
        });
        assert_eq!(normalize_contributions(&as_array).len(), 2);

        let keyed = json!({
            "years": {
                "2024": {"contributions": [{"date": "2024-12-31", "count": 1}]},
                "2025": [{"date": "2025-01-01", "count": 2}]
            }
        });
        let days = normalize_contributions(&keyed);
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, "2024-12-31");
    }

    #[test]
    fn data_list_is_accepted() {
        let response = json!({"data": [{"date": "2025-03-01", "count": "7"}]});
        assert_eq!(
            normalize_contributions(&response),
            vec![ContributionDay::new("2025-03-01", 7)]
        );
    }

    #[test]
    fn unknown_shapes_yield_nothing() {
        assert!(normalize_contributions(&json!({"total": 10})).is_empty());
        assert!(normalize_contributions(&json!({"contributions": {"a": 1}})).is_empty());
        assert!(normalize_contributions(&json!([1, 2, 3])).is_empty());
        assert!(normalize_contributions(&json!({"contributions": [{"count": 1}]})).is_empty());
    }

    #[test]
    fn events_count_only_contribution_types_per_day() {
        let events = vec![
            json!({"type": "PushEvent", "created_at": "2025-01-02T10:00:00Z"}),
            json!({"type": "WatchEvent", "created_at": "2025-01-02T11:00:00Z"}),
            json!({"type": "IssuesEvent", "created_at": "2025-01-02T12:00:00Z"}),
            json!({"type": "CreateEvent", "created_at": "2025-01-01T08:00:00Z"}),
            json!({"type": "PushEvent"}),
        ];
        assert_eq!(
            contributions_from_events(&events),
            vec![
                ContributionDay::new("2025-01-01", 1),
                ContributionDay::new("2025-01-02", 2),
            ]
        );
    }
}
