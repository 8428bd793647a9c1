use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{
    de::{self, MapAccess, Visitor},
    Deserialize, Deserializer, Serialize, Serializer,
};
use std::{fmt, str::FromStr};

pub type UserId = u64;

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    pub status: IssueStatus,
    pub reporter: User,
    #[serde(default)]
    pub assignee: Option<User>,
    #[serde(default)]
    pub fixer: Option<User>,
    pub reported_date: Timestamp,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct User {
    pub id: UserId,
    pub username: String,
    #[serde(default)]
    pub role: Role,
}

#[derive(Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Role {
    #[serde(rename = "DEV", alias = "DEVELOPER")]
    Developer,
    #[default]
    #[serde(other)]
    Member,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: u64,
    pub content: String,
    pub user: User,
    pub created_at: Timestamp,
}

/// Issue status as sent by the tracker. Unknown values are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IssueStatus {
    New,
    Assigned,
    Resolved,
    Closed,
    Reopened,
    Other(String),
}

impl IssueStatus {
    pub const KNOWN: [IssueStatus; 5] = [
        IssueStatus::New,
        IssueStatus::Assigned,
        IssueStatus::Resolved,
        IssueStatus::Closed,
        IssueStatus::Reopened,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Self::New => "NEW",
            Self::Assigned => "ASSIGNED",
            Self::Resolved => "RESOLVED",
            Self::Closed => "CLOSED",
            Self::Reopened => "REOPENED",
            Self::Other(other) => other,
        }
    }
}

impl From<&str> for IssueStatus {
    fn from(value: &str) -> Self {
        match value {
            "NEW" => Self::New,
            "ASSIGNED" => Self::Assigned,
            "RESOLVED" => Self::Resolved,
            "CLOSED" => Self::Closed,
            "REOPENED" => Self::Reopened,
            other => Self::Other(other.to_owned()),
        }
    }
}

impl fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for IssueStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for IssueStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let status = String::deserialize(deserializer)?;
        Ok(Self::from(status.as_str()))
    }
}

/// Point in time reported by the tracker, with or without an offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(pub NaiveDateTime);

impl FromStr for Timestamp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(date_time) = DateTime::parse_from_rfc3339(s) {
            return Ok(Self(date_time.naive_utc()));
        }
        if let Ok(date_time) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
            return Ok(Self(date_time));
        }
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(Self)
            .ok_or_else(|| format!("not a timestamp: {s}"))
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

/// Issues reported per month, in the order the tracker listed them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonthlyIssueCounts(pub Vec<(String, u64)>);

impl<'de> Deserialize<'de> for MonthlyIssueCounts {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CountsVisitor;

        impl<'de> Visitor<'de> for CountsVisitor {
            type Value = MonthlyIssueCounts;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object mapping month labels to issue counts")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut counts = Vec::with_capacity(map.size_hint().unwrap_or(12));
                while let Some((month, count)) = map.next_entry::<String, u64>()? {
                    counts.push((month, count));
                }
                Ok(MonthlyIssueCounts(counts))
            }
        }

        deserializer.deserialize_map(CountsVisitor)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IssueKey {
    pub project_id: u64,
    pub issue_id: u64,
}

impl From<(u64, u64)> for IssueKey {
    fn from((project_id, issue_id): (u64, u64)) -> Self {
        Self {
            project_id,
            issue_id,
        }
    }
}

impl fmt::Display for IssueKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.project_id, self.issue_id)
    }
}

impl FromStr for IssueKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (project, issue) = s
            .split_once('/')
            .ok_or_else(|| format!("expected PROJECT/ISSUE, got {s}"))?;
        let project_id = project
            .trim()
            .parse()
            .map_err(|_| format!("invalid project id: {project}"))?;
        let issue_id = issue
            .trim()
            .trim_start_matches('#')
            .parse()
            .map_err(|_| format!("invalid issue id: {issue}"))?;

        Ok(Self {
            project_id,
            issue_id,
        })
    }
}

/// Body of the update request.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct IssueUpdate {
    pub status: IssueStatus,
    pub assignee: Option<AssigneeRef>,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct AssigneeRef {
    pub id: UserId,
}

/// Body of the create request. The tracker fills in status, reporter and date.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct NewIssue {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
}
