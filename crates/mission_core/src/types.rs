use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueType {
    Meta,
    Content,
    Technical,
    Image,
    Link,
}

/// Issue and action urgency. Declaration order is the sort order: high first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    #[serde(rename = "type")]
    pub kind: IssueType,
    pub message: String,
    pub priority: Priority,
}

impl Issue {
    pub fn new(kind: IssueType, priority: Priority, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            priority,
        }
    }
}

/// Raw structural metrics taken from one fetch of a page.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSnapshot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub h1_count: usize,
    pub img_without_alt: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteAnalysis {
    pub issues: Vec<Issue>,
    pub page_data: PageSnapshot,
}

impl SiteAnalysis {
    pub fn has_issue_of(&self, kind: IssueType) -> bool {
        self.issues.iter().any(|issue| issue.kind == kind)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionCategory {
    Content,
    Technical,
    Link,
    Image,
    Meta,
}

impl ActionCategory {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "content" => Some(Self::Content),
            "technical" => Some(Self::Technical),
            "link" => Some(Self::Link),
            "image" => Some(Self::Image),
            "meta" => Some(Self::Meta),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Content => "content",
            Self::Technical => "technical",
            Self::Link => "link",
            Self::Image => "image",
            Self::Meta => "meta",
        }
    }

    /// Issue type whose absence means a generic action of this category is done.
    pub fn issue_type(self) -> IssueType {
        match self {
            Self::Content => IssueType::Content,
            Self::Technical => IssueType::Technical,
            Self::Link => IssueType::Link,
            Self::Image => IssueType::Image,
            Self::Meta => IssueType::Meta,
        }
    }
}

impl fmt::Display for ActionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl ActionStatus {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "pending" => Some(Self::Pending),
            "in_progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

impl fmt::Display for ActionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => f.write_str("pending"),
            Self::InProgress => f.write_str("in_progress"),
            Self::Completed => f.write_str("completed"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    Verified,
    Failed,
}

/// One recommended remediation task of a weekly batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyAction {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: ActionCategory,
    pub priority: Priority,
    #[serde(default)]
    pub status: ActionStatus,
    pub estimated_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_tip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_status: Option<VerificationStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_sorts_high_first() {
        let mut priorities = vec![Priority::Low, Priority::High, Priority::Medium];
        priorities.sort();
        assert_eq!(priorities, vec![Priority::High, Priority::Medium, Priority::Low]);
    }

    #[test]
    fn status_uses_snake_case_wire_names() {
        let json = serde_json::to_string(&ActionStatus::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");
        assert_eq!(ActionStatus::parse("in_progress"), Some(ActionStatus::InProgress));
        assert_eq!(ActionStatus::parse("done"), None);
    }

    #[test]
    fn issue_serializes_kind_as_type() {
        let issue = Issue::new(IssueType::Meta, Priority::High, "title 태그가 없습니다");
        let value = serde_json::to_value(&issue).unwrap();
        assert_eq!(value["type"], "meta");
        assert_eq!(value["priority"], "high");
    }
}
