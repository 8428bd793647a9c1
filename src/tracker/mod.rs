use crate::error::IssueBoardError;
use async_trait::async_trait;
use types::{Issue, IssueKey, IssueUpdate, MonthlyIssueCounts, NewIssue, User};

pub mod api;
pub mod types;

/// Everything the screens need from the tracker.
///
/// Mutations return nothing: callers re-fetch the affected issue to see the result.
#[async_trait]
pub trait IssueRepository: Send + Sync {
    async fn list_issues(
        &self,
        project_id: u64,
        title: Option<&str>,
    ) -> Result<Vec<Issue>, IssueBoardError>;

    async fn get_issue(&self, key: IssueKey) -> Result<Issue, IssueBoardError>;

    async fn create_issue(&self, project_id: u64, issue: &NewIssue) -> Result<(), IssueBoardError>;

    async fn update_issue(
        &self,
        key: IssueKey,
        update: &IssueUpdate,
    ) -> Result<(), IssueBoardError>;

    async fn add_comment(&self, key: IssueKey, content: &str) -> Result<(), IssueBoardError>;

    async fn recommended_assignees(&self, key: IssueKey) -> Result<Vec<User>, IssueBoardError>;

    async fn developers(&self) -> Result<Vec<User>, IssueBoardError>;

    async fn issues_per_month(&self) -> Result<MonthlyIssueCounts, IssueBoardError>;
}
