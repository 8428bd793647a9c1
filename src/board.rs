//! Project issue board: searchable issue list and monthly statistics.

use crate::{
    error::{IssueBoardError, RequestKind},
    screen::{Lifecycle, Notice, RequestTag},
    tracker::{
        types::{Issue, MonthlyIssueCounts, NewIssue},
        IssueRepository,
    },
    view::stats::{chart_points, ChartPoint},
};
use tracing::{debug, error, instrument};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub project_id: u64,
    pub title: Option<String>,
}

#[derive(Debug)]
pub struct ProjectBoard {
    project_id: u64,
    search: String,
    issues: Vec<Issue>,
    issues_per_month: Vec<ChartPoint>,
    notices: Vec<Notice>,
    lifecycle: Lifecycle,
}

impl ProjectBoard {
    pub fn mount(project_id: u64) -> Self {
        Self {
            project_id,
            search: String::new(),
            issues: Vec::new(),
            issues_per_month: Vec::new(),
            notices: Vec::new(),
            lifecycle: Lifecycle::mounted(),
        }
    }

    pub fn project_id(&self) -> u64 {
        self.project_id
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn issues_per_month(&self) -> &[ChartPoint] {
        &self.issues_per_month
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Switches to another project, dropping everything fetched for the previous one
    pub fn navigate(&mut self, project_id: u64) {
        *self = Self {
            lifecycle: std::mem::take(&mut self.lifecycle),
            ..Self::mount(project_id)
        };
        self.lifecycle.navigate();
    }

    pub fn unmount(&mut self) {
        self.lifecycle.unmount();
    }

    /// The list request for the current search term. Blank terms send no filter at all.
    pub fn query(&self) -> ListQuery {
        ListQuery {
            project_id: self.project_id,
            title: (!self.search.trim().is_empty()).then(|| self.search.clone()),
        }
    }

    /// Replaces the search term and re-fetches the list
    pub async fn set_search(&mut self, term: impl Into<String>, repo: &dyn IssueRepository) {
        self.search = term.into();
        self.refresh_issues(repo).await;
    }

    pub fn begin_issues(&self) -> RequestTag<ListQuery> {
        self.lifecycle.tag(self.query())
    }

    pub fn finish_issues(
        &mut self,
        tag: RequestTag<ListQuery>,
        result: Result<Vec<Issue>, IssueBoardError>,
    ) {
        if !self.lifecycle.accepts(&tag, &self.query()) {
            return;
        }

        match result {
            Ok(issues) => {
                debug!("Got {} issues", issues.len());
                self.issues = issues;
            }
            Err(err) => {
                error!("Failed to fetch issues: {err}");
                self.notices.push(Notice::failure("Loading issues", &err, RequestKind::Read));
            }
        }
    }

    #[instrument(level = "trace", skip_all, fields(project = self.project_id))]
    pub async fn refresh_issues(&mut self, repo: &dyn IssueRepository) {
        let tag = self.begin_issues();
        let query = self.query();
        let result = repo
            .list_issues(query.project_id, query.title.as_deref())
            .await;
        self.finish_issues(tag, result);
    }

    pub fn begin_statistics(&self) -> RequestTag<u64> {
        self.lifecycle.tag(self.project_id)
    }

    pub fn finish_statistics(
        &mut self,
        tag: RequestTag<u64>,
        result: Result<MonthlyIssueCounts, IssueBoardError>,
    ) {
        if !self.lifecycle.accepts(&tag, &self.project_id) {
            return;
        }

        match result {
            Ok(counts) => self.issues_per_month = chart_points(&counts),
            Err(err) => {
                error!("Failed to fetch issue statistics: {err}");
                self.issues_per_month.clear();
                self.notices.push(Notice::failure("Loading statistics", &err, RequestKind::Read));
            }
        }
    }

    #[instrument(level = "trace", skip_all)]
    pub async fn refresh_statistics(&mut self, repo: &dyn IssueRepository) {
        let tag = self.begin_statistics();
        let result = repo.issues_per_month().await;
        self.finish_statistics(tag, result);
    }

    /// Files a new issue in this project and re-fetches the list so it shows up
    #[instrument(level = "trace", skip_all, fields(project = self.project_id))]
    pub async fn create_issue(
        &mut self,
        issue: NewIssue,
        repo: &dyn IssueRepository,
    ) -> Result<(), IssueBoardError> {
        let result = if issue.title.trim().is_empty() {
            Err(IssueBoardError::BlankTitle)
        } else {
            repo.create_issue(self.project_id, &issue).await
        };

        match result {
            Ok(()) => {
                self.notices
                    .push(Notice::info(format!("Created issue \"{}\"", issue.title)));
                self.refresh_issues(repo).await;
                Ok(())
            }
            Err(err) => {
                error!("Failed to create issue in project {}: {err}", self.project_id);
                self.notices
                    .push(Notice::failure("Creating the issue", &err, RequestKind::Write));
                Err(err)
            }
        }
    }

    /// Everything the board fetches when it is shown
    pub async fn load(&mut self, repo: &dyn IssueRepository) {
        self.refresh_issues(repo).await;
        self.refresh_statistics(repo).await;
    }
}
