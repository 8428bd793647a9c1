use super::{
    types::{Issue, IssueKey, IssueUpdate, MonthlyIssueCounts, NewIssue, User},
    IssueRepository,
};
use crate::{
    config::{Config, Session},
    error::IssueBoardError,
};
use async_trait::async_trait;
use reqwest::{
    header::{self, HeaderMap, HeaderValue},
    Client, RequestBuilder, Url,
};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use tracing::{debug, error, instrument};

/// HTTP client for the tracker's REST API.
#[derive(Debug, Clone)]
pub struct TrackerApi {
    client: Client,
    base: Url,
}

impl TrackerApi {
    pub fn new(config: &Config, session: &Session) -> Result<Self, IssueBoardError> {
        let base = Url::parse(&config.base_url)
            .map_err(|_| IssueBoardError::InvalidBaseUrl(config.base_url.clone()))?;
        if base.cannot_be_a_base() {
            Err(IssueBoardError::InvalidBaseUrl(config.base_url.clone()))?
        }

        let cookie = format!("{}={}", config.cookie_name, session.member_id);
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&cookie).map_err(|_| IssueBoardError::InvalidCookie)?,
        );
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self { client, base })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        // Checked in `new`, base URLs can always hold path segments
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().push("api").extend(segments);
        }
        url
    }

    fn issue_endpoint(&self, key: IssueKey, rest: &[&str]) -> Url {
        let project = key.project_id.to_string();
        let issue = key.issue_id.to_string();
        let mut segments = vec!["projects", project.as_str(), "issues", issue.as_str()];
        segments.extend_from_slice(rest);
        self.endpoint(&segments)
    }

    async fn send(&self, request: RequestBuilder) -> Result<String, IssueBoardError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            Ok(body)
        } else {
            error!("Tracker answered {status}: {body}");
            Err(IssueBoardError::Status { status, body })
        }
    }

    async fn fetch<T: DeserializeOwned>(&self, url: Url) -> Result<T, IssueBoardError> {
        let endpoint = url.path().to_owned();
        let body = self.send(self.client.get(url)).await?;

        serde_json::from_str(&body)
            .map_err(|source| IssueBoardError::MalformedBody { endpoint, source })
    }

    async fn write<B: Serialize + ?Sized>(
        &self,
        request: RequestBuilder,
        body: &B,
    ) -> Result<(), IssueBoardError> {
        self.send(request.json(body)).await.map(|_| ())
    }
}

#[async_trait]
impl IssueRepository for TrackerApi {
    #[instrument(level = "trace", skip(self))]
    async fn list_issues(
        &self,
        project_id: u64,
        title: Option<&str>,
    ) -> Result<Vec<Issue>, IssueBoardError> {
        let project = project_id.to_string();
        let mut url = self.endpoint(&["projects", project.as_str(), "issues"]);
        if let Some(title) = title {
            url.query_pairs_mut().append_pair("title", title);
        }

        debug!("Listing issues from {url}");
        self.fetch(url).await
    }

    #[instrument(level = "trace", skip(self))]
    async fn get_issue(&self, key: IssueKey) -> Result<Issue, IssueBoardError> {
        self.fetch(self.issue_endpoint(key, &[])).await
    }

    #[instrument(level = "trace", skip(self, issue))]
    async fn create_issue(&self, project_id: u64, issue: &NewIssue) -> Result<(), IssueBoardError> {
        let project = project_id.to_string();
        let url = self.endpoint(&["projects", project.as_str(), "issues"]);
        debug!("Creating issue {:?} in project {project_id}", issue.title);
        self.write(self.client.post(url), issue).await
    }

    #[instrument(level = "trace", skip(self))]
    async fn update_issue(
        &self,
        key: IssueKey,
        update: &IssueUpdate,
    ) -> Result<(), IssueBoardError> {
        let url = self.issue_endpoint(key, &[]);
        self.write(self.client.put(url), update).await
    }

    #[instrument(level = "trace", skip(self, content))]
    async fn add_comment(&self, key: IssueKey, content: &str) -> Result<(), IssueBoardError> {
        #[derive(Serialize)]
        struct Payload<'a> {
            content: &'a str,
        }

        let url = self.issue_endpoint(key, &["comments"]);
        self.write(self.client.post(url), &Payload { content }).await
    }

    #[instrument(level = "trace", skip(self))]
    async fn recommended_assignees(&self, key: IssueKey) -> Result<Vec<User>, IssueBoardError> {
        self.fetch(self.issue_endpoint(key, &["recommendedAssignees"]))
            .await
    }

    #[instrument(level = "trace", skip(self))]
    async fn developers(&self) -> Result<Vec<User>, IssueBoardError> {
        self.fetch(self.endpoint(&["users"])).await
    }

    #[instrument(level = "trace", skip(self))]
    async fn issues_per_month(&self) -> Result<MonthlyIssueCounts, IssueBoardError> {
        self.fetch(self.endpoint(&["statistics", "issuesPerMonth"]))
            .await
    }
}
