//! Issue detail panel: metadata, comments, the update flow and recommended assignees.

use crate::{
    error::{IssueBoardError, RequestKind},
    screen::{Lifecycle, Notice, RequestTag},
    tracker::{
        types::{AssigneeRef, Issue, IssueKey, IssueStatus, IssueUpdate, User, UserId},
        IssueRepository,
    },
};
use tracing::{debug, error, instrument};

/// The two fields the update flow edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateForm {
    pub status: IssueStatus,
    /// `None` is unassigned
    pub assignee_id: Option<UserId>,
}

impl From<&Issue> for UpdateForm {
    fn from(issue: &Issue) -> Self {
        Self {
            status: issue.status.clone(),
            assignee_id: issue.assignee.as_ref().map(|user| user.id),
        }
    }
}

impl From<&UpdateForm> for IssueUpdate {
    fn from(form: &UpdateForm) -> Self {
        Self {
            status: form.status.clone(),
            assignee: form.assignee_id.map(|id| AssigneeRef { id }),
        }
    }
}

/// Stages handing the issue to `user`, without sending anything.
pub fn stage_assignment(user: &User) -> UpdateForm {
    UpdateForm {
        status: IssueStatus::Assigned,
        assignee_id: Some(user.id),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdatePhase {
    Idle,
    Editing,
    Submitting,
}

#[derive(Debug)]
pub struct IssueDetail {
    key: IssueKey,
    issue: Option<Issue>,
    form: Option<UpdateForm>,
    phase: UpdatePhase,
    comment_draft: String,
    developers: Vec<User>,
    recommended: Vec<User>,
    notices: Vec<Notice>,
    lifecycle: Lifecycle,
}

impl IssueDetail {
    pub fn mount(key: IssueKey) -> Self {
        Self {
            key,
            issue: None,
            form: None,
            phase: UpdatePhase::Idle,
            comment_draft: String::new(),
            developers: Vec::new(),
            recommended: Vec::new(),
            notices: Vec::new(),
            lifecycle: Lifecycle::mounted(),
        }
    }

    pub fn key(&self) -> IssueKey {
        self.key
    }

    pub fn issue(&self) -> Option<&Issue> {
        self.issue.as_ref()
    }

    pub fn form(&self) -> Option<&UpdateForm> {
        self.form.as_ref()
    }

    pub fn phase(&self) -> UpdatePhase {
        self.phase
    }

    pub fn comment_draft(&self) -> &str {
        &self.comment_draft
    }

    pub fn set_comment_draft(&mut self, draft: impl Into<String>) {
        self.comment_draft = draft.into();
    }

    pub fn developers(&self) -> &[User] {
        &self.developers
    }

    pub fn recommended(&self) -> &[User] {
        &self.recommended
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub fn navigate(&mut self, key: IssueKey) {
        *self = Self {
            lifecycle: std::mem::take(&mut self.lifecycle),
            ..Self::mount(key)
        };
        self.lifecycle.navigate();
    }

    pub fn unmount(&mut self) {
        self.lifecycle.unmount();
    }

    pub fn begin_load(&self) -> RequestTag<IssueKey> {
        self.lifecycle.tag(self.key)
    }

    /// Applies a fetched issue. The form is only reseeded when nothing is being edited.
    pub fn finish_load(&mut self, tag: RequestTag<IssueKey>, result: Result<Issue, IssueBoardError>) {
        if !self.lifecycle.accepts(&tag, &self.key) {
            return;
        }

        match result {
            Ok(issue) => {
                if self.phase == UpdatePhase::Idle || self.form.is_none() {
                    self.form = Some(UpdateForm::from(&issue));
                }
                self.issue = Some(issue);
            }
            Err(err) => {
                error!("Failed to fetch issue {}: {err}", self.key);
                self.notices.push(Notice::failure("Loading the issue", &err, RequestKind::Read));
            }
        }
    }

    #[instrument(level = "trace", skip_all, fields(issue = %self.key))]
    pub async fn load(&mut self, repo: &dyn IssueRepository) {
        let tag = self.begin_load();
        let result = repo.get_issue(self.key).await;
        self.finish_load(tag, result);
    }

    /// Fetches the developer list and the recommended assignees
    pub async fn load_candidates(&mut self, repo: &dyn IssueRepository) {
        let tag = self.begin_load();
        let developers = repo.developers().await;
        if self.lifecycle.accepts(&tag, &self.key) {
            match developers {
                Ok(developers) => self.developers = developers,
                Err(err) => error!("Failed to fetch developers: {err}"),
            }
        }

        let tag = self.begin_load();
        let recommended = repo.recommended_assignees(self.key).await;
        if self.lifecycle.accepts(&tag, &self.key) {
            match recommended {
                Ok(recommended) => self.recommended = recommended,
                Err(err) => error!("Failed to fetch recommended assignees: {err}"),
            }
        }
    }

    /// Everything the panel fetches when it is shown
    pub async fn load_all(&mut self, repo: &dyn IssueRepository) {
        self.load(repo).await;
        self.load_candidates(repo).await;
    }

    fn edit(&mut self, change: impl FnOnce(&mut UpdateForm)) -> bool {
        let Some(form) = self.form.as_mut() else {
            debug!("Ignoring edit before the issue was loaded");
            return false;
        };
        change(form);
        self.phase = UpdatePhase::Editing;
        true
    }

    pub fn stage_status(&mut self, status: IssueStatus) -> bool {
        self.edit(|form| form.status = status)
    }

    /// Picks an assignee from the selector, `None` to unassign
    pub fn stage_assignee(&mut self, assignee_id: Option<UserId>) -> bool {
        self.edit(|form| form.assignee_id = assignee_id)
    }

    /// Applies both fields of a staged assignment at once
    pub fn apply_staged(&mut self, staged: UpdateForm) -> bool {
        self.edit(|form| *form = staged)
    }

    /// Sends the form. On success the issue is re-fetched, on failure the edits stay.
    #[instrument(level = "trace", skip_all, fields(issue = %self.key))]
    pub async fn submit(&mut self, repo: &dyn IssueRepository) -> Result<(), IssueBoardError> {
        let Some(form) = self.form.clone() else {
            let err = IssueBoardError::IssueUnavailable(self.key);
            error!("Cannot submit before issue {} is loaded", self.key);
            self.notices.push(Notice::failure("Updating the issue", &err, RequestKind::Write));
            return Err(err);
        };

        self.phase = UpdatePhase::Submitting;
        let update = IssueUpdate::from(&form);
        debug!("Submitting {update:?}");

        match repo.update_issue(self.key, &update).await {
            Ok(()) => {
                self.phase = UpdatePhase::Idle;
                self.notices.push(Notice::info(format!(
                    "Issue #{} updated to {}",
                    self.key.issue_id, form.status
                )));
                self.load(repo).await;
                Ok(())
            }
            Err(err) => {
                error!("Failed to update issue {}: {err}", self.key);
                self.phase = UpdatePhase::Editing;
                self.notices.push(Notice::failure("Updating the issue", &err, RequestKind::Write));
                Err(err)
            }
        }
    }

    /// Assigns `user` and marks the issue ASSIGNED in one step, then submits.
    pub async fn assign(
        &mut self,
        user: &User,
        repo: &dyn IssueRepository,
    ) -> Result<(), IssueBoardError> {
        // Before the issue is loaded nothing is staged and submit reports it
        self.apply_staged(stage_assignment(user));
        self.submit(repo).await
    }

    /// Resolves a recommended candidate by user id, or by 1-based rank when `by_rank` is set
    pub fn recommended_candidate(&self, selector: u64, by_rank: bool) -> Result<User, IssueBoardError> {
        let found = if by_rank {
            selector
                .checked_sub(1)
                .and_then(|index| self.recommended.get(index as usize))
        } else {
            self.recommended.iter().find(|user| user.id == selector)
        };

        found
            .cloned()
            .ok_or_else(|| IssueBoardError::UnknownCandidate(selector.to_string()))
    }

    /// Posts the draft. Blank drafts are refused locally.
    #[instrument(level = "trace", skip_all, fields(issue = %self.key))]
    pub async fn submit_comment(
        &mut self,
        repo: &dyn IssueRepository,
    ) -> Result<(), IssueBoardError> {
        if self.comment_draft.trim().is_empty() {
            self.notices
                .push(Notice::failure(
                    "Adding the comment",
                    &IssueBoardError::BlankComment,
                    RequestKind::Write,
                ));
            return Err(IssueBoardError::BlankComment);
        }

        match repo.add_comment(self.key, &self.comment_draft).await {
            Ok(()) => {
                self.comment_draft.clear();
                self.load(repo).await;
                Ok(())
            }
            Err(err) => {
                error!("Failed to add comment to {}: {err}", self.key);
                self.notices.push(Notice::failure("Adding the comment", &err, RequestKind::Write));
                Err(err)
            }
        }
    }
}
