use directories::ProjectDirs;

pub mod args;
pub mod board;
pub mod config;
pub mod detail;
pub mod error;
pub mod screen;
pub mod shell;
pub mod tracker;
pub mod view;

pub fn dirs() -> Result<ProjectDirs, error::IssueBoardError> {
    ProjectDirs::from("de", "maxicarlos", "issueboard").ok_or(error::IssueBoardError::NoProjectDirs)
}

/// Web UI address of a project, or of one of its issues
pub fn web_link(web_url: &str, project_id: u64, issue_id: Option<u64>) -> String {
    match issue_id {
        Some(issue_id) => format!("{web_url}/project/{project_id}/issue/{issue_id}"),
        None => format!("{web_url}/project/{project_id}"),
    }
}
