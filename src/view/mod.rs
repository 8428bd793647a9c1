use crate::{
    board::ProjectBoard,
    detail::{IssueDetail, UpdatePhase},
    screen::{Notice, NoticeLevel},
    tracker::types::{Issue, Timestamp, User},
};
use badge::status_badge;
use colored::Colorize;

pub mod badge;
pub mod stats;

const UNASSIGNED: &str = "Unassigned";

pub fn user_label(user: Option<&User>) -> String {
    user.map(|user| user.username.to_owned())
        .unwrap_or_else(|| UNASSIGNED.to_owned())
}

fn date(timestamp: &Timestamp) -> String {
    timestamp.0.format("%Y-%m-%d").to_string()
}

fn date_time(timestamp: &Timestamp) -> String {
    timestamp.0.format("%Y-%m-%d %H:%M").to_string()
}

pub fn issue_row(issue: &Issue) -> String {
    format!(
        "{:>6}  {}  {:<40}  {:<16}  {}",
        format!("#{}", issue.id).bright_black(),
        status_badge(&issue.status),
        issue.title.bold(),
        issue
            .assignee
            .as_ref()
            .map(|user| user.username.as_str())
            .unwrap_or("-"),
        issue.reporter.username
    )
}

pub fn render_board(board: &ProjectBoard) -> String {
    let mut out = format!("{}", format!("Project {}", board.project_id()).bold());
    if !board.search().is_empty() {
        out += &format!(" matching \"{}\"", board.search().bright_blue());
    }
    out += "\n";

    if board.issues().is_empty() {
        out += &format!("{}\n", "No issues".dimmed());
    }
    for issue in board.issues() {
        out += &issue_row(issue);
        out += "\n";
    }

    out
}

pub fn render_issue(detail: &IssueDetail) -> String {
    let Some(issue) = detail.issue() else {
        return format!("{}\n", "Issue not loaded".dimmed());
    };

    let mut out = format!(
        "{} {}  {}  {}\n",
        format!("#{}", issue.id).bright_black(),
        issue.title.bold(),
        issue.priority.as_deref().unwrap_or("-").on_blue().white(),
        status_badge(&issue.status)
    );
    out += &format!(
        "Reported by {} on {}\n",
        issue.reporter.username.bright_blue(),
        date(&issue.reported_date)
    );
    out += &format!(
        "Assigned to {}\n",
        user_label(issue.assignee.as_ref()).bright_blue()
    );
    out += &format!(
        "Fixed by {}\n",
        user_label(issue.fixer.as_ref()).bright_blue()
    );

    if let Some(description) = issue.description.as_deref().filter(|d| !d.is_empty()) {
        out += &format!("\n{}\n", "Description".bold());
        for line in description.lines() {
            out += &format!("  {line}\n");
        }
    }

    out += &format!("\n{}\n", "Comments".bold());
    if issue.comments.is_empty() {
        out += &format!("  {}\n", "No comments yet".dimmed());
    }
    for comment in &issue.comments {
        out += &format!(
            "  {} {}\n",
            comment.user.username.bright_blue(),
            date_time(&comment.created_at).bright_black()
        );
        for line in comment.content.lines() {
            out += &format!("    {line}\n");
        }
    }

    if let Some(form) = detail.form() {
        if detail.phase() != UpdatePhase::Idle {
            out += &format!(
                "\n{} status {} assignee {}\n",
                "Pending update:".yellow(),
                form.status,
                form.assignee_id
                    .map(|id| format!("#{id}"))
                    .unwrap_or_else(|| UNASSIGNED.to_owned())
            );
        }
    }

    out
}

pub fn render_candidates(title: &str, users: &[User]) -> String {
    let mut out = format!("{}\n", title.bold());
    if users.is_empty() {
        out += &format!("  {}\n", "None".dimmed());
    }
    for (rank, user) in users.iter().enumerate() {
        out += &format!(
            "  {:>2}. {} {}\n",
            rank + 1,
            user.username,
            format!("(#{})", user.id).bright_black()
        );
    }
    out
}

pub fn render_notice(notice: &Notice) -> String {
    match notice.level {
        NoticeLevel::Info => notice.message.green().to_string(),
        NoticeLevel::Warning => notice.message.yellow().to_string(),
        NoticeLevel::Error => notice.message.red().to_string(),
    }
}
