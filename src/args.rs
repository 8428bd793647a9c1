use crate::{tracker::types::IssueKey, view::stats::ChartStyle};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct IssueBoardCLI {
    /// Override configuration root path value, can also be override using $ISSUEBOARD_ROOT
    #[arg(long, env = "ISSUEBOARD_ROOT")]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: CLISubcommand,
}

#[derive(Subcommand, Debug)]
pub enum CLISubcommand {
    /// Store the tracker session and connection settings
    Login {
        /// Session id handed out by the tracker (sent as the session cookie)
        #[arg(long)]
        member_id: String,
        /// Root URL of the tracker API
        #[arg(long)]
        base_url: Option<String>,
        /// Root URL of the tracker web UI, if it differs from the API
        #[arg(long)]
        web_url: Option<String>,
        /// Request timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,
    },
    /// Forget the stored session
    Logout,
    /// Browse a project's issues, every line typed becomes the new search
    Board {
        /// Project ID
        project: u64,
    },
    /// List a project's issues
    Issues {
        /// Project ID
        project: u64,
        /// Only issues whose title contains this text
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Report a new issue in a project
    Create {
        /// Project ID
        project: u64,
        /// Issue title
        #[arg(short, long)]
        title: String,
        #[arg(short, long)]
        description: Option<String>,
        /// Priority label, e.g. MAJOR
        #[arg(short, long)]
        priority: Option<String>,
    },
    /// Show issues reported per month across the tracker
    Stats {
        #[arg(long, value_enum, default_value_t)]
        style: ChartStyle,
    },
    /// Show an issue with its comments
    Show {
        /// Issue as PROJECT/ISSUE
        issue: IssueKey,
    },
    /// Work on a single issue interactively
    Detail {
        /// Issue as PROJECT/ISSUE
        issue: IssueKey,
    },
    /// Change the status and/or assignee of an issue
    Update {
        /// Issue as PROJECT/ISSUE
        issue: IssueKey,
        /// New status (NEW, ASSIGNED, RESOLVED, CLOSED, REOPENED)
        #[arg(short, long, value_parser = parse_status::parse_arg)]
        status: Option<crate::tracker::types::IssueStatus>,
        /// User ID of the new assignee
        #[arg(short, long, conflicts_with = "unassign")]
        assignee: Option<u64>,
        /// Remove the current assignee
        #[arg(long)]
        unassign: bool,
    },
    /// Assign a recommended user and mark the issue ASSIGNED
    Assign {
        /// Issue as PROJECT/ISSUE
        issue: IssueKey,
        /// User ID of the candidate, or its rank with --rank
        candidate: u64,
        /// Treat the candidate as its position in the recommendation list
        #[arg(short, long)]
        rank: bool,
    },
    /// List the recommended assignees of an issue
    Recommend {
        /// Issue as PROJECT/ISSUE
        issue: IssueKey,
    },
    /// Comment on an issue
    Comment {
        /// Issue as PROJECT/ISSUE
        issue: IssueKey,
        /// Comment text
        #[arg(required = true, num_args = 1..)]
        content: Vec<String>,
    },
    /// List developers that issues can be assigned to
    Users,
    /// Open a project or issue in the browser
    Open {
        /// Project ID
        project: u64,
        /// Issue ID
        issue: Option<u64>,
    },
}

pub mod parse_status {
    use crate::tracker::types::IssueStatus;

    pub fn parse_arg(status: &str) -> Result<IssueStatus, String> {
        match IssueStatus::from(status.trim().to_ascii_uppercase().as_str()) {
            IssueStatus::Other(other) => Err(format!(
                "Unknown status {other}, expected one of {}",
                IssueStatus::KNOWN.map(|status| status.to_string()).join(", ")
            )),
            known => Ok(known),
        }
    }

}
