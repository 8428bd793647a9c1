//! Line-driven loops standing in for the keystroke-driven screens.

use crate::{
    args::parse_status,
    board::ProjectBoard,
    detail::IssueDetail,
    error::IssueBoardError,
    screen::Notice,
    tracker::{
        types::{IssueStatus, NewIssue},
        IssueRepository,
    },
    view::{self, stats::render_chart},
};
use colored::Colorize;
use tokio::io::{self, AsyncBufReadExt, BufReader};
use tracing::debug;

fn print_notices(notices: Vec<Notice>) {
    for notice in notices {
        println!("{}", view::render_notice(&notice));
    }
}

/// Runs the board until stdin closes or `:q` is typed. Any other line replaces the search term.
pub async fn run_board(board: &mut ProjectBoard, repo: &dyn IssueRepository) -> Result<(), IssueBoardError> {
    board.load(repo).await;
    print!("{}", view::render_board(board));
    print_notices(board.take_notices());
    println!(
        "{}",
        "Type to search, :new <TITLE> to report an issue, :stats for the monthly chart, :q to quit"
            .dimmed()
    );

    let mut lines = BufReader::new(io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match line.as_str() {
            ":q" => break,
            ":stats" => {
                board.refresh_statistics(repo).await;
                print!(
                    "{}",
                    render_chart(board.issues_per_month(), Default::default())
                );
            }
            line if line == ":new" || line.starts_with(":new ") => {
                let issue = NewIssue {
                    title: line.trim_start_matches(":new").trim().to_owned(),
                    description: None,
                    priority: None,
                };
                if board.create_issue(issue, repo).await.is_ok() {
                    print!("{}", view::render_board(board));
                }
            }
            term => {
                board.set_search(term, repo).await;
                print!("{}", view::render_board(board));
            }
        }
        print_notices(board.take_notices());
    }

    board.unmount();
    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
pub enum DetailCommand {
    Status(IssueStatus),
    Assignee(Option<u64>),
    Submit,
    Assign(u64),
    Comment(String),
    Refresh,
    Quit,
    Help,
}

impl DetailCommand {
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
        let rest = rest.trim();
        let number = |what: &str| {
            rest.trim_start_matches('#')
                .parse::<u64>()
                .map_err(|_| format!("{what} expects a number, got {rest:?}"))
        };

        Ok(match command {
            "status" => Self::Status(parse_status::parse_arg(rest)?),
            "assignee" if rest == "none" => Self::Assignee(None),
            "assignee" => Self::Assignee(Some(number("assignee")?)),
            "submit" => Self::Submit,
            "assign" => Self::Assign(number("assign")?),
            "comment" => Self::Comment(rest.to_owned()),
            "refresh" | "" => Self::Refresh,
            "quit" | "q" => Self::Quit,
            "help" => Self::Help,
            other => Err(format!("Unknown command {other:?}, try help"))?,
        })
    }
}

const DETAIL_HELP: &str = "status <STATUS> | assignee <ID|none> | submit | assign <RANK> | comment <TEXT> | refresh | quit";

pub async fn run_detail(detail: &mut IssueDetail, repo: &dyn IssueRepository) -> Result<(), IssueBoardError> {
    detail.load_all(repo).await;
    print!("{}", view::render_issue(detail));
    print!("{}", view::render_candidates("Recommended assignees", detail.recommended()));
    print_notices(detail.take_notices());
    println!("{}", DETAIL_HELP.dimmed());

    let mut lines = BufReader::new(io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match DetailCommand::parse(&line) {
            Ok(command) => command,
            Err(message) => {
                println!("{}", message.red());
                continue;
            }
        };
        debug!("Running {command:?}");

        match command {
            DetailCommand::Status(status) => {
                detail.stage_status(status);
            }
            DetailCommand::Assignee(assignee) => {
                if let Some(id) = assignee {
                    if !detail.developers().iter().any(|user| user.id == id) {
                        println!("{}", format!("#{id} is not a known developer").yellow());
                    }
                }
                detail.stage_assignee(assignee);
            }
            DetailCommand::Submit => {
                let _ = detail.submit(repo).await;
            }
            DetailCommand::Assign(rank) => match detail.recommended_candidate(rank, true) {
                Ok(user) => {
                    let _ = detail.assign(&user, repo).await;
                }
                Err(err) => println!("{}", err.to_string().red()),
            },
            DetailCommand::Comment(text) => {
                detail.set_comment_draft(text);
                let _ = detail.submit_comment(repo).await;
            }
            DetailCommand::Refresh => detail.load(repo).await,
            DetailCommand::Quit => break,
            DetailCommand::Help => {
                println!("{DETAIL_HELP}");
                continue;
            }
        }

        print!("{}", view::render_issue(detail));
        print_notices(detail.take_notices());
    }

    detail.unmount();
    Ok(())
}
