use clap::Parser;
use colored::Colorize;
use issueboard::{
    args::{CLISubcommand, IssueBoardCLI},
    board::ProjectBoard,
    config::{Config, Saveable, Session},
    detail::IssueDetail,
    dirs,
    error::{IssueBoardError, RequestKind},
    screen::Notice,
    shell,
    tracker::{
        api::TrackerApi,
        types::{IssueKey, NewIssue},
        IssueRepository,
    },
    view::{
        self,
        stats::{chart_points, render_chart},
    },
    web_link,
};
use std::fs;
use tracing::debug;

fn print_notices(notices: Vec<Notice>) {
    for notice in notices {
        println!("{}", view::render_notice(&notice));
    }
}

async fn loaded_detail(key: IssueKey, repo: &dyn IssueRepository) -> Result<IssueDetail, IssueBoardError> {
    let mut detail = IssueDetail::mount(key);
    detail.load(repo).await;
    if detail.issue().is_none() {
        print_notices(detail.take_notices());
        Err(IssueBoardError::IssueUnavailable(key))?
    }
    Ok(detail)
}

#[tokio::main]
async fn main() -> Result<(), IssueBoardError> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let args = IssueBoardCLI::parse();
    let config_root = match args.config.to_owned() {
        Some(root) => root,
        None => dirs()?.config_local_dir().to_owned(),
    };

    if !config_root.is_dir() {
        fs::create_dir_all(&config_root)?;
    }

    let config = Config::try_read(&config_root)?.unwrap_or_default();
    let session = Session::try_read(&config_root)?;

    let requires_session = || -> Result<TrackerApi, IssueBoardError> {
        let Some(session) = session.as_ref() else {
            return Err(IssueBoardError::MissingSession);
        };

        debug!("Connecting to {}", config.base_url);
        TrackerApi::new(&config, session)
    };

    match args.command {
        CLISubcommand::Login {
            member_id,
            base_url,
            web_url,
            timeout,
        } => {
            let config = Config {
                base_url: base_url.unwrap_or_else(|| config.base_url.clone()),
                web_url: web_url.or_else(|| config.web_url.clone()),
                request_timeout_secs: timeout.unwrap_or(config.request_timeout_secs),
                ..config.clone()
            };
            // Fail before saving anything if the settings cannot produce a client
            let session = Session { member_id };
            TrackerApi::new(&config, &session)?;

            config.save(&config_root)?;
            session.save(&config_root)?;
            println!("Logged in to {}", config.base_url.bright_blue());
        }
        CLISubcommand::Logout => {
            if Session::remove(&config_root)? {
                println!("Logged out");
            } else {
                println!("{}", "Not logged in".yellow());
            }
        }
        CLISubcommand::Board { project } => {
            let api = requires_session()?;
            shell::run_board(&mut ProjectBoard::mount(project), &api).await?;
        }
        CLISubcommand::Issues { project, search } => {
            let api = requires_session()?;
            let mut board = ProjectBoard::mount(project);
            board.set_search(search.unwrap_or_default(), &api).await;

            print!("{}", view::render_board(&board));
            print_notices(board.take_notices());
        }
        CLISubcommand::Create {
            project,
            title,
            description,
            priority,
        } => {
            let api = requires_session()?;
            let mut board = ProjectBoard::mount(project);
            let issue = NewIssue {
                title,
                description,
                priority,
            };

            let result = board.create_issue(issue, &api).await;
            print_notices(board.take_notices());
            result?;
            print!("{}", view::render_board(&board));
        }
        CLISubcommand::Stats { style } => {
            let api = requires_session()?;
            let points = match api.issues_per_month().await {
                Ok(counts) => chart_points(&counts),
                Err(err) => {
                    print_notices(vec![Notice::failure(
                        "Loading statistics",
                        &err,
                        RequestKind::Read,
                    )]);
                    Vec::new()
                }
            };

            println!("{}", "Issues per month".bold());
            print!("{}", render_chart(&points, style));
        }
        CLISubcommand::Show { issue } => {
            let api = requires_session()?;
            let detail = loaded_detail(issue, &api).await?;

            print!("{}", view::render_issue(&detail));
        }
        CLISubcommand::Detail { issue } => {
            let api = requires_session()?;
            shell::run_detail(&mut IssueDetail::mount(issue), &api).await?;
        }
        CLISubcommand::Update {
            issue,
            status,
            assignee,
            unassign,
        } => {
            let api = requires_session()?;
            let mut detail = loaded_detail(issue, &api).await?;

            if let Some(status) = status {
                detail.stage_status(status);
            }
            if assignee.is_some() || unassign {
                detail.stage_assignee(assignee);
            }

            let result = detail.submit(&api).await;
            print_notices(detail.take_notices());
            result?;
            print!("{}", view::render_issue(&detail));
        }
        CLISubcommand::Assign {
            issue,
            candidate,
            rank,
        } => {
            let api = requires_session()?;
            let mut detail = loaded_detail(issue, &api).await?;
            detail.load_candidates(&api).await;

            let user = detail.recommended_candidate(candidate, rank)?;
            let result = detail.assign(&user, &api).await;
            print_notices(detail.take_notices());
            result?;
            print!("{}", view::render_issue(&detail));
        }
        CLISubcommand::Recommend { issue } => {
            let api = requires_session()?;
            let mut detail = IssueDetail::mount(issue);
            detail.load_candidates(&api).await;

            print!(
                "{}",
                view::render_candidates("Recommended assignees", detail.recommended())
            );
        }
        CLISubcommand::Comment { issue, content } => {
            let api = requires_session()?;
            let mut detail = loaded_detail(issue, &api).await?;
            detail.set_comment_draft(content.join(" "));

            let result = detail.submit_comment(&api).await;
            print_notices(detail.take_notices());
            result?;
            print!("{}", view::render_issue(&detail));
        }
        CLISubcommand::Users => {
            let api = requires_session()?;
            let developers = api.developers().await?;

            print!("{}", view::render_candidates("Developers", &developers));
        }
        CLISubcommand::Open { project, issue } => {
            let link = web_link(config.web_url(), project, issue);
            if open::that(&link).is_err() {
                println!("Could not open a browser, visit {link}");
            }
        }
    }

    Ok(())
}
