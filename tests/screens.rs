//! Board and detail screens driven against a mock tracker

mod common;

use common::{api, issue, user};
use issueboard::{
    board::ProjectBoard,
    detail::{stage_assignment, IssueDetail, UpdatePhase},
    error::IssueBoardError,
    screen::NoticeLevel,
    tracker::types::{IssueKey, IssueStatus, NewIssue, User},
    view,
};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ISSUE_PATH: &str = "/api/projects/1/issues/7";

fn key() -> IssueKey {
    IssueKey::from((1, 7))
}

#[tokio::test]
async fn test_search_term_drives_title_parameter() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/projects/1/issues"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(3)
        .mount(&mock_server)
        .await;

    let api = api(&mock_server);
    let mut board = ProjectBoard::mount(1);
    board.refresh_issues(&api).await;
    board.set_search("login bug", &api).await;
    board.set_search("", &api).await;

    let queries: Vec<_> = mock_server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|request| {
            request
                .url
                .query_pairs()
                .map(|(name, value)| (name.into_owned(), value.into_owned()))
                .collect::<Vec<_>>()
        })
        .collect();

    assert_eq!(
        queries,
        vec![
            vec![],
            vec![("title".to_owned(), "login bug".to_owned())],
            vec![]
        ]
    );
}

#[tokio::test]
async fn test_board_load() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/projects/1/issues"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            issue(1, "NEW", json!(null), json!([])),
            issue(2, "CLOSED", user(5, "kim"), json!([]))
        ])))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/statistics/issuesPerMonth"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(r#"{"2024-01": 3, "2024-02": 0}"#, "application/json"),
        )
        .mount(&mock_server)
        .await;

    let mut board = ProjectBoard::mount(1);
    board.load(&api(&mock_server)).await;

    assert_eq!(board.issues().len(), 2);
    assert_eq!(
        serde_json::to_value(board.issues_per_month()).unwrap(),
        json!([{ "x": "2024-01", "y": 3 }, { "x": "2024-02", "y": 0 }])
    );
    assert!(board.take_notices().is_empty());
}

#[tokio::test]
async fn test_failed_search_keeps_previous_list() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/projects/1/issues"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([issue(1, "NEW", json!(null), json!([]))])),
        )
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/projects/1/issues"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let api = api(&mock_server);
    let mut board = ProjectBoard::mount(1);
    board.refresh_issues(&api).await;
    board.set_search("crash", &api).await;

    assert_eq!(board.search(), "crash");
    assert_eq!(board.issues().len(), 1);
    assert_eq!(board.take_notices().len(), 1);
}

#[tokio::test]
async fn test_malformed_list_says_nothing_changed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/projects/1/issues"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "issues": [] })))
        .mount(&mock_server)
        .await;

    let mut board = ProjectBoard::mount(1);
    board.refresh_issues(&api(&mock_server)).await;

    let notices = board.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Warning);
    assert!(notices[0].message.contains("nothing changed"));
}

#[tokio::test]
async fn test_create_issue_then_refetch() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/projects/1/issues"))
        .and(body_json(json!({
            "title": "Crash on save",
            "description": "Steps to reproduce",
            "priority": "MAJOR"
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/projects/1/issues"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([issue(1, "NEW", json!(null), json!([]))])),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut board = ProjectBoard::mount(1);
    board
        .create_issue(
            NewIssue {
                title: "Crash on save".into(),
                description: Some("Steps to reproduce".into()),
                priority: Some("MAJOR".into()),
            },
            &api(&mock_server),
        )
        .await
        .unwrap();

    assert_eq!(board.issues().len(), 1);
    assert_eq!(board.take_notices()[0].level, NoticeLevel::Info);
}

#[tokio::test]
async fn test_untitled_issue_is_not_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut board = ProjectBoard::mount(1);
    let error = board
        .create_issue(
            NewIssue {
                title: "  ".into(),
                description: None,
                priority: None,
            },
            &api(&mock_server),
        )
        .await
        .unwrap_err();

    assert!(matches!(error, IssueBoardError::BlankTitle));
    assert_eq!(board.take_notices()[0].level, NoticeLevel::Warning);
}

#[tokio::test]
async fn test_update_before_load_is_refused() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let api = api(&mock_server);
    let mut detail = IssueDetail::mount(key());

    let error = detail.submit(&api).await.unwrap_err();
    assert!(matches!(error, IssueBoardError::IssueUnavailable(k) if k == key()));

    let lee = User {
        id: 42,
        username: "lee".into(),
        role: Default::default(),
    };
    let error = detail.assign(&lee, &api).await.unwrap_err();
    assert!(matches!(error, IssueBoardError::IssueUnavailable(_)));

    assert_eq!(detail.form(), None);
    assert_eq!(detail.phase(), UpdatePhase::Idle);
    let notices = detail.take_notices();
    assert_eq!(notices.len(), 2);
    assert!(notices[0].message.contains("Updating the issue failed"));
}

#[tokio::test]
async fn test_assign_then_refetch() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ISSUE_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(issue(7, "NEW", json!(null), json!([]))),
        )
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path(ISSUE_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(issue(7, "ASSIGNED", user(5, "kim"), json!([]))),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("PUT"))
        .and(path(ISSUE_PATH))
        .and(body_json(json!({ "status": "ASSIGNED", "assignee": { "id": 5 } })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    colored::control::set_override(false);
    let api = api(&mock_server);
    let mut detail = IssueDetail::mount(key());
    detail.load(&api).await;
    assert!(view::render_issue(&detail).contains("Assigned to Unassigned"));

    detail.stage_status(IssueStatus::Assigned);
    detail.stage_assignee(Some(5));
    detail.submit(&api).await.unwrap();

    let rendered = view::render_issue(&detail);
    assert!(rendered.contains("Assigned to kim"));
    assert!(rendered.contains("ASSIGNED"));
    assert_eq!(detail.phase(), UpdatePhase::Idle);
    assert_eq!(detail.take_notices().len(), 1);
}

#[tokio::test]
async fn test_recommended_assignment_is_staged_before_sending() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ISSUE_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(issue(7, "REOPENED", json!(null), json!([]))),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([user(5, "kim")])))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("{ISSUE_PATH}/recommendedAssignees")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([user(42, "lee"), user(5, "kim")])),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("PUT"))
        .and(path(ISSUE_PATH))
        .and(body_json(json!({ "status": "ASSIGNED", "assignee": { "id": 42 } })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let api = api(&mock_server);
    let mut detail = IssueDetail::mount(key());
    detail.load_all(&api).await;
    assert_eq!(detail.developers().len(), 1);

    let candidate = detail.recommended_candidate(1, true).unwrap();
    let staged = stage_assignment(&candidate);
    assert_eq!(staged.assignee_id, Some(42));
    assert_eq!(staged.status, IssueStatus::Assigned);

    detail.assign(&candidate, &api).await.unwrap();
}

#[tokio::test]
async fn test_failed_update_keeps_edits() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ISSUE_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(issue(7, "NEW", json!(null), json!([]))),
        )
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("PUT"))
        .and(path(ISSUE_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_string("bad status"))
        .mount(&mock_server)
        .await;

    let api = api(&mock_server);
    let mut detail = IssueDetail::mount(key());
    detail.load(&api).await;

    let lee = User {
        id: 42,
        username: "lee".into(),
        role: Default::default(),
    };
    let error = detail.assign(&lee, &api).await.unwrap_err();

    assert!(matches!(error, IssueBoardError::Status { .. }));
    assert_eq!(detail.phase(), UpdatePhase::Editing);
    assert_eq!(detail.form(), Some(&stage_assignment(&lee)));
    assert_eq!(detail.issue().unwrap().status, IssueStatus::New);
    assert!(detail.take_notices()[0].message.contains("nothing changed"));
}

#[tokio::test]
async fn test_comment_success_clears_draft_and_refetches() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ISSUE_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(issue(7, "NEW", json!(null), json!([]))),
        )
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path(ISSUE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(issue(
            7,
            "NEW",
            json!(null),
            json!([{
                "id": 1,
                "content": "Seen on staging too",
                "user": user(5, "kim"),
                "createdAt": "2024-05-03T10:00:00"
            }]),
        )))
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("{ISSUE_PATH}/comments")))
        .and(body_json(json!({ "content": "Seen on staging too" })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&mock_server)
        .await;

    let api = api(&mock_server);
    let mut detail = IssueDetail::mount(key());
    detail.load(&api).await;
    detail.set_comment_draft("Seen on staging too");
    detail.submit_comment(&api).await.unwrap();

    assert_eq!(detail.comment_draft(), "");
    assert_eq!(detail.issue().unwrap().comments.len(), 1);
}

#[tokio::test]
async fn test_failed_comment_keeps_draft() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ISSUE_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(issue(7, "NEW", json!(null), json!([]))),
        )
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("{ISSUE_PATH}/comments")))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let api = api(&mock_server);
    let mut detail = IssueDetail::mount(key());
    detail.load(&api).await;
    detail.set_comment_draft("Still broken");

    assert!(detail.submit_comment(&api).await.is_err());
    assert_eq!(detail.comment_draft(), "Still broken");
    assert!(detail.issue().unwrap().comments.is_empty());
}

#[tokio::test]
async fn test_blank_comment_is_not_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut detail = IssueDetail::mount(key());
    detail.set_comment_draft("   \n");

    let error = detail.submit_comment(&api(&mock_server)).await.unwrap_err();
    assert!(matches!(error, IssueBoardError::BlankComment));
    assert_eq!(detail.comment_draft(), "   \n");
}
