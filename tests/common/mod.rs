#![allow(dead_code)]

use issueboard::{
    config::{Config, Session},
    tracker::api::TrackerApi,
};
use serde_json::{json, Value};
use wiremock::MockServer;

pub const MEMBER_ID: &str = "member-12";

pub fn api(server: &MockServer) -> TrackerApi {
    api_with_timeout(server, 5)
}

pub fn api_with_timeout(server: &MockServer, request_timeout_secs: u64) -> TrackerApi {
    let config = Config {
        base_url: server.uri(),
        request_timeout_secs,
        ..Default::default()
    };
    let session = Session {
        member_id: MEMBER_ID.to_owned(),
    };

    TrackerApi::new(&config, &session).expect("Failed to build client")
}

pub fn user(id: u64, username: &str) -> Value {
    json!({ "id": id, "username": username, "role": "DEV" })
}

pub fn issue(id: u64, status: &str, assignee: Value, comments: Value) -> Value {
    json!({
        "id": id,
        "title": format!("Issue {id}"),
        "description": "Steps to reproduce",
        "priority": "MAJOR",
        "status": status,
        "reporter": { "id": 1, "username": "reporter", "role": "TESTER" },
        "assignee": assignee,
        "fixer": null,
        "reportedDate": "2024-05-02T09:30:00",
        "comments": comments
    })
}
