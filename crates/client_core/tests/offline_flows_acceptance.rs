use std::sync::Arc;

use chrono::NaiveDate;
use client_core::{
    filters::filter_items,
    forms::{ReportRange, RequestDraft, WorkdayMood},
    status_board::{StatusBoard, ON_BREAK, WORKING},
    ClientError, EmployeeClient, RedirectReason, SessionManager, SessionState,
};
use shared::domain::AnnouncementData;
use storage::Storage;

#[tokio::test]
async fn fresh_install_is_sent_to_login_without_network() {
    // Nothing listens on port 9; bootstrap must not get that far.
    let client = EmployeeClient::new("http://127.0.0.1:9/apis/root").expect("client");
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let manager = SessionManager::new(client, Arc::new(storage));

    assert_eq!(
        manager.bootstrap().await,
        SessionState::RedirectToLogin(RedirectReason::MissingCredentials)
    );
    assert!(matches!(
        manager.cached().await,
        Err(ClientError::NotLoggedIn)
    ));
}

#[test]
fn announcement_search_is_a_view_over_fetched_rows() {
    let rows = vec![
        AnnouncementData {
            a_title: "Office closed Friday".into(),
            a_desc: "Maintenance work".into(),
            ..AnnouncementData::default()
        },
        AnnouncementData {
            a_title: "Town hall".into(),
            a_desc: "Quarterly results".into(),
            ..AnnouncementData::default()
        },
    ];

    let hits = filter_items(&rows, "QUARTER");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].a_title, "Town hall");
    assert_eq!(filter_items(&rows, "").len(), rows.len());
}

#[test]
fn forms_reject_incomplete_input() {
    let err = RequestDraft {
        date: NaiveDate::from_ymd_opt(2024, 7, 1),
        request_type: "Leave".into(),
        title: " ".into(),
        description: "Family function".into(),
    }
    .validate()
    .expect_err("blank title");
    assert_eq!(err.to_string(), "Please fill in all fields.");

    let start = NaiveDate::from_ymd_opt(2024, 7, 10).expect("start");
    let end = NaiveDate::from_ymd_opt(2024, 7, 1).expect("end");
    assert!(ReportRange::new(start, end).is_err());
    assert_eq!(WorkdayMood::default().index(), 5);
}

#[test]
fn break_toggle_returns_to_working() {
    let mut board = StatusBoard::default();
    board.apply(board.take_break());
    assert_eq!(board.working_status(), ON_BREAK);
    board.apply(board.take_break());
    assert_eq!(board.working_status(), WORKING);
    assert!(!board.is_on_break());
}
