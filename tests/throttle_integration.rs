//! Throttle budgets shared across lists and clients

use mws_client::api::{FetchError, ListResource, MockDispatcher, MwsClient, ResilienceConfig};
use mws_client::api::resilience::GroupLimit;
use mws_client::cli::commands::handler::build_client;
use mws_client::config::Config;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

fn fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

fn client_with(files: &[&str], resilience: &ResilienceConfig) -> (MwsClient, MockDispatcher) {
    let mock = MockDispatcher::from_files(fixtures(), files).unwrap();
    let client = MwsClient::new("https://mws.amazonservices.com", Arc::new(mock.clone()), resilience)
        .with_seller_id("A1SELLER");
    (client, mock)
}

#[tokio::test]
async fn test_lists_from_one_client_share_budget() {
    let resilience = ResilienceConfig::builder()
        .group_limit("GetReportList", 1, Duration::from_secs(60))
        .build();
    let (client, mock) = client_with(&["fetchReportList.xml", "fetchReportList.xml"], &resilience);

    let mut first = client.reports();
    first.fetch().await.unwrap();

    let mut second = client.reports();
    let err = second.fetch().await.unwrap_err();

    match err {
        FetchError::Throttled { group, restore_interval } => {
            assert_eq!(group, "GetReportList");
            assert_eq!(restore_interval, Duration::from_secs(60));
        }
        other => panic!("expected throttled, got {:?}", other),
    }
    assert_eq!(mock.call_count(), 1);
    assert!(second.records().is_none());

    let stats = client.governor().stats("GetReportList");
    assert_eq!(stats.requests_made, 1);
    assert_eq!(stats.requests_rejected, 1);
}

#[tokio::test]
async fn test_continuation_charges_its_own_group() {
    let resilience = ResilienceConfig::builder()
        .group_limit("GetReportList", 1, Duration::from_secs(60))
        .build();
    let (client, mock) = client_with(&["fetchReportList.xml", "fetchReportListToken.xml"], &resilience);
    let mut reports = client.reports();
    reports.set_use_token(true);

    let summary = reports.fetch().await.unwrap();

    assert_eq!(summary.pages, 2);
    assert_eq!(mock.call_count(), 2);
    assert_eq!(client.governor().remaining("GetReportList"), 0);
    assert_eq!(client.governor().remaining("GetReportListByNextToken"), 29);
}

#[tokio::test]
async fn test_denied_continuation_resumes_after_restore() {
    let (client, mock) = client_with(&["fetchReportList.xml", "fetchReportListToken.xml"], &ResilienceConfig::default());
    client.governor().set_remaining("GetReportListByNextToken", 0);

    let mut reports = client.reports();
    reports.set_use_token(true);

    let err = reports.fetch().await.unwrap_err();
    assert!(err.is_throttled());
    assert_eq!(mock.call_count(), 1);
    assert_eq!(reports.report_id(0), Some("2291326454"));
    assert!(reports.has_more());

    client.governor().replenish("GetReportListByNextToken", 1);
    let summary = reports.fetch().await.unwrap();

    assert_eq!(summary.pages, 1);
    assert_eq!(reports.report_id(1), Some("2291326455"));
    assert!(!reports.has_more());
}

#[tokio::test]
async fn test_disabled_throttling_never_denies() {
    let (client, mock) = client_with(&["fetchFeedList.xml"], &ResilienceConfig::disabled());
    client.governor().set_remaining("GetFeedSubmissionList", 0);

    let mut feeds = client.feeds();
    feeds.fetch().await.unwrap();

    assert_eq!(mock.call_count(), 1);
    assert_eq!(feeds.feed_id(1), Some("2291326431"));
}

#[tokio::test]
async fn test_clients_can_share_a_governor() {
    let resilience = ResilienceConfig::builder()
        .group_limit("ListMarketplaceParticipations", 1, Duration::from_secs(60))
        .build();
    let (first, _) = client_with(&["fetchParticipationList.xml"], &resilience);
    let (second, second_mock) = client_with(&["fetchParticipationList.xml"], &resilience);
    let second = second.with_governor(first.governor().clone());

    first.participations().fetch().await.unwrap();
    let err = second.participations().fetch().await.unwrap_err();

    assert!(err.is_throttled());
    assert_eq!(second_mock.call_count(), 0);
}

#[tokio::test]
async fn test_config_group_overrides_reach_the_client() {
    let mut config = Config::default();
    config.seller_id = Some("A2CONFIG".to_string());
    config
        .throttle
        .groups
        .insert("GetFeedSubmissionList".to_string(), GroupLimit::new(1, 45));

    let files = vec!["fetchFeedList.xml".to_string(), "fetchFeedList.xml".to_string()];
    let fixtures = fixtures();
    let client = build_client(&config, Some(fixtures.as_path()), &files).unwrap();

    let mut feeds = client.feeds();
    feeds.fetch().await.unwrap();
    assert_eq!(client.governor().remaining("GetFeedSubmissionList"), 0);

    let err = client.feeds().fetch().await.unwrap_err();
    assert!(err.is_throttled());
    // untouched groups keep their built-in budgets
    assert_eq!(client.governor().remaining("GetFeedSubmissionCount"), 10);
}
