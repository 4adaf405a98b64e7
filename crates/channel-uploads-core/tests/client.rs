//! YouTubeClient against a mock Data API server

use std::time::Duration;

use channel_uploads_core::{
    ChannelEnumerator, ClientConfig, PageCursor, RemoteGateway, RetryPolicy, UploadsError,
    YouTubeClient,
};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> YouTubeClient {
    let config = ClientConfig {
        base_url: server.uri(),
        timeout_secs: 5,
        ..ClientConfig::new("test-key")
    };
    YouTubeClient::with_config(config).expect("client")
}

fn fast_retry() -> RetryPolicy {
    let mut policy = RetryPolicy::default();
    policy.multiplier = Duration::from_millis(1);
    policy.min_wait = Duration::from_millis(1);
    policy.max_wait = Duration::from_millis(5);
    policy
}

#[tokio::test]
async fn test_resolves_handle_with_key_and_encoded_sigil() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/channels"))
        .and(query_param("part", "id"))
        .and(query_param("forHandle", "@Alpha"))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "kind": "youtube#channelListResponse",
            "pageInfo": {"totalResults": 1, "resultsPerPage": 5},
            "items": [{"kind": "youtube#channel", "id": "UCalpha"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let channel_id = client.resolve_handle("@Alpha").await.unwrap();
    assert_eq!(channel_id.as_deref(), Some("UCalpha"));
}

#[tokio::test]
async fn test_unknown_handle_resolves_to_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/channels"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "kind": "youtube#channelListResponse",
            "pageInfo": {"totalResults": 0, "resultsPerPage": 5}
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert_eq!(client.resolve_handle("@Nobody").await.unwrap(), None);
}

#[tokio::test]
async fn test_lists_playlist_page_with_cursor() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/playlistItems"))
        .and(query_param("playlistId", "UUalpha"))
        .and(query_param("maxResults", "50"))
        .and(query_param("pageToken", "CURSOR2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "nextPageToken": "CURSOR3",
            "pageInfo": {"totalResults": 120, "resultsPerPage": 50},
            "items": [
                {"contentDetails": {"videoId": "v51"}},
                {"contentDetails": {"videoId": "v52"}}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let cursor = PageCursor::new("CURSOR2");
    let page = client
        .list_playlist_page("UUalpha", Some(&cursor), 50)
        .await
        .unwrap();

    assert_eq!(page.total_results, 120);
    assert_eq!(page.video_ids, vec!["v51", "v52"]);
    assert_eq!(page.next_cursor.as_ref().map(PageCursor::as_str), Some("CURSOR3"));
}

#[tokio::test]
async fn test_fetches_titles_in_one_batched_call() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/videos"))
        .and(query_param("part", "snippet"))
        .and(query_param("id", "v1,v2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                {"id": "v2", "snippet": {"title": "Second"}},
                {"id": "v1", "snippet": {"title": "First"}}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let videos = client
        .video_metadata(&["v1".to_string(), "v2".to_string()])
        .await
        .unwrap();

    assert_eq!(videos.len(), 2);
    assert_eq!(videos[0].id, "v2");
    assert_eq!(videos[1].title, "First");
}

#[tokio::test]
async fn test_maps_error_statuses() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/playlistItems"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {
                "code": 404,
                "message": "The playlist cannot be found.",
                "errors": [{"reason": "playlistNotFound"}]
            }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/channels"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/videos"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = client_for(&server);

    let missing = client.list_playlist_page("UUgone", None, 50).await;
    assert!(matches!(missing, Err(UploadsError::NotFound(_))));

    let limited = client.resolve_handle("@Alpha").await.unwrap_err();
    assert!(matches!(limited, UploadsError::RateLimited));
    assert!(limited.is_transient());

    let unavailable = client.video_metadata(&["v1".to_string()]).await.unwrap_err();
    assert!(matches!(unavailable, UploadsError::ServerError(503)));
}

#[tokio::test]
async fn test_error_messages_never_contain_the_key() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(400))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let error = client.channel_details("UCalpha").await.unwrap_err();

    assert!(matches!(error, UploadsError::Rejected { status: 400, .. }));
    assert!(!error.to_string().contains("test-key"));
}

#[tokio::test]
async fn test_enumerates_channel_end_to_end_with_retry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/channels"))
        .and(query_param("forHandle", "@Alpha"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"id": "UCalpha"}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/channels"))
        .and(query_param("id", "UCalpha"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{
                "id": "UCalpha",
                "contentDetails": {"relatedPlaylists": {"uploads": "UUalpha"}}
            }]
        })))
        .mount(&server)
        .await;
    // First attempt at the page fails, the retry succeeds
    Mock::given(method("GET"))
        .and(path("/playlistItems"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/playlistItems"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "pageInfo": {"totalResults": 1},
            "items": [{"contentDetails": {"videoId": "v1"}}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/videos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"id": "v1", "snippet": {"title": "Only video"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = ClientConfig {
        base_url: server.uri(),
        ..ClientConfig::new("test-key")
    };
    let enumerator = ChannelEnumerator::with_config(config, fast_retry()).unwrap();
    let report = enumerator.run(["@Alpha"], &()).await.unwrap();

    assert_eq!(report.rows.len(), 1);
    assert_eq!(report.rows[0].channel, "Alpha");
    assert_eq!(report.rows[0].title, "Only video");
    assert_eq!(report.rows[0].url, "https://www.youtube.com/watch?v=v1");
    assert_eq!(report.progress.processed_videos, 1);
}
