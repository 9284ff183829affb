use plains_feed::{FeedApi, FetchError};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FEED_PATH: &str = "/v1/agronomy/en";

async fn api_for(server: &MockServer) -> FeedApi {
    FeedApi::new(&format!("{}{FEED_PATH}", server.uri())).unwrap()
}

#[tokio::test]
async fn fetches_articles_and_tags_in_document_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(FEED_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "agronomy": {
                "b": { "nid": 2, "title": "Second key" },
                "a": { "nid": 1, "title": "First key" }
            },
            "tags": { "7": { "name": "Corn" }, "3": { "label": "Soil" } }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let feed = api_for(&server).await.fetch_feed().await.unwrap();
    let titles: Vec<_> = feed
        .articles
        .iter()
        .map(|a| a.title.as_deref().unwrap_or_default())
        .collect();
    assert_eq!(titles, vec!["Second key", "First key"]);
    assert_eq!(
        plains_feed::extract::tag_catalog_labels(&feed.tags),
        vec!["Corn", "Soil"]
    );
}

#[tokio::test]
async fn null_agronomy_map_is_an_empty_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "agronomy": null })))
        .mount(&server)
        .await;

    let articles = api_for(&server).await.fetch_articles().await.unwrap();
    assert!(articles.is_empty());
}

#[tokio::test]
async fn not_found_reads_as_status_line() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let err = api_for(&server).await.fetch_articles().await.unwrap_err();
    assert_eq!(err.to_string(), "HTTP 404 Not Found");
}

#[tokio::test]
async fn server_error_is_not_retried_by_default() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let err = api_for(&server).await.fetch_feed().await.unwrap_err();
    assert!(matches!(err, FetchError::Http { status: 500, .. }));
}

#[tokio::test]
async fn garbage_body_is_a_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = api_for(&server).await.fetch_feed().await.unwrap_err();
    assert!(matches!(err, FetchError::Parse(_)), "got {err:?}");
}

#[tokio::test]
async fn unreachable_host_is_a_network_error() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let api = FeedApi::new(&format!("http://127.0.0.1:{port}{FEED_PATH}"))
        .unwrap()
        .with_timeout(std::time::Duration::from_secs(2));
    let err = api.fetch_feed().await.unwrap_err();
    assert!(matches!(err, FetchError::Network(_)), "got {err:?}");
}
