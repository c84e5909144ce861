use std::time::Duration;

use shiplog::{
    DeliveryRequest, DeliveryResponse, HttpTransport, Logger, LoggerConfig, Transport,
    TransportError,
};
use wiremock::matchers::{body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const COLLECTOR_CODE: &str = "FAKE-COLLECTOR-CODE";

async fn wait_for_requests(mock_server: &MockServer, num_requests: usize) -> Vec<String> {
    for _ in 0..200 {
        let requests = mock_server.received_requests().await.unwrap_or_default();
        if requests.len() >= num_requests {
            return requests
                .iter()
                .map(|request| String::from_utf8(request.body.clone()).unwrap())
                .collect();
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("collector did not receive {} requests", num_requests);
}

#[tokio::test]
async fn test_http_transport_posts_body() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/receiver/FAKE-COLLECTOR-CODE"))
        .and(body_string("line 1\nline 2"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;
    let transport = HttpTransport::new().unwrap();
    let request = DeliveryRequest::post(
        format!("{}/receiver/{}", mock_server.uri(), COLLECTOR_CODE),
        "line 1\nline 2",
    );
    let response = transport.send(request).await.unwrap();
    assert_eq!(response, DeliveryResponse { status: 200 });
}

#[tokio::test]
async fn test_http_transport_reports_error_statuses() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;
    let transport = HttpTransport::new().unwrap();
    let request = DeliveryRequest::post(mock_server.uri(), "line");
    let response = transport.send(request).await.unwrap();
    assert_eq!(response.status, 503);
}

#[tokio::test]
async fn test_http_transport_does_not_follow_redirects() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/old"))
        .respond_with(
            ResponseTemplate::new(302).insert_header("Location", format!("{}/new", mock_server.uri())),
        )
        .mount(&mock_server)
        .await;
    Mock::given(path("/new"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&mock_server)
        .await;
    let transport = HttpTransport::new().unwrap();
    let request = DeliveryRequest::post(format!("{}/old", mock_server.uri()), "line");
    let response = transport.send(request).await.unwrap();
    assert_eq!(response.status, 302);
}

#[tokio::test]
async fn test_http_transport_with_custom_client() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header("x-sumo-category", "shiplog/test"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;
    let mut default_headers = reqwest::header::HeaderMap::new();
    default_headers.insert(
        "x-sumo-category",
        reqwest::header::HeaderValue::from_static("shiplog/test"),
    );
    let client = reqwest::Client::builder()
        .default_headers(default_headers)
        .build()
        .unwrap();
    let transport = HttpTransport::with_client(client);
    let response = transport
        .send(DeliveryRequest::post(mock_server.uri(), "line"))
        .await
        .unwrap();
    assert_eq!(response.status, 204);
}

#[tokio::test]
async fn test_http_transport_connection_error() {
    // Nothing listens on a port freshly released by the OS.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let uri = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);
    let transport = HttpTransport::new().unwrap();
    let result = transport.send(DeliveryRequest::post(uri, "line")).await;
    assert!(matches!(result, Err(TransportError::Http(_))));
}

#[tokio::test]
async fn test_logger_ships_and_retries_over_http() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/receiver/FAKE-COLLECTOR-CODE"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/receiver/FAKE-COLLECTOR-CODE"))
        .respond_with(ResponseTemplate::new(200))
        .with_priority(2)
        .mount(&mock_server)
        .await;
    let config = LoggerConfig {
        endpoint: format!("{}/receiver/", mock_server.uri()),
        sync_interval: Duration::from_millis(20),
        request_timeout: Some(Duration::from_secs(5)),
        ..Default::default()
    };
    let logger = Logger::new(COLLECTOR_CODE, config).unwrap();
    logger.info("log line");
    logger.error(&[1, 2, 3]);
    let bodies = wait_for_requests(&mock_server, 2).await;
    let expected_body = "{\"level\":\"INFO\",\"data\":\"log line\"}\n{\"level\":\"ERROR\",\"data\":[1,2,3]}";
    assert_eq!(bodies[0], expected_body);
    assert_eq!(bodies[1], expected_body);
    for _ in 0..200 {
        if logger.pending_len() == 0 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(logger.pending_len(), 0);
}
