use docindex::api::serve_listener;
use docindex::config::Config;
use docindex::db::Database;
use docindex::engine::IndexOptions;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

const FIXTURE: &str = concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/tests/fixtures/lunr-pretext-search-index.js"
);

async fn start(db: Database) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(serve_listener(listener, Arc::new(Config::default()), Arc::new(db)));
    addr
}

fn built_db() -> Database {
    let db = Database::with_source(IndexOptions::default(), FIXTURE);
    db.reload().unwrap();
    db
}

/// Send one request and return the status code and body.
async fn request(addr: SocketAddr, method: &str, target: &str) -> (u16, String) {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let req = format!(
        "{method} {target} HTTP/1.1\r\nHost: localhost\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
    );
    stream.write_all(req.as_bytes()).await.unwrap();
    stream.flush().await.unwrap();

    let mut raw = Vec::new();
    tokio::time::timeout(Duration::from_secs(10), stream.read_to_end(&mut raw))
        .await
        .expect("response timed out")
        .unwrap();
    let text = String::from_utf8(raw).unwrap();

    let (head, body) = text.split_once("\r\n\r\n").expect("no header terminator");
    let status = head
        .split_whitespace()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .expect("no status code");
    (status, body.to_string())
}

fn json(body: &str) -> serde_json::Value {
    serde_json::from_str(body).unwrap()
}

#[tokio::test]
async fn test_search_endpoint() {
    let addr = start(built_db()).await;

    let (status, body) = request(addr, "GET", "/api/search?q=ggplot2").await;
    assert_eq!(status, 200);
    let v = json(&body);
    assert_eq!(v["query"], "ggplot2");
    assert_eq!(v["total"], 1);
    let hit = &v["results"][0];
    assert_eq!(hit["id"], "ch-ggplot2");
    assert_eq!(hit["url"], "ch-ggplot2.html");
    assert_eq!(hit["type"], "Chapter");
    assert_eq!(hit["number"], "9");
    assert!(hit["score"].as_f64().unwrap() > 0.0);
    assert!(!hit["matches"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_search_decodes_and_limits() {
    let addr = start(built_db()).await;

    let (status, body) = request(addr, "GET", "/api/search?q=%2Bdata%20%2Bvisualization").await;
    assert_eq!(status, 200);
    assert_eq!(json(&body)["total"], 2);

    let (status, body) = request(addr, "GET", "/api/search?q=content&limit=3").await;
    assert_eq!(status, 200);
    let v = json(&body);
    assert_eq!(v["total"], 22);
    assert_eq!(v["results"].as_array().unwrap().len(), 3);

    let (status, body) = request(addr, "GET", "/api/search?q=data+-table").await;
    assert_eq!(status, 200);
    let v = json(&body);
    assert_eq!(v["query"], "data -table");
    assert_eq!(v["total"], 6);
    assert!(v["results"]
        .as_array()
        .unwrap()
        .iter()
        .all(|r| r["id"] != "ch-data-table"));

    let (status, body) = request(addr, "GET", "/api/search?q=").await;
    assert_eq!(status, 200);
    assert_eq!(json(&body)["total"], 0);
}

#[tokio::test]
async fn test_bad_requests() {
    let addr = start(built_db()).await;

    let (status, _) = request(addr, "GET", "/api/search").await;
    assert_eq!(status, 400);
    let (status, body) = request(addr, "GET", "/api/search?q=nope:term").await;
    assert_eq!(status, 400);
    assert!(json(&body)["error"].as_str().unwrap().contains("nope"));
    let (status, _) = request(addr, "GET", "/api/search?q=data&limit=lots").await;
    assert_eq!(status, 400);
    let (status, _) = request(addr, "GET", "/nowhere").await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn test_unbuilt_index_is_unavailable() {
    let addr = start(Database::new(IndexOptions::default())).await;

    let (status, _) = request(addr, "GET", "/api/search?q=data").await;
    assert_eq!(status, 503);
    let (status, _) = request(addr, "POST", "/api/rebuild").await;
    assert_eq!(status, 409);
}

#[tokio::test]
async fn test_document_and_rebuild() {
    let db = Database::with_source(IndexOptions::default(), FIXTURE);
    let addr = start(db).await;

    let (status, _) = request(addr, "GET", "/api/docs?id=ch-locales").await;
    assert_eq!(status, 503);

    let (status, body) = request(addr, "POST", "/api/rebuild").await;
    assert_eq!(status, 200);
    assert_eq!(json(&body)["documents"], 22);

    let (status, body) = request(addr, "GET", "/api/docs?id=ch-locales").await;
    assert_eq!(status, 200);
    assert_eq!(json(&body)["title"], "Locales");

    let (status, _) = request(addr, "GET", "/api/docs?id=missing").await;
    assert_eq!(status, 404);
    let (status, _) = request(addr, "GET", "/api/rebuild").await;
    assert_eq!(status, 405);
}

#[tokio::test]
async fn test_home_and_metrics() {
    let addr = start(built_db()).await;

    let (status, body) = request(addr, "GET", "/").await;
    assert_eq!(status, 200);
    assert!(body.contains("/api/search"));

    let (status, body) = request(addr, "GET", "/api/metrics").await;
    assert_eq!(status, 200);
    assert_eq!(json(&body)["index_built"], true);

    let (status, body) = request(addr, "GET", "/metrics").await;
    assert_eq!(status, 200);
    assert!(body.contains("docindex_queries"));
}
