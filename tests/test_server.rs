//! End-to-end tests over real TCP sockets

mod common;

use std::net::SocketAddr;
use std::sync::Arc;

use common::Fixture;
use docserve::config::{Config, ServerConfig};
use docserve::http::respond::StatusPolicy;
use docserve::server::listener;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

async fn start(fx: &Fixture, max_connections: usize) -> (SocketAddr, JoinHandle<anyhow::Result<()>>) {
    let site = Arc::new(fx.site(StatusPolicy::Strict).await);
    let tcp = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = tcp.local_addr().unwrap();

    let cfg = ServerConfig {
        listen_addr: addr.to_string(),
        max_connections,
        read_timeout_secs: None,
    };

    let handle = tokio::spawn(async move { listener::serve(tcp, site, &cfg).await });
    (addr, handle)
}

async fn fetch(addr: SocketAddr, request: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut out = Vec::new();
    stream.read_to_end(&mut out).await.unwrap();
    String::from_utf8(out).unwrap()
}

#[tokio::test]
async fn test_server_get_index() {
    let fx = Fixture::new();
    fx.write("index.html", "<html>Hi</html>");
    let (addr, server) = start(&fx, 16).await;

    let response = fetch(addr, "GET /index.html HTTP/1.1\r\nHost: localhost\r\n\r\n").await;
    assert_eq!(response, "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\n\r\n<html>Hi</html>");

    server.abort();
}

#[tokio::test]
async fn test_server_directory_listing() {
    let fx = Fixture::new();
    fx.write("docs/a.txt", "alpha");
    fx.write("docs/b.txt", "beta");
    let (addr, server) = start(&fx, 16).await;

    let response = fetch(addr, "GET /docs HTTP/1.1\r\n\r\n").await;
    assert!(response.starts_with("HTTP/1.1 200 OK\r\nContent-Type: text/html\r\n\r\n<html>"));
    assert!(response.contains("<a href=\"/docs/a.txt\">a</a>"));
    assert!(response.contains("<a href=\"/docs/b.txt\">b</a>"));

    server.abort();
}

#[tokio::test]
async fn test_server_not_found() {
    let fx = Fixture::new();
    let (addr, server) = start(&fx, 16).await;

    let response = fetch(addr, "GET /nothing/here HTTP/1.1\r\n\r\n").await;
    assert!(response.starts_with("HTTP/1.1 404 Not Found\r\n"));
    assert!(response.contains("<title>nothinghere</title>"));

    server.abort();
}

#[tokio::test]
async fn test_server_survives_malformed_request() {
    let fx = Fixture::new();
    fx.write("index.html", "ok");
    let (addr, server) = start(&fx, 16).await;

    let bad = fetch(addr, "NONSENSE\r\n\r\n").await;
    assert!(bad.starts_with("HTTP/1.1 400 Bad Request\r\n"));

    let good = fetch(addr, "GET / HTTP/1.1\r\n\r\n").await;
    assert!(good.ends_with("\r\n\r\nok"));

    server.abort();
}

#[tokio::test]
async fn test_server_concurrent_clients() {
    let fx = Fixture::new();
    fx.write("a.txt", "alpha");
    let (addr, server) = start(&fx, 16).await;

    let clients: Vec<_> = (0..8)
        .map(|_| tokio::spawn(fetch(addr, "GET /a.txt HTTP/1.1\r\n\r\n")))
        .collect();

    for client in clients {
        let response = client.await.unwrap();
        assert_eq!(response, "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\n\r\nalpha");
    }

    server.abort();
}

#[tokio::test]
async fn test_server_rejects_beyond_capacity() {
    let fx = Fixture::new();
    fx.write("a.txt", "alpha");
    let (addr, server) = start(&fx, 1).await;

    // Holds the only permit: connected, never sends a request.
    let idle = TcpStream::connect(addr).await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    for _ in 0..5 {
        let response = fetch(addr, "GET /a.txt HTTP/1.1\r\nHost: x\r\n\r\n").await;
        assert!(response.starts_with("HTTP/1.1 503 Service Unavailable\r\n"));
    }

    drop(idle);
    server.abort();
}

#[tokio::test]
async fn test_server_rejects_silent_peer_beyond_capacity() {
    let fx = Fixture::new();
    let (addr, server) = start(&fx, 1).await;

    let idle = TcpStream::connect(addr).await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    // Sends nothing; still answered once the drain gives up.
    let mut rejected = TcpStream::connect(addr).await.unwrap();
    let mut out = Vec::new();
    rejected.read_to_end(&mut out).await.unwrap();
    assert!(out.starts_with(b"HTTP/1.1 503 Service Unavailable\r\n"));

    drop(idle);
    server.abort();
}

#[tokio::test]
async fn test_reject_reads_request_before_answering() {
    let (mut client, server) = tokio::io::duplex(4096);
    let handle = tokio::spawn(listener::reject(server));

    client.write_all(b"GET /a.txt HTTP/1.1\r\nHost: x\r\n\r\n").await.unwrap();

    let mut out = Vec::new();
    client.read_to_end(&mut out).await.unwrap();
    let response = String::from_utf8(out).unwrap();

    assert!(response.starts_with("HTTP/1.1 503 Service Unavailable\r\n"));
    assert!(response.contains("Content-Type: text/html\r\n"));
    handle.await.unwrap();
}

#[tokio::test]
async fn test_run_fails_on_missing_document_root() {
    let fx = Fixture::new();
    let mut cfg = Config::default();
    cfg.server.listen_addr = "127.0.0.1:0".to_string();
    cfg.site.document_root = fx.outside().join("missing");

    let err = listener::run(&cfg).await.unwrap_err();
    assert!(err.to_string().contains("failed to open document root"));
}
