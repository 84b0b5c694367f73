//! Shared utilities for integration testing.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use eth_explorer::config::ExplorerConfig;
use eth_explorer::http::HttpServer;
use eth_explorer::lifecycle::Shutdown;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;

pub type Params = HashMap<String, String>;

/// Programmable stand-in for the upstream API that records every query.
pub struct MockUpstream {
    pub addr: SocketAddr,
    calls: Arc<Mutex<Vec<Params>>>,
}

impl MockUpstream {
    pub fn base_url(&self) -> String {
        format!("http://{}/v2/api", self.addr)
    }

    /// Query parameters of every call received so far, in order.
    pub fn calls(&self) -> Vec<Params> {
        self.calls.lock().unwrap().clone()
    }

    /// `action` parameter of every call received so far, in order.
    pub fn actions(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .map(|p| p.get("action").cloned().unwrap_or_default())
            .collect()
    }
}

/// Start a mock upstream. `f` maps the decoded query to a status and body.
pub async fn start_mock_upstream<F>(f: F) -> MockUpstream
where
    F: Fn(&Params) -> (u16, String) + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let calls = Arc::new(Mutex::new(Vec::new()));
    let f = Arc::new(f);

    let recorded = calls.clone();
    tokio::spawn(async move {
        loop {
            let (socket, _) = match listener.accept().await {
                Ok(conn) => conn,
                Err(_) => break,
            };
            let f = f.clone();
            let recorded = recorded.clone();
            tokio::spawn(async move {
                let (read_half, mut write_half) = socket.into_split();
                let mut reader = BufReader::new(read_half);

                let mut request_line = String::new();
                if reader.read_line(&mut request_line).await.is_err() {
                    return;
                }
                // Drain headers.
                loop {
                    let mut line = String::new();
                    match reader.read_line(&mut line).await {
                        Ok(0) => break,
                        Ok(_) if line == "\r\n" || line == "\n" => break,
                        Ok(_) => continue,
                        Err(_) => return,
                    }
                }

                let target = request_line.split_whitespace().nth(1).unwrap_or("/");
                let query = target.split_once('?').map(|(_, q)| q).unwrap_or("");
                let params: Params = url::form_urlencoded::parse(query.as_bytes())
                    .into_owned()
                    .collect();
                recorded.lock().unwrap().push(params.clone());

                let (status, body) = f(&params);
                let status_text = match status {
                    200 => "200 OK",
                    404 => "404 Not Found",
                    429 => "429 Too Many Requests",
                    500 => "500 Internal Server Error",
                    502 => "502 Bad Gateway",
                    503 => "503 Service Unavailable",
                    _ => "200 OK",
                };
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\n\
                     Content-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status_text,
                    body.len(),
                    body
                );
                let _ = write_half.write_all(response.as_bytes()).await;
                let _ = write_half.shutdown().await;
            });
        }
    });

    MockUpstream { addr, calls }
}

/// Config pointing at `base_url` with pacing disabled.
pub fn test_config(base_url: &str, api_key: Option<&str>) -> ExplorerConfig {
    let mut config = ExplorerConfig::default();
    config.listener.bind_host = "127.0.0.1".into();
    config.upstream.base_url = base_url.to_string();
    config.upstream.api_key = api_key.map(String::from);
    config.upstream.keyed_interval_ms = 0;
    config.upstream.anonymous_interval_ms = 0;
    config.upstream.timeout_secs = 5;
    config
}

/// Serve the explorer on an ephemeral port; returns its base URL.
pub async fn start_explorer(config: ExplorerConfig, shutdown: &Shutdown) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = HttpServer::new(config).unwrap();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    format!("http://{}", addr)
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
