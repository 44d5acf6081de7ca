//! End-to-end tests against a running server.

mod common;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use common::{config_with, start_mock_loki, start_programmable_backend};
use health_orchestrator::config::HealthConfig;
use health_orchestrator::{build_orchestrator, HttpServer, ProbeName, Shutdown};

async fn start_server(
    config: HealthConfig,
) -> (SocketAddr, Shutdown, mpsc::UnboundedSender<HealthConfig>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let (updates, config_updates) = mpsc::unbounded_channel();
    let server = HttpServer::new(Arc::new(build_orchestrator(config)));
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, config_updates, server_shutdown).await;
    });

    (addr, shutdown, updates)
}

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_loki_up_is_200() {
    let loki = start_mock_loki().await;
    let mut config = config_with(&[ProbeName::EnvConfig, ProbeName::Loki]);
    config.loki.url = Some(format!("http://{loki}"));
    let (addr, shutdown, _updates) = start_server(config).await;

    let res = client()
        .get(format!("http://{addr}/health"))
        .send()
        .await
        .expect("server unreachable");

    assert_eq!(res.status(), 200);
    assert!(res.headers().contains_key("x-request-id"));
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["checks"]["loki"]["status"], "UP");
    assert_eq!(body["checks"]["loki"]["version"], "2.9.4");
    assert_eq!(body["checks"]["loki"]["go_version"], "go1.21.3");

    shutdown.trigger();
}

#[tokio::test]
async fn test_loki_error_status_is_500() {
    let loki = start_programmable_backend(|| async { (503, "not ready".to_string()) }).await;
    let mut config = config_with(&[ProbeName::Loki]);
    config.loki.url = Some(format!("http://{loki}"));
    let (addr, shutdown, _updates) = start_server(config).await;

    let res = client()
        .get(format!("http://{addr}/health"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 500);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "unhealthy");
    assert_eq!(body["checks"]["loki"]["status"], "DOWN");
    assert_eq!(body["checks"]["loki"]["error"], "Loki unreachable (status 503)");

    shutdown.trigger();
}

#[tokio::test]
async fn test_config_update_applies_to_next_request() {
    let (addr, shutdown, updates) = start_server(config_with(&[ProbeName::EnvConfig])).await;
    let url = format!("http://{addr}/health");

    let res = client().get(&url).send().await.unwrap();
    assert_eq!(res.status(), 200);

    let mut debug = config_with(&[ProbeName::EnvConfig]);
    debug.app.debug = true;
    updates.send(debug).unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    let res = client().get(&url).send().await.unwrap();
    assert_eq!(res.status(), 500);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["checks"]["env-config"]["debug_mode"], true);

    shutdown.trigger();
}

#[tokio::test]
async fn test_shutdown_stops_server() {
    let (addr, shutdown, _updates) = start_server(config_with(&[ProbeName::Queue])).await;
    let url = format!("http://{addr}/health");
    assert_eq!(client().get(&url).send().await.unwrap().status(), 200);

    shutdown.trigger();
    tokio::time::sleep(Duration::from_millis(200)).await;

    assert!(client().get(&url).send().await.is_err());
}
