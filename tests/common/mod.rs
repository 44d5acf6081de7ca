//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use health_orchestrator::config::{ChecksConfig, HealthConfig};
use health_orchestrator::{Probe, ProbeFault, ProbeName, ProbeResult};

/// Always returns the same result.
pub struct FixedProbe {
    pub name: ProbeName,
    pub result: ProbeResult,
    pub calls: Arc<AtomicUsize>,
}

impl FixedProbe {
    pub fn up(name: ProbeName) -> Self {
        Self::new(name, ProbeResult::up())
    }

    pub fn new(name: ProbeName, result: ProbeResult) -> Self {
        Self {
            name,
            result,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Probe for FixedProbe {
    fn name(&self) -> ProbeName {
        self.name
    }

    async fn check(&self, _config: &HealthConfig) -> Result<ProbeResult, ProbeFault> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.result.clone())
    }
}

/// Faults with the given message.
pub struct FailingProbe(pub ProbeName, pub &'static str);

#[async_trait]
impl Probe for FailingProbe {
    fn name(&self) -> ProbeName {
        self.0
    }

    async fn check(&self, _config: &HealthConfig) -> Result<ProbeResult, ProbeFault> {
        Err(ProbeFault::new(self.1))
    }
}

pub struct PanickingProbe(pub ProbeName);

#[async_trait]
impl Probe for PanickingProbe {
    fn name(&self) -> ProbeName {
        self.0
    }

    async fn check(&self, _config: &HealthConfig) -> Result<ProbeResult, ProbeFault> {
        panic!("backend exploded");
    }
}

/// Never completes on its own.
pub struct HangingProbe(pub ProbeName);

#[async_trait]
impl Probe for HangingProbe {
    fn name(&self) -> ProbeName {
        self.0
    }

    async fn check(&self, _config: &HealthConfig) -> Result<ProbeResult, ProbeFault> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(ProbeResult::up())
    }
}

/// Configuration with only `names` enabled.
pub fn config_with(names: &[ProbeName]) -> HealthConfig {
    let mut config = HealthConfig::default();
    config.checks = ChecksConfig::all(false);
    for name in names {
        config.checks.set(*name, true);
    }
    config
}

/// Start a programmable HTTP backend on an ephemeral port.
///
/// Every request is answered with the `(status, body)` returned by `f`.
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let mut buf = [0u8; 4096];
                        let _ = socket.read(&mut buf).await;

                        let (status, body) = f().await;
                        let status_text = match status {
                            200 => "200 OK",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };

                        let response = format!(
                            concat!(
                                "HTTP/1.1 {}\r\n",
                                "Content-Type: application/json\r\n",
                                "Content-Length: {}\r\n",
                                "Connection: close\r\n\r\n{}",
                            ),
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// A backend answering like Loki's build-info endpoint.
pub async fn start_mock_loki() -> SocketAddr {
    start_programmable_backend(|| async {
        (
            200,
            serde_json::json!({
                "version": "2.9.4",
                "revision": "f599ebc",
                "branch": "HEAD",
                "buildDate": "2024-01-24T14:23:52Z",
                "goVersion": "go1.21.3",
            })
            .to_string(),
        )
    })
    .await
}
