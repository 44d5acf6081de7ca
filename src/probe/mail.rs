//! Mail transport probe.

use std::fmt;

use async_trait::async_trait;
use url::Url;

use super::{Probe, ProbeFault, ProbeName, ProbeResult};
use crate::config::{HealthConfig, MailConfig};

/// A mail transport as described by configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MailTransport {
    Smtp { host: String, port: u16, implicit_tls: bool },
    Sendmail { path: String },
    Log,
    Array,
}

impl MailTransport {
    /// Build the transport the configuration describes.
    pub fn from_config(config: &MailConfig) -> Result<Self, ProbeFault> {
        match config.mailer.as_str() {
            "smtp" => {
                let raw = config
                    .url
                    .as_deref()
                    .ok_or_else(|| ProbeFault::new("SMTP URL not configured"))?;
                let url = Url::parse(raw)
                    .map_err(|e| ProbeFault::new(format!("invalid SMTP URL '{}': {}", raw, e)))?;
                let implicit_tls = match url.scheme() {
                    "smtp" => false,
                    "smtps" => true,
                    other => {
                        return Err(ProbeFault::new(format!(
                            "unsupported SMTP scheme '{}'",
                            other
                        )))
                    }
                };
                let host = url
                    .host_str()
                    .filter(|h| !h.is_empty())
                    .ok_or_else(|| ProbeFault::new("SMTP URL has no host"))?
                    .to_string();
                let port = url.port().unwrap_or(if implicit_tls { 465 } else { 587 });
                Ok(MailTransport::Smtp {
                    host,
                    port,
                    implicit_tls,
                })
            }
            "sendmail" => Ok(MailTransport::Sendmail {
                path: config
                    .url
                    .clone()
                    .unwrap_or_else(|| "/usr/sbin/sendmail -bs -i".to_string()),
            }),
            "log" => Ok(MailTransport::Log),
            "array" => Ok(MailTransport::Array),
            other => Err(ProbeFault::new(format!("unsupported mailer '{}'", other))),
        }
    }
}

impl fmt::Display for MailTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MailTransport::Smtp {
                host,
                port,
                implicit_tls,
            } => {
                let scheme = if *implicit_tls { "smtps" } else { "smtp" };
                write!(f, "{}://{}:{}", scheme, host, port)
            }
            MailTransport::Sendmail { path } => write!(f, "sendmail://{}", path),
            MailTransport::Log => f.write_str("log://"),
            MailTransport::Array => f.write_str("null://"),
        }
    }
}

/// UP iff a transport can be constructed from configuration.
pub struct MailProbe;

#[async_trait]
impl Probe for MailProbe {
    fn name(&self) -> ProbeName {
        ProbeName::Mail
    }

    async fn check(&self, config: &HealthConfig) -> Result<ProbeResult, ProbeFault> {
        let transport = MailTransport::from_config(&config.mail)?;
        Ok(ProbeResult::up().with("transport", transport.to_string()))
    }
}
