//! HTTP backend for the compile endpoint, built on ureq.

use super::protocol::{CompileOutcome, CompileRequest, CompileResponse};
use super::CompileBackend;
use std::time::Duration;
use ureq::tls::{RootCerts, TlsConfig, TlsProvider};
use ureq::Agent;

/// Endpoint used when neither the config nor the CLI names one
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8080/api/compile";

/// Default cap on response bodies (10 MB)
pub const DEFAULT_MAX_RESPONSE_BYTES: u64 = 10 * 1024 * 1024;

/// Sends compile requests as JSON `POST`s to a single endpoint
pub struct HttpBackend {
    agent: Agent,
    endpoint: String,
    max_response_bytes: u64,
}

impl HttpBackend {
    /// Create a backend. `timeout` of `None` leaves requests unbounded; the
    /// remote service owns its own deadlines.
    pub fn new(endpoint: impl Into<String>, timeout: Option<Duration>, max_response_bytes: u64) -> Self {
        HttpBackend {
            agent: agent(timeout),
            endpoint: endpoint.into(),
            max_response_bytes,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn read_response(&self, response: ureq::http::Response<ureq::Body>) -> CompileOutcome {
        let status = response.status();
        let mut body = response.into_body();
        let bytes = match body
            .with_config()
            .limit(self.max_response_bytes)
            .read_to_vec()
        {
            Ok(bytes) => bytes,
            Err(e) => {
                log::warn!("Failed to read compile response body (HTTP {}): {}", status, e);
                return CompileOutcome::Transport { output: None };
            }
        };

        match serde_json::from_slice::<CompileResponse>(&bytes) {
            Ok(parsed) if status.is_success() => parsed.into(),
            // An error status with a structured body still carries the
            // service's message and any partial output
            Ok(parsed) => CompileOutcome::Failure {
                message: parsed.message,
                output: parsed.output,
            },
            Err(e) => {
                log::warn!("Unparseable compile response (HTTP {}): {}", status, e);
                CompileOutcome::Transport { output: None }
            }
        }
    }
}

impl CompileBackend for HttpBackend {
    fn compile(&self, request: &CompileRequest) -> CompileOutcome {
        let body = match serde_json::to_vec(request) {
            Ok(body) => body,
            Err(e) => {
                log::error!("Failed to encode compile request: {}", e);
                return CompileOutcome::Transport { output: None };
            }
        };

        log::debug!("POST {} ({} bytes)", self.endpoint, body.len());
        match self
            .agent
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .send(body.as_slice())
        {
            Ok(response) => self.read_response(response),
            Err(e) => {
                log::warn!("Compile request to {} failed: {}", self.endpoint, e);
                CompileOutcome::Transport { output: None }
            }
        }
    }
}

/// HTTP agent using native-tls. Status codes are returned as responses, not
/// errors, so failure bodies can be read.
fn agent(timeout: Option<Duration>) -> Agent {
    let tls_config = TlsConfig::builder()
        .provider(TlsProvider::NativeTls)
        .root_certs(RootCerts::PlatformVerifier)
        .build();

    Agent::config_builder()
        .tls_config(tls_config)
        .http_status_as_error(false)
        .timeout_global(timeout)
        .build()
        .into()
}
