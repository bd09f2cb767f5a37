//! Blocking HTTP transport backed by `reqwest`.

use crate::domain::error::BuffetError;
use crate::ports::http_port::{HttpPort, HttpResponse};
use std::time::Duration;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

pub struct ReqwestHttpAdapter {
    client: reqwest::blocking::Client,
}

impl ReqwestHttpAdapter {
    pub fn new() -> Result<Self, BuffetError> {
        Self::with_timeout(Duration::from_secs(30))
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, BuffetError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| BuffetError::Network {
                url: String::new(),
                reason: format!("failed to build HTTP client: {}", e),
            })?;
        Ok(Self { client })
    }
}

impl HttpPort for ReqwestHttpAdapter {
    fn get(&self, url: &str) -> Result<HttpResponse, BuffetError> {
        let network = |e: reqwest::Error| BuffetError::Network {
            url: url.to_string(),
            reason: e.to_string(),
        };
        tracing::debug!(url, "GET");
        let response = self.client.get(url).send().map_err(network)?;
        let status = response.status().as_u16();
        let body = response.bytes().map_err(network)?.to_vec();
        tracing::debug!(url, status, bytes = body.len(), "response received");
        Ok(HttpResponse { status, body })
    }
}
