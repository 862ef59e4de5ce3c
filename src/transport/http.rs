//! HTTPS transport over `reqwest`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;

use super::{HttpReply, SoapRequest, SoapTransport};
use crate::error::TransportError;

/// Transport that posts envelopes with a shared `reqwest` client.
///
/// The client only follows https URLs.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Builds a transport with an https-only client.
    pub fn new() -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .https_only(true)
            .pool_max_idle_per_host(4)
            .build()
            .map_err(|e| TransportError::Client {
                message: e.to_string(),
            })?;
        Ok(Self { client })
    }

    /// Wraps an existing client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SoapTransport for HttpTransport {
    async fn post(&self, request: SoapRequest) -> Result<HttpReply, TransportError> {
        let SoapRequest {
            url,
            soap_action,
            body,
            timeout,
        } = request;

        let response = self
            .client
            .post(&url)
            .timeout(timeout)
            .header(CONTENT_TYPE, "text/xml; charset=utf-8")
            .header("SOAPAction", format!("\"{}\"", soap_action))
            .body(body)
            .send()
            .await
            .map_err(|e| map_error(&url, timeout, e))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| map_error(&url, timeout, e))?;
        Ok(HttpReply { status, body })
    }
}

fn map_error(url: &str, timeout: Duration, error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout {
            endpoint: url.to_string(),
            after: timeout,
        }
    } else if error.is_connect() {
        TransportError::Connect {
            endpoint: url.to_string(),
            message: error.to_string(),
        }
    } else if error.is_decode() || error.is_body() {
        TransportError::MalformedResponse {
            message: error.to_string(),
        }
    } else {
        TransportError::Client {
            message: error.to_string(),
        }
    }
}
