//! Network exchange with the registration service.
//!
//! [`TransportClient`] owns endpoint selection, the HTTPS requirement, the
//! per-call timeout and the single retry. The wire itself sits behind the
//! [`SoapTransport`] trait: [`HttpTransport`] talks to the real service and
//! [`ScriptedTransport`] is an explicit test double.

mod client;
mod endpoints;
mod http;
mod scripted;

use std::time::Duration;

use async_trait::async_trait;

use crate::error::TransportError;

pub use client::{MAX_ATTEMPTS, TransportClient};
pub use endpoints::{EndpointSet, Endpoints};
pub use http::HttpTransport;
pub use scripted::ScriptedTransport;

/// One SOAP POST.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoapRequest {
    /// Target endpoint.
    pub url: String,
    /// Value of the `SOAPAction` header.
    pub soap_action: String,
    /// The envelope.
    pub body: String,
    /// Time allowed for the exchange.
    pub timeout: Duration,
}

/// Raw HTTP reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    /// HTTP status code.
    pub status: u16,
    /// Response body.
    pub body: String,
}

impl HttpReply {
    /// A `200 OK` reply.
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    /// True for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends one SOAP request and returns the raw reply.
///
/// Implementations report connection failures as
/// [`TransportError::Connect`] and expired deadlines as
/// [`TransportError::Timeout`] so the client can retry them.
#[async_trait]
pub trait SoapTransport: Send + Sync {
    /// Posts the request.
    async fn post(&self, request: SoapRequest) -> Result<HttpReply, TransportError>;
}
