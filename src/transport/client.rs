//! Transport client with endpoint selection, timeout and a single retry.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use super::{Endpoints, HttpReply, SoapRequest, SoapTransport};
use crate::error::TransportError;
use crate::models::Environment;
use crate::protocol::{Operation, ResponseParser};

/// Attempts per exchange: the first try plus one retry.
pub const MAX_ATTEMPTS: u32 = 2;

/// Performs SOAP exchanges over a [`SoapTransport`].
///
/// Each attempt runs on its own task. If the caller stops waiting, the
/// request still runs until it completes or its timeout expires.
#[derive(Clone)]
pub struct TransportClient {
    transport: Arc<dyn SoapTransport>,
    endpoints: Endpoints,
    timeout: Duration,
}

impl TransportClient {
    /// Creates a client.
    pub fn new(transport: Arc<dyn SoapTransport>, endpoints: Endpoints, timeout: Duration) -> Self {
        Self {
            transport,
            endpoints,
            timeout,
        }
    }

    /// The per-call timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Sets the per-call timeout for subsequent exchanges.
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    /// The configured endpoints.
    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Sends an envelope and returns the response document.
    ///
    /// Non-2xx replies are returned as documents only when they carry a SOAP
    /// fault, so the parser can report it. Any other non-2xx reply is
    /// [`TransportError::HttpStatus`].
    pub async fn exchange(
        &self,
        environment: Environment,
        operation: Operation,
        envelope: String,
    ) -> Result<String, TransportError> {
        let url = self
            .endpoints
            .resolve(environment, operation.family())?
            .to_string();
        let request = SoapRequest {
            url: url.clone(),
            soap_action: operation.element().to_string(),
            body: envelope,
            timeout: self.timeout,
        };

        let mut attempt = 1;
        loop {
            debug!(
                endpoint = %url,
                operation = %operation,
                attempt = attempt,
                "Sending SOAP request"
            );
            match self.send_detached(request.clone()).await {
                Ok(reply) => return interpret(&url, reply),
                Err(error) if error.is_transient() && attempt < MAX_ATTEMPTS => {
                    warn!(
                        endpoint = %url,
                        operation = %operation,
                        attempt = attempt,
                        error = %error,
                        "Transient transport failure, retrying once"
                    );
                    attempt += 1;
                }
                Err(error) => return Err(error),
            }
        }
    }

    async fn send_detached(&self, request: SoapRequest) -> Result<HttpReply, TransportError> {
        let transport = Arc::clone(&self.transport);
        let timeout = request.timeout;
        let endpoint = request.url.clone();
        let task = tokio::spawn(async move {
            match tokio::time::timeout(timeout, transport.post(request)).await {
                Ok(result) => result,
                Err(_) => Err(TransportError::Timeout {
                    endpoint,
                    after: timeout,
                }),
            }
        });
        task.await.map_err(|e| TransportError::Detached {
            message: e.to_string(),
        })?
    }
}

impl std::fmt::Debug for TransportClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportClient")
            .field("endpoints", &self.endpoints)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

fn interpret(url: &str, reply: HttpReply) -> Result<String, TransportError> {
    if reply.is_success() || ResponseParser::fault_of(&reply.body).is_some() {
        return Ok(reply.body);
    }
    Err(TransportError::HttpStatus {
        endpoint: url.to_string(),
        status: reply.status,
    })
}
