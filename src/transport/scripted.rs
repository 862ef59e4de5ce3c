//! Scripted transport for tests and offline demos.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;

use super::{HttpReply, SoapRequest, SoapTransport};
use crate::error::TransportError;

/// A transport that answers from a queue of prepared replies.
///
/// It never fabricates a reply: once the queue is empty every call fails
/// with [`TransportError::Client`]. Every request is recorded, so tests can
/// assert that no call was made.
///
/// # Example
///
/// ```
/// use sgk_gateway::transport::ScriptedTransport;
///
/// let transport = ScriptedTransport::new().reply("<ok/>");
/// assert_eq!(transport.call_count(), 0);
/// assert_eq!(transport.pending(), 1);
/// ```
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<Result<HttpReply, TransportError>>>,
    requests: Mutex<Vec<SoapRequest>>,
    delay: Option<Duration>,
    completed: AtomicUsize,
}

impl ScriptedTransport {
    /// Creates a transport with no replies queued.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a `200 OK` reply.
    pub fn reply(self, body: impl Into<String>) -> Self {
        self.then(Ok(HttpReply::ok(body)))
    }

    /// Queues a reply with the given status.
    pub fn reply_status(self, status: u16, body: impl Into<String>) -> Self {
        self.then(Ok(HttpReply {
            status,
            body: body.into(),
        }))
    }

    /// Queues a transport failure.
    pub fn fail(self, error: TransportError) -> Self {
        self.then(Err(error))
    }

    /// Delays every reply.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    fn then(self, outcome: Result<HttpReply, TransportError>) -> Self {
        self.push(outcome);
        self
    }

    /// Queues an outcome on a shared transport.
    pub fn push(&self, outcome: Result<HttpReply, TransportError>) {
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(outcome);
    }

    /// Number of requests received.
    pub fn call_count(&self) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Number of requests that ran to completion.
    pub fn completed_count(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    /// Replies still queued.
    pub fn pending(&self) -> usize {
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Copies of the received requests, in arrival order.
    pub fn requests(&self) -> Vec<SoapRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl SoapTransport for ScriptedTransport {
    async fn post(&self, request: SoapRequest) -> Result<HttpReply, TransportError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);
        let outcome = self
            .replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or_else(|| {
                Err(TransportError::Client {
                    message: "no scripted reply left".to_string(),
                })
            });

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.completed.fetch_add(1, Ordering::SeqCst);
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> SoapRequest {
        SoapRequest {
            url: "https://example.test/hire".to_string(),
            soap_action: "iseGirisKaydet".to_string(),
            body: "<e/>".to_string(),
            timeout: Duration::from_secs(1),
        }
    }

    #[tokio::test]
    async fn test_replies_in_queue_order() {
        let transport = ScriptedTransport::new().reply("<a/>").reply_status(500, "<b/>");
        assert_eq!(transport.post(request()).await.unwrap().body, "<a/>");
        assert_eq!(transport.post(request()).await.unwrap().status, 500);
        assert_eq!(transport.call_count(), 2);
        assert_eq!(transport.requests()[0].soap_action, "iseGirisKaydet");
    }

    #[tokio::test]
    async fn test_empty_queue_fails_instead_of_fabricating() {
        let transport = ScriptedTransport::new();
        let error = transport.post(request()).await.unwrap_err();
        assert!(matches!(error, TransportError::Client { .. }));
        assert!(!error.is_transient());
    }
}
