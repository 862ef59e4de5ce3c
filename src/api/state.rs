//! Application state for the gateway API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::Mutex;

use crate::calculation::PenaltySchedule;
use crate::catalog::ErrorCatalog;
use crate::gateway::{Clock, GatewayState, SgkGateway, StateCell};

/// Shared application state.
///
/// The gateway sits behind an async mutex, so calls from one API instance
/// are serialized through one writer. Serve separate tenants from separate
/// states.
#[derive(Clone)]
pub struct AppState {
    gateway: Arc<Mutex<SgkGateway>>,
    gateway_state: StateCell,
    catalog: Arc<ErrorCatalog>,
    penalties: Arc<PenaltySchedule>,
    clock: Clock,
}

impl AppState {
    /// Creates the state around a gateway.
    pub fn new(gateway: SgkGateway) -> Self {
        let catalog = Arc::new(gateway.catalog().clone());
        let penalties = Arc::new(gateway.penalties().clone());
        let clock = gateway.clock();
        let gateway_state = gateway.state_cell();
        Self {
            gateway: Arc::new(Mutex::new(gateway)),
            gateway_state,
            catalog,
            penalties,
            clock,
        }
    }

    /// The shared gateway.
    pub fn gateway(&self) -> &Mutex<SgkGateway> {
        &self.gateway
    }

    /// Lifecycle state of the gateway, readable while a call holds the lock.
    pub fn gateway_state(&self) -> GatewayState {
        self.gateway_state.get()
    }

    /// The result code catalog.
    pub fn catalog(&self) -> &ErrorCatalog {
        &self.catalog
    }

    /// The penalty bands.
    pub fn penalties(&self) -> &PenaltySchedule {
        &self.penalties
    }

    /// Today's date according to the gateway clock.
    pub fn today(&self) -> NaiveDate {
        (self.clock)()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_is_clone_and_send() {
        fn assert_clone_send<T: Clone + Send + Sync>() {}
        assert_clone_send::<AppState>();
    }
}
