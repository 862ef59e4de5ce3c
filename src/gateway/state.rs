//! Gateway lifecycle state.
//!
//! The state lives in a [`StateCell`] shared between the gateway and any
//! observers, so a caller waiting on a busy gateway can still see that it
//! is `InFlight`.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

use serde::Serialize;

/// Lifecycle state of a gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GatewayState {
    /// No credentials set; every operation fails fast.
    Unconfigured,
    /// Credentials set and no call running.
    Ready,
    /// A call is running.
    InFlight,
}

impl GatewayState {
    fn to_raw(self) -> u8 {
        match self {
            GatewayState::Unconfigured => 0,
            GatewayState::Ready => 1,
            GatewayState::InFlight => 2,
        }
    }

    fn from_raw(raw: u8) -> Self {
        match raw {
            1 => GatewayState::Ready,
            2 => GatewayState::InFlight,
            _ => GatewayState::Unconfigured,
        }
    }
}

impl fmt::Display for GatewayState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GatewayState::Unconfigured => write!(f, "unconfigured"),
            GatewayState::Ready => write!(f, "ready"),
            GatewayState::InFlight => write!(f, "in_flight"),
        }
    }
}

/// Shared, read-only view of a gateway's lifecycle state.
///
/// Clones observe the same gateway. Only the gateway changes the state.
#[derive(Clone)]
pub struct StateCell {
    raw: Arc<AtomicU8>,
}

impl StateCell {
    pub(crate) fn new(state: GatewayState) -> Self {
        Self {
            raw: Arc::new(AtomicU8::new(state.to_raw())),
        }
    }

    /// The current state.
    pub fn get(&self) -> GatewayState {
        GatewayState::from_raw(self.raw.load(Ordering::SeqCst))
    }

    pub(crate) fn set(&self, state: GatewayState) {
        self.raw.store(state.to_raw(), Ordering::SeqCst);
    }
}

impl fmt::Debug for StateCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("StateCell").field(&self.get()).finish()
    }
}

/// Holds the state at `InFlight` and restores `Ready` when dropped.
///
/// Dropping covers every exit path: success, error, or the caller
/// abandoning the future.
pub(crate) struct InFlightGuard<'a> {
    cell: &'a StateCell,
}

impl<'a> InFlightGuard<'a> {
    pub(crate) fn enter(cell: &'a StateCell) -> Self {
        cell.set(GatewayState::InFlight);
        Self { cell }
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.cell.set(GatewayState::Ready);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_restores_ready() {
        let cell = StateCell::new(GatewayState::Ready);
        {
            let _guard = InFlightGuard::enter(&cell);
            assert_eq!(cell.get(), GatewayState::InFlight);
        }
        assert_eq!(cell.get(), GatewayState::Ready);
    }

    #[test]
    fn test_guard_restores_ready_on_panic() {
        let cell = StateCell::new(GatewayState::Ready);
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = InFlightGuard::enter(&cell);
            panic!("call failed");
        }));
        assert!(result.is_err());
        assert_eq!(cell.get(), GatewayState::Ready);
    }

    #[test]
    fn test_clones_observe_the_same_state() {
        let cell = StateCell::new(GatewayState::Unconfigured);
        let observer = cell.clone();
        let _guard = InFlightGuard::enter(&cell);
        assert_eq!(observer.get(), GatewayState::InFlight);
    }

    #[test]
    fn test_raw_round_trip() {
        for state in [
            GatewayState::Unconfigured,
            GatewayState::Ready,
            GatewayState::InFlight,
        ] {
            assert_eq!(GatewayState::from_raw(state.to_raw()), state);
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(GatewayState::InFlight.to_string(), "in_flight");
    }
}
