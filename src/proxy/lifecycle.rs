//! Worker Lifecycle
//!
//! Tracks the `Installing -> Activating -> Active` progression of one
//! worker instance, plus the host signals raised along the way.

use serde::Serialize;
use tracing::info;

use crate::error::{ProxyError, Result};

// == Worker State ==
/// Lifecycle state of a worker instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkerState {
    /// Install event pending or running
    Installing,
    /// Installed; activate event pending or running
    Activating,
    /// Controlling clients
    Active,
    /// Install failed; the instance is discarded
    Redundant,
}

// == Lifecycle ==
/// State machine plus the skip-waiting and client-claim flags.
#[derive(Debug)]
pub struct Lifecycle {
    state: WorkerState,
    skip_waiting: bool,
    clients_claimed: bool,
}

impl Lifecycle {
    // == Constructor ==
    /// A fresh instance starts installing.
    pub fn new() -> Self {
        Self {
            state: WorkerState::Installing,
            skip_waiting: false,
            clients_claimed: false,
        }
    }

    pub fn state(&self) -> WorkerState {
        self.state
    }

    pub fn skip_waiting_requested(&self) -> bool {
        self.skip_waiting
    }

    pub fn clients_claimed(&self) -> bool {
        self.clients_claimed
    }

    /// Fails unless the instance is in `expected`.
    pub fn expect(&self, expected: WorkerState) -> Result<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(ProxyError::InvalidState {
                expected,
                found: self.state,
            })
        }
    }

    // == Host Signals ==
    /// Asks the host to adopt this instance without waiting for older ones.
    pub fn skip_waiting(&mut self) {
        if !self.skip_waiting {
            info!("Skip-waiting requested");
        }
        self.skip_waiting = true;
    }

    // == Transitions ==
    /// Installing -> Activating.
    pub fn installed(&mut self) -> Result<()> {
        self.transition(WorkerState::Installing, WorkerState::Activating)
    }

    /// Activating -> Active, claiming every open client.
    pub fn claim_clients(&mut self) -> Result<()> {
        self.transition(WorkerState::Activating, WorkerState::Active)?;
        self.clients_claimed = true;
        info!("Clients claimed");
        Ok(())
    }

    /// Installing -> Redundant.
    pub fn install_failed(&mut self) -> Result<()> {
        self.transition(WorkerState::Installing, WorkerState::Redundant)
    }

    fn transition(&mut self, from: WorkerState, to: WorkerState) -> Result<()> {
        self.expect(from)?;
        info!("Worker state {:?} -> {:?}", from, to);
        self.state = to;
        Ok(())
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path() {
        let mut lifecycle = Lifecycle::new();
        assert_eq!(lifecycle.state(), WorkerState::Installing);

        lifecycle.skip_waiting();
        lifecycle.installed().unwrap();
        assert_eq!(lifecycle.state(), WorkerState::Activating);
        assert!(!lifecycle.clients_claimed());

        lifecycle.claim_clients().unwrap();
        assert_eq!(lifecycle.state(), WorkerState::Active);
        assert!(lifecycle.clients_claimed());
        assert!(lifecycle.skip_waiting_requested());
    }

    #[test]
    fn test_claim_before_install_rejected() {
        let mut lifecycle = Lifecycle::new();

        let err = lifecycle.claim_clients().unwrap_err();
        assert!(matches!(
            err,
            ProxyError::InvalidState {
                expected: WorkerState::Activating,
                found: WorkerState::Installing
            }
        ));
        assert!(!lifecycle.clients_claimed());
    }

    #[test]
    fn test_failed_install_is_terminal() {
        let mut lifecycle = Lifecycle::new();
        lifecycle.install_failed().unwrap();

        assert_eq!(lifecycle.state(), WorkerState::Redundant);
        assert!(lifecycle.installed().is_err());
        assert!(lifecycle.claim_clients().is_err());
    }

    #[test]
    fn test_install_twice_rejected() {
        let mut lifecycle = Lifecycle::new();
        lifecycle.installed().unwrap();
        assert!(lifecycle.installed().is_err());
    }
}
