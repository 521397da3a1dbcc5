//! The one-shot teardown handshake between the UI thread and the renderer.
//!
//! The UI thread delivers `SurfaceEvent::Destroyed`, then calls
//! [`QuitGate::wait`]. The renderer, once it has stopped issuing GL calls,
//! calls [`QuitGate::acknowledge`]. The gate holds at most one token.

use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TrySendError};
use glbridge_core::config::HandshakeConfig;

use crate::error::HandshakeError;

/// How long and how often teardown waits for an acknowledgment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandshakePolicy {
    pub attempt_timeout: Duration,
    pub max_attempts: u32,
}

impl Default for HandshakePolicy {
    fn default() -> Self {
        HandshakeConfig::default().into()
    }
}

impl From<HandshakeConfig> for HandshakePolicy {
    fn from(config: HandshakeConfig) -> Self {
        Self {
            attempt_timeout: config.attempt_timeout(),
            max_attempts: config.max_attempts.max(1),
        }
    }
}

#[derive(Debug)]
pub struct QuitGate {
    token_tx: Sender<()>,
    token_rx: Receiver<()>,
}

impl QuitGate {
    pub fn new() -> Self {
        let (token_tx, token_rx) = crossbeam_channel::bounded(1);
        Self { token_tx, token_rx }
    }

    /// Renderer side: hand over the token.
    ///
    /// Returns `AlreadyAcknowledged` if the token is already waiting to be taken.
    pub fn acknowledge(&self) -> Result<(), HandshakeError> {
        match self.token_tx.try_send(()) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(())) => Err(HandshakeError::AlreadyAcknowledged),
            Err(TrySendError::Disconnected(())) => Err(HandshakeError::GateClosed),
        }
    }

    /// Whether a token is waiting to be taken.
    pub fn is_acknowledged(&self) -> bool {
        !self.token_rx.is_empty()
    }

    /// UI side: block until the renderer acknowledges, at most
    /// `policy.max_attempts` times `policy.attempt_timeout`.
    pub fn wait(&self, policy: &HandshakePolicy) -> Result<u32, HandshakeError> {
        let attempts = policy.max_attempts.max(1);
        for attempt in 1..=attempts {
            match self.token_rx.recv_timeout(policy.attempt_timeout) {
                Ok(()) => {
                    tracing::debug!("quit acknowledged after {} attempt(s)", attempt);
                    return Ok(attempt);
                }
                Err(RecvTimeoutError::Timeout) => {
                    tracing::warn!(
                        "renderer has not acknowledged quit (attempt {}/{})",
                        attempt,
                        attempts
                    );
                }
                Err(RecvTimeoutError::Disconnected) => return Err(HandshakeError::GateClosed),
            }
        }

        Err(HandshakeError::TimedOut {
            attempts,
            timeout: policy.attempt_timeout,
        })
    }
}

impl Default for QuitGate {
    fn default() -> Self {
        Self::new()
    }
}
