//! Error types for the bridge.

use std::time::Duration;

use glbridge_core::config::ConfigError;

/// Misuse or failure of the GL context control surface.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ContextError {
    /// No context has been bound yet; the surface is not embedded in a window.
    #[error("GL context is not available yet")]
    Unavailable,

    /// The calling thread already holds the context lock.
    #[error("GL context is already locked by this thread")]
    AlreadyHeld,

    /// The calling thread does not hold the context lock.
    #[error("GL context is not held by this thread")]
    NotHeld,

    /// The context was destroyed during teardown.
    #[error("GL context has been destroyed")]
    Destroyed,

    /// The windowing backend reported a failure.
    #[error("GL backend error: {0}")]
    Backend(String),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum HandshakeError {
    /// The renderer never acknowledged the destroyed notification.
    #[error("renderer did not acknowledge quit after {attempts} attempts of {timeout:?}")]
    TimedOut { attempts: u32, timeout: Duration },

    /// The renderer already acknowledged; the gate only holds one token.
    #[error("quit was already acknowledged")]
    AlreadyAcknowledged,

    /// The surface has not delivered `SurfaceEvent::Destroyed` yet.
    #[error("quit acknowledged before the surface started detaching")]
    NotDetaching,

    /// The gate no longer exists: the handshake has finished.
    #[error("quit gate is closed")]
    GateClosed,
}

#[derive(thiserror::Error, Debug)]
pub enum PlatformError {
    #[error("failed to create native window: {0}")]
    WindowCreation(String),

    #[error("failed to create GL context: {0}")]
    ContextCreation(String),

    #[error("failed to run event loop: {0}")]
    EventLoop(String),
}

#[derive(thiserror::Error, Debug)]
pub enum BridgeError {
    #[error("invalid application signature: {0:?}")]
    InvalidSignature(String),

    #[error("invalid window title: {0:?}")]
    InvalidTitle(String),

    #[error("render surface is {0}, expected {1}")]
    SurfaceState(&'static str, &'static str),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Context(#[from] ContextError),

    #[error(transparent)]
    Handshake(#[from] HandshakeError),

    #[error(transparent)]
    Platform(#[from] PlatformError),
}
