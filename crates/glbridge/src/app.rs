use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use glbridge_core::config::BridgeConfig;
use glbridge_core::geometry::Rect;
use parking_lot::Mutex;

use crate::error::BridgeError;
use crate::platform::{EventLoop, LaunchRequest, Platform};
use crate::quit_gate::HandshakePolicy;
use crate::surface::RenderSurface;
use crate::window::WindowShim;

type Waker = Box<dyn Fn() + Send + Sync>;

/// The application context.
///
/// Owns the quit flag shared between the event loop and any thread that wants
/// the application to exit. One `AppShim` runs one window at a time.
pub struct AppShim {
    signature: String,
    config: BridgeConfig,
    quit: AtomicBool,
    waker: Mutex<Option<Waker>>,
}

impl AppShim {
    /// `signature` identifies the application to the toolkit, e.g.
    /// `"application/x-vnd.example"`.
    pub fn new(signature: &str) -> Result<Self, BridgeError> {
        if signature.trim().is_empty() || signature.contains('\0') {
            return Err(BridgeError::InvalidSignature(signature.to_string()));
        }

        tracing::debug!("application {:?} created", signature);
        Ok(Self {
            signature: signature.to_string(),
            config: BridgeConfig::default(),
            quit: AtomicBool::new(false),
            waker: Mutex::new(None),
        })
    }

    pub fn with_config(mut self, config: BridgeConfig) -> Result<Self, BridgeError> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn handshake_policy(&self) -> HandshakePolicy {
        self.config.handshake.into()
    }

    /// Open the window around `surface` and block until the application quits.
    ///
    /// A quit requested before the call is honored as soon as the window is up.
    /// The quit flag is cleared again on return.
    ///
    /// Returns the exit status; `Err` only for failures the process cannot
    /// recover from, such as the renderer never acknowledging teardown.
    pub fn run<L: EventLoop>(
        &self,
        event_loop: L,
        rect: Rect,
        title: &str,
        surface: Arc<RenderSurface>,
        fullscreen: bool,
    ) -> Result<i32, BridgeError> {
        if title.contains('\0') {
            return Err(BridgeError::InvalidTitle(title.to_string()));
        }

        let launch = LaunchRequest {
            rect,
            title: title.to_string(),
            surface,
            fullscreen,
            size_limits: self.config.window.size_limits,
        };

        tracing::info!("running {:?}", self.signature);
        let result = event_loop.run(self, launch);
        self.set_waker(None);
        self.quit.store(false, Ordering::SeqCst);

        match &result {
            Ok(status) => tracing::info!("{:?} exited with status {}", self.signature, status),
            Err(e) => tracing::error!("{:?} failed: {}", self.signature, e),
        }
        result
    }

    /// Build, place and show the window. Shared by every backend.
    pub fn launch_window<P: Platform>(
        &self,
        platform: &mut P,
        request: LaunchRequest,
    ) -> Result<WindowShim<P::Window>, BridgeError> {
        let descriptor = request.descriptor();
        let mut window = WindowShim::new(
            platform,
            &descriptor,
            request.surface,
            request.size_limits,
        )?;
        window.show();
        Ok(window)
    }

    /// Ask the running loop to quit. Callable from any thread.
    pub fn request_quit(&self) {
        if !self.quit.swap(true, Ordering::SeqCst) {
            tracing::debug!("quit requested");
        }
        if let Some(wake) = self.waker.lock().as_ref() {
            wake();
        }
    }

    pub fn quit_requested(&self) -> bool {
        self.quit.load(Ordering::SeqCst)
    }

    /// Installed by the running event loop so `request_quit` can wake it.
    pub fn set_waker(&self, waker: Option<Waker>) {
        *self.waker.lock() = waker;
    }
}

impl std::fmt::Debug for AppShim {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppShim")
            .field("signature", &self.signature)
            .field("quit_requested", &self.quit_requested())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_signature_validation() {
        assert!(AppShim::new("application/x-vnd.glbridge").is_ok());
        assert!(matches!(
            AppShim::new(""),
            Err(BridgeError::InvalidSignature(_))
        ));
        assert!(AppShim::new("bad\0sig").is_err());
    }

    #[test]
    fn test_request_quit_wakes_loop() {
        let app = AppShim::new("application/x-vnd.glbridge").unwrap();
        let wakes = Arc::new(AtomicUsize::new(0));
        let counter = wakes.clone();
        app.set_waker(Some(Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })));

        assert!(!app.quit_requested());
        app.request_quit();
        app.request_quit();
        assert!(app.quit_requested());
        assert_eq!(wakes.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_with_config_rejects_invalid_handshake() {
        let mut config = BridgeConfig::default();
        config.handshake.max_attempts = 0;
        let app = AppShim::new("application/x-vnd.glbridge").unwrap();
        assert!(matches!(
            app.with_config(config),
            Err(BridgeError::Config(_))
        ));
    }
}
