//! The seams a windowing backend implements.

use std::sync::Arc;

use glbridge_core::config::SizeLimits;
use glbridge_core::geometry::{Rect, Size};

use crate::app::AppShim;
use crate::error::{BridgeError, PlatformError};
use crate::surface::{Focusable, RenderSurface, ViewHandler};

/// How to build the native window.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowDescriptor {
    pub title: String,
    /// Initial frame in screen coordinates.
    pub rect: Rect,
    pub fullscreen: bool,
}

impl Default for WindowDescriptor {
    fn default() -> Self {
        Self {
            title: "glbridge".to_string(),
            rect: Rect::new(0.0, 0.0, 800.0, 600.0),
            fullscreen: false,
        }
    }
}

/// A top-level window owned by the UI thread.
pub trait NativeWindow: Focusable {
    /// Size of the content area in pixels.
    fn content_size(&self) -> Size<u32>;

    /// Create the GL context for the content area and hand it to `view`.
    fn embed_surface(&mut self, view: &dyn ViewHandler) -> Result<(), BridgeError>;

    fn set_size_limits(&mut self, min: Size<u32>, max: Size<u32>);

    fn center_on_screen(&mut self);

    fn set_fullscreen(&mut self, fullscreen: bool);

    fn show(&mut self);

    /// Request a new content size. The backend may apply it later.
    fn resize(&mut self, size: Size<u32>);

    /// Hide the window ahead of teardown.
    fn request_close(&mut self);
}

pub trait Platform {
    type Window: NativeWindow;

    fn create_window(
        &mut self,
        descriptor: &WindowDescriptor,
    ) -> Result<Self::Window, PlatformError>;
}

/// Everything a backend needs to open the application's one window.
#[derive(Debug, Clone)]
pub struct LaunchRequest {
    pub rect: Rect,
    pub title: String,
    pub surface: Arc<RenderSurface>,
    pub fullscreen: bool,
    pub size_limits: Option<SizeLimits>,
}

impl LaunchRequest {
    pub fn descriptor(&self) -> WindowDescriptor {
        WindowDescriptor {
            title: self.title.clone(),
            rect: self.rect,
            fullscreen: self.fullscreen,
        }
    }
}

/// Drives the native event loop until the application quits.
pub trait EventLoop {
    /// Blocks the calling thread. Returns the process exit status.
    fn run(self, app: &AppShim, launch: LaunchRequest) -> Result<i32, BridgeError>;
}
