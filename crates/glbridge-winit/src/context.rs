use std::ffi::{CStr, c_void};
use std::num::NonZeroU32;
use std::sync::Arc;

use glbridge::{ContextError, GlContext, PlatformError, Size};
use glutin::config::{Config, GlConfig};
use glutin::context::{
    ContextAttributesBuilder, NotCurrentGlContext, PossiblyCurrentContext,
    PossiblyCurrentGlContext,
};
use glutin::display::{Display, GetGlDisplay, GlDisplay};
use glutin::surface::{GlSurface, Surface, WindowSurface};
use glutin_winit::GlWindow;
use parking_lot::Mutex;
use winit::raw_window_handle::HasWindowHandle;
use winit::window::Window;

fn backend(e: glutin::error::Error) -> ContextError {
    ContextError::Backend(e.to_string())
}

/// A glutin context and window surface for one winit window.
///
/// The context is created on the UI thread but never made current there; the
/// renderer makes it current through the surface's context lock.
pub struct GlutinContext {
    context: PossiblyCurrentContext,
    surface: Surface<WindowSurface>,
    display: Display,
    pending_size: Mutex<Option<Size<u32>>>,
    // Keeps the native window alive for as long as the drawable exists.
    _window: Arc<Window>,
}

// SAFETY: glutin marks contexts !Send because a context may only be current on
// one thread at a time. `RenderSurface` only calls into a `GlContext` from the
// thread holding its context lock, except for `resize`, which only touches the
// `pending_size` mutex.
unsafe impl Send for GlutinContext {}
unsafe impl Sync for GlutinContext {}

impl GlutinContext {
    pub fn new(window: Arc<Window>, config: &Config) -> Result<Self, PlatformError> {
        let raw_window_handle = window
            .window_handle()
            .map(|handle| handle.as_raw())
            .map_err(|e| PlatformError::ContextCreation(e.to_string()))?;

        let display = config.display();
        let context_attributes = ContextAttributesBuilder::new().build(Some(raw_window_handle));
        let not_current = unsafe { display.create_context(config, &context_attributes) }
            .map_err(|e| PlatformError::ContextCreation(e.to_string()))?;

        let surface_attributes = window
            .build_surface_attributes(Default::default())
            .map_err(|e| PlatformError::ContextCreation(e.to_string()))?;
        let surface = unsafe { display.create_window_surface(config, &surface_attributes) }
            .map_err(|e| PlatformError::ContextCreation(e.to_string()))?;

        tracing::debug!(
            "created GL context ({:?}, {} samples)",
            config.api(),
            config.num_samples()
        );

        Ok(Self {
            context: not_current.treat_as_possibly_current(),
            surface,
            display,
            pending_size: Mutex::new(None),
            _window: window,
        })
    }

    /// Resize the drawable if the window changed size since the last frame.
    /// Must run with the context current.
    fn apply_pending_size(&self) {
        let Some(size) = self.pending_size.lock().take() else {
            return;
        };
        if let (Some(width), Some(height)) =
            (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
        {
            self.surface.resize(&self.context, width, height);
        }
    }
}

impl GlContext for GlutinContext {
    fn make_current(&self) -> Result<(), ContextError> {
        self.context.make_current(&self.surface).map_err(backend)?;
        self.apply_pending_size();
        Ok(())
    }

    fn make_not_current(&self) -> Result<(), ContextError> {
        self.context.make_not_current_in_place().map_err(backend)
    }

    fn swap_buffers(&self) -> Result<(), ContextError> {
        self.apply_pending_size();
        self.surface.swap_buffers(&self.context).map_err(backend)
    }

    fn resize(&self, size: Size<u32>) {
        *self.pending_size.lock() = Some(size);
    }

    fn get_proc_address(&self, name: &CStr) -> *const c_void {
        self.display.get_proc_address(name)
    }
}
