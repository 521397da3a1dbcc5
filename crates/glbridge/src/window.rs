use std::sync::Arc;

use glbridge_core::config::SizeLimits;
use glbridge_core::geometry::Size;
use glbridge_core::profiling::profile_function;

use crate::app::AppShim;
use crate::error::BridgeError;
use crate::event::{HandleStatus, NativeEvent};
use crate::platform::{NativeWindow, Platform, WindowDescriptor};
use crate::quit_gate::HandshakePolicy;
use crate::surface::{RenderSurface, ViewHandler};

/// The application's top-level window with its embedded [`RenderSurface`].
pub struct WindowShim<W: NativeWindow> {
    native: W,
    surface: Arc<RenderSurface>,
    title: String,
    fullscreen: bool,
    size_limits: Option<SizeLimits>,
}

impl<W: NativeWindow> WindowShim<W> {
    /// Build the window and embed `surface`.
    ///
    /// The renderer sees `Created` and then the content size as `Resized` before
    /// this returns; the window is still hidden at that point.
    pub fn new<P>(
        platform: &mut P,
        descriptor: &WindowDescriptor,
        surface: Arc<RenderSurface>,
        size_limits: Option<SizeLimits>,
    ) -> Result<Self, BridgeError>
    where
        P: Platform<Window = W>,
    {
        profile_function!();
        let mut native = platform.create_window(descriptor)?;
        native.embed_surface(surface.as_ref())?;

        if let Some(limits) = size_limits {
            native.set_size_limits(limits.min_size(), limits.max_size());
            let size = native.content_size();
            let clamped = limits.clamp(size);
            if clamped != size {
                native.resize(clamped);
            }
        }

        tracing::debug!(
            "window {:?} created for {}",
            descriptor.title,
            surface.id()
        );
        surface.announce(native.content_size());

        Ok(Self {
            native,
            surface,
            title: descriptor.title.clone(),
            fullscreen: descriptor.fullscreen,
            size_limits,
        })
    }

    /// Fullscreen windows are never centered.
    pub fn show(&mut self) {
        if self.fullscreen {
            self.native.set_fullscreen(true);
        } else {
            self.native.center_on_screen();
        }
        self.native.show();
    }

    pub fn native(&self) -> &W {
        &self.native
    }

    pub fn surface(&self) -> &Arc<RenderSurface> {
        &self.surface
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    pub fn dispatch(&mut self, event: NativeEvent, app: &AppShim) -> HandleStatus {
        profile_function!();
        match event {
            NativeEvent::FrameResized(size) => {
                self.surface.on_resize(size);
                HandleStatus::handled()
            }
            NativeEvent::Pointer(action, pos) => {
                self.surface.on_pointer(action, pos, &mut self.native);
                HandleStatus::consumed()
            }
            NativeEvent::Key(action, message) => {
                self.surface.on_key(action, &message);
                HandleStatus::consumed()
            }
            NativeEvent::CloseRequested => self.close_requested(app),
            NativeEvent::Other => HandleStatus::ignored(),
        }
    }

    /// Programmatic resize, clamped by the size limits.
    pub fn resize(&mut self, size: Size<u32>) {
        let size = match self.size_limits {
            Some(limits) => limits.clamp(size),
            None => size,
        };
        self.native.resize(size);
        self.surface.on_resize(self.native.content_size());
    }

    /// Close the window from code, through the same path as the user closing it.
    pub fn request_close(&mut self, app: &AppShim) -> HandleStatus {
        self.native.request_close();
        self.close_requested(app)
    }

    /// Never refused. Teardown happens once the event loop sees the quit.
    pub fn close_requested(&mut self, app: &AppShim) -> HandleStatus {
        tracing::info!("close requested for window {:?}", self.title);
        app.request_quit();
        HandleStatus::handled()
    }

    /// Run the surface's quit handshake, then drop the native window.
    pub fn teardown(self, policy: &HandshakePolicy) -> Result<(), BridgeError> {
        profile_function!();
        self.surface.on_detach(policy)?;
        tracing::debug!("window {:?} destroyed", self.title);
        Ok(())
    }
}
