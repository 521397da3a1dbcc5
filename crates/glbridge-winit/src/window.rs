use std::sync::Arc;

use glbridge::{
    BridgeError, Focusable, NativeWindow, Platform, PlatformError, Size, ViewHandler,
    WindowDescriptor,
};
use glutin::config::{Config, ConfigTemplateBuilder, GlConfig};
use glutin::display::{Display, DisplayApiPreference, GlDisplay};
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event_loop::ActiveEventLoop;
use winit::raw_window_handle::{HasDisplayHandle, HasWindowHandle, RawWindowHandle};
use winit::window::{Fullscreen, Window, WindowId};

use crate::context::GlutinContext;

/// Creates windows while the winit loop is running.
pub struct WinitPlatform<'a> {
    event_loop: &'a ActiveEventLoop,
}

impl<'a> WinitPlatform<'a> {
    pub fn new(event_loop: &'a ActiveEventLoop) -> Self {
        Self { event_loop }
    }
}

/// Prefer the config with the most samples.
fn pick_config(configs: impl Iterator<Item = Config>) -> Option<Config> {
    configs.reduce(|best, config| {
        if config.num_samples() > best.num_samples() {
            config
        } else {
            best
        }
    })
}

#[cfg(windows)]
fn display_preference(window: RawWindowHandle) -> DisplayApiPreference {
    DisplayApiPreference::WglThenEgl(Some(window))
}

#[cfg(target_os = "macos")]
fn display_preference(_window: RawWindowHandle) -> DisplayApiPreference {
    DisplayApiPreference::Cgl
}

#[cfg(not(any(windows, target_os = "macos")))]
fn display_preference(_window: RawWindowHandle) -> DisplayApiPreference {
    DisplayApiPreference::Egl
}

fn context_error(e: impl std::fmt::Display) -> PlatformError {
    PlatformError::ContextCreation(e.to_string())
}

impl Platform for WinitPlatform<'_> {
    type Window = WinitWindow;

    fn create_window(
        &mut self,
        descriptor: &WindowDescriptor,
    ) -> Result<WinitWindow, PlatformError> {
        let size = descriptor.rect.pixel_size();
        let origin = descriptor.rect.origin();
        let attributes = Window::default_attributes()
            .with_title(descriptor.title.as_str())
            .with_inner_size(PhysicalSize::new(size.width.max(1), size.height.max(1)))
            .with_position(PhysicalPosition::new(origin.x as i32, origin.y as i32))
            .with_resizable(true)
            .with_visible(false);

        let window = self
            .event_loop
            .create_window(attributes)
            .map_err(|e| PlatformError::WindowCreation(e.to_string()))?;
        let window_handle = window.window_handle().map_err(context_error)?.as_raw();
        let display_handle = self.event_loop.display_handle().map_err(context_error)?.as_raw();

        let display = unsafe { Display::new(display_handle, display_preference(window_handle)) }
            .map_err(context_error)?;
        let template = ConfigTemplateBuilder::new().with_depth_size(24);
        #[cfg(windows)]
        let template = template.compatible_with_native_window(window_handle);
        let configs = unsafe { display.find_configs(template.build()) }.map_err(context_error)?;
        let config = pick_config(configs)
            .ok_or_else(|| context_error("display offered no GL configs"))?;

        tracing::debug!("created window {:?} ({:?})", descriptor.title, window.id());
        Ok(WinitWindow {
            window: Arc::new(window),
            config,
        })
    }
}

pub struct WinitWindow {
    window: Arc<Window>,
    config: Config,
}

impl WinitWindow {
    pub fn id(&self) -> WindowId {
        self.window.id()
    }

    pub fn winit(&self) -> &Window {
        &self.window
    }
}

impl Focusable for WinitWindow {
    fn has_focus(&self) -> bool {
        self.window.has_focus()
    }

    fn make_focus(&mut self) {
        self.window.focus_window();
    }
}

impl NativeWindow for WinitWindow {
    fn content_size(&self) -> Size<u32> {
        let size = self.window.inner_size();
        Size::new(size.width, size.height)
    }

    fn embed_surface(&mut self, view: &dyn ViewHandler) -> Result<(), BridgeError> {
        let context = GlutinContext::new(self.window.clone(), &self.config)?;
        view.on_attach(Arc::new(context))
    }

    fn set_size_limits(&mut self, min: Size<u32>, max: Size<u32>) {
        self.window
            .set_min_inner_size(Some(PhysicalSize::new(min.width, min.height)));
        self.window
            .set_max_inner_size(Some(PhysicalSize::new(max.width, max.height)));
    }

    fn center_on_screen(&mut self) {
        let Some(monitor) = self.window.current_monitor() else {
            tracing::debug!("no monitor to center on");
            return;
        };
        let screen = monitor.size();
        let origin = monitor.position();
        let outer = self.window.outer_size();
        let x = origin.x + (screen.width as i32 - outer.width as i32) / 2;
        let y = origin.y + (screen.height as i32 - outer.height as i32) / 2;
        self.window.set_outer_position(PhysicalPosition::new(x, y));
    }

    fn set_fullscreen(&mut self, fullscreen: bool) {
        self.window
            .set_fullscreen(fullscreen.then_some(Fullscreen::Borderless(None)));
    }

    fn show(&mut self) {
        self.window.set_visible(true);
    }

    fn resize(&mut self, size: Size<u32>) {
        let _ = self
            .window
            .request_inner_size(PhysicalSize::new(size.width, size.height));
    }

    fn request_close(&mut self) {
        self.window.set_visible(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_configs_is_none() {
        assert!(pick_config(std::iter::empty()).is_none());
    }
}
