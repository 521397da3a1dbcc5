//! A platform that records instead of drawing.

use std::sync::Arc;

use glbridge::{
    BridgeError, ContextError, Focusable, GlContext, NativeWindow, Platform, PlatformError, Size,
    ViewHandler, WindowDescriptor,
};

use crate::recording::{Entry, Timeline};

/// Records a window operation for verification in tests.
#[derive(Debug, Clone, PartialEq)]
pub enum NativeCall {
    CreateWindow { title: String, size: Size<u32> },
    EmbedSurface,
    SetSizeLimits { min: Size<u32>, max: Size<u32> },
    CenterOnScreen,
    SetFullscreen(bool),
    Show,
    Resize(Size<u32>),
    RequestClose,
    Focus,
    DropWindow,
}

/// Records a GL context operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextCall {
    MakeCurrent,
    MakeNotCurrent,
    SwapBuffers,
    Resize(Size<u32>),
    Dropped,
}

#[derive(Debug, Clone, Default)]
pub struct HeadlessPlatform {
    timeline: Timeline,
    focused: bool,
    fail_context: bool,
}

impl HeadlessPlatform {
    pub fn new(timeline: &Timeline) -> Self {
        Self {
            timeline: timeline.clone(),
            focused: false,
            fail_context: false,
        }
    }

    /// Windows start out holding keyboard focus.
    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    /// Embedding a surface fails as if no GL config was found.
    pub fn failing_context(mut self) -> Self {
        self.fail_context = true;
        self
    }
}

impl Platform for HeadlessPlatform {
    type Window = HeadlessWindow;

    fn create_window(
        &mut self,
        descriptor: &WindowDescriptor,
    ) -> Result<HeadlessWindow, PlatformError> {
        let size = descriptor.rect.pixel_size();
        self.timeline.push(Entry::Native(NativeCall::CreateWindow {
            title: descriptor.title.clone(),
            size,
        }));

        Ok(HeadlessWindow {
            timeline: self.timeline.clone(),
            size,
            limits: None,
            focused: self.focused,
            visible: false,
            fullscreen: false,
            fail_context: self.fail_context,
        })
    }
}

#[derive(Debug)]
pub struct HeadlessWindow {
    timeline: Timeline,
    size: Size<u32>,
    limits: Option<(Size<u32>, Size<u32>)>,
    focused: bool,
    visible: bool,
    fullscreen: bool,
    fail_context: bool,
}

impl HeadlessWindow {
    fn record(&self, call: NativeCall) {
        self.timeline.push(Entry::Native(call));
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }
}

impl Focusable for HeadlessWindow {
    fn has_focus(&self) -> bool {
        self.focused
    }

    fn make_focus(&mut self) {
        self.record(NativeCall::Focus);
        self.focused = true;
    }
}

impl NativeWindow for HeadlessWindow {
    fn content_size(&self) -> Size<u32> {
        self.size
    }

    fn embed_surface(&mut self, view: &dyn ViewHandler) -> Result<(), BridgeError> {
        self.record(NativeCall::EmbedSurface);
        if self.fail_context {
            return Err(PlatformError::ContextCreation("no matching GL config".to_string()).into());
        }
        view.on_attach(Arc::new(HeadlessContext::new(&self.timeline)))
    }

    fn set_size_limits(&mut self, min: Size<u32>, max: Size<u32>) {
        self.record(NativeCall::SetSizeLimits { min, max });
        self.limits = Some((min, max));
    }

    fn center_on_screen(&mut self) {
        self.record(NativeCall::CenterOnScreen);
    }

    fn set_fullscreen(&mut self, fullscreen: bool) {
        self.record(NativeCall::SetFullscreen(fullscreen));
        self.fullscreen = fullscreen;
    }

    fn show(&mut self) {
        self.record(NativeCall::Show);
        self.visible = true;
    }

    fn resize(&mut self, size: Size<u32>) {
        self.record(NativeCall::Resize(size));
        self.size = match self.limits {
            Some((min, max)) => Size::new(
                size.width.clamp(min.width, max.width),
                size.height.clamp(min.height, max.height),
            ),
            None => size,
        };
    }

    fn request_close(&mut self) {
        self.record(NativeCall::RequestClose);
        self.visible = false;
    }
}

impl Drop for HeadlessWindow {
    fn drop(&mut self) {
        self.record(NativeCall::DropWindow);
    }
}

/// A GL context with no GL behind it.
#[derive(Debug)]
pub struct HeadlessContext {
    timeline: Timeline,
}

impl HeadlessContext {
    pub fn new(timeline: &Timeline) -> Self {
        Self {
            timeline: timeline.clone(),
        }
    }

    fn record(&self, call: ContextCall) {
        self.timeline.push(Entry::Context(call));
    }
}

impl GlContext for HeadlessContext {
    fn make_current(&self) -> Result<(), ContextError> {
        self.record(ContextCall::MakeCurrent);
        Ok(())
    }

    fn make_not_current(&self) -> Result<(), ContextError> {
        self.record(ContextCall::MakeNotCurrent);
        Ok(())
    }

    fn swap_buffers(&self) -> Result<(), ContextError> {
        self.record(ContextCall::SwapBuffers);
        Ok(())
    }

    fn resize(&self, size: Size<u32>) {
        self.record(ContextCall::Resize(size));
    }
}

impl Drop for HeadlessContext {
    fn drop(&mut self) {
        self.record(ContextCall::Dropped);
    }
}
