//! An event loop that replays a script instead of waiting on a display.

use std::sync::Arc;

use glbridge::{
    AppShim, BridgeError, EventLoop, KeyAction, KeyMessage, LaunchRequest, NativeEvent,
    PointerAction, Pos, RenderSurface, Size,
};

use crate::headless::HeadlessPlatform;
use crate::recording::Timeline;

type RendererStep = Box<dyn FnOnce(&Arc<RenderSurface>) + Send>;

/// One thing that happens while the scripted loop runs.
pub enum Step {
    /// Delivered as if the toolkit reported it.
    Native(NativeEvent),
    /// `WindowShim::resize`.
    Resize(Size<u32>),
    /// `WindowShim::request_close`.
    RequestClose,
    /// `AppShim::request_quit`, as another thread would call it.
    Quit,
    /// Runs against the surface on the UI thread between events.
    Renderer(RendererStep),
}

impl std::fmt::Debug for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Step::Native(event) => f.debug_tuple("Native").field(event).finish(),
            Step::Resize(size) => f.debug_tuple("Resize").field(size).finish(),
            Step::RequestClose => f.write_str("RequestClose"),
            Step::Quit => f.write_str("Quit"),
            Step::Renderer(_) => f.write_str("Renderer(..)"),
        }
    }
}

/// Replays its steps in order on the calling thread.
///
/// The loop stops before the first step that finds quit requested, or when
/// the script runs out; either way it then tears the window down exactly
/// as a real backend would.
#[derive(Debug)]
pub struct ScriptedEventLoop {
    platform: HeadlessPlatform,
    steps: Vec<Step>,
}

impl ScriptedEventLoop {
    pub fn new(timeline: &Timeline) -> Self {
        Self::with_platform(HeadlessPlatform::new(timeline))
    }

    pub fn with_platform(platform: HeadlessPlatform) -> Self {
        Self {
            platform,
            steps: Vec::new(),
        }
    }

    pub fn step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    pub fn native(self, event: NativeEvent) -> Self {
        self.step(Step::Native(event))
    }

    pub fn frame_resized(self, width: u32, height: u32) -> Self {
        self.native(NativeEvent::FrameResized(Size::new(width, height)))
    }

    pub fn pointer(self, action: PointerAction, x: f32, y: f32) -> Self {
        self.native(NativeEvent::Pointer(action, Pos::new(x, y)))
    }

    pub fn key(self, action: KeyAction, message: KeyMessage) -> Self {
        self.native(NativeEvent::Key(action, message))
    }

    pub fn renderer(self, f: impl FnOnce(&Arc<RenderSurface>) + Send + 'static) -> Self {
        self.step(Step::Renderer(Box::new(f)))
    }

    /// The user closes the window.
    pub fn close(self) -> Self {
        self.native(NativeEvent::CloseRequested)
    }
}

impl EventLoop for ScriptedEventLoop {
    fn run(mut self, app: &AppShim, launch: LaunchRequest) -> Result<i32, BridgeError> {
        let surface = launch.surface.clone();
        let mut window = app.launch_window(&mut self.platform, launch)?;

        for step in std::mem::take(&mut self.steps) {
            if app.quit_requested() {
                break;
            }
            match step {
                Step::Native(event) => {
                    let status = window.dispatch(event, app);
                    tracing::trace!("{:?} -> {:?}", event, status);
                }
                Step::Resize(size) => window.resize(size),
                Step::RequestClose => {
                    window.request_close(app);
                }
                Step::Quit => app.request_quit(),
                Step::Renderer(f) => f(&surface),
            }
        }

        if !app.quit_requested() {
            tracing::debug!("script finished without a quit request");
        }
        window.teardown(&app.handshake_policy())?;
        Ok(0)
    }
}
