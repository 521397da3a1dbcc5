use glbridge::{AppShim, BridgeError, EventLoop, LaunchRequest, PlatformError, WindowShim};
use glbridge_core::profiling::{self, profile_function};
use parking_lot::Mutex;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow};
use winit::window::WindowId;

use crate::event::InputState;
use crate::window::{WinitPlatform, WinitWindow};

/// The winit event loop, driven on the calling (main) thread.
pub struct WinitEventLoop {
    event_loop: winit::event_loop::EventLoop<()>,
}

impl WinitEventLoop {
    pub fn new() -> Result<Self, PlatformError> {
        let event_loop = winit::event_loop::EventLoop::new()
            .map_err(|e| PlatformError::EventLoop(e.to_string()))?;
        event_loop.set_control_flow(ControlFlow::Wait);
        Ok(Self { event_loop })
    }
}

impl EventLoop for WinitEventLoop {
    fn run(self, app: &AppShim, launch: LaunchRequest) -> Result<i32, BridgeError> {
        let proxy = Mutex::new(self.event_loop.create_proxy());
        app.set_waker(Some(Box::new(move || {
            let _ = proxy.lock().send_event(());
        })));

        let mut handler = BridgeHandler {
            app,
            launch: Some(launch),
            window: None,
            input: InputState::default(),
            result: Ok(0),
        };
        self.event_loop
            .run_app(&mut handler)
            .map_err(|e| PlatformError::EventLoop(e.to_string()))?;
        handler.result
    }
}

struct BridgeHandler<'a> {
    app: &'a AppShim,
    launch: Option<LaunchRequest>,
    window: Option<WindowShim<WinitWindow>>,
    input: InputState,
    result: Result<i32, BridgeError>,
}

impl BridgeHandler<'_> {
    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(window) = self.window.take() {
            if let Err(e) = window.teardown(&self.app.handshake_policy()) {
                self.result = Err(e);
            }
        }
        event_loop.exit();
    }
}

impl ApplicationHandler for BridgeHandler<'_> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let Some(launch) = self.launch.take() else {
            return;
        };

        let mut platform = WinitPlatform::new(event_loop);
        match self.app.launch_window(&mut platform, launch) {
            Ok(window) => self.window = Some(window),
            Err(e) => {
                tracing::error!("failed to open window: {}", e);
                self.result = Err(e);
                event_loop.exit();
            }
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, _event: ()) {
        if self.app.quit_requested() {
            self.shutdown(event_loop);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        profile_function!();
        let Some(window) = self.window.as_mut() else {
            return;
        };
        if window.native().id() != window_id {
            return;
        }

        let native = self.input.translate(&event);
        window.dispatch(native, self.app);

        if self.app.quit_requested() {
            self.shutdown(event_loop);
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        profiling::new_frame();
        if self.app.quit_requested() && self.window.is_some() {
            self.shutdown(event_loop);
        }
    }

    fn exiting(&mut self, event_loop: &ActiveEventLoop) {
        self.shutdown(event_loop);
    }
}
