//! Clears the window from a dedicated renderer thread.
//!
//! Events reach the renderer over a channel; the renderer locks the context for
//! each frame and acknowledges quit when the surface is destroyed. Close the
//! window to exit.

use std::ffi::{CStr, c_void};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError};
use glbridge::{AppShim, Rect, RenderSurface, SurfaceEvent};
use glbridge_winit::WinitEventLoop;

const GL_COLOR_BUFFER_BIT: u32 = 0x0000_4000;

type ClearColorFn = unsafe extern "system" fn(f32, f32, f32, f32);
type ClearFn = unsafe extern "system" fn(u32);

struct Gl {
    clear_color: ClearColorFn,
    clear: ClearFn,
}

impl Gl {
    fn load(surface: &RenderSurface) -> Option<Self> {
        let load = |name: &CStr| {
            let ptr = surface.get_proc_address(name);
            (!ptr.is_null()).then_some(ptr)
        };
        let clear_color = load(c"glClearColor")?;
        let clear = load(c"glClear")?;
        // SAFETY: the pointers come from the context's loader for these names.
        unsafe {
            Some(Self {
                clear_color: std::mem::transmute::<*const c_void, ClearColorFn>(clear_color),
                clear: std::mem::transmute::<*const c_void, ClearFn>(clear),
            })
        }
    }
}

fn render_loop(surface: &RenderSurface, events: Receiver<SurfaceEvent>) {
    let mut gl = None;
    let mut frame = 0u32;

    loop {
        match events.recv_timeout(Duration::from_millis(16)) {
            Ok(SurfaceEvent::Created) => {
                // Some loaders only resolve entry points with a current context.
                if let Err(e) = surface.lock_context() {
                    tracing::warn!("lock failed: {}", e);
                    continue;
                }
                gl = Gl::load(surface);
                let _ = surface.unlock_context();
                if gl.is_none() {
                    tracing::warn!("could not load GL entry points");
                }
            }
            Ok(SurfaceEvent::Resized { width, height }) => {
                tracing::info!("surface resized to {}x{}", width, height);
            }
            Ok(SurfaceEvent::Destroyed) => {
                if let Err(e) = surface.acknowledge_quit() {
                    tracing::error!("failed to acknowledge quit: {}", e);
                }
                break;
            }
            Ok(event) => tracing::debug!("{:?}", event),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }

        let Some(gl) = &gl else {
            continue;
        };
        if let Err(e) = surface.lock_context() {
            tracing::warn!("lock failed: {}", e);
            continue;
        }
        let shade = (frame % 120) as f32 / 120.0;
        unsafe {
            (gl.clear_color)(0.1, shade, 0.3, 1.0);
            (gl.clear)(GL_COLOR_BUFFER_BIT);
        }
        if let Err(e) = surface.swap_buffers() {
            tracing::warn!("swap failed: {}", e);
        }
        if let Err(e) = surface.unlock_context() {
            tracing::warn!("unlock failed: {}", e);
        }
        frame = frame.wrapping_add(1);
    }

    tracing::info!("renderer stopped after {} frames", frame);
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    glbridge_core::logging::init(None);

    let app = AppShim::new("application/x-vnd.glbridge-demo")?;
    let surface = Arc::new(RenderSurface::new());
    let (tx, rx) = crossbeam_channel::unbounded::<SurfaceEvent>();
    surface.set_sink(Arc::new(tx));

    let renderer_surface = surface.clone();
    let renderer = thread::Builder::new()
        .name("renderer".to_string())
        .spawn(move || render_loop(&renderer_surface, rx))?;

    let status = app.run(
        WinitEventLoop::new()?,
        Rect::new(100.0, 100.0, 900.0, 700.0),
        "glbridge renderer thread",
        surface,
        false,
    )?;

    if renderer.join().is_err() {
        tracing::error!("renderer thread panicked");
    }
    std::process::exit(status);
}
