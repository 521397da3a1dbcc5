//! Drives the C ABI end to end: open a window, draw one frame from a renderer
//! thread, quit, and acknowledge the teardown from the destroyed callback.
//!
//! winit needs the main thread, so this runs as an example rather than a test.
//! Exits non-zero if any step misbehaves.

use std::ffi::{CString, c_void};
use std::process::ExitCode;
use std::sync::atomic::{AtomicI32, Ordering};
use std::thread;
use std::time::Duration;

use glbridge::{AppShim, RenderSurface};
use glbridge_winit::ffi::*;

static CREATED: AtomicI32 = AtomicI32::new(0);
static ACKNOWLEDGED: AtomicI32 = AtomicI32::new(BridgeStatus::Backend as i32);

struct Handle<T>(*const T);

unsafe impl<T> Send for Handle<T> {}

impl<T> Handle<T> {
    fn get(self) -> *const T {
        self.0
    }
}

unsafe extern "C" fn on_created(_: *mut c_void) {
    CREATED.fetch_add(1, Ordering::SeqCst);
}

unsafe extern "C" fn on_destroyed(data: *mut c_void) {
    let status = unsafe { glbridge_acknowledge_quit(data as *const RenderSurface) };
    ACKNOWLEDGED.store(status as i32, Ordering::SeqCst);
}

fn draw_one_frame_then_quit(surface: *const RenderSurface, app: *const AppShim) -> bool {
    thread::sleep(Duration::from_millis(200));
    let statuses = unsafe {
        [
            glbridge_lock_context(surface),
            glbridge_swap_buffers(surface),
            glbridge_unlock_context(surface),
        ]
    };
    unsafe { glbridge_request_quit(app) };
    statuses.iter().all(|status| *status == BridgeStatus::Ok)
}

fn main() -> ExitCode {
    let (Ok(signature), Ok(title)) = (
        CString::new("application/x-vnd.glbridge-ffi"),
        CString::new("glbridge ffi"),
    ) else {
        return ExitCode::FAILURE;
    };

    let app = unsafe { glbridge_new_app(signature.as_ptr()) };
    if app.is_null() {
        return ExitCode::FAILURE;
    }
    let rect = glbridge_new_rect(0.0, 0.0, 320.0, 240.0);
    let surface = glbridge_new_render_surface();

    let table = CallbackTable {
        user_data: surface as *mut c_void,
        on_surface_created: Some(on_created),
        on_surface_destroyed: Some(on_destroyed),
        on_surface_resized: None,
        on_pointer_moved: None,
        on_pointer_down: None,
        on_pointer_up: None,
        on_text_input: None,
        on_key_down: None,
        on_key_up: None,
    };
    unsafe { glbridge_set_callbacks(surface, &table) };

    let renderer_surface = Handle(surface);
    let renderer_app = Handle(app as *const AppShim);
    let renderer = thread::spawn(move || {
        draw_one_frame_then_quit(renderer_surface.get(), renderer_app.get())
    });

    let status = unsafe { glbridge_run_app(app, rect, title.as_ptr(), surface, false) };
    let drew = renderer.join().unwrap_or(false);
    let destroyed = unsafe { glbridge_lock_context(surface) } == BridgeStatus::Destroyed;

    unsafe {
        glbridge_release_render_surface(surface);
        glbridge_free_rect(rect);
        glbridge_free_app(app);
    }

    let ok = status == 0
        && drew
        && destroyed
        && CREATED.load(Ordering::SeqCst) == 1
        && ACKNOWLEDGED.load(Ordering::SeqCst) == BridgeStatus::Ok as i32;
    println!(
        "status {status}, drew {drew}, destroyed {destroyed}, created {}, ack {}",
        CREATED.load(Ordering::SeqCst),
        ACKNOWLEDGED.load(Ordering::SeqCst)
    );
    if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}
