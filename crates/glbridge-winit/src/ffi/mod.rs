//! The C ABI.
//!
//! Handles are opaque pointers created and released through this module:
//!
//! - `Rect` and `AppShim` are boxed; free them with `glbridge_free_rect` and
//!   `glbridge_free_app`.
//! - `RenderSurface` is reference counted; `glbridge_run_app` takes its own
//!   reference, so the caller releases its handle with
//!   `glbridge_release_render_surface` whenever it is done with it.
//!
//! No panic crosses this boundary. Failures are logged and reported as null
//! handles, [`BridgeStatus`] codes or a negative exit status.

mod callbacks;

pub use callbacks::{CallbackSink, CallbackTable};

use std::ffi::{CStr, c_char, c_void};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use glbridge::{AppShim, ContextError, HandshakeError, Rect, RenderSurface};
use glbridge_core::config::BridgeConfig;
use glbridge_core::{logging, profiling};

use crate::app::WinitEventLoop;

/// Exit status of `glbridge_run_app` when the bridge itself failed.
pub const EXIT_FAILURE: i32 = -1;

#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeStatus {
    Ok = 0,
    NullHandle = -1,
    Unavailable = -2,
    AlreadyHeld = -3,
    NotHeld = -4,
    Destroyed = -5,
    Backend = -6,
    AlreadyAcknowledged = -7,
    GateClosed = -8,
    NotDetaching = -9,
}

impl From<ContextError> for BridgeStatus {
    fn from(e: ContextError) -> Self {
        match e {
            ContextError::Unavailable => BridgeStatus::Unavailable,
            ContextError::AlreadyHeld => BridgeStatus::AlreadyHeld,
            ContextError::NotHeld => BridgeStatus::NotHeld,
            ContextError::Destroyed => BridgeStatus::Destroyed,
            ContextError::Backend(_) => BridgeStatus::Backend,
        }
    }
}

impl From<HandshakeError> for BridgeStatus {
    fn from(e: HandshakeError) -> Self {
        match e {
            HandshakeError::AlreadyAcknowledged => BridgeStatus::AlreadyAcknowledged,
            HandshakeError::GateClosed => BridgeStatus::GateClosed,
            HandshakeError::NotDetaching => BridgeStatus::NotDetaching,
            HandshakeError::TimedOut { .. } => BridgeStatus::Backend,
        }
    }
}

impl<E: Into<BridgeStatus>> From<Result<(), E>> for BridgeStatus {
    fn from(result: Result<(), E>) -> Self {
        match result {
            Ok(()) => BridgeStatus::Ok,
            Err(e) => e.into(),
        }
    }
}

fn guard<T>(name: &str, on_panic: T, f: impl FnOnce() -> T) -> T {
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(value) => value,
        Err(_) => {
            tracing::error!("panic in {}", name);
            on_panic
        }
    }
}

/// # Safety
/// `ptr` must be null or a live handle returned by this module.
unsafe fn surface_ref<'a>(ptr: *const RenderSurface) -> Option<&'a RenderSurface> {
    unsafe { ptr.as_ref() }
}

fn report(name: &str, status: BridgeStatus) -> BridgeStatus {
    if status != BridgeStatus::Ok {
        tracing::debug!("{} returned {:?}", name, status);
    }
    status
}

#[unsafe(no_mangle)]
pub extern "C" fn glbridge_new_rect(left: f32, top: f32, right: f32, bottom: f32) -> *mut Rect {
    Box::into_raw(Box::new(Rect::new(left, top, right, bottom)))
}

/// # Safety
/// `rect` must be null or come from `glbridge_new_rect`, and is invalid afterwards.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn glbridge_free_rect(rect: *mut Rect) {
    if !rect.is_null() {
        drop(unsafe { Box::from_raw(rect) });
    }
}

/// Create the application context. Returns null on failure.
///
/// Also installs logging and, if configured, the profiler. Configuration comes
/// from the TOML file named by `GLBRIDGE_CONFIG`.
///
/// # Safety
/// `signature` must be null or a NUL-terminated string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn glbridge_new_app(signature: *const c_char) -> *mut AppShim {
    guard("glbridge_new_app", std::ptr::null_mut(), || {
        let config = match BridgeConfig::from_env() {
            Ok(config) => config,
            Err(e) => {
                logging::init(None);
                tracing::error!("invalid configuration: {}", e);
                return std::ptr::null_mut();
            }
        };
        logging::init(config.logging.filter.as_deref());
        if config.profiling.enabled {
            profiling::init_profiling(&config.profiling.address);
        }

        if signature.is_null() {
            tracing::error!("glbridge_new_app: null signature");
            return std::ptr::null_mut();
        }
        let signature = unsafe { CStr::from_ptr(signature) };
        let Ok(signature) = signature.to_str() else {
            tracing::error!("glbridge_new_app: signature is not UTF-8");
            return std::ptr::null_mut();
        };

        match AppShim::new(signature).and_then(|app| app.with_config(config)) {
            Ok(app) => Box::into_raw(Box::new(app)),
            Err(e) => {
                tracing::error!("glbridge_new_app: {}", e);
                std::ptr::null_mut()
            }
        }
    })
}

/// # Safety
/// `app` must be null or come from `glbridge_new_app`, must not be running, and
/// is invalid afterwards.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn glbridge_free_app(app: *mut AppShim) {
    if !app.is_null() {
        drop(unsafe { Box::from_raw(app) });
    }
}

#[unsafe(no_mangle)]
pub extern "C" fn glbridge_new_render_surface() -> *const RenderSurface {
    guard("glbridge_new_render_surface", std::ptr::null(), || {
        Arc::into_raw(Arc::new(RenderSurface::new()))
    })
}

/// # Safety
/// `surface` must be null or a handle from `glbridge_new_render_surface` that
/// has not been released yet.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn glbridge_release_render_surface(surface: *const RenderSurface) {
    if !surface.is_null() {
        drop(unsafe { Arc::from_raw(surface) });
    }
}

/// Install the renderer's callbacks. The table is copied.
///
/// # Safety
/// `surface` must be null or a live surface handle; `table` must be null or
/// point to a valid `CallbackTable`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn glbridge_set_callbacks(
    surface: *const RenderSurface,
    table: *const CallbackTable,
) -> BridgeStatus {
    let (Some(surface), Some(table)) = (unsafe { surface_ref(surface) }, unsafe { table.as_ref() })
    else {
        return BridgeStatus::NullHandle;
    };
    surface.set_sink(Arc::new(CallbackSink::new(*table)));
    BridgeStatus::Ok
}

/// Open the window and run the event loop on the calling thread until the
/// application quits. Returns 0 on a clean exit and a negative value when the
/// bridge failed, including the renderer never acknowledging teardown.
///
/// # Safety
/// `app` must be a live app handle, `rect` a live rect handle, `title` null or
/// a NUL-terminated string and `surface` a live surface handle.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn glbridge_run_app(
    app: *mut AppShim,
    rect: *const Rect,
    title: *const c_char,
    surface: *const RenderSurface,
    fullscreen: bool,
) -> i32 {
    guard("glbridge_run_app", EXIT_FAILURE, || {
        let (Some(app), Some(rect)) = (unsafe { app.as_ref() }, unsafe { rect.as_ref() }) else {
            tracing::error!("glbridge_run_app: null handle");
            return EXIT_FAILURE;
        };
        if surface.is_null() {
            tracing::error!("glbridge_run_app: null surface");
            return EXIT_FAILURE;
        }
        let surface = unsafe {
            Arc::increment_strong_count(surface);
            Arc::from_raw(surface)
        };
        let title = if title.is_null() {
            String::new()
        } else {
            unsafe { CStr::from_ptr(title) }.to_string_lossy().into_owned()
        };

        let event_loop = match WinitEventLoop::new() {
            Ok(event_loop) => event_loop,
            Err(e) => {
                tracing::error!("glbridge_run_app: {}", e);
                return EXIT_FAILURE;
            }
        };

        match app.run(event_loop, *rect, &title, surface, fullscreen) {
            Ok(status) => status,
            Err(e) => {
                tracing::error!("glbridge_run_app: {}", e);
                EXIT_FAILURE
            }
        }
    })
}

/// Ask the running application to quit. Callable from any thread.
///
/// # Safety
/// `app` must be null or a live app handle.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn glbridge_request_quit(app: *const AppShim) {
    if let Some(app) = unsafe { app.as_ref() } {
        app.request_quit();
    }
}

/// # Safety
/// `surface` must be null or a live surface handle.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn glbridge_lock_context(surface: *const RenderSurface) -> BridgeStatus {
    let Some(surface) = (unsafe { surface_ref(surface) }) else {
        return BridgeStatus::NullHandle;
    };
    let status = guard("glbridge_lock_context", BridgeStatus::Backend, || {
        surface.lock_context().into()
    });
    report("glbridge_lock_context", status)
}

/// # Safety
/// `surface` must be null or a live surface handle.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn glbridge_unlock_context(surface: *const RenderSurface) -> BridgeStatus {
    let Some(surface) = (unsafe { surface_ref(surface) }) else {
        return BridgeStatus::NullHandle;
    };
    let status = guard("glbridge_unlock_context", BridgeStatus::Backend, || {
        surface.unlock_context().into()
    });
    report("glbridge_unlock_context", status)
}

/// # Safety
/// `surface` must be null or a live surface handle.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn glbridge_swap_buffers(surface: *const RenderSurface) -> BridgeStatus {
    let Some(surface) = (unsafe { surface_ref(surface) }) else {
        return BridgeStatus::NullHandle;
    };
    let status = guard("glbridge_swap_buffers", BridgeStatus::Backend, || {
        surface.swap_buffers().into()
    });
    report("glbridge_swap_buffers", status)
}

/// Tell the UI thread the renderer is done with the context. Call once, after
/// `on_surface_destroyed`, with the context unlocked. Earlier calls return
/// `NotDetaching` and are ignored.
///
/// # Safety
/// `surface` must be null or a live surface handle.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn glbridge_acknowledge_quit(surface: *const RenderSurface) -> BridgeStatus {
    let Some(surface) = (unsafe { surface_ref(surface) }) else {
        return BridgeStatus::NullHandle;
    };
    let status = guard("glbridge_acknowledge_quit", BridgeStatus::Backend, || {
        surface.acknowledge_quit().into()
    });
    report("glbridge_acknowledge_quit", status)
}

/// Look up a GL function for the surface's context. Null if unknown or if no
/// context is bound.
///
/// # Safety
/// `surface` must be null or a live surface handle; `name` must be null or a
/// NUL-terminated string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn glbridge_get_proc_address(
    surface: *const RenderSurface,
    name: *const c_char,
) -> *const c_void {
    let Some(surface) = (unsafe { surface_ref(surface) }) else {
        return std::ptr::null();
    };
    if name.is_null() {
        return std::ptr::null();
    }
    let name = unsafe { CStr::from_ptr(name) };
    guard("glbridge_get_proc_address", std::ptr::null(), || {
        surface.get_proc_address(name)
    })
}
