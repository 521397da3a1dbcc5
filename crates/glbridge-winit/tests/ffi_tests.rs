//! C ABI tests that need no windowing system. `examples/ffi_quit.rs` drives a
//! full run.

use std::ffi::CString;
use std::ptr;

use glbridge_winit::ffi::*;

#[test]
fn test_rect_round_trip() {
    let rect = glbridge_new_rect(10.0, 20.0, 110.0, 220.0);
    assert!(!rect.is_null());
    let r = unsafe { &*rect };
    assert_eq!(r.width(), 100.0);
    assert_eq!(r.height(), 200.0);
    unsafe { glbridge_free_rect(rect) };
    unsafe { glbridge_free_rect(ptr::null_mut()) };
}

#[test]
fn test_new_app_rejects_bad_signatures() {
    assert!(unsafe { glbridge_new_app(ptr::null()) }.is_null());

    let empty = CString::new("").unwrap();
    assert!(unsafe { glbridge_new_app(empty.as_ptr()) }.is_null());

    let signature = CString::new("application/x-vnd.glbridge-ffi").unwrap();
    let app = unsafe { glbridge_new_app(signature.as_ptr()) };
    assert!(!app.is_null());
    unsafe { glbridge_free_app(app) };
}

#[test]
fn test_null_handles() {
    unsafe {
        assert_eq!(glbridge_lock_context(ptr::null()), BridgeStatus::NullHandle);
        assert_eq!(glbridge_unlock_context(ptr::null()), BridgeStatus::NullHandle);
        assert_eq!(glbridge_swap_buffers(ptr::null()), BridgeStatus::NullHandle);
        assert_eq!(glbridge_acknowledge_quit(ptr::null()), BridgeStatus::NullHandle);
        assert_eq!(
            glbridge_set_callbacks(ptr::null(), ptr::null()),
            BridgeStatus::NullHandle
        );
        assert!(glbridge_get_proc_address(ptr::null(), ptr::null()).is_null());
        glbridge_request_quit(ptr::null());
        glbridge_release_render_surface(ptr::null());
    }
}

#[test]
fn test_surface_before_run() {
    let surface = glbridge_new_render_surface();
    assert!(!surface.is_null());

    unsafe {
        assert_eq!(glbridge_lock_context(surface), BridgeStatus::Unavailable);
        assert_eq!(glbridge_unlock_context(surface), BridgeStatus::NotHeld);
        assert_eq!(glbridge_swap_buffers(surface), BridgeStatus::NotHeld);

        assert_eq!(
            glbridge_acknowledge_quit(surface),
            BridgeStatus::NotDetaching
        );
        assert_eq!(
            glbridge_acknowledge_quit(surface),
            BridgeStatus::NotDetaching
        );

        let name = CString::new("glClear").unwrap();
        assert!(glbridge_get_proc_address(surface, name.as_ptr()).is_null());

        glbridge_release_render_surface(surface);
    }
}

#[test]
fn test_set_callbacks() {
    let surface = glbridge_new_render_surface();
    let table = CallbackTable {
        user_data: ptr::null_mut(),
        on_surface_created: None,
        on_surface_destroyed: None,
        on_surface_resized: None,
        on_pointer_moved: None,
        on_pointer_down: None,
        on_pointer_up: None,
        on_text_input: None,
        on_key_down: None,
        on_key_up: None,
    };
    unsafe {
        assert_eq!(glbridge_set_callbacks(surface, &table), BridgeStatus::Ok);
        glbridge_release_render_surface(surface);
    }
}

#[test]
fn test_status_codes_are_stable() {
    assert_eq!(BridgeStatus::Ok as i32, 0);
    assert_eq!(BridgeStatus::NullHandle as i32, -1);
    assert_eq!(BridgeStatus::Unavailable as i32, -2);
    assert_eq!(BridgeStatus::AlreadyHeld as i32, -3);
    assert_eq!(BridgeStatus::NotHeld as i32, -4);
    assert_eq!(BridgeStatus::Destroyed as i32, -5);
    assert_eq!(BridgeStatus::Backend as i32, -6);
    assert_eq!(BridgeStatus::AlreadyAcknowledged as i32, -7);
    assert_eq!(BridgeStatus::GateClosed as i32, -8);
    assert_eq!(BridgeStatus::NotDetaching as i32, -9);
}
