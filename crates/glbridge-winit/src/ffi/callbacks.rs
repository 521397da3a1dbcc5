use std::ffi::c_void;

use glbridge::{EventSink, SurfaceEvent};

pub type SurfaceCallback = unsafe extern "C" fn(user_data: *mut c_void);
pub type ResizedCallback = unsafe extern "C" fn(user_data: *mut c_void, width: i32, height: i32);
pub type PointerCallback = unsafe extern "C" fn(user_data: *mut c_void, x: f32, y: f32);
pub type TextInputCallback = unsafe extern "C" fn(
    user_data: *mut c_void,
    bytes: *const u8,
    len: usize,
    modifiers: i32,
    repeat: i32,
);
pub type KeyDownCallback =
    unsafe extern "C" fn(user_data: *mut c_void, keycode: i32, modifiers: i32, repeat: i32);
pub type KeyUpCallback = unsafe extern "C" fn(user_data: *mut c_void, keycode: i32, modifiers: i32);

/// The renderer's callbacks. Every entry is optional.
///
/// Callbacks run on the UI thread and must not block on the renderer thread.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct CallbackTable {
    pub user_data: *mut c_void,
    pub on_surface_created: Option<SurfaceCallback>,
    pub on_surface_destroyed: Option<SurfaceCallback>,
    pub on_surface_resized: Option<ResizedCallback>,
    pub on_pointer_moved: Option<PointerCallback>,
    pub on_pointer_down: Option<PointerCallback>,
    pub on_pointer_up: Option<PointerCallback>,
    pub on_text_input: Option<TextInputCallback>,
    pub on_key_down: Option<KeyDownCallback>,
    pub on_key_up: Option<KeyUpCallback>,
}

/// Forwards events to a [`CallbackTable`].
pub struct CallbackSink {
    table: CallbackTable,
}

// SAFETY: the table's owner guarantees `user_data` may be used from the UI
// thread for as long as the table is installed.
unsafe impl Send for CallbackSink {}
unsafe impl Sync for CallbackSink {}

impl CallbackSink {
    pub fn new(table: CallbackTable) -> Self {
        Self { table }
    }
}

impl EventSink for CallbackSink {
    fn send(&self, event: SurfaceEvent) {
        let t = &self.table;
        let data = t.user_data;
        unsafe {
            match event {
                SurfaceEvent::Created => {
                    if let Some(f) = t.on_surface_created {
                        f(data)
                    }
                }
                SurfaceEvent::Destroyed => {
                    if let Some(f) = t.on_surface_destroyed {
                        f(data)
                    }
                }
                SurfaceEvent::Resized { width, height } => {
                    if let Some(f) = t.on_surface_resized {
                        f(data, width, height)
                    }
                }
                SurfaceEvent::PointerMoved { x, y } => {
                    if let Some(f) = t.on_pointer_moved {
                        f(data, x, y)
                    }
                }
                SurfaceEvent::PointerDown { x, y } => {
                    if let Some(f) = t.on_pointer_down {
                        f(data, x, y)
                    }
                }
                SurfaceEvent::PointerUp { x, y } => {
                    if let Some(f) = t.on_pointer_up {
                        f(data, x, y)
                    }
                }
                SurfaceEvent::TextInput {
                    text,
                    modifiers,
                    repeat,
                } => {
                    if let Some(f) = t.on_text_input {
                        let bytes = text.as_bytes();
                        f(data, bytes.as_ptr(), bytes.len(), modifiers.raw(), repeat)
                    }
                }
                SurfaceEvent::KeyDown {
                    keycode,
                    modifiers,
                    repeat,
                } => {
                    if let Some(f) = t.on_key_down {
                        f(data, keycode, modifiers.raw(), repeat)
                    }
                }
                SurfaceEvent::KeyUp { keycode, modifiers } => {
                    if let Some(f) = t.on_key_up {
                        f(data, keycode, modifiers.raw())
                    }
                }
            }
        }
    }
}
