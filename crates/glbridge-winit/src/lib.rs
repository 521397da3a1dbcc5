//! winit + glutin backend for glbridge, and the C ABI built on it.
//!
//! Rust callers use [`WinitEventLoop`] with [`glbridge::AppShim::run`]; C
//! callers link the `cdylib` and use the functions in [`ffi`].

pub mod app;
pub mod context;
pub mod event;
pub mod ffi;
pub mod window;

pub use app::WinitEventLoop;
pub use context::GlutinContext;
pub use window::{WinitPlatform, WinitWindow};
