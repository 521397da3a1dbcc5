//! glbridge
//!
//! Hosts a single native window with an OpenGL drawable and lets an external
//! renderer, running on its own thread, draw into it safely.
//!
//! The UI thread runs the event loop through [`AppShim::run`] and owns the
//! [`WindowShim`]. The renderer thread talks to the shared [`RenderSurface`]:
//! it receives [`SurfaceEvent`]s through an [`EventSink`], brackets its GL work
//! with [`RenderSurface::lock_context`] / [`RenderSurface::unlock_context`], and
//! answers `SurfaceEvent::Destroyed` with [`RenderSurface::acknowledge_quit`].
//! The window is not torn down until that acknowledgment arrives.
//!
//! Windowing toolkits plug in through the [`platform`] traits.

pub mod app;
pub mod error;
pub mod event;
pub mod platform;
pub mod quit_gate;
pub mod renderer;
pub mod surface;
pub mod translate;
pub mod window;

pub use app::AppShim;
pub use error::{BridgeError, ContextError, HandshakeError, PlatformError};
pub use event::{
    HandleStatus, KeyAction, KeyMessage, Modifiers, NativeEvent, PointerAction, SurfaceEvent,
    TextBytes,
};
pub use platform::{EventLoop, LaunchRequest, NativeWindow, Platform, WindowDescriptor};
pub use quit_gate::{HandshakePolicy, QuitGate};
pub use renderer::{EventSink, NullSink};
pub use surface::{Focusable, GlContext, RenderSurface, SurfaceId, SurfaceState, ViewHandler};
pub use translate::EventTranslator;
pub use window::WindowShim;

pub use glbridge_core::geometry::{Pos, Rect, Size};
