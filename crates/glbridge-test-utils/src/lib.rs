//! Test utilities for glbridge.
//!
//! Everything here runs without a display:
//!
//! - [`HeadlessPlatform`] - a `Platform` whose windows and GL contexts only
//!   record what was done to them
//! - [`RecordingSink`] - a renderer stand-in that records events and can
//!   acknowledge quit on its own
//! - [`ScriptedEventLoop`] - an `EventLoop` that replays a fixed list of steps
//!
//! All three write into a shared [`Timeline`], so tests can assert the relative
//! order of native calls, GL context calls and renderer events.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use glbridge::{AppShim, Rect, RenderSurface};
//! use glbridge_test_utils::{AckMode, RecordingSink, ScriptedEventLoop, Timeline};
//!
//! let timeline = Timeline::new();
//! let surface = Arc::new(RenderSurface::new());
//! RecordingSink::install(&surface, &timeline, AckMode::Immediately);
//!
//! let app = AppShim::new("application/x-vnd.test").unwrap();
//! let event_loop = ScriptedEventLoop::new(&timeline).close();
//! let status = app
//!     .run(event_loop, Rect::new(0.0, 0.0, 800.0, 600.0), "test", surface, false)
//!     .unwrap();
//! assert_eq!(status, 0);
//! ```

pub mod headless;
pub mod recording;
pub mod scripted;

pub use headless::*;
pub use recording::*;
pub use scripted::*;
