//! The callback side of the renderer interface.

use crossbeam_channel::Sender;

use crate::event::SurfaceEvent;

/// Receives normalized events on the UI thread.
///
/// Implementations must return quickly; anything that touches the GL context
/// belongs on the renderer thread, so the usual implementation forwards the
/// event there.
pub trait EventSink: Send + Sync {
    fn send(&self, event: SurfaceEvent);
}

/// Drops every event. Installed until the renderer registers its own sink.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn send(&self, event: SurfaceEvent) {
        tracing::trace!("no renderer sink installed, dropping {:?}", event);
    }
}

/// Forwards events to a renderer thread over a channel.
impl EventSink for Sender<SurfaceEvent> {
    fn send(&self, event: SurfaceEvent) {
        if Sender::send(self, event).is_err() {
            tracing::debug!("renderer channel closed, dropping {:?}", event);
        }
    }
}

impl<F> EventSink for F
where
    F: Fn(SurfaceEvent) + Send + Sync,
{
    fn send(&self, event: SurfaceEvent) {
        self(event)
    }
}
