//! Shared call log and the recording renderer.

use std::sync::{Arc, Weak};
use std::thread;
use std::time::Duration;

use glbridge::{EventSink, RenderSurface, Size, SurfaceEvent};
use parking_lot::Mutex;

use crate::headless::{ContextCall, NativeCall};

#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    Native(NativeCall),
    Context(ContextCall),
    Event(SurfaceEvent),
}

/// An ordered log shared by everything a test wires together.
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    entries: Arc<Mutex<Vec<Entry>>>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, entry: Entry) {
        self.entries.lock().push(entry);
    }

    pub fn entries(&self) -> Vec<Entry> {
        self.entries.lock().clone()
    }

    pub fn events(&self) -> Vec<SurfaceEvent> {
        self.entries
            .lock()
            .iter()
            .filter_map(|entry| match entry {
                Entry::Event(event) => Some(*event),
                _ => None,
            })
            .collect()
    }

    pub fn native_calls(&self) -> Vec<NativeCall> {
        self.entries
            .lock()
            .iter()
            .filter_map(|entry| match entry {
                Entry::Native(call) => Some(call.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn context_calls(&self) -> Vec<ContextCall> {
        self.entries
            .lock()
            .iter()
            .filter_map(|entry| match entry {
                Entry::Context(call) => Some(*call),
                _ => None,
            })
            .collect()
    }

    /// Index of the first entry equal to `entry`.
    pub fn position(&self, entry: &Entry) -> Option<usize> {
        self.entries.lock().iter().position(|e| e == entry)
    }

    pub fn count_events(&self, predicate: impl Fn(&SurfaceEvent) -> bool) -> usize {
        self.events().iter().filter(|event| predicate(event)).count()
    }

    pub fn resized_events(&self) -> Vec<Size<u32>> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                SurfaceEvent::Resized { width, height } => {
                    Some(Size::new(width as u32, height as u32))
                }
                _ => None,
            })
            .collect()
    }
}

/// What the recording renderer does when it sees `SurfaceEvent::Destroyed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AckMode {
    /// Never acknowledge; teardown should time out.
    Never,
    /// Acknowledge from inside the callback, on the UI thread.
    Immediately,
    /// Acknowledge from a separate thread after a delay.
    FromThread(Duration),
}

/// A renderer stand-in that logs every event into a [`Timeline`].
pub struct RecordingSink {
    timeline: Timeline,
    surface: Weak<RenderSurface>,
    ack: AckMode,
    renderers: Mutex<Vec<thread::JoinHandle<()>>>,
}

impl RecordingSink {
    /// Create a sink for `surface` and install it.
    pub fn install(surface: &Arc<RenderSurface>, timeline: &Timeline, ack: AckMode) -> Arc<Self> {
        let sink = Arc::new(Self {
            timeline: timeline.clone(),
            surface: Arc::downgrade(surface),
            ack,
            renderers: Mutex::new(Vec::new()),
        });
        surface.set_sink(sink.clone());
        sink
    }

    /// Wait for acknowledgments sent from background threads.
    pub fn join(&self) {
        for handle in self.renderers.lock().drain(..) {
            let _ = handle.join();
        }
    }

    fn acknowledge(&self) {
        let Some(surface) = self.surface.upgrade() else {
            return;
        };

        match self.ack {
            AckMode::Never => {}
            AckMode::Immediately => {
                if let Err(e) = surface.acknowledge_quit() {
                    tracing::warn!("recording sink failed to acknowledge quit: {}", e);
                }
            }
            AckMode::FromThread(delay) => {
                let handle = thread::Builder::new()
                    .name("recording-renderer".to_string())
                    .spawn(move || {
                        thread::sleep(delay);
                        if let Err(e) = surface.acknowledge_quit() {
                            tracing::warn!("recording renderer failed to acknowledge quit: {}", e);
                        }
                    });
                match handle {
                    Ok(handle) => self.renderers.lock().push(handle),
                    Err(e) => tracing::error!("failed to spawn recording renderer: {}", e),
                }
            }
        }
    }
}

impl EventSink for RecordingSink {
    fn send(&self, event: SurfaceEvent) {
        self.timeline.push(Entry::Event(event));
        if event == SurfaceEvent::Destroyed {
            self.acknowledge();
        }
    }
}
