//! The drawable embedded in the window.
//!
//! A [`RenderSurface`] is shared between two threads. The UI thread drives its
//! lifecycle (attach, resize, input, detach) and the renderer thread uses the
//! control surface (lock, swap, unlock, acknowledge). Both sides hold it through
//! an `Arc`.
//!
//! # Lifecycle
//!
//! ```text
//! Pending --attach--> Attached --detach--> Detaching --ack--> Destroyed
//! ```
//!
//! `Destroyed` is only reached after the renderer acknowledged the
//! `SurfaceEvent::Destroyed` notification, so the GL context is never dropped
//! while the renderer may still be using it.

use std::ffi::{CStr, c_void};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::{self, ThreadId};

use glbridge_core::geometry::{Pos, Size};
use glbridge_core::profiling::profile_function;
use parking_lot::{Condvar, Mutex, RwLock};

use crate::error::{BridgeError, ContextError, HandshakeError};
use crate::event::{KeyAction, KeyMessage, PointerAction, SurfaceEvent};
use crate::quit_gate::{HandshakePolicy, QuitGate};
use crate::renderer::{EventSink, NullSink};
use crate::translate::EventTranslator;

/// A GL context bound to a native drawable.
///
/// Implementations are driven from whichever thread holds the surface's context
/// lock; the surface guarantees that at most one thread calls
/// `make_current`/`swap_buffers` at a time.
pub trait GlContext: Send + Sync {
    fn make_current(&self) -> Result<(), ContextError>;

    fn make_not_current(&self) -> Result<(), ContextError>;

    fn swap_buffers(&self) -> Result<(), ContextError>;

    /// Called on the UI thread when the drawable changes size.
    fn resize(&self, size: Size<u32>) {
        let _ = size;
    }

    /// Look up a GL entry point. Null when unknown.
    fn get_proc_address(&self, name: &CStr) -> *const c_void {
        let _ = name;
        std::ptr::null()
    }
}

/// Keyboard focus on the native side.
pub trait Focusable {
    fn has_focus(&self) -> bool;

    fn make_focus(&mut self);
}

/// The notifications a windowing backend delivers to its embedded view.
pub trait ViewHandler {
    fn on_attach(&self, context: Arc<dyn GlContext>) -> Result<(), BridgeError>;

    fn on_detach(&self, policy: &HandshakePolicy) -> Result<(), BridgeError>;

    fn on_resize(&self, size: Size<u32>);

    fn on_pointer(&self, action: PointerAction, pos: Pos<f32>, focus: &mut dyn Focusable);

    fn on_key(&self, action: KeyAction, message: &KeyMessage);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId(u64);

impl SurfaceId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        SurfaceId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "surface#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceState {
    /// Created, not yet embedded in a window.
    Pending,
    Attached,
    Detaching,
    Destroyed,
}

impl SurfaceState {
    const fn name(self) -> &'static str {
        match self {
            SurfaceState::Pending => "pending",
            SurfaceState::Attached => "attached",
            SurfaceState::Detaching => "detaching",
            SurfaceState::Destroyed => "destroyed",
        }
    }
}

struct Lifecycle {
    state: SurfaceState,
    last_size: Option<Size<u32>>,
}

enum Binding {
    Unbound,
    Bound(Arc<dyn GlContext>),
    Destroyed,
}

struct ContextSlot {
    binding: Binding,
    owner: Option<ThreadId>,
}

impl ContextSlot {
    fn context(&self) -> Result<&Arc<dyn GlContext>, ContextError> {
        match &self.binding {
            Binding::Bound(context) => Ok(context),
            Binding::Unbound => Err(ContextError::Unavailable),
            Binding::Destroyed => Err(ContextError::Destroyed),
        }
    }
}

pub struct RenderSurface {
    id: SurfaceId,
    lifecycle: Mutex<Lifecycle>,
    sink: RwLock<Arc<dyn EventSink>>,
    slot: Mutex<ContextSlot>,
    released: Condvar,
    gate: RwLock<Option<Arc<QuitGate>>>,
}

impl RenderSurface {
    pub fn new() -> Self {
        let surface = Self {
            id: SurfaceId::next(),
            lifecycle: Mutex::new(Lifecycle {
                state: SurfaceState::Pending,
                last_size: None,
            }),
            sink: RwLock::new(Arc::new(NullSink)),
            slot: Mutex::new(ContextSlot {
                binding: Binding::Unbound,
                owner: None,
            }),
            released: Condvar::new(),
            gate: RwLock::new(Some(Arc::new(QuitGate::new()))),
        };
        tracing::debug!("{} created", surface.id);
        surface
    }

    pub fn id(&self) -> SurfaceId {
        self.id
    }

    pub fn state(&self) -> SurfaceState {
        self.lifecycle.lock().state
    }

    pub fn is_attached(&self) -> bool {
        self.state() == SurfaceState::Attached
    }

    /// The last size reported to the renderer.
    pub fn size(&self) -> Option<Size<u32>> {
        self.lifecycle.lock().last_size
    }

    pub fn set_sink(&self, sink: Arc<dyn EventSink>) {
        *self.sink.write() = sink;
    }

    fn sink(&self) -> Arc<dyn EventSink> {
        self.sink.read().clone()
    }

    fn emit(&self, event: SurfaceEvent) {
        tracing::trace!("{} -> {:?}", self.id, event);
        self.sink().send(event);
    }

    /// Bind the GL context. Pending -> Attached; no event is emitted.
    pub fn attach(&self, context: Arc<dyn GlContext>) -> Result<(), BridgeError> {
        let mut lifecycle = self.lifecycle.lock();
        if lifecycle.state != SurfaceState::Pending {
            return Err(BridgeError::SurfaceState(
                lifecycle.state.name(),
                SurfaceState::Pending.name(),
            ));
        }

        self.slot.lock().binding = Binding::Bound(context);
        lifecycle.state = SurfaceState::Attached;
        tracing::debug!("{} attached", self.id);
        Ok(())
    }

    /// Deliver `Created` followed by the initial `Resized`.
    pub(crate) fn announce(&self, size: Size<u32>) {
        {
            let mut lifecycle = self.lifecycle.lock();
            lifecycle.last_size = Some(size);
        }
        self.slot_context_resize(size);
        self.emit(SurfaceEvent::Created);
        self.emit(SurfaceEvent::resized(size));
    }

    /// Report a new content size. Repeats of the last reported size are dropped.
    pub fn resize(&self, size: Size<u32>) {
        profile_function!();
        {
            let mut lifecycle = self.lifecycle.lock();
            if lifecycle.state != SurfaceState::Attached {
                tracing::trace!("{} ignoring resize while {:?}", self.id, lifecycle.state);
                return;
            }
            if lifecycle.last_size == Some(size) {
                return;
            }
            lifecycle.last_size = Some(size);
        }

        self.slot_context_resize(size);
        self.emit(SurfaceEvent::resized(size));
    }

    fn slot_context_resize(&self, size: Size<u32>) {
        let context = self.slot.lock().context().ok().cloned();
        if let Some(context) = context {
            context.resize(size);
        }
    }

    pub fn pointer(&self, action: PointerAction, pos: Pos<f32>, focus: &mut dyn Focusable) {
        if !self.is_attached() {
            return;
        }
        if action == PointerAction::Down && !focus.has_focus() {
            focus.make_focus();
        }
        self.emit(EventTranslator::pointer(action, pos));
    }

    pub fn key(&self, action: KeyAction, message: &KeyMessage) {
        if !self.is_attached() {
            return;
        }
        let sink = self.sink();
        EventTranslator::key(action, message, |event| {
            tracing::trace!("{} -> {:?}", self.id, event);
            sink.send(event);
        });
    }

    /// Tear down: deliver `Destroyed`, wait for the renderer's acknowledgment,
    /// then drop the quit gate and the GL context.
    ///
    /// On `HandshakeError::TimedOut` the context stays alive and the surface stays
    /// `Detaching`; calling `detach` again resumes waiting without re-sending
    /// `Destroyed`.
    pub fn detach(&self, policy: &HandshakePolicy) -> Result<(), BridgeError> {
        profile_function!();
        let previous = {
            let mut lifecycle = self.lifecycle.lock();
            let previous = lifecycle.state;
            match previous {
                SurfaceState::Attached => lifecycle.state = SurfaceState::Detaching,
                SurfaceState::Pending => lifecycle.state = SurfaceState::Destroyed,
                SurfaceState::Detaching => {}
                SurfaceState::Destroyed => {
                    return Err(BridgeError::SurfaceState(
                        previous.name(),
                        SurfaceState::Attached.name(),
                    ));
                }
            }
            previous
        };

        match previous {
            SurfaceState::Pending => {
                tracing::debug!("{} destroyed before it was attached", self.id);
                self.gate.write().take();
                self.destroy_context();
                return Ok(());
            }
            SurfaceState::Attached => {
                tracing::debug!("{} detaching", self.id);
                self.emit(SurfaceEvent::Destroyed);
            }
            _ => tracing::debug!("{} resuming quit handshake", self.id),
        }

        let gate = self.gate.read().clone().ok_or(HandshakeError::GateClosed)?;
        if let Err(e) = gate.wait(policy) {
            tracing::error!("{} quit handshake failed: {}", self.id, e);
            return Err(e.into());
        }

        self.gate.write().take();
        self.destroy_context();
        self.lifecycle.lock().state = SurfaceState::Destroyed;
        tracing::debug!("{} destroyed", self.id);
        Ok(())
    }

    fn destroy_context(&self) {
        let binding = {
            let mut slot = self.slot.lock();
            if let Some(owner) = slot.owner.take() {
                tracing::warn!(
                    "{} context still locked by {:?} after quit was acknowledged",
                    self.id,
                    owner
                );
            }
            let binding = std::mem::replace(&mut slot.binding, Binding::Destroyed);
            self.released.notify_all();
            binding
        };
        drop(binding);
    }

    /// Acquire the GL context for the calling thread, blocking while another
    /// thread holds it. Not reentrant.
    pub fn lock_context(&self) -> Result<(), ContextError> {
        let me = thread::current().id();
        let mut slot = self.slot.lock();
        loop {
            match slot.owner {
                Some(owner) if owner == me => return Err(ContextError::AlreadyHeld),
                Some(_) => self.released.wait(&mut slot),
                None => break,
            }
        }

        slot.context()?.make_current()?;
        slot.owner = Some(me);
        Ok(())
    }

    pub fn unlock_context(&self) -> Result<(), ContextError> {
        let me = thread::current().id();
        let mut slot = self.slot.lock();
        if slot.owner != Some(me) {
            return Err(ContextError::NotHeld);
        }

        let result = slot.context().and_then(|context| context.make_not_current());
        slot.owner = None;
        self.released.notify_one();
        result
    }

    /// Present the back buffer. The calling thread must hold the context.
    pub fn swap_buffers(&self) -> Result<(), ContextError> {
        let me = thread::current().id();
        let context = {
            let slot = self.slot.lock();
            if slot.owner != Some(me) {
                return Err(ContextError::NotHeld);
            }
            slot.context()?.clone()
        };
        context.swap_buffers()
    }

    pub fn is_context_held(&self) -> bool {
        self.slot.lock().owner == Some(thread::current().id())
    }

    /// Renderer side of the quit handshake.
    ///
    /// Only accepted while the surface is `Detaching`, i.e. after
    /// `SurfaceEvent::Destroyed` was delivered.
    pub fn acknowledge_quit(&self) -> Result<(), HandshakeError> {
        match self.state() {
            SurfaceState::Detaching => {}
            SurfaceState::Destroyed => return Err(HandshakeError::GateClosed),
            SurfaceState::Pending | SurfaceState::Attached => {
                tracing::warn!("{} quit acknowledged before detach, ignoring", self.id);
                return Err(HandshakeError::NotDetaching);
            }
        }
        let gate = self.gate.read().clone().ok_or(HandshakeError::GateClosed)?;
        gate.acknowledge()
    }

    pub fn get_proc_address(&self, name: &CStr) -> *const c_void {
        match self.slot.lock().context() {
            Ok(context) => context.get_proc_address(name),
            Err(_) => std::ptr::null(),
        }
    }
}

impl Default for RenderSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RenderSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderSurface")
            .field("id", &self.id)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl ViewHandler for RenderSurface {
    fn on_attach(&self, context: Arc<dyn GlContext>) -> Result<(), BridgeError> {
        self.attach(context)
    }

    fn on_detach(&self, policy: &HandshakePolicy) -> Result<(), BridgeError> {
        self.detach(policy)
    }

    fn on_resize(&self, size: Size<u32>) {
        self.resize(size)
    }

    fn on_pointer(&self, action: PointerAction, pos: Pos<f32>, focus: &mut dyn Focusable) {
        self.pointer(action, pos, focus)
    }

    fn on_key(&self, action: KeyAction, message: &KeyMessage) {
        self.key(action, message)
    }
}
