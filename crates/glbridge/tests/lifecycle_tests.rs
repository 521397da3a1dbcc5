//! Window and surface lifecycle against the headless platform.
//!
//! These tests drive `AppShim::run` with a scripted event loop and check the
//! order in which the renderer, the native window and the GL context see things.

use std::sync::Arc;
use std::time::Duration;

use glbridge::{
    AppShim, BridgeError, ContextError, HandshakeError, Rect, RenderSurface, Size, SurfaceEvent,
    SurfaceState,
};
use glbridge_core::config::{BridgeConfig, HandshakeConfig, SizeLimits};
use glbridge_test_utils::{
    AckMode, ContextCall, Entry, HeadlessPlatform, NativeCall, RecordingSink, ScriptedEventLoop,
    Step, Timeline,
};
use parking_lot::Mutex;

const RECT: Rect = Rect::new(0.0, 0.0, 800.0, 600.0);

fn app_with(handshake: HandshakeConfig) -> AppShim {
    let config = BridgeConfig {
        handshake,
        ..Default::default()
    };
    AppShim::new("application/x-vnd.glbridge-test")
        .unwrap()
        .with_config(config)
        .unwrap()
}

fn app() -> AppShim {
    app_with(HandshakeConfig {
        attempt_timeout_ms: 10,
        max_attempts: 100,
    })
}

fn surface(timeline: &Timeline, ack: AckMode) -> (Arc<RenderSurface>, Arc<RecordingSink>) {
    let surface = Arc::new(RenderSurface::new());
    let sink = RecordingSink::install(&surface, timeline, ack);
    (surface, sink)
}

#[test]
fn test_created_then_resized_before_show() {
    let timeline = Timeline::new();
    let (surface, _sink) = surface(&timeline, AckMode::Immediately);
    let event_loop = ScriptedEventLoop::new(&timeline).close();

    let status = app().run(event_loop, RECT, "lifecycle", surface, false).unwrap();
    assert_eq!(status, 0);

    let created = timeline.position(&Entry::Event(SurfaceEvent::Created)).unwrap();
    let resized = timeline
        .position(&Entry::Event(SurfaceEvent::Resized {
            width: 800,
            height: 600,
        }))
        .unwrap();
    let shown = timeline.position(&Entry::Native(NativeCall::Show)).unwrap();
    assert!(created < resized);
    assert!(resized < shown);
    assert_eq!(resized, created + 1);

    assert_eq!(timeline.count_events(|e| *e == SurfaceEvent::Created), 1);
    assert_eq!(timeline.resized_events(), vec![Size::new(800, 600)]);
}

#[test]
fn test_window_created_with_title_and_rect_size() {
    let timeline = Timeline::new();
    let (surface, _sink) = surface(&timeline, AckMode::Immediately);
    let event_loop = ScriptedEventLoop::new(&timeline).close();

    app()
        .run(
            event_loop,
            Rect::new(100.0, 50.0, 420.0, 290.0),
            "Teapot",
            surface,
            false,
        )
        .unwrap();

    assert_eq!(
        timeline.native_calls()[0],
        NativeCall::CreateWindow {
            title: "Teapot".to_string(),
            size: Size::new(320, 240),
        }
    );
    assert_eq!(timeline.native_calls()[1], NativeCall::EmbedSurface);
}

#[test]
fn test_destroyed_once_and_before_context_drop() {
    let timeline = Timeline::new();
    let (surface, sink) = surface(&timeline, AckMode::FromThread(Duration::from_millis(30)));
    let event_loop = ScriptedEventLoop::new(&timeline).close();

    let status = app()
        .run(event_loop, RECT, "handshake", surface.clone(), false)
        .unwrap();
    sink.join();
    assert_eq!(status, 0);

    assert_eq!(timeline.count_events(|e| *e == SurfaceEvent::Destroyed), 1);
    let destroyed = timeline.position(&Entry::Event(SurfaceEvent::Destroyed)).unwrap();
    let dropped = timeline
        .position(&Entry::Context(ContextCall::Dropped))
        .unwrap();
    let window_dropped = timeline
        .position(&Entry::Native(NativeCall::DropWindow))
        .unwrap();
    assert!(destroyed < dropped);
    assert!(dropped < window_dropped);

    assert_eq!(surface.state(), SurfaceState::Destroyed);
    assert_eq!(surface.lock_context(), Err(ContextError::Destroyed));
    assert_eq!(surface.acknowledge_quit(), Err(HandshakeError::GateClosed));
}

#[test]
fn test_handshake_without_ack_is_fatal() {
    let timeline = Timeline::new();
    let (surface, _sink) = surface(&timeline, AckMode::Never);
    let event_loop = ScriptedEventLoop::new(&timeline).close();
    let app = app_with(HandshakeConfig {
        attempt_timeout_ms: 5,
        max_attempts: 3,
    });

    let err = app
        .run(event_loop, RECT, "timeout", surface.clone(), false)
        .unwrap_err();
    assert!(matches!(
        err,
        BridgeError::Handshake(HandshakeError::TimedOut { attempts: 3, .. })
    ));

    // The renderer may still be drawing, so the context must survive.
    assert_eq!(surface.state(), SurfaceState::Detaching);
    assert!(!timeline.context_calls().contains(&ContextCall::Dropped));
    assert_eq!(timeline.count_events(|e| *e == SurfaceEvent::Destroyed), 1);
}

#[test]
fn test_second_acknowledgment_is_reported() {
    let timeline = Timeline::new();
    let surface = Arc::new(RenderSurface::new());
    let acks = Arc::new(Mutex::new(Vec::new()));
    let sink_acks = acks.clone();
    let weak = Arc::downgrade(&surface);
    surface.set_sink(Arc::new(move |event: SurfaceEvent| {
        if event != SurfaceEvent::Destroyed {
            return;
        }
        if let Some(surface) = weak.upgrade() {
            sink_acks.lock().push(surface.acknowledge_quit());
            sink_acks.lock().push(surface.acknowledge_quit());
        }
    }));
    let event_loop = ScriptedEventLoop::new(&timeline).close();

    let status = app()
        .run(event_loop, RECT, "double-ack", surface.clone(), false)
        .unwrap();

    assert_eq!(status, 0);
    assert_eq!(
        *acks.lock(),
        vec![Ok(()), Err(HandshakeError::AlreadyAcknowledged)]
    );
    assert_eq!(surface.state(), SurfaceState::Destroyed);
}

#[test]
fn test_ack_before_destroyed_does_not_release_context() {
    let timeline = Timeline::new();
    let (surface, _sink) = surface(&timeline, AckMode::Never);
    let event_loop = ScriptedEventLoop::new(&timeline)
        .renderer(|surface| {
            assert_eq!(
                surface.acknowledge_quit(),
                Err(HandshakeError::NotDetaching)
            );
        })
        .close();
    let app = app_with(HandshakeConfig {
        attempt_timeout_ms: 5,
        max_attempts: 3,
    });

    let err = app
        .run(event_loop, RECT, "early-ack", surface.clone(), false)
        .unwrap_err();
    assert!(matches!(
        err,
        BridgeError::Handshake(HandshakeError::TimedOut { .. })
    ));
    assert_eq!(surface.state(), SurfaceState::Detaching);
    assert!(!timeline.context_calls().contains(&ContextCall::Dropped));
}

#[test]
fn test_fullscreen_never_centers() {
    let timeline = Timeline::new();
    let (surface, _sink) = surface(&timeline, AckMode::Immediately);
    let event_loop = ScriptedEventLoop::new(&timeline).close();

    app().run(event_loop, RECT, "full", surface, true).unwrap();

    let calls = timeline.native_calls();
    assert!(calls.contains(&NativeCall::SetFullscreen(true)));
    assert!(!calls.contains(&NativeCall::CenterOnScreen));
}

#[test]
fn test_windowed_centers_without_fullscreen() {
    let timeline = Timeline::new();
    let (surface, _sink) = surface(&timeline, AckMode::Immediately);
    let event_loop = ScriptedEventLoop::new(&timeline).close();

    app().run(event_loop, RECT, "windowed", surface, false).unwrap();

    let calls = timeline.native_calls();
    assert!(calls.contains(&NativeCall::CenterOnScreen));
    assert!(
        !calls
            .iter()
            .any(|call| matches!(call, NativeCall::SetFullscreen(_)))
    );
}

#[test]
fn test_resize_emits_once_without_stale_size() {
    let timeline = Timeline::new();
    let (surface, _sink) = surface(&timeline, AckMode::Immediately);
    let event_loop = ScriptedEventLoop::new(&timeline)
        .frame_resized(640, 480)
        .frame_resized(640, 480)
        .close();

    app()
        .run(event_loop, RECT, "resize", surface.clone(), false)
        .unwrap();

    assert_eq!(
        timeline.resized_events(),
        vec![Size::new(800, 600), Size::new(640, 480)]
    );
    assert_eq!(surface.size(), Some(Size::new(640, 480)));
    assert!(
        timeline
            .context_calls()
            .contains(&ContextCall::Resize(Size::new(640, 480)))
    );
}

#[test]
fn test_size_limits_clamp_initial_and_programmatic_size() {
    let timeline = Timeline::new();
    let (surface, _sink) = surface(&timeline, AckMode::Immediately);
    let mut config = BridgeConfig::default();
    config.window.size_limits = Some(SizeLimits::new(320, 1024, 240, 768));
    let app = AppShim::new("application/x-vnd.glbridge-test")
        .unwrap()
        .with_config(config)
        .unwrap();
    let event_loop = ScriptedEventLoop::new(&timeline)
        .step(Step::Resize(Size::new(4000, 4000)))
        .close();

    app.run(
        event_loop,
        Rect::new(0.0, 0.0, 2000.0, 100.0),
        "limits",
        surface,
        false,
    )
    .unwrap();

    assert!(timeline.native_calls().contains(&NativeCall::SetSizeLimits {
        min: Size::new(320, 240),
        max: Size::new(1024, 768),
    }));
    assert_eq!(
        timeline.resized_events(),
        vec![Size::new(1024, 240), Size::new(1024, 768)]
    );
}

#[test]
fn test_programmatic_close_quits() {
    let timeline = Timeline::new();
    let (surface, _sink) = surface(&timeline, AckMode::Immediately);
    let event_loop = ScriptedEventLoop::new(&timeline)
        .step(Step::RequestClose)
        .frame_resized(10, 10);

    app()
        .run(event_loop, RECT, "close", surface.clone(), false)
        .unwrap();

    assert!(timeline.native_calls().contains(&NativeCall::RequestClose));
    // The loop stops at the close; later steps never run.
    assert_eq!(timeline.resized_events(), vec![Size::new(800, 600)]);
    assert_eq!(surface.state(), SurfaceState::Destroyed);
}

#[test]
fn test_quit_from_outside_tears_down() {
    let timeline = Timeline::new();
    let (surface, _sink) = surface(&timeline, AckMode::Immediately);
    let event_loop = ScriptedEventLoop::new(&timeline).step(Step::Quit);

    let app = app();
    let status = app
        .run(event_loop, RECT, "quit", surface.clone(), false)
        .unwrap();
    assert_eq!(status, 0);
    assert!(!app.quit_requested());
    assert_eq!(surface.state(), SurfaceState::Destroyed);
}

#[test]
fn test_quit_requested_before_run_is_kept() {
    let timeline = Timeline::new();
    let (surface, _sink) = surface(&timeline, AckMode::Immediately);
    let event_loop = ScriptedEventLoop::new(&timeline).frame_resized(640, 480);

    let app = app();
    app.request_quit();
    let status = app
        .run(event_loop, RECT, "early-quit", surface.clone(), false)
        .unwrap();

    assert_eq!(status, 0);
    assert_eq!(timeline.resized_events(), vec![Size::new(800, 600)]);
    assert_eq!(surface.state(), SurfaceState::Destroyed);
    assert!(!app.quit_requested());
}

#[test]
fn test_renderer_lock_swap_unlock() {
    let timeline = Timeline::new();
    let (surface, _sink) = surface(&timeline, AckMode::Immediately);
    let event_loop = ScriptedEventLoop::new(&timeline)
        .renderer(|surface| {
            surface.lock_context().unwrap();
            assert_eq!(surface.lock_context(), Err(ContextError::AlreadyHeld));
            surface.swap_buffers().unwrap();
            surface.unlock_context().unwrap();
            assert_eq!(surface.swap_buffers(), Err(ContextError::NotHeld));
        })
        .close();

    app().run(event_loop, RECT, "draw", surface, false).unwrap();

    let calls: Vec<_> = timeline
        .context_calls()
        .into_iter()
        .filter(|call| !matches!(call, ContextCall::Resize(_)))
        .collect();
    assert_eq!(
        calls,
        vec![
            ContextCall::MakeCurrent,
            ContextCall::SwapBuffers,
            ContextCall::MakeNotCurrent,
            ContextCall::Dropped,
        ]
    );
}

#[test]
fn test_context_creation_failure_leaves_surface_pending() {
    let timeline = Timeline::new();
    let (surface, _sink) = surface(&timeline, AckMode::Immediately);
    let platform = HeadlessPlatform::new(&timeline).failing_context();
    let event_loop = ScriptedEventLoop::with_platform(platform).close();

    let err = app()
        .run(event_loop, RECT, "no-gl", surface.clone(), false)
        .unwrap_err();
    assert!(matches!(err, BridgeError::Platform(_)));
    assert_eq!(surface.state(), SurfaceState::Pending);
    assert!(timeline.events().is_empty());
    assert_eq!(surface.lock_context(), Err(ContextError::Unavailable));
}

#[test]
fn test_interior_nul_title_rejected() {
    let timeline = Timeline::new();
    let (surface, _sink) = surface(&timeline, AckMode::Immediately);
    let event_loop = ScriptedEventLoop::new(&timeline);

    let err = app()
        .run(event_loop, RECT, "bad\0title", surface, false)
        .unwrap_err();
    assert!(matches!(err, BridgeError::InvalidTitle(_)));
    assert!(timeline.entries().is_empty());
}
