//! Translation of winit window events into [`NativeEvent`]s.

use glbridge::{KeyAction, KeyMessage, Modifiers, NativeEvent, PointerAction, Pos, Size};
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::keyboard::ModifiersState;
use winit::platform::scancode::PhysicalKeyExtScancode;

pub fn modifiers_from_winit(state: ModifiersState) -> Modifiers {
    let mut modifiers = Modifiers::empty();
    modifiers.set(Modifiers::SHIFT, state.shift_key());
    modifiers.set(Modifiers::CONTROL, state.control_key());
    modifiers.set(Modifiers::OPTION, state.alt_key());
    modifiers.set(Modifiers::COMMAND, state.super_key());
    modifiers
}

/// Per-window input state winit reports separately from the events that need it.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputState {
    cursor: Pos<f32>,
    modifiers: Modifiers,
}

impl InputState {
    pub fn translate(&mut self, event: &WindowEvent) -> NativeEvent {
        match event {
            WindowEvent::Resized(size) => {
                NativeEvent::FrameResized(Size::new(size.width, size.height))
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = Pos::new(position.x as f32, position.y as f32);
                NativeEvent::Pointer(PointerAction::Moved, self.cursor)
            }
            WindowEvent::MouseInput { state, .. } => {
                let action = match state {
                    ElementState::Pressed => PointerAction::Down,
                    ElementState::Released => PointerAction::Up,
                };
                NativeEvent::Pointer(action, self.cursor)
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                self.modifiers = modifiers_from_winit(modifiers.state());
                NativeEvent::Other
            }
            WindowEvent::KeyboardInput {
                event,
                is_synthetic: false,
                ..
            } => self.key(event),
            WindowEvent::CloseRequested => NativeEvent::CloseRequested,
            _ => NativeEvent::Other,
        }
    }

    fn key(&self, event: &KeyEvent) -> NativeEvent {
        let keycode = event
            .physical_key
            .to_scancode()
            .map_or(0, |code| code as i32);
        let repeat = i32::from(event.repeat);

        match event.state {
            ElementState::Pressed => {
                let message = match &event.text {
                    Some(text) => {
                        KeyMessage::mapped(keycode, self.modifiers, repeat, text.as_bytes())
                    }
                    None => KeyMessage::unmapped(keycode, self.modifiers, repeat),
                };
                NativeEvent::Key(KeyAction::Down, message)
            }
            ElementState::Released => NativeEvent::Key(
                KeyAction::Up,
                KeyMessage::unmapped(keycode, self.modifiers, repeat),
            ),
        }
    }
}
