use glbridge_core::geometry::Pos;

use crate::event::{KeyAction, KeyMessage, PointerAction, SurfaceEvent, TextBytes};

/// Maps native input notifications onto [`SurfaceEvent`]s.
///
/// Stateless; runs synchronously on the UI thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct EventTranslator;

impl EventTranslator {
    /// Pointer coordinates pass through unchanged.
    pub fn pointer(action: PointerAction, pos: Pos<f32>) -> SurfaceEvent {
        let Pos { x, y } = pos;
        match action {
            PointerAction::Moved => SurfaceEvent::PointerMoved { x, y },
            PointerAction::Down => SurfaceEvent::PointerDown { x, y },
            PointerAction::Up => SurfaceEvent::PointerUp { x, y },
        }
    }

    /// Emit the events for one key notification, in delivery order.
    ///
    /// A mapped key-down yields `TextInput` then `KeyDown`; an unmapped one only
    /// `KeyDown`. Releases yield a single `KeyUp` and never decode text.
    pub fn key(action: KeyAction, message: &KeyMessage, mut emit: impl FnMut(SurfaceEvent)) {
        match action {
            KeyAction::Down => {
                if message.mapped {
                    emit(SurfaceEvent::TextInput {
                        text: TextBytes::decode(&message.bytes),
                        modifiers: message.modifiers,
                        repeat: message.repeat,
                    });
                }
                emit(SurfaceEvent::KeyDown {
                    keycode: message.keycode,
                    modifiers: message.modifiers,
                    repeat: message.repeat,
                });
            }
            KeyAction::Up => emit(SurfaceEvent::KeyUp {
                keycode: message.keycode,
                modifiers: message.modifiers,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Modifiers;

    fn collect(action: KeyAction, message: &KeyMessage) -> Vec<SurfaceEvent> {
        let mut events = Vec::new();
        EventTranslator::key(action, message, |event| events.push(event));
        events
    }

    #[test]
    fn test_pointer_coordinates_unchanged() {
        let pos = Pos::new(12.5, 40.25);
        assert_eq!(
            EventTranslator::pointer(PointerAction::Moved, pos),
            SurfaceEvent::PointerMoved { x: 12.5, y: 40.25 }
        );
        assert_eq!(
            EventTranslator::pointer(PointerAction::Down, pos),
            SurfaceEvent::PointerDown { x: 12.5, y: 40.25 }
        );
        assert_eq!(
            EventTranslator::pointer(PointerAction::Up, pos),
            SurfaceEvent::PointerUp { x: 12.5, y: 40.25 }
        );
    }

    #[test]
    fn test_mapped_key_down_emits_text_then_key() {
        let modifiers = Modifiers::SHIFT | Modifiers::OPTION;
        let message = KeyMessage::mapped(0x3c, modifiers, 1, "é".as_bytes());

        let events = collect(KeyAction::Down, &message);
        assert_eq!(events.len(), 2);
        match events[0] {
            SurfaceEvent::TextInput {
                text,
                modifiers: m,
                repeat,
            } => {
                assert_eq!(text.len(), 2);
                assert_eq!(text.as_bytes(), "é".as_bytes());
                assert_eq!(m, modifiers);
                assert_eq!(repeat, 1);
            }
            other => panic!("expected TextInput first, got {other:?}"),
        }
        assert_eq!(
            events[1],
            SurfaceEvent::KeyDown {
                keycode: 0x3c,
                modifiers,
                repeat: 1
            }
        );
    }

    #[test]
    fn test_mapped_key_with_undecodable_text_sends_empty_text() {
        let message = KeyMessage::unmapped(0x12, Modifiers::empty(), 0);
        let message = KeyMessage {
            mapped: true,
            ..message
        };

        let events = collect(KeyAction::Down, &message);
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], SurfaceEvent::TextInput { text, .. } if text.is_empty()));
        assert!(matches!(events[1], SurfaceEvent::KeyDown { keycode: 0x12, .. }));
    }

    #[test]
    fn test_unmapped_key_down_emits_only_key() {
        let message = KeyMessage::unmapped(0x4b, Modifiers::CONTROL, 0);

        let events = collect(KeyAction::Down, &message);
        assert_eq!(
            events,
            vec![SurfaceEvent::KeyDown {
                keycode: 0x4b,
                modifiers: Modifiers::CONTROL,
                repeat: 0
            }]
        );
    }

    #[test]
    fn test_key_up_never_decodes_text() {
        let message = KeyMessage::mapped(0x3c, Modifiers::SHIFT, 0, b"a");

        let events = collect(KeyAction::Up, &message);
        assert_eq!(
            events,
            vec![SurfaceEvent::KeyUp {
                keycode: 0x3c,
                modifiers: Modifiers::SHIFT
            }]
        );
    }
}
