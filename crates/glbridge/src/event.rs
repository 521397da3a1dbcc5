//! Event vocabularies on both sides of the bridge.
//!
//! [`NativeEvent`] is what a windowing backend reports; [`SurfaceEvent`] is what
//! the renderer receives. [`EventTranslator`](crate::translate::EventTranslator)
//! maps one onto the other.

use glbridge_core::geometry::{Pos, Size};

/// Decoded key text: at most three bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextBytes {
    bytes: [u8; 3],
    len: u8,
}

impl TextBytes {
    pub const fn empty() -> Self {
        Self {
            bytes: [0; 3],
            len: 0,
        }
    }

    /// Take bytes in order until the first one the toolkit failed to decode.
    pub fn decode(raw: &[Option<u8>; 3]) -> Self {
        let mut text = Self::empty();
        for byte in raw.iter().map_while(|byte| *byte) {
            text.bytes[text.len as usize] = byte;
            text.len += 1;
        }
        text
    }

    /// First three bytes of `s`. Multi-byte sequences longer than that are cut.
    pub fn from_str_prefix(s: &str) -> Self {
        let mut raw = [None; 3];
        for (slot, byte) in raw.iter_mut().zip(s.bytes()) {
            *slot = Some(byte);
        }
        Self::decode(&raw)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

bitflags::bitflags! {
    /// Keyboard modifier mask.
    ///
    /// Carries the toolkit's raw mask unchanged; bits without a name survive
    /// the round trip through [`Modifiers::from_raw`] and [`Modifiers::raw`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u32 {
        const SHIFT = 0x0000_0001;
        const COMMAND = 0x0000_0002;
        const CONTROL = 0x0000_0004;
        const CAPS_LOCK = 0x0000_0008;
        const SCROLL_LOCK = 0x0000_0010;
        const NUM_LOCK = 0x0000_0020;
        const OPTION = 0x0000_0040;
        const MENU = 0x0000_0080;
    }
}

impl Modifiers {
    pub const fn from_raw(mask: i32) -> Self {
        Self::from_bits_retain(mask as u32)
    }

    pub const fn raw(&self) -> i32 {
        self.bits() as i32
    }
}

/// A normalized event delivered to the renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SurfaceEvent {
    Created,
    Destroyed,
    Resized { width: i32, height: i32 },
    PointerMoved { x: f32, y: f32 },
    PointerDown { x: f32, y: f32 },
    PointerUp { x: f32, y: f32 },
    TextInput {
        text: TextBytes,
        modifiers: Modifiers,
        repeat: i32,
    },
    KeyDown {
        keycode: i32,
        modifiers: Modifiers,
        repeat: i32,
    },
    KeyUp { keycode: i32, modifiers: Modifiers },
}

impl SurfaceEvent {
    pub fn resized(size: Size<u32>) -> Self {
        SurfaceEvent::Resized {
            width: size.width as i32,
            height: size.height as i32,
        }
    }
}

/// A key press or release as the toolkit reported it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyMessage {
    pub keycode: i32,
    pub modifiers: Modifiers,
    pub repeat: i32,
    /// Whether the toolkit has a character mapping for the key.
    pub mapped: bool,
    /// Decoded text, `None` from the first byte that failed to decode.
    pub bytes: [Option<u8>; 3],
}

impl KeyMessage {
    pub fn mapped(keycode: i32, modifiers: Modifiers, repeat: i32, text: &[u8]) -> Self {
        let mut bytes = [None; 3];
        for (slot, byte) in bytes.iter_mut().zip(text) {
            *slot = Some(*byte);
        }
        Self {
            keycode,
            modifiers,
            repeat,
            mapped: true,
            bytes,
        }
    }

    pub fn unmapped(keycode: i32, modifiers: Modifiers, repeat: i32) -> Self {
        Self {
            keycode,
            modifiers,
            repeat,
            mapped: false,
            bytes: [None; 3],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerAction {
    Moved,
    Down,
    Up,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Down,
    Up,
}

/// A notification from the windowing backend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NativeEvent {
    /// The content area changed size.
    FrameResized(Size<u32>),
    Pointer(PointerAction, Pos<f32>),
    Key(KeyAction, KeyMessage),
    CloseRequested,
    /// Anything the bridge has no policy for; left to the toolkit.
    Other,
}

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct HandleStatus: u8 {
        const HANDLED = 0b00000001;
        const CONSUMED = 0b00000010;
    }
}

impl HandleStatus {
    pub const fn is_consumed(&self) -> bool {
        self.contains(Self::CONSUMED)
    }

    pub const fn is_handled(&self) -> bool {
        self.contains(Self::HANDLED)
    }

    pub const fn consumed() -> Self {
        Self::from_bits_truncate(Self::HANDLED.bits() | Self::CONSUMED.bits())
    }

    pub const fn handled() -> Self {
        Self::from_bits_truncate(Self::HANDLED.bits())
    }

    pub const fn ignored() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_stops_at_first_failure() {
        let text = TextBytes::decode(&[Some(b'a'), None, Some(b'c')]);
        assert_eq!(text.as_bytes(), b"a");

        let text = TextBytes::decode(&[None, Some(b'b'), Some(b'c')]);
        assert!(text.is_empty());
    }

    #[test]
    fn test_str_prefix_truncates_to_three_bytes() {
        assert_eq!(TextBytes::from_str_prefix("é").as_bytes(), "é".as_bytes());
        assert_eq!(TextBytes::from_str_prefix("abcd").len(), 3);
        assert!(TextBytes::from_str_prefix("").is_empty());
    }

    #[test]
    fn test_modifiers_keep_unknown_bits() {
        let raw = 0x4000_0005;
        let modifiers = Modifiers::from_raw(raw);
        assert!(modifiers.contains(Modifiers::SHIFT | Modifiers::CONTROL));
        assert_eq!(modifiers.raw(), raw);
    }

    #[test]
    fn test_handle_status() {
        assert!(HandleStatus::consumed().is_handled());
        assert!(HandleStatus::consumed().is_consumed());
        assert!(!HandleStatus::handled().is_consumed());
        assert!(!HandleStatus::ignored().is_handled());
    }
}
