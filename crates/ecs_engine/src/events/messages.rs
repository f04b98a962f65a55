//! Stock messages sent by the window
//!
//! Input events are translated by the window into these messages and sent to
//! the active scene. Pointer positions are normalised to `[-1, 1]` with `+y`
//! up, matching clip space.

use super::mailbox::{Message, MessageKind};

bitflags::bitflags! {
    /// Modifier keys held during a key event
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        /// Either shift key
        const SHIFT = 1 << 0;
        /// Either control key
        const CONTROL = 1 << 1;
        /// Either alt key
        const ALT = 1 << 2;
        /// Either super / command key
        const SUPER = 1 << 3;
    }
}

/// Key codes used by the stock backends
///
/// Printable keys use their upper-case ASCII value.
pub mod keys {
    /// Space bar
    pub const SPACE: i32 = 32;
    /// A
    pub const A: i32 = 65;
    /// D
    pub const D: i32 = 68;
    /// E
    pub const E: i32 = 69;
    /// Q
    pub const Q: i32 = 81;
    /// S
    pub const S: i32 = 83;
    /// W
    pub const W: i32 = 87;
    /// Escape
    pub const ESCAPE: i32 = 256;
    /// Tab
    pub const TAB: i32 = 258;
    /// Right arrow
    pub const RIGHT: i32 = 262;
    /// Left arrow
    pub const LEFT: i32 = 263;
    /// Down arrow
    pub const DOWN: i32 = 264;
    /// Up arrow
    pub const UP: i32 = 265;
}

/// A key was pressed or released
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyboardMessage {
    /// Backend key code, see [`keys`]
    pub key: i32,
    /// Platform scancode
    pub scancode: i32,
    /// `true` on press and repeat, `false` on release
    pub pressed: bool,
    /// Modifier keys held
    pub modifiers: Modifiers,
    /// Seconds since the window was created
    pub timestamp: f64,
}

impl Message for KeyboardMessage {
    const KIND: MessageKind = "Keyboard";
}

/// A mouse button was pressed or released
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseButtonMessage {
    /// Button index, 0 is the primary button
    pub button: u8,
    /// `true` on press
    pub pressed: bool,
    /// Normalised pointer x
    pub x: f32,
    /// Normalised pointer y
    pub y: f32,
    /// Seconds since the window was created
    pub timestamp: f64,
}

impl Message for MouseButtonMessage {
    const KIND: MessageKind = "MouseButton";
}

/// The pointer moved
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseMotionMessage {
    /// Normalised pointer x
    pub x: f32,
    /// Normalised pointer y
    pub y: f32,
    /// Motion since the previous event, in normalised units
    pub x_rel: f32,
    /// Motion since the previous event, in normalised units
    pub y_rel: f32,
    /// Seconds since the window was created
    pub timestamp: f64,
}

impl Message for MouseMotionMessage {
    const KIND: MessageKind = "MouseMotion";
}

/// The scroll wheel moved
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseScrollMessage {
    /// Horizontal scroll, positive to the left
    pub x: f32,
    /// Vertical scroll, positive away from the user
    pub y: f32,
    /// Seconds since the window was created
    pub timestamp: f64,
}

impl Message for MouseScrollMessage {
    const KIND: MessageKind = "MouseScroll";
}

/// Request to display another scene
///
/// Takes effect at the end of the current frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeSceneMessage {
    /// Scene index, or a step from the current scene when `relative`
    pub offset: isize,
    /// Whether `offset` is relative to the current scene
    pub relative: bool,
}

impl ChangeSceneMessage {
    /// Move by `offset` scenes, wrapping around in both directions
    pub const fn relative(offset: isize) -> Self {
        Self { offset, relative: true }
    }

    /// Jump to the scene at `index`
    #[allow(clippy::cast_possible_wrap)]
    pub const fn absolute(index: usize) -> Self {
        Self { offset: index as isize, relative: false }
    }

    /// Index of the requested scene
    ///
    /// Returns `None` for an absolute index outside `0..count`, or when there
    /// are no scenes at all.
    pub fn target(&self, current: usize, count: usize) -> Option<usize> {
        if count == 0 {
            return None;
        }
        if self.relative {
            let count_signed = isize::try_from(count).ok()?;
            let step = usize::try_from(self.offset.rem_euclid(count_signed)).ok()?;
            Some((current % count + step) % count)
        } else {
            usize::try_from(self.offset).ok().filter(|index| *index < count)
        }
    }
}

impl Message for ChangeSceneMessage {
    const KIND: MessageKind = "ChangeScene";
}

/// Request to close the window
///
/// Takes effect at the end of the current frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuitMessage;

impl Message for QuitMessage {
    const KIND: MessageKind = "Quit";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_change_wraps_forward() {
        let change = ChangeSceneMessage::relative(1);
        assert_eq!(change.target(0, 3), Some(1));
        assert_eq!(change.target(2, 3), Some(0));
    }

    #[test]
    fn test_relative_change_wraps_backward() {
        let change = ChangeSceneMessage::relative(-1);
        assert_eq!(change.target(0, 3), Some(2));
        assert_eq!(ChangeSceneMessage::relative(-7).target(1, 3), Some(0));
    }

    #[test]
    fn test_absolute_change_checks_bounds() {
        assert_eq!(ChangeSceneMessage::absolute(2).target(0, 3), Some(2));
        assert_eq!(ChangeSceneMessage::absolute(3).target(0, 3), None);
        assert_eq!(ChangeSceneMessage { offset: -1, relative: false }.target(0, 3), None);
    }

    #[test]
    fn test_change_without_scenes() {
        assert_eq!(ChangeSceneMessage::relative(1).target(0, 0), None);
    }

    #[test]
    fn test_message_kinds_are_distinct() {
        let kinds = [
            KeyboardMessage::KIND,
            MouseButtonMessage::KIND,
            MouseMotionMessage::KIND,
            MouseScrollMessage::KIND,
            ChangeSceneMessage::KIND,
            QuitMessage::KIND,
        ];
        for (index, kind) in kinds.iter().enumerate() {
            assert!(!kinds[..index].contains(kind), "duplicate kind {kind}");
        }
    }

    #[test]
    fn test_modifiers_combine() {
        let held = Modifiers::SHIFT | Modifiers::CONTROL;
        assert!(held.contains(Modifiers::SHIFT));
        assert!(!held.contains(Modifiers::ALT));
        assert_eq!(Modifiers::default(), Modifiers::empty());
    }
}
